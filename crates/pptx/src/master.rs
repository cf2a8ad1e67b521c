//! Slide masters: the background and decoration shared by every slide.

use crate::drawing::{emu, Drawable, Fill, Frame, ShapeSpec, TextBox, TextStyle};
use deck_core::request::{ColorSpec, FontSpec, MasterTemplateRequest};
use deck_core::theme::resolve_color;
use deck_core::{Canvas, ColorScheme, Fonts, Theme};

pub const DECK_MASTER_NAME: &str = "MASTER_SLIDE";
pub const TABLE_MASTER_NAME: &str = "TABLE_MASTER";

/// Left accent bar width, inches.
const SIDE_BAR_WIDTH: f64 = 0.4;
/// Footer bar height on generated decks, inches.
const DECK_FOOTER_HEIGHT: f64 = 0.3;
/// Header and footer bar heights on templates, inches.
const TEMPLATE_HEADER_HEIGHT: f64 = 0.75;
const TEMPLATE_FOOTER_HEIGHT: f64 = 0.7;
/// Header band height on table decks, inches.
const TABLE_HEADER_HEIGHT: f64 = 0.75;
const TABLE_HEADER_FILL: &str = "F1F1F1";
const TABLE_HEADER_TEXT: &str = "333333";

/// Page number box: fixed x, y at 95% of the canvas height.
const SLIDE_NUMBER_X: f64 = 0.3;
const SLIDE_NUMBER_Y_FRACTION: f64 = 0.95;
const SLIDE_NUMBER_SIZE: (f64, f64) = (0.8, 0.25);

/// Logo box defaults, inches.
const LOGO_DEFAULT: (f64, f64, f64, f64) = (9.0, 0.1, 1.0, 0.5);

/// One reusable master shared by every slide of a deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Master {
    pub name: String,
    pub canvas: Canvas,
    /// Colors and fonts written to the package theme.
    pub theme: Theme,
    pub background: Fill,
    /// Drawn behind every slide, in order.
    pub decorations: Vec<Drawable>,
    pub slide_number: Option<Frame>,
    pub slide_number_color: String,
}

impl Master {
    /// Master for a generated deck: background, full-height left bar in the
    /// primary color, full-width footer bar in the accent color.
    pub fn for_theme(theme: &Theme, canvas: Canvas) -> Self {
        let (width, height) = canvas.size();
        let colors = &theme.color_scheme;
        let decorations = vec![
            Drawable::Shape(ShapeSpec::rect(
                Frame::inches(0.0, 0.0, SIDE_BAR_WIDTH, height),
                Fill::solid(&colors.primary),
            )),
            Drawable::Shape(ShapeSpec::rect(
                Frame::inches(0.0, height - DECK_FOOTER_HEIGHT, width, DECK_FOOTER_HEIGHT),
                Fill::solid(&colors.accent),
            )),
        ];

        Self {
            name: DECK_MASTER_NAME.to_string(),
            canvas,
            theme: theme.clone(),
            background: Fill::solid(&colors.background),
            decorations,
            slide_number: Some(slide_number_frame(canvas)),
            slide_number_color: colors.background.clone(),
        }
    }

    /// Master for a table import: white background with a light header band
    /// carrying the deck title.
    pub fn for_table(title: Option<&str>, canvas: Canvas) -> Self {
        let width = canvas.width();
        let decorations = vec![
            Drawable::Shape(ShapeSpec::rect(
                Frame::inches(0.0, 0.0, width, TABLE_HEADER_HEIGHT),
                Fill::solid(TABLE_HEADER_FILL),
            )),
            Drawable::Text(TextBox::new(
                Frame::inches(0.5, 0.1, 5.5, TABLE_HEADER_HEIGHT),
                title.unwrap_or("Data Presentation"),
                TextStyle::new(20.0, TABLE_HEADER_TEXT).bold(true),
            )),
        ];

        Self {
            name: TABLE_MASTER_NAME.to_string(),
            canvas,
            theme: Theme::default(),
            background: Fill::solid("FFFFFF"),
            decorations,
            slide_number: Some(slide_number_frame(canvas)),
            slide_number_color: TABLE_HEADER_TEXT.to_string(),
        }
    }

    /// Master described by a template request: header and footer bars,
    /// optional footer text and an optional labelled logo box.
    pub fn for_template(request: &MasterTemplateRequest, canvas: Canvas) -> Self {
        let theme = template_theme(request);
        let colors = &theme.color_scheme;
        let (width, height) = canvas.size();
        let footer_y = height - TEMPLATE_FOOTER_HEIGHT;

        let mut decorations = vec![
            Drawable::Shape(ShapeSpec::rect(
                Frame::inches(0.0, 0.0, width, TEMPLATE_HEADER_HEIGHT),
                Fill::solid(&colors.primary),
            )),
            Drawable::Shape(ShapeSpec::rect(
                Frame::inches(0.0, footer_y, width, TEMPLATE_FOOTER_HEIGHT),
                Fill::solid(&colors.accent),
            )),
        ];

        if let Some(text) = request.footer_text.as_deref().filter(|t| !t.trim().is_empty()) {
            decorations.push(Drawable::Text(TextBox::new(
                Frame::inches(0.5, footer_y + 0.07, width - 1.0, 0.5),
                text,
                TextStyle::new(12.0, "FFFFFF"),
            )));
        }

        if let Some(logo) = &request.logo_position {
            let frame = Frame::sanitized(
                logo.x.unwrap_or(LOGO_DEFAULT.0),
                logo.y.unwrap_or(LOGO_DEFAULT.1),
                logo.w.unwrap_or(LOGO_DEFAULT.2),
                logo.h.unwrap_or(LOGO_DEFAULT.3),
                LOGO_DEFAULT,
            );
            decorations.push(Drawable::Shape(
                ShapeSpec::rect(frame, Fill::transparent(&colors.secondary, 80.0))
                    .with_stroke(&colors.secondary, 1.0),
            ));
            decorations.push(Drawable::Text(TextBox::new(
                frame,
                "LOGO",
                TextStyle::new(12.0, &colors.secondary).centered(),
            )));
        }

        let background = request.background.as_ref();
        let background_color = resolve_color(
            background.and_then(|b| b.color.as_deref()),
            &colors.background,
        );
        let transparency = background.and_then(|b| b.transparency).unwrap_or(0.0);

        Self {
            name: request.title.clone(),
            canvas,
            background: Fill::transparent(background_color, transparency),
            decorations,
            slide_number: Some(slide_number_frame(canvas)),
            slide_number_color: colors.text.clone(),
            theme,
        }
    }

    /// The per-slide page number box, if this master numbers slides.
    pub fn slide_number_box(&self, number: usize) -> Option<TextBox> {
        self.slide_number.map(|frame| {
            TextBox::slide_number(
                frame,
                number.to_string(),
                TextStyle::new(10.0, &self.slide_number_color),
            )
        })
    }
}

fn slide_number_frame(canvas: Canvas) -> Frame {
    let y = canvas.height() * SLIDE_NUMBER_Y_FRACTION;
    let frame = Frame::inches(SLIDE_NUMBER_X, y, SLIDE_NUMBER_SIZE.0, SLIDE_NUMBER_SIZE.1);
    // Keep the box on the canvas.
    let bottom = emu(canvas.height());
    Frame {
        y: frame.y.min(bottom - frame.cy),
        ..frame
    }
}

/// Theme of a template request, every key defaulted.
pub fn template_theme(request: &MasterTemplateRequest) -> Theme {
    let defaults = ColorScheme::default();
    let requested = request.color_scheme.clone().unwrap_or_default();
    let ColorSpec {
        primary,
        secondary,
        accent,
        background,
        text,
    } = requested;
    let color_scheme = ColorScheme {
        primary: resolve_color(primary.as_deref(), &defaults.primary),
        secondary: resolve_color(secondary.as_deref(), &defaults.secondary),
        accent: resolve_color(accent.as_deref(), &defaults.accent),
        background: resolve_color(background.as_deref(), &defaults.background),
        text: resolve_color(text.as_deref(), &defaults.text),
    };

    let default_fonts = Fonts::default();
    let FontSpec { title, body } = request.fonts.clone().unwrap_or_default();
    let non_empty = |font: Option<String>, fallback: String| {
        font.filter(|f| !f.trim().is_empty()).unwrap_or(fallback)
    };
    let fonts = Fonts {
        title: non_empty(title, default_fonts.title),
        body: non_empty(body, default_fonts.body),
    };

    Theme {
        color_scheme,
        fonts,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::request::{BackgroundSpec, LogoPosition};

    fn shapes(master: &Master) -> Vec<&ShapeSpec> {
        master
            .decorations
            .iter()
            .filter_map(|d| match d {
                Drawable::Shape(shape) => Some(shape),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_deck_master_bars() {
        let mut theme = Theme::default();
        theme.color_scheme.primary = "112233".into();
        theme.color_scheme.accent = "445566".into();
        let master = Master::for_theme(&theme, Canvas::Standard16x9);

        let bars = shapes(&master);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].fill.as_ref().unwrap().color, "112233");
        assert_eq!(bars[0].frame.cy, emu(5.625));
        assert_eq!(bars[1].fill.as_ref().unwrap().color, "445566");
        assert_eq!(bars[1].frame.cx, emu(10.0));
        assert_eq!(bars[1].frame.y + bars[1].frame.cy, emu(5.625));
        assert_eq!(master.background.color, theme.color_scheme.background);
    }

    #[test]
    fn test_slide_number_on_canvas() {
        for canvas in [Canvas::Standard16x9, Canvas::Wide, Canvas::Standard4x3] {
            let frame = slide_number_frame(canvas);
            assert_eq!(frame.x, emu(SLIDE_NUMBER_X));
            assert!(frame.y + frame.cy <= emu(canvas.height()));
        }
    }

    #[test]
    fn test_template_defaults() {
        let request = MasterTemplateRequest::new("Brand");
        let master = Master::for_template(&request, Canvas::default());
        assert_eq!(master.name, "Brand");
        assert_eq!(master.theme.color_scheme, ColorScheme::default());
        assert_eq!(master.theme.fonts, Fonts::default());
        // Header and footer bars only.
        assert_eq!(master.decorations.len(), 2);
    }

    #[test]
    fn test_template_logo_and_footer() {
        let mut request = MasterTemplateRequest::new("Brand");
        request.footer_text = Some("Confidential".into());
        request.logo_position = Some(LogoPosition {
            x: Some(8.0),
            ..Default::default()
        });
        request.color_scheme = Some(ColorSpec {
            secondary: Some("#00aa00".into()),
            ..Default::default()
        });
        request.background = Some(BackgroundSpec {
            color: None,
            transparency: Some(25.0),
        });
        let master = Master::for_template(&request, Canvas::default());

        assert_eq!(master.decorations.len(), 5);
        let logo = shapes(&master)[2];
        assert_eq!(logo.frame, Frame::inches(8.0, 0.1, 1.0, 0.5));
        assert_eq!(logo.fill.as_ref().unwrap().color, "00AA00");
        assert_eq!(logo.fill.as_ref().unwrap().transparency, 80.0);
        assert_eq!(master.background.transparency, 25.0);
        assert!(master.decorations.iter().any(|d| matches!(
            d,
            Drawable::Text(TextBox { style, .. }) if style.size == 12.0 && style.color == "FFFFFF"
        )));
    }

    #[test]
    fn test_table_master_title() {
        let master = Master::for_table(None, Canvas::default());
        assert_eq!(master.name, TABLE_MASTER_NAME);
        let title = master.decorations.iter().find_map(|d| match d {
            Drawable::Text(text) => Some(text.content.clone()),
            _ => None,
        });
        assert_eq!(
            title,
            Some(crate::drawing::TextContent::Paragraphs(vec!["Data Presentation".into()]))
        );
    }

    #[test]
    fn test_slide_number_box() {
        let master = Master::for_theme(&Theme::default(), Canvas::default());
        let number = master.slide_number_box(3).unwrap();
        assert_eq!(number.content, crate::drawing::TextContent::SlideNumber("3".into()));
    }
}
