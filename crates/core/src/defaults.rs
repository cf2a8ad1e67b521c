//! Layout defaulting and slide-list reconciliation.
//!
//! All default geometry comes from one table keyed by [`Region`], laid out
//! for the 16:9 reference canvas and scaled to the requested [`Canvas`].

use crate::fallback;
use crate::theme;
use crate::types::{
    Align, Document, Placement, Section, Slide, SlideLayout, SlideType, TextStyle,
};
use std::collections::HashSet;

/// Width and height, in inches, of the canvas the default table targets.
const REFERENCE_SIZE: (f64, f64) = (10.0, 5.625);

/// Named slide canvases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Canvas {
    /// 10 x 5.625 in.
    #[default]
    Standard16x9,
    /// 10 x 6.25 in.
    Standard16x10,
    /// 10 x 7.5 in.
    Standard4x3,
    /// 13.333 x 7.5 in.
    Wide,
}

impl Canvas {
    /// Resolve a caller-supplied layout name. Unknown names get 16:9.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("wide") | Some("layout_wide") => Self::Wide,
            Some("16x10") | Some("layout_16x10") => Self::Standard16x10,
            Some("4x3") | Some("layout_4x3") => Self::Standard4x3,
            _ => Self::Standard16x9,
        }
    }

    /// Size in inches.
    pub fn size(&self) -> (f64, f64) {
        match self {
            Self::Standard16x9 => REFERENCE_SIZE,
            Self::Standard16x10 => (10.0, 6.25),
            Self::Standard4x3 => (10.0, 7.5),
            Self::Wide => (13.333, 7.5),
        }
    }

    pub fn width(&self) -> f64 {
        self.size().0
    }

    pub fn height(&self) -> f64 {
        self.size().1
    }

    /// Map a rectangle from the reference canvas onto this one.
    pub fn scale(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
        let sx = self.width() / REFERENCE_SIZE.0;
        let sy = self.height() / REFERENCE_SIZE.1;
        (x * sx, y * sy, w * sx, h * sy)
    }
}

/// Regions of a slide that have default geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The slide title block.
    Title,
    /// The bullet body block.
    Body,
    /// The dedicated chart slot.
    Chart,
    /// The image placeholder slot.
    Image,
    /// The table slot when the slide has no bullets.
    Table,
}

struct RegionDefaults {
    region: Region,
    frame: (f64, f64, f64, f64),
    align: Option<Align>,
    font_size: f64,
    bold: bool,
    bullet: bool,
    line_spacing: f64,
}

const REGION_DEFAULTS: &[RegionDefaults] = &[
    RegionDefaults {
        region: Region::Title,
        frame: (0.8, 0.5, 8.4, 1.2),
        align: Some(Align::Left),
        font_size: 38.0,
        bold: true,
        bullet: false,
        line_spacing: 1.0,
    },
    RegionDefaults {
        region: Region::Body,
        frame: (0.8, 2.0, 8.4, 3.2),
        align: Some(Align::Left),
        font_size: 24.0,
        bold: false,
        bullet: true,
        line_spacing: 1.5,
    },
    RegionDefaults {
        region: Region::Chart,
        frame: (5.5, 2.2, 4.0, 3.0),
        align: None,
        font_size: 14.0,
        bold: false,
        bullet: false,
        line_spacing: 1.0,
    },
    RegionDefaults {
        region: Region::Image,
        frame: (5.5, 2.5, 4.0, 2.5),
        align: Some(Align::Center),
        font_size: 14.0,
        bold: false,
        bullet: false,
        line_spacing: 1.0,
    },
    RegionDefaults {
        region: Region::Table,
        frame: (0.8, 2.0, 8.4, 3.0),
        align: None,
        font_size: 14.0,
        bold: false,
        bullet: false,
        line_spacing: 1.0,
    },
];

impl Region {
    fn defaults(self) -> &'static RegionDefaults {
        REGION_DEFAULTS
            .iter()
            .find(|d| d.region == self)
            .unwrap_or(&REGION_DEFAULTS[0])
    }

    /// Default placement of this region on `canvas`.
    pub fn placement(self, canvas: Canvas) -> Placement {
        let d = self.defaults();
        let (x, y, w, h) = d.frame;
        let (x, y, w, h) = canvas.scale(x, y, w, h);
        Placement {
            align: d.align,
            ..Placement::new(x, y, w, h)
        }
    }

    /// Default typography of this region.
    pub fn style(self) -> TextStyle {
        let d = self.defaults();
        TextStyle {
            font_size: Some(d.font_size),
            bold: Some(d.bold),
            bullet: Some(d.bullet),
            line_spacing: Some(d.line_spacing),
        }
    }
}

/// A fully populated layout for `canvas`.
pub fn default_layout(canvas: Canvas) -> SlideLayout {
    SlideLayout {
        title_position: Region::Title.placement(canvas),
        content_position: Region::Body.placement(canvas),
        title_style: Region::Title.style(),
        content_style: Region::Body.style(),
    }
}

/// Fill every unset field of `doc` so it can be rendered as-is.
pub fn apply_defaults(doc: &mut Document, canvas: Canvas) {
    if doc.title.trim().is_empty() {
        doc.title = fallback::GENERIC_DECK_TITLE.to_string();
    }
    theme::normalize_theme(&mut doc.theme);

    let mut seen_ids = HashSet::new();
    for (index, slide) in doc.slides.iter_mut().enumerate() {
        if slide.id.trim().is_empty() || !seen_ids.insert(slide.id.clone()) {
            let mut number = index + 1;
            while !seen_ids.insert(format!("slide-{}", number)) {
                number += 1;
            }
            slide.id = format!("slide-{}", number);
        }
        default_slide(slide, index, canvas);
    }
}

fn default_slide(slide: &mut Slide, index: usize, canvas: Canvas) {
    let layout = &mut slide.layout;
    layout.title_position.fill_from(&Region::Title.placement(canvas));
    layout.content_position.fill_from(&Region::Body.placement(canvas));
    layout.title_style.fill_from(&Region::Title.style());
    layout.content_style.fill_from(&Region::Body.style());

    if slide.bullets().next().is_none() {
        let filler = if slide.description.trim().is_empty() {
            fallback::GENERIC_BULLETS[index % fallback::GENERIC_BULLETS.len()].to_string()
        } else {
            slide.description.clone()
        };
        log::debug!("Slide {} has no bullets; using '{}'", slide.id, filler);
        slide.content = vec![filler];
    }

    if let Some(chart) = slide.chart_data.as_mut() {
        chart.position.fill_from(&Region::Chart.placement(canvas));
    }
    if let Some(image) = slide.image_data.as_mut() {
        image.position.fill_from(&Region::Image.placement(canvas));
    }
}

/// Make the slide list exactly `requested` long.
///
/// Longer lists keep their leading slides. Shorter lists gain generic
/// "Key Point" slides, inserted before a trailing conclusion slide so the
/// deck still ends with it.
pub fn reconcile_slide_count(doc: &mut Document, requested: usize) {
    let requested = requested.max(1);
    let actual = doc.slides.len();

    if actual > requested {
        log::debug!("Truncating {} slides to {}", actual, requested);
        doc.slides.truncate(requested);
        return;
    }
    if actual == requested {
        return;
    }

    log::debug!("Padding {} slides to {}", actual, requested);
    let closing = match doc.slides.last() {
        Some(last) if last.slide_type == SlideType::Conclusion && actual > 1 => doc.slides.pop(),
        _ => None,
    };
    let target = requested - usize::from(closing.is_some());
    while doc.slides.len() < target {
        let index = doc.slides.len();
        let mut slide = fallback::filler_slide(index, requested, &doc.theme.color_scheme);
        if slide.slide_type == SlideType::Conclusion && closing.is_some() {
            slide.slide_type = SlideType::Content;
        }
        slide.id = String::new();
        doc.slides.push(slide);
    }
    doc.slides.extend(closing);
}

/// Replace the document's sections with caller-supplied titles, if any.
pub fn apply_sections(doc: &mut Document, sections: Option<&[String]>) {
    let Some(titles) = sections.filter(|s| !s.is_empty()) else {
        return;
    };
    doc.sections = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Section::new(title.clone(), i as u32 + 1))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorScheme;

    fn doc_with(n: usize) -> Document {
        let mut doc = fallback::template_document("Topic", n);
        doc.slides.iter_mut().for_each(|s| s.layout = SlideLayout::default());
        doc
    }

    #[test]
    fn test_renumbered_ids_stay_unique() {
        let mut doc = doc_with(4);
        for (slide, id) in doc.slides.iter_mut().zip(["slide-2", "", "", "slide-3"]) {
            slide.id = id.to_string();
        }
        apply_defaults(&mut doc, Canvas::default());
        let ids: Vec<_> = doc.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["slide-2", "slide-3", "slide-4", "slide-5"]);
    }

    #[test]
    fn test_canvas_names() {
        assert_eq!(Canvas::from_name(Some("wide")), Canvas::Wide);
        assert_eq!(Canvas::from_name(Some(" WIDE ")), Canvas::Wide);
        assert_eq!(Canvas::from_name(Some("4x3")), Canvas::Standard4x3);
        assert_eq!(Canvas::from_name(Some("poster")), Canvas::Standard16x9);
        assert_eq!(Canvas::from_name(None), Canvas::Standard16x9);
    }

    #[test]
    fn test_region_table_scales_with_canvas() {
        let standard = Region::Title.placement(Canvas::Standard16x9);
        assert_eq!(standard.x, Some(0.8));
        assert_eq!(standard.width, Some(8.4));

        let wide = Region::Title.placement(Canvas::Wide);
        assert!(wide.width.unwrap() > standard.width.unwrap());
        assert!(wide.y.unwrap() > standard.y.unwrap());
    }

    #[test]
    fn test_apply_defaults_fills_layout() {
        let mut doc = doc_with(3);
        doc.slides[1].layout.title_position.x = Some(2.0);
        apply_defaults(&mut doc, Canvas::Standard16x9);

        for slide in &doc.slides {
            let layout = &slide.layout;
            for placement in [&layout.title_position, &layout.content_position] {
                assert!(placement.x.is_some() && placement.y.is_some());
                assert!(placement.width.is_some() && placement.height.is_some());
            }
            assert_eq!(layout.title_style.font_size, Some(38.0));
            assert_eq!(layout.content_style.line_spacing, Some(1.5));
        }
        assert_eq!(doc.slides[1].layout.title_position.x, Some(2.0));
        assert_eq!(doc.slides[1].layout.title_position.y, Some(0.5));
    }

    #[test]
    fn test_apply_defaults_fills_empty_content_and_ids() {
        let mut doc = doc_with(3);
        doc.title = "  ".into();
        doc.slides[0].content = vec!["".into(), " ".into()];
        doc.slides[1].content.clear();
        doc.slides[1].description = "What this slide conveys".into();
        doc.slides[2].id = doc.slides[0].id.clone();
        apply_defaults(&mut doc, Canvas::default());

        assert_eq!(doc.title, fallback::GENERIC_DECK_TITLE);
        assert_eq!(doc.slides[0].content, vec![fallback::GENERIC_BULLETS[0]]);
        assert_eq!(doc.slides[1].content, vec!["What this slide conveys"]);
        assert_eq!(doc.slides[2].id, "slide-3");
    }

    #[test]
    fn test_chart_slot_defaults() {
        let mut doc = doc_with(4);
        if let Some(chart) = doc.slides[0].chart_data.as_mut() {
            chart.position = Placement::default();
        }
        apply_defaults(&mut doc, Canvas::default());
        let chart = doc.slides[0].chart_data.as_ref().unwrap();
        assert_eq!(chart.position.x, Some(5.5));
        assert_eq!(chart.position.height, Some(3.0));
    }

    #[test]
    fn test_reconcile_truncates() {
        let mut doc = doc_with(8);
        reconcile_slide_count(&mut doc, 3);
        assert_eq!(doc.slides.len(), 3);
        assert_eq!(doc.slides[0].title, "Topic");
    }

    #[test]
    fn test_reconcile_pads_before_conclusion() {
        let mut doc = doc_with(3);
        reconcile_slide_count(&mut doc, 6);
        assert_eq!(doc.slides.len(), 6);
        assert_eq!(doc.slides[5].title, "Conclusion");
        assert_eq!(doc.slides[5].slide_type, SlideType::Conclusion);
        assert!(doc.slides[..5]
            .iter()
            .all(|s| s.slide_type != SlideType::Conclusion));
        assert_eq!(doc.slides[2].title, "Key Point 2");
    }

    #[test]
    fn test_reconcile_pads_single_slide() {
        let mut doc = doc_with(1);
        reconcile_slide_count(&mut doc, 4);
        assert_eq!(doc.slides.len(), 4);
        assert_eq!(doc.slides[0].title, "Topic");
        assert_eq!(doc.slides[3].slide_type, SlideType::Conclusion);
    }

    #[test]
    fn test_reconcile_then_defaults_renumbers_ids() {
        let mut doc = doc_with(2);
        reconcile_slide_count(&mut doc, 4);
        apply_defaults(&mut doc, Canvas::default());
        let ids: Vec<_> = doc.slides.iter().map(|s| s.id.as_str()).collect();
        // The moved conclusion keeps its id until it collides with a pad.
        assert_eq!(ids, vec!["slide-1", "slide-2", "slide-3", "slide-4"]);
        assert_eq!(doc.slides[3].title, "Conclusion");
    }

    #[test]
    fn test_caller_sections_replace() {
        let mut doc = doc_with(2);
        apply_sections(&mut doc, Some(&["Only".to_string()]));
        assert_eq!(doc.sections, vec![Section::new("Only", 1)]);

        apply_sections(&mut doc, Some(&[]));
        assert_eq!(doc.sections.len(), 1);
        apply_sections(&mut doc, None);
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_defaults_normalize_colors() {
        let mut doc = doc_with(1);
        doc.theme.color_scheme.primary = "#abcdef".into();
        doc.theme.color_scheme.text = "#hexcode".into();
        apply_defaults(&mut doc, Canvas::default());
        assert_eq!(doc.theme.color_scheme.primary, "ABCDEF");
        assert_eq!(doc.theme.color_scheme.text, ColorScheme::default().text);
    }
}
