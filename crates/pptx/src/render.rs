//! Rendering engine: turns a finished document into writer-ready slides.
//!
//! Every element goes through the same path. An element renderer returns an
//! [`ElementOutput`] holding either its drawables or a [`RenderError`]; the
//! slide assembler ([`RenderedSlide::place`]) swaps failures for a labelled
//! placeholder so one bad element never costs the rest of the slide or deck.

use crate::drawing::{
    emu, ChartKind, ChartSpec, Drawable, Fill, Frame, Geometry, ShapeSpec, Stroke, TableRow,
    TableSpec, TextBox, TextStyle,
};
use crate::master::Master;
use deck_core::fallback::{SAMPLE_LABELS, SAMPLE_VALUES};
use deck_core::theme::{normalize_hex, resolve_color};
use deck_core::{
    Canvas, ChartElement, Document, ImageData, Region, RenderError, SeriesData, ShapeElement,
    Slide, TableData, TextElement, Theme, VisualElement,
};

/// Geometry used for visual elements that leave position fields unset.
const ELEMENT_FALLBACK: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 1.0);

const DEFAULT_TEXT_SIZE: f64 = 20.0;
const DEFAULT_TITLE_SIZE: f64 = 38.0;
const DEFAULT_BODY_SIZE: f64 = 24.0;
const MIN_FONT_SIZE: f64 = 1.0;
const MAX_FONT_SIZE: f64 = 4000.0;
const MAX_LINE_SPACING: f64 = 132.0;

/// Vertical position of a table that follows bullet content, on the 16:9 reference.
const TABLE_BELOW_BULLETS_Y: f64 = 3.5;
const TABLE_ROW_HEIGHT: f64 = 0.4;

/// Placeholder look: translucent fill, solid outline, centered caption.
const PLACEHOLDER_TRANSPARENCY: f64 = 80.0;
const PLACEHOLDER_STROKE: f64 = 2.0;
const PLACEHOLDER_CAPTION_HEIGHT: f64 = 0.5;
const PLACEHOLDER_CAPTION_SIZE: f64 = 16.0;

const IMAGE_TRANSPARENCY: f64 = 87.0;

/// Rendering switches for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub canvas: Canvas,
    pub include_charts: bool,
    pub include_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            include_charts: true,
            include_images: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_charts(mut self, include: bool) -> Self {
        self.include_charts = include;
        self
    }

    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }
}

/// The kinds of element a slide is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Shape,
    Text,
    Chart,
    Table,
    Image,
}

impl ElementKind {
    /// Caption prefix of this kind's placeholder.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shape => "Shape",
            Self::Text => "Text",
            Self::Chart => "Chart",
            Self::Table => "Table",
            Self::Image => "Image",
        }
    }
}

/// What one element renderer produced.
#[derive(Debug, Clone)]
pub struct ElementOutput {
    pub kind: ElementKind,
    /// Human name used in the placeholder caption.
    pub name: String,
    /// Placeholder color.
    pub color: String,
    /// Where a placeholder goes if rendering failed.
    pub area: Frame,
    pub result: Result<Vec<Drawable>, RenderError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementFailure {
    pub kind: ElementKind,
    pub error: RenderError,
}

/// A slide ready for the package writer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    /// 1-based position in the deck.
    pub number: usize,
    /// Index into the deck's section list.
    pub section: Option<usize>,
    /// Overrides the master background.
    pub background: Option<String>,
    pub drawables: Vec<Drawable>,
    pub notes: Option<String>,
    pub failures: Vec<ElementFailure>,
}

impl RenderedSlide {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            section: None,
            background: None,
            drawables: Vec::new(),
            notes: None,
            failures: Vec::new(),
        }
    }

    /// Add an element's drawables, or a placeholder if it failed.
    pub fn place(&mut self, output: ElementOutput) {
        match output.result {
            Ok(drawables) => self.drawables.extend(drawables),
            Err(error) => {
                log::warn!(
                    "Slide {}: {} element '{}' replaced by placeholder: {}",
                    self.number,
                    output.kind.label(),
                    output.name,
                    error
                );
                self.drawables.extend(placeholder(
                    output.kind,
                    &output.name,
                    &output.color,
                    output.area,
                ));
                self.failures.push(ElementFailure {
                    kind: output.kind,
                    error,
                });
            }
        }
    }
}

/// A fully rendered deck.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDeck {
    pub master: Master,
    /// Section titles in display order.
    pub sections: Vec<String>,
    pub slides: Vec<RenderedSlide>,
}

impl RenderedDeck {
    pub fn new(master: Master) -> Self {
        Self {
            master,
            sections: Vec::new(),
            slides: Vec::new(),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn failure_count(&self) -> usize {
        self.slides.iter().map(|s| s.failures.len()).sum()
    }
}

/// Translucent box plus centered "<Kind>: <name>" caption.
fn placeholder(kind: ElementKind, name: &str, color: &str, area: Frame) -> Vec<Drawable> {
    vec![
        Drawable::Shape(
            ShapeSpec::rect(area, Fill::transparent(color, PLACEHOLDER_TRANSPARENCY))
                .with_stroke(color, PLACEHOLDER_STROKE),
        ),
        Drawable::Text(TextBox::new(
            area.centered_band(emu(PLACEHOLDER_CAPTION_HEIGHT)),
            format!("{}: {}", kind.label(), name),
            TextStyle::new(PLACEHOLDER_CAPTION_SIZE, color).centered(),
        )),
    ]
}

/// Per-slide rendering inputs.
struct SlideContext<'a> {
    theme: &'a Theme,
    options: &'a RenderOptions,
}

impl SlideContext<'_> {
    fn primary(&self) -> &str {
        &self.theme.color_scheme.primary
    }
}

/// Untrusted placement with per-field fallbacks.
fn element_frame(
    element: &'static str,
    placement: &deck_core::Placement,
    fallback: (f64, f64, f64, f64),
) -> (Result<Frame, RenderError>, Frame) {
    let x = placement.x.unwrap_or(fallback.0);
    let y = placement.y.unwrap_or(fallback.1);
    let w = placement.width.unwrap_or(fallback.2);
    let h = placement.height.unwrap_or(fallback.3);
    (
        Frame::checked(element, x, y, w, h),
        Frame::sanitized(x, y, w, h, fallback),
    )
}

fn region_fallback(region: Region, canvas: Canvas) -> (f64, f64, f64, f64) {
    let p = region.placement(canvas);
    (
        p.x.unwrap_or(0.0),
        p.y.unwrap_or(0.0),
        p.width.unwrap_or(1.0),
        p.height.unwrap_or(1.0),
    )
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Requested font size in points, or `default` when unset or unusable.
fn font_size(element: &'static str, value: Option<f64>, default: f64) -> Result<f64, RenderError> {
    match positive(value) {
        Some(size) if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) => {
            Err(RenderError::InvalidTextStyle {
                element,
                detail: format!("font size {}", size),
            })
        }
        Some(size) => Ok(size),
        None => Ok(default),
    }
}

/// Requested line spacing as a multiple of the font height.
fn line_spacing(element: &'static str, value: Option<f64>) -> Result<Option<f64>, RenderError> {
    match positive(value) {
        Some(spacing) if spacing > MAX_LINE_SPACING => Err(RenderError::InvalidTextStyle {
            element,
            detail: format!("line spacing {}", spacing),
        }),
        other => Ok(other),
    }
}

fn render_shape(shape: &ShapeElement, ctx: &SlideContext) -> ElementOutput {
    let (frame, area) = element_frame("shape", &shape.position, ELEMENT_FALLBACK);
    let color = resolve_color(shape.color.as_deref(), ctx.primary());
    let geometry = Geometry::from_name(shape.shape.as_deref());
    let opacity = shape.opacity.filter(|o| o.is_finite()).unwrap_or(1.0);

    let result = frame.map(|frame| {
        let stroke = shape.outline.as_ref().map(|outline| Stroke {
            color: resolve_color(outline.color.as_deref(), &color),
            width: positive(outline.width).unwrap_or(1.0),
        });
        vec![Drawable::Shape(ShapeSpec {
            geometry,
            frame,
            fill: Some(Fill::with_opacity(&color, opacity)),
            stroke,
            rotation: shape.rotate.filter(|r| r.is_finite()).unwrap_or(0.0),
        })]
    });

    ElementOutput {
        kind: ElementKind::Shape,
        name: shape.shape.clone().unwrap_or_else(|| "rectangle".to_string()),
        color,
        area,
        result,
    }
}

fn render_text(text: &TextElement, ctx: &SlideContext) -> ElementOutput {
    let (frame, area) = element_frame("text", &text.position, ELEMENT_FALLBACK);
    let color = resolve_color(text.color.as_deref(), ctx.primary());

    let result = frame.and_then(|frame| {
        let font = text
            .font_face
            .clone()
            .unwrap_or_else(|| ctx.theme.fonts.body.clone());
        let style = TextStyle::new(font_size("text", text.font_size, DEFAULT_TEXT_SIZE)?, &color)
            .bold(text.bold.unwrap_or(false))
            .italic(text.italic.unwrap_or(false))
            .align(text.align.or(text.position.align).unwrap_or_default())
            .font(font);
        Ok(vec![Drawable::Text(TextBox::new(frame, text.text.clone(), style))])
    });

    ElementOutput {
        kind: ElementKind::Text,
        name: short_name(&text.text),
        color,
        area,
        result,
    }
}

fn short_name(text: &str) -> String {
    const MAX: usize = 24;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        format!("{}...", trimmed.chars().take(MAX).collect::<String>())
    }
}

/// Validated chart drawable.
#[allow(clippy::too_many_arguments)]
fn chart_spec(
    frame: Frame,
    kind: Option<&str>,
    title: &str,
    data: &SeriesData,
    show_title: bool,
    show_legend: bool,
    color: &str,
) -> Result<Drawable, RenderError> {
    let labels: Vec<String> = if data.labels.is_empty() {
        SAMPLE_LABELS.iter().map(|s| s.to_string()).collect()
    } else {
        data.labels.clone()
    };
    let values = if data.values.is_empty() {
        SAMPLE_VALUES.to_vec()
    } else {
        data.values.clone()
    };

    if labels.len() != values.len() {
        return Err(RenderError::SeriesMismatch {
            title: title.to_string(),
            labels: labels.len(),
            values: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(RenderError::NonFiniteValue(title.to_string()));
    }

    Ok(Drawable::Chart(ChartSpec {
        frame,
        kind: ChartKind::from_name(kind),
        title: title.to_string(),
        show_title,
        show_legend,
        labels,
        values,
        color: color.to_string(),
    }))
}

fn render_chart_element(chart: &ChartElement, data: &SeriesData, ctx: &SlideContext) -> ElementOutput {
    let (frame, area) = element_frame("chart", &chart.position, ELEMENT_FALLBACK);
    let color = resolve_color(chart.color.as_deref(), ctx.primary());
    let title = chart.title.clone().unwrap_or_else(|| "Chart".to_string());

    let result = frame.and_then(|frame| {
        chart_spec(
            frame,
            chart.chart_type.as_deref(),
            &title,
            data,
            chart.show_title.unwrap_or(true),
            chart.show_legend.unwrap_or(true),
            &color,
        )
        .map(|d| vec![d])
    });

    ElementOutput {
        kind: ElementKind::Chart,
        name: chart
            .title
            .clone()
            .unwrap_or_else(|| "Data Visualization".to_string()),
        color,
        area,
        result,
    }
}

fn render_chart_slot(chart: &deck_core::ChartData, ctx: &SlideContext) -> ElementOutput {
    let fallback = region_fallback(Region::Chart, ctx.options.canvas);
    let (frame, area) = element_frame("chart", &chart.position, fallback);
    let color = ctx.primary().to_string();
    let title = chart.title.clone().unwrap_or_else(|| "Data Analysis".to_string());

    let result = frame.and_then(|frame| {
        chart_spec(
            frame,
            chart.chart_type.as_deref(),
            &title,
            &chart.data,
            true,
            true,
            &color,
        )
        .map(|d| vec![d])
    });

    ElementOutput {
        kind: ElementKind::Chart,
        name: chart
            .title
            .clone()
            .unwrap_or_else(|| "Data Visualization".to_string()),
        color,
        area,
        result,
    }
}

fn render_title(slide: &Slide, ctx: &SlideContext) -> Option<ElementOutput> {
    if slide.title.trim().is_empty() {
        return None;
    }
    let layout = &slide.layout;
    let fallback = region_fallback(Region::Title, ctx.options.canvas);
    let (frame, area) = element_frame("title", &layout.title_position, fallback);
    let color = ctx.theme.color_scheme.text.clone();

    let result = frame.and_then(|frame| {
        let style = TextStyle::new(
            font_size("title", layout.title_style.font_size, DEFAULT_TITLE_SIZE)?,
            &color,
        )
        .bold(true)
        .align(layout.title_position.align.unwrap_or_default())
        .font(ctx.theme.fonts.title.clone());
        Ok(vec![Drawable::Text(TextBox::new(frame, slide.title.clone(), style))])
    });

    Some(ElementOutput {
        kind: ElementKind::Text,
        name: short_name(&slide.title),
        color,
        area,
        result,
    })
}

fn render_body(slide: &Slide, ctx: &SlideContext) -> Option<ElementOutput> {
    let bullets: Vec<String> = slide.bullets().map(|s| s.to_string()).collect();
    if bullets.is_empty() {
        return None;
    }
    let layout = &slide.layout;
    let fallback = region_fallback(Region::Body, ctx.options.canvas);
    let (frame, area) = element_frame("body", &layout.content_position, fallback);
    let color = ctx.theme.color_scheme.text.clone();

    let result = frame.and_then(|frame| {
        let style = &layout.content_style;
        let spacing = line_spacing("body", style.line_spacing)?;
        let mut text_style =
            TextStyle::new(font_size("body", style.font_size, DEFAULT_BODY_SIZE)?, &color)
                .bold(style.bold.unwrap_or(false))
                .align(layout.content_position.align.unwrap_or_default())
                .font(ctx.theme.fonts.body.clone());
        if style.bullet.unwrap_or(true) {
            text_style = text_style.bullets(spacing.or(Some(1.5)));
        } else {
            text_style.line_spacing = spacing;
        }
        Ok(vec![Drawable::Text(TextBox::paragraphs(frame, bullets, text_style))])
    });

    Some(ElementOutput {
        kind: ElementKind::Text,
        name: "body".to_string(),
        color,
        area,
        result,
    })
}

/// Colors and sizes of a rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLook {
    pub header_fill: String,
    pub header_color: String,
    pub header_size: f64,
    pub body_color: String,
    pub body_size: f64,
    /// Fill of body rows 1, 3, 5, ...
    pub odd_fill: String,
    /// Fill of body rows 2, 4, 6, ...
    pub even_fill: String,
    pub border: Stroke,
    pub font: Option<String>,
}

impl TableLook {
    /// Table styling derived from a document theme.
    pub fn for_theme(theme: &Theme) -> Self {
        let colors = &theme.color_scheme;
        Self {
            header_fill: colors.primary.clone(),
            header_color: "FFFFFF".to_string(),
            header_size: 16.0,
            body_color: colors.text.clone(),
            body_size: 14.0,
            odd_fill: "F5F5F5".to_string(),
            even_fill: "FFFFFF".to_string(),
            border: Stroke {
                color: colors.secondary.clone(),
                width: 0.5,
            },
            font: Some(theme.fonts.body.clone()),
        }
    }

    /// Fixed styling of tables imported from HTML.
    pub fn imported() -> Self {
        Self {
            header_fill: "4472C4".to_string(),
            header_color: "FFFFFF".to_string(),
            header_size: 16.0,
            body_color: "333333".to_string(),
            body_size: 14.0,
            odd_fill: "FFFFFF".to_string(),
            even_fill: "F5F5F5".to_string(),
            border: Stroke {
                color: "999999".to_string(),
                width: 0.5,
            },
            font: None,
        }
    }
}

/// Lay out `data` as a grid whose top-left corner is at (`x`, `y`) inches.
///
/// Column widths come from `data.col_w` when it has one usable width per
/// column; otherwise `width` is split evenly.
pub fn table_spec(
    data: &TableData,
    x: f64,
    y: f64,
    width: f64,
    look: &TableLook,
) -> Result<TableSpec, RenderError> {
    let columns = data
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(data.headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Err(RenderError::EmptyTable);
    }

    let widths: Vec<f64> = match &data.col_w {
        Some(w) if w.len() == columns && w.iter().all(|v| v.is_finite() && *v > 0.0) => w.clone(),
        Some(w) => {
            log::debug!("Ignoring {} column widths for {} columns", w.len(), columns);
            vec![width / columns as f64; columns]
        }
        None => vec![width / columns as f64; columns],
    };

    let pad = |cells: &[String]| {
        let mut row = cells.to_vec();
        row.resize(columns, String::new());
        row
    };

    let mut rows = Vec::with_capacity(data.rows.len() + 1);
    rows.push(TableRow {
        cells: pad(&data.headers),
        fill: look.header_fill.clone(),
        color: look.header_color.clone(),
        bold: true,
        size: look.header_size,
    });
    for (i, cells) in data.rows.iter().enumerate() {
        let position = i + 1;
        let fill = if position % 2 == 1 {
            &look.odd_fill
        } else {
            &look.even_fill
        };
        rows.push(TableRow {
            cells: pad(cells),
            fill: fill.clone(),
            color: look.body_color.clone(),
            bold: false,
            size: look.body_size,
        });
    }

    let total_width: f64 = widths.iter().sum();
    let height = TABLE_ROW_HEIGHT * rows.len() as f64;
    let frame = Frame::checked("table", x, y, total_width, height)?;

    Ok(TableSpec {
        frame,
        col_widths: widths.iter().map(|w| emu(*w)).collect(),
        row_height: emu(TABLE_ROW_HEIGHT),
        rows,
        border: look.border.clone(),
        font: look.font.clone(),
    })
}

fn render_table(slide: &Slide, data: &TableData, ctx: &SlideContext) -> ElementOutput {
    let canvas = ctx.options.canvas;
    let region = region_fallback(Region::Table, canvas);
    let y = if slide.bullets().next().is_some() {
        canvas.scale(0.0, TABLE_BELOW_BULLETS_Y, 0.0, 0.0).1
    } else {
        region.1
    };
    let look = TableLook::for_theme(ctx.theme);
    let result = table_spec(data, region.0, y, region.2, &look).map(|t| vec![Drawable::Table(t)]);

    ElementOutput {
        kind: ElementKind::Table,
        name: format!("{} columns", data.headers.len()),
        color: ctx.primary().to_string(),
        area: Frame::sanitized(region.0, y, region.2, region.3, region),
        result,
    }
}

fn render_image(image: &ImageData, ctx: &SlideContext) -> ElementOutput {
    let fallback = region_fallback(Region::Image, ctx.options.canvas);
    let (frame, area) = element_frame("image", &image.position, fallback);
    let color = ctx.theme.color_scheme.secondary.clone();
    let caption = image
        .placeholder
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| "Visual Representation".to_string());

    let result = frame.map(|frame| {
        vec![
            Drawable::Shape(
                ShapeSpec::rect(frame, Fill::transparent(&color, IMAGE_TRANSPARENCY))
                    .with_stroke(&color, 1.0),
            ),
            Drawable::Text(TextBox::new(
                frame.inset_x(emu(0.1)).centered_band(emu(1.0)),
                format!("Image: {}", caption),
                TextStyle::new(14.0, &color).centered(),
            )),
        ]
    });

    ElementOutput {
        kind: ElementKind::Image,
        name: caption,
        color,
        area,
        result,
    }
}

/// Render one slide.
pub fn render_slide(
    slide: &Slide,
    number: usize,
    theme: &Theme,
    master: &Master,
    options: &RenderOptions,
) -> RenderedSlide {
    let ctx = SlideContext { theme, options };
    let mut out = RenderedSlide::new(number);

    if let Some(background) = slide.background.as_deref() {
        out.background = normalize_hex(background);
        if out.background.is_none() {
            log::debug!("Slide {}: ignoring background '{}'", number, background);
        }
    }

    for element in &slide.visual_elements {
        match element {
            VisualElement::Shape(shape) => out.place(render_shape(shape, &ctx)),
            VisualElement::Text(text) => out.place(render_text(text, &ctx)),
            VisualElement::Chart(chart) => {
                if !options.include_charts {
                    continue;
                }
                match &chart.data {
                    Some(data) => out.place(render_chart_element(chart, data, &ctx)),
                    None => log::debug!("Slide {}: skipping chart element without data", number),
                }
            }
        }
    }

    if let Some(title) = render_title(slide, &ctx) {
        out.place(title);
    }
    if let Some(body) = render_body(slide, &ctx) {
        out.place(body);
    }
    if options.include_charts {
        if let Some(chart) = &slide.chart_data {
            out.place(render_chart_slot(chart, &ctx));
        }
    }
    if let Some(table) = &slide.table_data {
        out.place(render_table(slide, table, &ctx));
    }
    if options.include_images {
        if let Some(image) = &slide.image_data {
            out.place(render_image(image, &ctx));
        }
    }
    if let Some(number_box) = master.slide_number_box(number) {
        out.drawables.push(Drawable::Text(number_box));
    }

    out.notes = slide
        .speaker_notes
        .clone()
        .filter(|n| !n.trim().is_empty());
    out
}

/// Section titles in display order, and the section each slide falls in.
///
/// A slide joins the section named by its `sectionTitle`; otherwise it
/// stays in the previous slide's section, or the first section.
fn assign_sections(doc: &Document) -> (Vec<String>, Vec<Option<usize>>) {
    let mut sections: Vec<_> = doc.sections.iter().filter(|s| !s.title.trim().is_empty()).collect();
    sections.sort_by_key(|s| s.order);
    let titles: Vec<String> = sections.iter().map(|s| s.title.clone()).collect();

    let mut current = if titles.is_empty() { None } else { Some(0) };
    let assignment = doc
        .slides
        .iter()
        .map(|slide| {
            if let Some(wanted) = slide.section_title.as_deref() {
                if let Some(index) = titles.iter().position(|t| t.trim() == wanted.trim()) {
                    current = Some(index);
                }
            }
            current
        })
        .collect();
    (titles, assignment)
}

/// Render every slide of `doc` against `master`.
pub fn render_document(doc: &Document, master: Master, options: &RenderOptions) -> RenderedDeck {
    let (sections, assignment) = assign_sections(doc);
    let slides: Vec<RenderedSlide> = doc
        .slides
        .iter()
        .zip(assignment)
        .enumerate()
        .map(|(index, (slide, section))| {
            let mut rendered = render_slide(slide, index + 1, &doc.theme, &master, options);
            rendered.section = section;
            rendered
        })
        .collect();

    let deck = RenderedDeck {
        master,
        sections,
        slides,
    };
    log::debug!(
        "Rendered {} slides with {} placeholder(s)",
        deck.slide_count(),
        deck.failure_count()
    );
    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Anchor, TextContent, MAX_COORDINATE};
    use deck_core::fallback::template_document;
    use deck_core::{apply_defaults, Placement, Section};

    fn finished(n: usize) -> Document {
        let mut doc = template_document("Testing", n);
        apply_defaults(&mut doc, Canvas::default());
        doc
    }

    fn render(doc: &Document) -> RenderedDeck {
        let master = Master::for_theme(&doc.theme, Canvas::default());
        render_document(doc, master, &RenderOptions::default())
    }

    fn texts(slide: &RenderedSlide) -> Vec<String> {
        slide
            .drawables
            .iter()
            .filter_map(|d| match d {
                Drawable::Text(TextBox {
                    content: TextContent::Paragraphs(p),
                    ..
                }) => Some(p.join("\n")),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_slide_count_matches_document() {
        for n in [1, 5, 20] {
            assert_eq!(render(&finished(n)).slide_count(), n);
        }
    }

    #[test]
    fn test_title_and_bullets_rendered() {
        let deck = render(&finished(3));
        let first = texts(&deck.slides[0]);
        assert!(first.contains(&"Testing".to_string()));
        assert!(first.iter().any(|t| t.contains("Key insight about this topic")));
        assert_eq!(deck.failure_count(), 0);
    }

    #[test]
    fn test_empty_bullets_skipped() {
        let mut doc = finished(1);
        doc.slides[0].content = vec!["One".into(), "".into(), "  ".into(), "Two".into()];
        let deck = render(&doc);
        let body = deck.slides[0]
            .drawables
            .iter()
            .find_map(|d| match d {
                Drawable::Text(TextBox {
                    content: TextContent::Paragraphs(p),
                    style,
                    ..
                }) if style.bullet => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(body, vec!["One", "Two"]);
    }

    #[test]
    fn test_chart_failure_is_isolated() {
        let mut doc = finished(4);
        let healthy = render(&doc);

        // Slide 1 carries a chart; break it.
        let chart = doc.slides[0].chart_data.as_mut().unwrap();
        chart.title = Some("Broken".into());
        chart.data.values = vec![1.0, 2.0];
        let deck = render(&doc);

        assert_eq!(deck.slides[0].failures.len(), 1);
        assert!(matches!(
            deck.slides[0].failures[0].error,
            RenderError::SeriesMismatch { labels: 4, values: 2, .. }
        ));
        assert!(texts(&deck.slides[0]).contains(&"Chart: Broken".to_string()));
        assert!(!deck.slides[0].drawables.iter().any(|d| matches!(d, Drawable::Chart(_))));

        // Title and bullets of the broken slide survive.
        assert!(texts(&deck.slides[0]).contains(&"Testing".to_string()));
        // Every other slide is untouched.
        assert_eq!(deck.slides[1..], healthy.slides[1..]);
    }

    #[test]
    fn test_non_finite_chart_value() {
        let mut doc = finished(1);
        doc.slides[0].chart_data.as_mut().unwrap().data.values[2] = f64::NAN;
        let deck = render(&doc);
        assert!(matches!(
            deck.slides[0].failures[0].error,
            RenderError::NonFiniteValue(_)
        ));
    }

    #[test]
    fn test_every_element_kind_gets_placeholder() {
        let mut doc = finished(1);
        let bad = Placement::new(f64::NAN, 0.0, 1.0, 1.0);
        doc.slides[0].visual_elements = vec![
            VisualElement::Shape(ShapeElement {
                position: bad.clone(),
                ..Default::default()
            }),
            VisualElement::Text(TextElement {
                text: "Hello".into(),
                position: bad.clone(),
                ..Default::default()
            }),
            VisualElement::Shape(ShapeElement {
                shape: Some("ellipse".into()),
                position: Placement::new(1.0, 1.0, 2.0, 2.0),
                ..Default::default()
            }),
        ];
        doc.slides[0].table_data = Some(TableData::default());
        let deck = render(&doc);
        let kinds: Vec<_> = deck.slides[0].failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Shape, ElementKind::Text, ElementKind::Table]
        );
        let captions = texts(&deck.slides[0]);
        assert!(captions.contains(&"Shape: rectangle".to_string()));
        assert!(captions.contains(&"Text: Hello".to_string()));
        // The healthy ellipse still renders.
        assert!(deck.slides[0].drawables.iter().any(|d| matches!(
            d,
            Drawable::Shape(ShapeSpec { geometry: Geometry::Ellipse, .. })
        )));
    }

    #[test]
    fn test_huge_finite_geometry_gets_placeholder() {
        let mut doc = finished(4);
        doc.slides[3].image_data.as_mut().unwrap().position =
            Placement::new(1.0, 1e13, 2.0, 1e12);
        doc.slides[0].visual_elements = vec![
            VisualElement::Shape(ShapeElement {
                position: Placement::new(1e15, -1e15, 1.0, 1.0),
                ..Default::default()
            }),
            VisualElement::Text(TextElement {
                text: "Wide".into(),
                position: Placement::new(0.0, 0.0, 1e9, 1.0),
                ..Default::default()
            }),
        ];
        let deck = render(&doc);

        let kinds: Vec<_> = deck.slides[0].failures.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![ElementKind::Shape, ElementKind::Text]);
        assert!(texts(&deck.slides[0]).contains(&"Text: Wide".to_string()));

        assert_eq!(deck.slides[3].failures.len(), 1);
        assert!(matches!(
            deck.slides[3].failures[0].error,
            RenderError::InvalidGeometry { element: "image", .. }
        ));
        assert!(texts(&deck.slides[3]).iter().any(|t| t.starts_with("Image:")));
        for slide in &deck.slides {
            for drawable in &slide.drawables {
                let frame = match drawable {
                    Drawable::Shape(s) => s.frame,
                    Drawable::Text(t) => t.frame,
                    Drawable::Chart(c) => c.frame,
                    Drawable::Table(t) => t.frame,
                };
                assert!(frame.x.abs() <= MAX_COORDINATE && frame.y.abs() <= MAX_COORDINATE);
                assert!(frame.cx <= MAX_COORDINATE && frame.cy <= MAX_COORDINATE);
            }
        }
    }

    #[test]
    fn test_huge_font_size_gets_placeholder() {
        let mut doc = finished(2);
        doc.slides[0].layout.title_style.font_size = Some(1e9);
        doc.slides[1].layout.content_style.line_spacing = Some(1e12);
        doc.slides[1].visual_elements = vec![VisualElement::Text(TextElement {
            text: "Loud".into(),
            font_size: Some(5000.0),
            position: Placement::new(1.0, 1.0, 2.0, 1.0),
            ..Default::default()
        })];
        let deck = render(&doc);

        assert_eq!(deck.slides[0].failures.len(), 1);
        assert!(matches!(
            deck.slides[0].failures[0].error,
            RenderError::InvalidTextStyle { element: "title", .. }
        ));
        assert!(texts(&deck.slides[0]).contains(&"Text: Testing".to_string()));
        // Bullets on the same slide still render.
        assert!(texts(&deck.slides[0]).iter().any(|t| t.contains("Key insight")));

        let errors: Vec<_> = deck.slides[1].failures.iter().map(|f| &f.error).collect();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, RenderError::InvalidTextStyle { .. })));
        assert!(texts(&deck.slides[1]).contains(&"Text: Loud".to_string()));
        for slide in &deck.slides {
            for drawable in &slide.drawables {
                if let Drawable::Text(t) = drawable {
                    assert!(t.style.size <= MAX_FONT_SIZE);
                }
            }
        }
    }

    #[test]
    fn test_shape_details() {
        let theme = Theme::default();
        let options = RenderOptions::default();
        let ctx = SlideContext {
            theme: &theme,
            options: &options,
        };
        let output = render_shape(
            &ShapeElement {
                shape: Some("cloud".into()),
                position: Placement::new(1.0, 1.0, 2.0, 1.0),
                color: Some("#ff0000".into()),
                opacity: Some(0.25),
                outline: Some(deck_core::types::Outline {
                    color: None,
                    width: Some(3.0),
                }),
                rotate: Some(45.0),
            },
            &ctx,
        );
        let drawables = output.result.unwrap();
        let Drawable::Shape(shape) = &drawables[0] else {
            panic!("expected a shape");
        };
        assert_eq!(shape.geometry, Geometry::Cloud);
        assert_eq!(shape.fill.as_ref().unwrap().color, "FF0000");
        assert_eq!(shape.fill.as_ref().unwrap().transparency, 75.0);
        assert_eq!(shape.stroke.as_ref().unwrap().color, "FF0000");
        assert_eq!(shape.stroke.as_ref().unwrap().width, 3.0);
        assert_eq!(shape.rotation, 45.0);
    }

    #[test]
    fn test_table_rows_styled() {
        let look = TableLook::for_theme(&Theme::default());
        let data = TableData {
            headers: vec!["A".into(), "B".into()],
            rows: vec![
                vec!["1".into(), "2".into()],
                vec!["3".into()],
                vec!["5".into(), "6".into()],
            ],
            col_w: None,
        };
        let table = table_spec(&data, 0.8, 2.0, 8.4, &look).unwrap();
        assert_eq!(table.col_widths, vec![emu(4.2), emu(4.2)]);
        assert!(table.rows[0].bold);
        assert_eq!(table.rows[0].color, "FFFFFF");
        assert_eq!(table.rows[0].fill, look.header_fill);
        assert_eq!(table.rows[1].fill, "F5F5F5");
        assert_eq!(table.rows[2].fill, "FFFFFF");
        assert_eq!(table.rows[3].fill, "F5F5F5");
        assert_eq!(table.rows[2].cells, vec!["3", ""]);
    }

    #[test]
    fn test_table_widths_and_position() {
        let doc = finished(3);
        let deck = render(&doc);
        // Template slide 3 (index 2) carries a table with explicit widths below its bullets.
        let table = deck.slides[2]
            .drawables
            .iter()
            .find_map(|d| match d {
                Drawable::Table(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.col_widths, vec![emu(2.0), emu(4.0), emu(2.0)]);
        assert_eq!(table.frame.y, emu(3.5));
    }

    #[test]
    fn test_options_gate_charts_and_images() {
        let doc = finished(4);
        let master = Master::for_theme(&doc.theme, Canvas::default());
        let options = RenderOptions::new().with_charts(false).with_images(false);
        let deck = render_document(&doc, master, &options);
        for slide in &deck.slides {
            assert!(!slide.drawables.iter().any(|d| matches!(d, Drawable::Chart(_))));
            assert!(!texts(slide).iter().any(|t| t.starts_with("Image:")));
        }

        let with_images = render(&doc);
        let captions = texts(&with_images.slides[3]);
        assert!(captions.contains(&"Image: Image related to Testing".to_string()));
    }

    #[test]
    fn test_image_placeholder_centered() {
        let doc = finished(4);
        let deck = render(&doc);
        let caption = deck.slides[3]
            .drawables
            .iter()
            .find_map(|d| match d {
                Drawable::Text(t) if matches!(&t.content, TextContent::Paragraphs(p) if p[0].starts_with("Image:")) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(caption.style.anchor, Anchor::Middle);
        assert_eq!(caption.frame.cy, emu(1.0));
    }

    #[test]
    fn test_sections_follow_previous_slide() {
        let mut doc = finished(4);
        doc.sections = vec![Section::new("Second", 2), Section::new("First", 1)];
        doc.slides[0].section_title = Some("Unknown".into());
        doc.slides[1].section_title = Some("Second".into());
        doc.slides[2].section_title = None;
        doc.slides[3].section_title = Some("First".into());
        let deck = render(&doc);
        assert_eq!(deck.sections, vec!["First", "Second"]);
        let assigned: Vec<_> = deck.slides.iter().map(|s| s.section).collect();
        assert_eq!(assigned, vec![Some(0), Some(1), Some(1), Some(0)]);
    }

    #[test]
    fn test_background_override() {
        let mut doc = finished(2);
        doc.slides[0].background = Some("#101010".into());
        doc.slides[1].background = Some("dark".into());
        let deck = render(&doc);
        assert_eq!(deck.slides[0].background.as_deref(), Some("101010"));
        assert_eq!(deck.slides[1].background, None);
    }

    #[test]
    fn test_render_is_repeatable() {
        let doc = finished(6);
        assert_eq!(render(&doc), render(&doc));
    }
}
