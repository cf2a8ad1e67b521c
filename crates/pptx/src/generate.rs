//! The three deck operations: generate from a prompt, import an HTML table
//! and build a master template.

use crate::drawing::{Drawable, Frame, TextBox, TextStyle};
use crate::master::Master;
use crate::render::{
    render_document, table_spec, ElementKind, ElementOutput, RenderOptions, RenderedDeck,
    RenderedSlide, TableLook,
};
use crate::writer::{write_package, Metadata};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use deck_core::fallback::template_document;
use deck_core::request::MasterTemplate;
use deck_core::table::IMPORT_TABLE_WIDTH;
use deck_core::theme::merge_override;
use deck_core::{
    apply_defaults, apply_sections, build_instruction, interpret, parse_table,
    reconcile_slide_count, ApiResponse, Canvas, Document, GenerateRequest, GeneratedDeck,
    MasterTemplateRequest, Result, TableDeck, TableRequest, TextGenerator,
};

pub const GENERATE_SUCCESS: &str = "Custom presentation created successfully";
pub const GENERATE_FAILURE: &str = "Failed to generate presentation";
pub const TABLE_SUCCESS: &str = "Table presentation created successfully";
pub const TABLE_FAILURE: &str = "Failed to generate table presentation";
pub const TEMPLATE_SUCCESS: &str = "Master template created successfully";
pub const TEMPLATE_FAILURE: &str = "Failed to create master template";

const FORMAT: &str = "pptx";

const TEMPLATE_DEMO_BULLETS: [&str; 3] = ["Sample Content", "Bullet point 2", "Bullet point 3"];

/// A finished document plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    pub document: Document,
    pub canvas: Canvas,
    /// The service failed or its answer could not be read.
    pub used_fallback: bool,
}

/// Generates decks from prompts through a [`TextGenerator`].
pub struct DeckGenerator<G> {
    generator: G,
}

impl<G: TextGenerator> DeckGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Ask the service for a document and bring it into renderable shape.
    ///
    /// Only input validation fails here; service and parsing problems are
    /// absorbed by the fallback paths.
    pub fn prepare(&self, request: &GenerateRequest) -> Result<PreparedDocument> {
        request.validate()?;
        let count = request.resolved_slide_count();
        let instruction = build_instruction(&request.prompt, count);

        let (mut document, used_fallback) = match self.generator.generate(&instruction) {
            Ok(text) => {
                let interpretation = interpret(&text);
                (interpretation.document, interpretation.used_fallback)
            }
            Err(e) => {
                log::warn!("Text generation failed, using template deck: {}", e);
                (template_document(&request.prompt, count), true)
            }
        };

        merge_override(&mut document.theme, request.theme.as_deref());
        apply_sections(&mut document, request.sections.as_deref());
        reconcile_slide_count(&mut document, count);

        let canvas = Canvas::from_name(request.layout.as_deref());
        apply_defaults(&mut document, canvas);

        Ok(PreparedDocument {
            document,
            canvas,
            used_fallback,
        })
    }

    /// Generate a deck and encode the package.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GeneratedDeck> {
        let prepared = self.prepare(request)?;
        let document = &prepared.document;

        let master = Master::for_theme(&document.theme, prepared.canvas);
        let options = RenderOptions::new()
            .with_canvas(prepared.canvas)
            .with_charts(request.include_charts)
            .with_images(request.include_images);
        let deck = render_document(document, master, &options);

        let metadata = Metadata::new(&document.title)
            .with_subject(format!("Presentation about {}", request.prompt))
            .with_author(request.author.clone())
            .with_company(request.company.clone())
            .with_description(request.contact_email.clone());
        let bytes = write_package(&deck, &metadata)?;

        log::info!(
            "Generated '{}': {} slides, {} placeholder(s), fallback: {}",
            document.title,
            deck.slide_count(),
            deck.failure_count(),
            prepared.used_fallback
        );

        Ok(GeneratedDeck {
            presentation: STANDARD.encode(&bytes),
            format: FORMAT.to_string(),
            filename: request.filename(),
            slide_count: deck.slide_count(),
            theme: document.theme.clone(),
            used_fallback: prepared.used_fallback,
        })
    }

    /// [`generate`](Self::generate) wrapped in the response envelope.
    pub fn respond(&self, request: &GenerateRequest) -> ApiResponse<GeneratedDeck> {
        ApiResponse::from_result(self.generate(request), GENERATE_SUCCESS, GENERATE_FAILURE)
    }
}

/// Build a one-slide deck from the first table in the request markup.
pub fn generate_from_table(request: &TableRequest) -> Result<TableDeck> {
    request.validate()?;
    let table = parse_table(&request.table_html)?;
    let canvas = Canvas::default();
    let master = Master::for_table(request.title(), canvas);

    let mut slide = RenderedSlide::new(1);
    slide.drawables.push(Drawable::Text(TextBox::new(
        Frame::inches(0.5, 1.0, IMPORT_TABLE_WIDTH, 0.8),
        request.title().unwrap_or("Table Data"),
        TextStyle::new(24.0, "363636").bold(true),
    )));

    if table.is_empty() {
        log::debug!("Table has no rows; emitting title only");
    } else {
        let columns = table.column_count();
        let data = table.into_table_data();
        let result = table_spec(&data, 0.5, 2.0, IMPORT_TABLE_WIDTH, &TableLook::imported())
            .map(|t| vec![Drawable::Table(t)]);
        slide.place(ElementOutput {
            kind: ElementKind::Table,
            name: format!("{} columns", columns),
            color: "4472C4".to_string(),
            area: Frame::inches(0.5, 2.0, IMPORT_TABLE_WIDTH, 3.0),
            result,
        });
    }
    if let Some(number) = master.slide_number_box(1) {
        slide.drawables.push(Drawable::Text(number));
    }

    let mut deck = RenderedDeck::new(master);
    deck.slides.push(slide);

    let metadata = Metadata::new(request.title().unwrap_or("Data Presentation"))
        .with_author(request.author.clone())
        .with_company(request.company.clone());
    let bytes = write_package(&deck, &metadata)?;

    Ok(TableDeck {
        presentation: STANDARD.encode(&bytes),
        format: FORMAT.to_string(),
        filename: request.filename(),
    })
}

pub fn respond_to_table(request: &TableRequest) -> ApiResponse<TableDeck> {
    ApiResponse::from_result(generate_from_table(request), TABLE_SUCCESS, TABLE_FAILURE)
}

/// Build a master from the request and one slide demonstrating it.
pub fn create_master_template(request: &MasterTemplateRequest) -> Result<MasterTemplate> {
    request.validate()?;
    let canvas = Canvas::default();
    let master = Master::for_template(request, canvas);
    let colors = &master.theme.color_scheme;
    let fonts = &master.theme.fonts;

    let mut slide = RenderedSlide::new(1);
    slide.drawables.push(Drawable::Text(TextBox::new(
        Frame::inches(0.5, 1.0, 9.0, 0.8),
        "Slide Title",
        TextStyle::new(32.0, &colors.text).bold(true).font(&fonts.title),
    )));
    let bullets = TEMPLATE_DEMO_BULLETS.iter().map(|b| b.to_string()).collect();
    slide.drawables.push(Drawable::Text(TextBox::paragraphs(
        Frame::inches(0.5, 2.0, 9.0, 3.0),
        bullets,
        TextStyle::new(20.0, &colors.text).font(&fonts.body).bullets(None),
    )));
    if let Some(number) = master.slide_number_box(1) {
        slide.drawables.push(Drawable::Text(number));
    }

    let master_name = master.name.clone();
    let mut deck = RenderedDeck::new(master);
    deck.slides.push(slide);
    let bytes = write_package(&deck, &Metadata::new(&request.title))?;
    log::info!("Created master template '{}'", master_name);

    Ok(MasterTemplate {
        template: STANDARD.encode(&bytes),
        format: FORMAT.to_string(),
        filename: request.filename(),
        master_name,
    })
}

pub fn respond_to_template(request: &MasterTemplateRequest) -> ApiResponse<MasterTemplate> {
    ApiResponse::from_result(create_master_template(request), TEMPLATE_SUCCESS, TEMPLATE_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{inspect_package, PackageSummary};
    use deck_core::request::ColorSpec;
    use deck_core::Error;
    use std::io::Read;

    const RESPONSE: &str = r#"Sure! ```json
    {
      "title": "Urban Beekeeping",
      "sections": [{"title": "Basics", "order": 1}, {"title": "Practice", "order": 2}],
      "slides": [
        {"title": "Urban Beekeeping", "slideType": "title", "sectionTitle": "Basics", "content": ["Why bees"]},
        {"title": "Hive Output", "slideType": "chart", "sectionTitle": "Practice", "content": ["Yield by season"],
         "chartData": {"chartType": "bar", "title": "Honey", "data": {"labels": ["Spring", "Summer"], "values": [12]}}},
        {"title": "Wrap Up", "slideType": "conclusion", "content": ["Start small"], "speakerNotes": "Thank the audience"}
      ]
    }
    ```"#;

    fn canned(text: &'static str) -> impl Fn(&str) -> Result<String> {
        move |_: &str| Ok(text.to_string())
    }

    fn offline(_: &str) -> Result<String> {
        Err(Error::Upstream("connection refused".into()))
    }

    fn decode(base64: &str) -> PackageSummary {
        let bytes = STANDARD.decode(base64).unwrap();
        inspect_package(&bytes).unwrap()
    }

    #[test]
    fn test_generate_from_response() {
        let generator = DeckGenerator::new(canned(RESPONSE));
        let request = GenerateRequest::new("Urban beekeeping").with_slide_count(3);
        let deck = generator.generate(&request).unwrap();

        assert!(!deck.used_fallback);
        assert_eq!(deck.slide_count, 3);
        assert_eq!(deck.format, "pptx");
        assert_eq!(deck.filename, "Urban_beekeeping.pptx");

        let summary = decode(&deck.presentation);
        assert_eq!(summary.slide_count(), 3);
        assert!(summary.slides[0].contains_text("Urban Beekeeping"));
        assert!(summary.slides[2].contains_text("Start small"));
        assert_eq!(summary.slides[2].notes.as_deref(), Some("Thank the audience"));
        assert_eq!(summary.sections.len(), 2);
        assert_eq!(summary.sections[0].name, "Basics");
        assert_eq!(summary.sections[1].slide_count, 2);
    }

    #[test]
    fn test_broken_chart_does_not_break_deck() {
        let generator = DeckGenerator::new(canned(RESPONSE));
        let request = GenerateRequest::new("Urban beekeeping").with_slide_count(3);
        let summary = decode(&generator.generate(&request).unwrap().presentation);

        let chart_slide = &summary.slides[1];
        assert!(chart_slide.charts.is_empty());
        assert!(chart_slide.contains_text("Chart: Honey"));
        assert!(chart_slide.contains_text("Hive Output"));
        assert!(chart_slide.contains_text("Yield by season"));
        assert!(summary.slides[0].contains_text("Why bees"));
    }

    const OVERSIZED: &str = r#"{
      "title": "Oversized",
      "slides": [
        {"title": "Loud Title", "content": ["Still here"],
         "layout": {"titleStyle": {"fontSize": 1e9}}},
        {"title": "Far Away", "content": ["Also here"],
         "imageData": {"placeholder": "Hive photo", "position": {"x": 1, "y": 1e13, "width": 2, "height": 1e12}}}
      ]
    }"#;

    #[test]
    fn test_oversized_values_become_placeholders() {
        let generator = DeckGenerator::new(canned(OVERSIZED));
        let request = GenerateRequest::new("Oversized").with_slide_count(2);
        let deck = generator.generate(&request).unwrap();
        assert!(!deck.used_fallback);

        let summary = decode(&deck.presentation);
        assert!(summary.slides[0].contains_text("Text: Loud Title"));
        assert!(summary.slides[0].contains_text("Still here"));
        assert!(summary.slides[1].contains_text("Image: Hive photo"));
        assert!(summary.slides[1].contains_text("Far Away"));

        let bytes = STANDARD.decode(&deck.presentation).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(!xml.contains("100000000000"));
    }

    #[test]
    fn test_upstream_failure_uses_template() {
        let generator = DeckGenerator::new(offline);
        for count in [1, 5, 20] {
            let request = GenerateRequest::new("Tidal energy").with_slide_count(count);
            let deck = generator.generate(&request).unwrap();
            assert!(deck.used_fallback);
            assert_eq!(deck.slide_count, count);
            assert_eq!(decode(&deck.presentation).slide_count(), count);
        }
    }

    #[test]
    fn test_slide_count_is_clamped() {
        let generator = DeckGenerator::new(offline);
        let deck = generator
            .generate(&GenerateRequest::new("Tidal energy").with_slide_count(50))
            .unwrap();
        assert_eq!(deck.slide_count, 20);
    }

    #[test]
    fn test_unreadable_response_falls_back() {
        let generator = DeckGenerator::new(canned("I cannot produce JSON today."));
        let deck = generator
            .generate(&GenerateRequest::new("Volcanoes").with_slide_count(4))
            .unwrap();
        assert!(deck.used_fallback);
        assert_eq!(deck.slide_count, 4);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let generator = DeckGenerator::new(canned(RESPONSE));
        let request = GenerateRequest::new("Urban beekeeping").with_slide_count(6);
        let first = generator.generate(&request).unwrap();
        let second = generator.generate(&request).unwrap();
        assert_eq!(first.presentation, second.presentation);
    }

    #[test]
    fn test_caller_sections_and_theme() {
        let generator = DeckGenerator::new(offline);
        let request = GenerateRequest::new("Tidal energy")
            .with_slide_count(4)
            .with_sections(vec!["Opening".into(), "Closing".into()])
            .with_theme(r##"{"colorScheme": {"primary": "#112233", "accent": "nope"}}"##);
        let deck = generator.generate(&request).unwrap();
        assert_eq!(deck.theme.color_scheme.primary, "112233");

        let summary = decode(&deck.presentation);
        let names: Vec<_> = summary.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Opening", "Closing"]);
        assert_eq!(summary.theme.unwrap().primary, "112233");
    }

    #[test]
    fn test_charts_can_be_disabled() {
        let generator = DeckGenerator::new(offline);
        let mut request = GenerateRequest::new("Tidal energy").with_slide_count(4);
        let with_charts = decode(&generator.generate(&request).unwrap().presentation);
        assert_eq!(with_charts.slides[0].charts, vec!["bar"]);

        request.include_charts = false;
        let without = decode(&generator.generate(&request).unwrap().presentation);
        assert!(without.slides.iter().all(|s| s.charts.is_empty()));
    }

    #[test]
    fn test_empty_prompt_is_rejected() {
        let generator = DeckGenerator::new(canned(RESPONSE));
        let response = generator.respond(&GenerateRequest::new(""));
        assert!(!response.is_success());
        assert_eq!(response.status_code(), 400);
    }

    #[test]
    fn test_table_import() {
        let html = "<p>Report</p><TABLE><tr><th>Name</th><th>Score</th></tr>\
                    <tr><td>Ada</td><td>97</td></tr></TABLE>";
        let deck = generate_from_table(&TableRequest::new(html).with_title("Scores")).unwrap();
        assert_eq!(deck.filename, "Scores.pptx");

        let summary = decode(&deck.presentation);
        assert_eq!(summary.master_name.as_deref(), Some("TABLE_MASTER"));
        let slide = &summary.slides[0];
        assert!(slide.contains_text("Scores"));
        assert!(slide.has_slide_number);

        let table = &slide.tables[0];
        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns(), 2);
        assert_eq!(table.cells[1], vec!["Ada", "97"]);
        assert_eq!(table.row_fills, vec!["4472C4", "FFFFFF"]);
        assert_eq!(table.row_bold, vec![true, false]);
    }

    #[test]
    fn test_table_import_without_table() {
        let response = respond_to_table(&TableRequest::new("<div>nothing</div>"));
        assert!(!response.is_success());
        assert_eq!(response.status_code(), 400);
        assert!(matches!(
            generate_from_table(&TableRequest::new("<div>nothing</div>")),
            Err(Error::NoTableFound)
        ));
    }

    #[test]
    fn test_master_template() {
        let mut request = MasterTemplateRequest::new("Corporate");
        request.color_scheme = Some(ColorSpec {
            primary: Some("#AA0000".into()),
            ..Default::default()
        });
        request.footer_text = Some("Confidential".into());

        let template = create_master_template(&request).unwrap();
        assert_eq!(template.master_name, "Corporate");
        assert_eq!(template.filename, "Corporate_Template.pptx");

        let summary = decode(&template.template);
        assert_eq!(summary.master_name.as_deref(), Some("Corporate"));
        let theme = summary.theme.unwrap();
        assert_eq!(theme.primary, "AA0000");
        assert_eq!(theme.secondary, "5B9BD5");

        let slide = &summary.slides[0];
        assert_eq!(
            slide.paragraphs,
            vec!["Slide Title", "Sample Content", "Bullet point 2", "Bullet point 3"]
        );
    }
}
