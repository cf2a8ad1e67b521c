//! Heuristic document synthesis for when structured recovery fails.
//!
//! Everything here is total: any input string, including an empty one,
//! produces a complete document with at least [`MIN_SLIDES`] slides.

use crate::defaults::{default_layout, Canvas};
use crate::types::{
    Align, ChartData, ChartElement, ColorScheme, Document, Fonts, ImageData, Outline, Placement,
    Section, SeriesData, ShapeElement, Slide, SlideType, TableData, TextElement, Theme,
    VisualElement,
};
use regex::Regex;
use std::sync::LazyLock;

/// Quoted `title: "..."` pairs. Matches the deck title and slide titles alike.
static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']title["']\s*:\s*["']([^"']+)["']"#).unwrap());

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Fa-f]{6})").unwrap());

/// `content: [ ... ]` regions; the capture is the list interior.
static CONTENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']content["'][^\[]*\[([\s\S]*?)\]"#).unwrap());

/// Separator between quoted list items.
static ITEM_SPLIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'],\s*["']"#).unwrap());

/// Minimum number of slides a synthesized deck has.
pub const MIN_SLIDES: usize = 5;

/// Minimum size of the bullet pool slides draw from.
const MIN_BULLETS: usize = 12;

pub const GENERIC_DECK_TITLE: &str = "Presentation";

/// Titles used to pad a deck up to [`MIN_SLIDES`], in order.
pub const GENERIC_SLIDE_TITLES: [&str; MIN_SLIDES] =
    ["Introduction", "Key Points", "Details", "Analysis", "Conclusion"];

/// Sentences used, cyclically, to pad the bullet pool.
pub const GENERIC_BULLETS: [&str; 6] = [
    "First important point to consider",
    "Analysis of key factors",
    "Strategic considerations",
    "Implementation approach",
    "Expected outcomes and results",
    "Next steps forward",
];

/// Third bullet when the pool runs short.
pub const FILLER_BULLET: &str = "Additional considerations";

/// Bullets for template and padding slides.
pub const TEMPLATE_BULLETS: [&str; 3] = [
    "Key insight about this topic",
    "Important consideration for stakeholders",
    "Strategic recommendation based on analysis",
];

/// Placeholder series for charts that arrive without data.
pub const SAMPLE_LABELS: [&str; 4] = ["Category A", "Category B", "Category C", "Category D"];
pub const SAMPLE_VALUES: [f64; 4] = [4.3, 2.5, 3.5, 4.5];

// Decoration geometry on the 16:9 reference canvas (10 x 5.625 in).
const SIDE_BAR: (f64, f64, f64, f64) = (0.0, 0.0, 0.4, 5.625);
const TITLE_PANEL: (f64, f64, f64, f64) = (0.0, 0.0, 3.0, 5.625);
const BOTTOM_BAR: (f64, f64, f64, f64) = (0.0, 5.125, 10.0, 0.5);

/// Build a complete document from whatever text the service returned.
pub fn synthesize(raw: &str) -> Document {
    let title = TITLE_REGEX
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| GENERIC_DECK_TITLE.to_string());

    let colors = scrape_colors(raw);
    let titles = scrape_slide_titles(raw);
    let pool = scrape_bullets(raw);

    let count = titles.len();
    let slides = titles
        .iter()
        .enumerate()
        .map(|(index, slide_title)| {
            let slide_type = SlideType::for_position(index, count);
            let lower = slide_title.to_lowercase();
            Slide {
                id: format!("slide-{}", index + 1),
                slide_type,
                title: slide_title.clone(),
                description: format!("Slide about {}", lower),
                layout: default_layout(Canvas::default()),
                content: bullets_for(index, &pool),
                visual_elements: catalog_elements(slide_type, &colors),
                speaker_notes: Some(format!("Speaker notes for the {} slide", lower)),
                ..Default::default()
            }
        })
        .collect();

    Document {
        title,
        theme: Theme {
            color_scheme: colors,
            fonts: Fonts::default(),
            visual_style: Some("Modern and impactful".to_string()),
            layout_principle: Some("Strong visual focus with dynamic elements".to_string()),
            background_style: Some("Gradient with subtle patterns".to_string()),
        },
        sections: Vec::new(),
        slides,
    }
}

/// Default palette, with primary/secondary/accent replaced by the first
/// three `#rrggbb` codes in the text, as far as they go.
fn scrape_colors(raw: &str) -> ColorScheme {
    let mut colors = ColorScheme::default();
    let mut found = HEX_COLOR_REGEX
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_uppercase());

    for slot in [&mut colors.primary, &mut colors.secondary, &mut colors.accent] {
        match found.next() {
            Some(hex) => *slot = hex,
            None => break,
        }
    }
    colors
}

fn scrape_slide_titles(raw: &str) -> Vec<String> {
    let mut titles: Vec<String> = TITLE_REGEX
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    while titles.len() < MIN_SLIDES {
        titles.push(GENERIC_SLIDE_TITLES[titles.len()].to_string());
    }
    titles
}

fn scrape_bullets(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = CONTENT_REGEX
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .flat_map(|interior| {
            ITEM_SPLIT_REGEX
                .split(interior.as_str())
                .map(strip_quotes)
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
        })
        .collect();

    while items.len() < MIN_BULLETS {
        items.push(GENERIC_BULLETS[items.len() % GENERIC_BULLETS.len()].to_string());
    }
    items
}

fn strip_quotes(item: &str) -> String {
    item.trim()
        .trim_start_matches(['"', '\''])
        .trim_end_matches(['"', '\''])
        .trim()
        .to_string()
}

/// Three bullets for slide `index`: pool items 2i and 2i+1 (wrapping when
/// the deck outgrows the pool) and 2i+2 when it exists.
fn bullets_for(index: usize, pool: &[String]) -> Vec<String> {
    let at = |k: usize| pool[k % pool.len()].clone();
    let third = pool
        .get(index * 2 + 2)
        .cloned()
        .unwrap_or_else(|| FILLER_BULLET.to_string());
    vec![at(index * 2), at(index * 2 + 1), third]
}

fn bar(frame: (f64, f64, f64, f64), color: &str, opacity: f64) -> VisualElement {
    let (x, y, w, h) = frame;
    VisualElement::Shape(ShapeElement {
        shape: Some("rectangle".to_string()),
        position: Placement::new(x, y, w, h),
        color: Some(color.to_string()),
        opacity: Some(opacity),
        ..Default::default()
    })
}

/// Decoration for each slide type.
pub fn catalog_elements(slide_type: SlideType, colors: &ColorScheme) -> Vec<VisualElement> {
    match slide_type {
        SlideType::Title => vec![
            bar(TITLE_PANEL, &colors.primary, 0.8),
            bar(BOTTOM_BAR, &colors.accent, 0.9),
        ],
        SlideType::Chart => vec![
            bar(SIDE_BAR, &colors.primary, 0.8),
            VisualElement::Chart(ChartElement {
                chart_type: Some("bar".to_string()),
                data: Some(SeriesData::new(&SAMPLE_LABELS, &SAMPLE_VALUES)),
                position: Placement::new(5.5, 2.2, 4.0, 3.0),
                title: Some("Data Analysis".to_string()),
                show_title: Some(false),
                show_legend: Some(true),
                color: Some(colors.primary.clone()),
            }),
        ],
        SlideType::Comparison => vec![
            bar(SIDE_BAR, &colors.accent, 0.8),
            VisualElement::Shape(ShapeElement {
                shape: Some("rectangle".to_string()),
                position: Placement::new(5.5, 2.5, 4.0, 2.5),
                color: Some(colors.secondary.clone()),
                opacity: Some(0.15),
                outline: Some(Outline {
                    color: Some(colors.secondary.clone()),
                    width: Some(2.0),
                }),
                rotate: None,
            }),
            VisualElement::Text(TextElement {
                text: "Option A".to_string(),
                position: Placement::new(5.5, 2.0, 4.0, 0.5),
                color: Some(colors.secondary.clone()),
                font_size: Some(22.0),
                bold: Some(true),
                align: Some(Align::Left),
                ..Default::default()
            }),
        ],
        SlideType::Conclusion => vec![
            bar(SIDE_BAR, &colors.accent, 0.8),
            bar(BOTTOM_BAR, &colors.secondary, 0.7),
        ],
        SlideType::Content => vec![bar(SIDE_BAR, &colors.secondary, 0.8)],
    }
}

/// A generic "Key Point" slide for position `index` of `total`.
///
/// Used for decks built without any service text and to pad short decks.
pub fn filler_slide(index: usize, total: usize, colors: &ColorScheme) -> Slide {
    let slide_type = SlideType::for_position(index, total);
    Slide {
        id: format!("slide-{}", index + 1),
        slide_type,
        title: format!("Key Point {}", index),
        layout: default_layout(Canvas::default()),
        content: TEMPLATE_BULLETS.iter().map(|s| s.to_string()).collect(),
        visual_elements: catalog_elements(slide_type, colors),
        speaker_notes: Some(format!("Speaker notes for slide {}", index + 1)),
        ..Default::default()
    }
}

/// The fixed deck used when the generation service could not be reached.
pub fn template_document(prompt: &str, slide_count: usize) -> Document {
    let count = slide_count.max(1);
    let colors = ColorScheme::default();

    let slides = (0..count)
        .map(|i| {
            let mut slide = filler_slide(i, count, &colors);
            let is_last = i + 1 == count;
            if i == 0 {
                slide.title = prompt.to_string();
            } else if is_last {
                slide.title = "Conclusion".to_string();
            }
            slide.section_title = Some(
                if i == 0 {
                    "Introduction"
                } else if is_last {
                    "Conclusion"
                } else if (i as f64) < count as f64 / 2.0 {
                    "Key Points"
                } else {
                    "Details"
                }
                .to_string(),
            );
            if i % 3 == 0 {
                slide.chart_data = Some(ChartData {
                    chart_type: Some("bar".to_string()),
                    title: Some("Data Analysis".to_string()),
                    data: SeriesData::new(&SAMPLE_LABELS, &SAMPLE_VALUES),
                    position: Placement::new(5.5, 2.2, 4.0, 3.0),
                });
            }
            if i % 4 == 2 {
                slide.table_data = Some(TableData {
                    headers: vec!["Element".into(), "Description".into(), "Impact".into()],
                    rows: vec![
                        vec!["Factor 1".into(), "Description of factor 1".into(), "High".into()],
                        vec!["Factor 2".into(), "Description of factor 2".into(), "Medium".into()],
                        vec!["Factor 3".into(), "Description of factor 3".into(), "Low".into()],
                    ],
                    col_w: Some(vec![2.0, 4.0, 2.0]),
                });
            }
            if i % 5 == 3 {
                slide.image_data = Some(ImageData {
                    placeholder: Some(format!("Image related to {}", prompt)),
                    position: Placement::new(5.5, 2.5, 4.0, 2.5),
                });
            }
            slide
        })
        .collect();

    Document {
        title: format!("Presentation: {}", prompt),
        theme: Theme {
            color_scheme: colors,
            fonts: Fonts::default(),
            visual_style: Some("Modern and professional".to_string()),
            layout_principle: Some("Clear visual hierarchy with dynamic elements".to_string()),
            background_style: Some("Clean with accent shapes".to_string()),
        },
        sections: vec![
            Section::new("Introduction", 1),
            Section::new("Key Points", 2),
            Section::new("Details", 3),
            Section::new("Conclusion", 4),
        ],
        slides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complete(doc: &Document) {
        assert!(doc.slides.len() >= MIN_SLIDES);
        assert!(!doc.title.is_empty());
        let scheme = &doc.theme.color_scheme;
        for color in [&scheme.primary, &scheme.secondary, &scheme.accent] {
            assert_eq!(color.len(), 6);
            assert!(color.chars().all(|c| c.is_ascii_hexdigit()));
        }
        for slide in &doc.slides {
            assert!(slide.bullets().count() > 0);
        }
    }

    #[test]
    fn test_synthesize_empty() {
        let doc = synthesize("");
        assert_complete(&doc);
        assert_eq!(doc.title, GENERIC_DECK_TITLE);
        let titles: Vec<_> = doc.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, GENERIC_SLIDE_TITLES);
        assert_eq!(doc.theme.color_scheme, ColorScheme::default());
    }

    #[test]
    fn test_synthesize_arbitrary_inputs() {
        for raw in ["}{", "\"title\": ", "#12345", "content: [", "🙂🙂🙂", "{{{{}}}}"] {
            assert_complete(&synthesize(raw));
        }
    }

    #[test]
    fn test_title_and_slide_titles_share_matches() {
        let raw = r#"{"title": "Ocean Life", "slides": [{"title": "Whales"}, {'title': 'Reefs'}"#;
        let doc = synthesize(raw);
        assert_eq!(doc.title, "Ocean Life");
        let titles: Vec<_> = doc.slides.iter().map(|s| s.title.as_str()).collect();
        // The deck title is re-captured as the first slide title.
        assert_eq!(titles, vec!["Ocean Life", "Whales", "Reefs", "Analysis", "Conclusion"]);
    }

    #[test]
    fn test_colors_scraped_in_order() {
        let doc = synthesize("primary #112233 then #aabbcc and #445566 and #778899");
        let scheme = &doc.theme.color_scheme;
        assert_eq!(scheme.primary, "112233");
        assert_eq!(scheme.secondary, "AABBCC");
        assert_eq!(scheme.accent, "445566");
        assert_eq!(scheme.background, "FFFFFF");
    }

    #[test]
    fn test_partial_colors_keep_defaults() {
        let scheme = synthesize("only #010203 here").theme.color_scheme;
        assert_eq!(scheme.primary, "010203");
        assert_eq!(scheme.secondary, crate::types::DEFAULT_SECONDARY);
        assert_eq!(scheme.accent, crate::types::DEFAULT_ACCENT);
    }

    #[test]
    fn test_bullets_scraped_and_padded() {
        let raw = r#""content": ["Alpha", "Beta"], 'content': ['Gamma']"#;
        let pool = scrape_bullets(raw);
        assert_eq!(&pool[..3], &["Alpha", "Beta", "Gamma"]);
        assert_eq!(pool.len(), MIN_BULLETS);
        assert_eq!(pool[3], GENERIC_BULLETS[3]);

        let doc = synthesize(raw);
        assert_eq!(doc.slides[0].content, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_slide_types_by_position() {
        let doc = synthesize("");
        let types: Vec<_> = doc.slides.iter().map(|s| s.slide_type).collect();
        assert_eq!(
            types,
            vec![
                SlideType::Title,
                SlideType::Content,
                SlideType::Comparison,
                SlideType::Chart,
                SlideType::Conclusion,
            ]
        );
        assert!(doc.slides[3]
            .visual_elements
            .iter()
            .any(|e| matches!(e, VisualElement::Chart(_))));
    }

    #[test]
    fn test_many_titles_wrap_bullet_pool() {
        let raw: String = (0..10).map(|i| format!("\"title\": \"T{}\", ", i)).collect();
        let doc = synthesize(&raw);
        assert_eq!(doc.slides.len(), 10);
        assert_eq!(doc.slides[9].content[2], FILLER_BULLET);
        assert_complete(&doc);
    }

    #[test]
    fn test_template_document() {
        let doc = template_document("Rust adoption", 6);
        assert_eq!(doc.title, "Presentation: Rust adoption");
        assert_eq!(doc.slides.len(), 6);
        assert_eq!(doc.slides[0].title, "Rust adoption");
        assert_eq!(doc.slides[5].title, "Conclusion");
        assert_eq!(doc.slides[5].slide_type, SlideType::Conclusion);
        assert_eq!(doc.slides[1].section_title.as_deref(), Some("Key Points"));
        assert_eq!(doc.slides[4].section_title.as_deref(), Some("Details"));
        assert!(doc.slides[3].chart_data.is_some());
        assert!(doc.slides[2].table_data.is_some());
        assert!(doc.slides[3].image_data.is_some());
        assert_eq!(doc.sections.len(), 4);
    }

    #[test]
    fn test_template_document_single_slide() {
        let doc = template_document("One", 1);
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.slides[0].slide_type, SlideType::Title);
    }
}
