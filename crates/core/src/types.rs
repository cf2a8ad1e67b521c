//! Domain types describing a generated presentation.
//!
//! Field names follow the camelCase JSON schema the generation service is
//! asked to produce. Deserialization is deliberately forgiving (see
//! [`crate::lenient`]); serialization is strict and skips absent options.

use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default theme palette, as 6-digit hex without a leading `#`.
pub const DEFAULT_PRIMARY: &str = "4472C4";
pub const DEFAULT_SECONDARY: &str = "5B9BD5";
pub const DEFAULT_ACCENT: &str = "ED7D31";
pub const DEFAULT_BACKGROUND: &str = "FFFFFF";
pub const DEFAULT_TEXT: &str = "333333";

/// Default typefaces.
pub const DEFAULT_TITLE_FONT: &str = "Segoe UI";
pub const DEFAULT_BODY_FONT: &str = "Calibri";

/// The complete structured description of a presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub theme: Theme,

    #[serde(deserialize_with = "lenient::each")]
    pub sections: Vec<Section>,

    /// Slides in render order.
    #[serde(deserialize_with = "lenient::each")]
    pub slides: Vec<Slide>,
}

impl Document {
    /// Parse a document out of an already-decoded JSON value.
    ///
    /// Returns `None` when the value is not an object or carries no slides,
    /// since such a document has nothing to render.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        match serde_json::from_value::<Document>(value) {
            Ok(doc) if !doc.slides.is_empty() => Some(doc),
            Ok(_) => {
                log::debug!("Parsed JSON object has no usable slides");
                None
            }
            Err(e) => {
                log::debug!("JSON object does not fit the document model: {}", e);
                None
            }
        }
    }
}

/// Color scheme and font choices applied across a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    #[serde(deserialize_with = "lenient::or_default")]
    pub color_scheme: ColorScheme,

    #[serde(deserialize_with = "lenient::or_default")]
    pub fonts: Fonts,

    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,

    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub layout_principle: Option<String>,

    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub background_style: Option<String>,
}

/// The five theme colors. Always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    #[serde(deserialize_with = "lenient::string")]
    pub primary: String,
    #[serde(deserialize_with = "lenient::string")]
    pub secondary: String,
    #[serde(deserialize_with = "lenient::string")]
    pub accent: String,
    #[serde(deserialize_with = "lenient::string")]
    pub background: String,
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fonts {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub body: String,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_FONT.to_string(),
            body: DEFAULT_BODY_FONT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::order")]
    pub order: u32,
}

impl Section {
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            title: title.into(),
            order,
        }
    }
}

/// The role a slide plays, which governs its default visual treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Title,
    #[default]
    Content,
    Chart,
    Comparison,
    Conclusion,
}

impl SlideType {
    /// Resolve a slide type name; anything unrecognised is a content slide.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "chart" => Self::Chart,
            "comparison" => Self::Comparison,
            "conclusion" => Self::Conclusion,
            _ => Self::Content,
        }
    }

    /// Slide type for position `index` in a deck of `len` slides.
    pub fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            Self::Title
        } else if index + 1 == len {
            Self::Conclusion
        } else if index % 3 == 0 {
            Self::Chart
        } else if index % 2 == 0 {
            Self::Comparison
        } else {
            Self::Content
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Chart => "chart",
            Self::Comparison => "comparison",
            Self::Conclusion => "conclusion",
        }
    }
}

impl<'de> Deserialize<'de> for SlideType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value.as_str().map(Self::from_name).unwrap_or_default())
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "center" | "centre" | "ctr" | "middle" => Some(Self::Center),
            "right" | "r" => Some(Self::Right),
            "justify" | "just" => Some(Self::Justify),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Align {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value.as_str().and_then(Self::from_name).unwrap_or_default())
    }
}

/// A position and size in inches, every field individually optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(alias = "w", deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(alias = "h", deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

impl Placement {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            align: None,
        }
    }

    /// Whether no coordinate has been set at all.
    pub fn is_unset(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Fill every unset field from `defaults`.
    pub fn fill_from(&mut self, defaults: &Placement) {
        self.x = self.x.or(defaults.x);
        self.y = self.y.or(defaults.y);
        self.width = self.width.or(defaults.width);
        self.height = self.height.or(defaults.height);
        self.align = self.align.or(defaults.align);
    }
}

/// Typography for a text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub bullet: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
}

impl TextStyle {
    pub fn fill_from(&mut self, defaults: &TextStyle) {
        self.font_size = self.font_size.or(defaults.font_size);
        self.bold = self.bold.or(defaults.bold);
        self.bullet = self.bullet.or(defaults.bullet);
        self.line_spacing = self.line_spacing.or(defaults.line_spacing);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideLayout {
    #[serde(deserialize_with = "lenient::or_default")]
    pub title_position: Placement,
    #[serde(deserialize_with = "lenient::or_default")]
    pub content_position: Placement,
    #[serde(deserialize_with = "lenient::or_default")]
    pub title_style: TextStyle,
    #[serde(deserialize_with = "lenient::or_default")]
    pub content_style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slide {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,

    pub slide_type: SlideType,

    #[serde(deserialize_with = "lenient::string")]
    pub title: String,

    #[serde(deserialize_with = "lenient::string")]
    pub description: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub layout: SlideLayout,

    /// Bullet strings. Empty entries are kept here and skipped at render.
    #[serde(deserialize_with = "lenient::string_list")]
    pub content: Vec<String>,

    /// Drawn in list order; later elements sit on top.
    #[serde(deserialize_with = "lenient::each")]
    pub visual_elements: Vec<VisualElement>,

    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,

    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub table_data: Option<TableData>,

    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<ImageData>,

    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,

    /// Background color overriding the master's for this slide only.
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Slide {
    /// Content entries that will actually render as bullets.
    pub fn bullets(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// One drawable unit on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VisualElement {
    Shape(ShapeElement),
    Text(TextElement),
    Chart(ChartElement),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeElement {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub position: Placement,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    /// Clockwise rotation in degrees.
    #[serde(alias = "rotation", deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outline {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line width in points.
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextElement {
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub position: Placement,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub font_face: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartElement {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt", skip_serializing_if = "Option::is_none")]
    pub data: Option<SeriesData>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub position: Placement,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Category labels with one numeric value per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesData {
    #[serde(deserialize_with = "lenient::string_list")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "lenient::number_list")]
    pub values: Vec<f64>,
}

impl SeriesData {
    pub fn new(labels: &[&str], values: &[f64]) -> Self {
        Self {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
        }
    }
}

/// Chart payload rendered into the slide's dedicated chart slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartData {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub data: SeriesData,
    #[serde(deserialize_with = "lenient::or_default")]
    pub position: Placement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableData {
    #[serde(deserialize_with = "lenient::string_list")]
    pub headers: Vec<String>,
    #[serde(deserialize_with = "lenient::string_grid")]
    pub rows: Vec<Vec<String>>,
    /// Column widths in inches.
    #[serde(
        rename = "colW",
        alias = "colWidths",
        deserialize_with = "lenient::opt_number_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub col_w: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageData {
    /// Description of the intended image; shown as the placeholder caption.
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub position: Placement,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slide_type_resolution() {
        assert_eq!(SlideType::from_name("Title"), SlideType::Title);
        assert_eq!(SlideType::from_name(" chart "), SlideType::Chart);
        assert_eq!(SlideType::from_name("timeline"), SlideType::Content);
        assert_eq!(SlideType::from_name(""), SlideType::Content);
    }

    #[test]
    fn test_slide_type_for_position() {
        let types: Vec<_> = (0..7).map(|i| SlideType::for_position(i, 7)).collect();
        assert_eq!(
            types,
            vec![
                SlideType::Title,
                SlideType::Content,
                SlideType::Comparison,
                SlideType::Chart,
                SlideType::Comparison,
                SlideType::Content,
                SlideType::Conclusion,
            ]
        );
    }

    #[test]
    fn test_document_from_value_requires_slides() {
        assert!(Document::from_value(json!({"title": "x"})).is_none());
        assert!(Document::from_value(json!({"title": "x", "slides": []})).is_none());
        assert!(Document::from_value(json!("just text")).is_none());
        assert!(Document::from_value(json!({"slides": [{"title": "A"}]})).is_some());
    }

    #[test]
    fn test_lenient_slide_fields() {
        let doc = Document::from_value(json!({
            "title": "Deck",
            "slides": [{
                "slideType": "infographic",
                "title": "Numbers",
                "content": ["one", null, 2, ""],
                "layout": {"titlePosition": {"x": "1.5", "y": 0.25, "align": "CENTER"}},
                "visualElements": [
                    {"type": "shape", "shape": "star", "opacity": "0.5"},
                    {"type": "video", "src": "x.mp4"},
                    {"type": "text", "text": "Hi", "bold": "true"}
                ],
                "chartData": "not a chart"
            }]
        }))
        .unwrap();

        let slide = &doc.slides[0];
        assert_eq!(slide.slide_type, SlideType::Content);
        assert_eq!(slide.content, vec!["one", "2", ""]);
        assert_eq!(slide.bullets().collect::<Vec<_>>(), vec!["one", "2"]);
        assert_eq!(slide.layout.title_position.x, Some(1.5));
        assert_eq!(slide.layout.title_position.align, Some(Align::Center));
        assert_eq!(slide.visual_elements.len(), 2);
        assert!(slide.chart_data.is_none());
        match &slide.visual_elements[0] {
            VisualElement::Shape(shape) => assert_eq!(shape.opacity, Some(0.5)),
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_missing_colors_take_defaults() {
        let theme: Theme =
            serde_json::from_value(json!({"colorScheme": {"primary": "112233"}})).unwrap();
        assert_eq!(theme.color_scheme.primary, "112233");
        assert_eq!(theme.color_scheme.secondary, DEFAULT_SECONDARY);
        assert_eq!(theme.color_scheme.text, DEFAULT_TEXT);
        assert_eq!(theme.fonts.body, DEFAULT_BODY_FONT);
    }

    #[test]
    fn test_chart_values_keep_positions() {
        let data: SeriesData =
            serde_json::from_value(json!({"labels": ["a", "b"], "values": [1, "x"]})).unwrap();
        assert_eq!(data.values.len(), 2);
        assert!(data.values[1].is_nan());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let slide = Slide {
            slide_type: SlideType::Chart,
            speaker_notes: Some("n".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(value["slideType"], "chart");
        assert_eq!(value["speakerNotes"], "n");
        assert!(value.get("chartData").is_none());
    }
}
