//! Typed requests and responses for the three deck operations.

use crate::error::{Error, Result};
use crate::types::Theme;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Slides requested when the caller does not say.
pub const DEFAULT_SLIDE_COUNT: usize = 5;

/// Accepted slide-count range; requests outside it are clamped.
pub const MIN_SLIDE_COUNT: usize = 1;
pub const MAX_SLIDE_COUNT: usize = 20;

/// Characters of the prompt that make it into the output filename.
const FILENAME_PROMPT_CHARS: usize = 30;

fn default_slide_count() -> usize {
    DEFAULT_SLIDE_COUNT
}

fn default_true() -> bool {
    true
}

/// Generate a deck from a topic prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,

    #[serde(default = "default_slide_count")]
    pub slide_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Named canvas; `"wide"` selects widescreen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Serialized partial theme merged over the generated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default = "default_true")]
    pub include_charts: bool,

    #[serde(default = "default_true")]
    pub include_images: bool,

    /// Section titles replacing the generated sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            slide_count: DEFAULT_SLIDE_COUNT,
            author: None,
            company: None,
            contact_email: None,
            layout: None,
            theme: None,
            include_charts: true,
            include_images: true,
            sections: None,
        }
    }

    pub fn with_slide_count(mut self, count: usize) -> Self {
        self.slide_count = count;
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_sections(mut self, sections: Vec<String>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::InvalidInput("prompt must not be empty".to_string()));
        }
        Ok(())
    }

    /// The slide count actually honored.
    pub fn resolved_slide_count(&self) -> usize {
        self.slide_count.clamp(MIN_SLIDE_COUNT, MAX_SLIDE_COUNT)
    }

    /// Output filename derived from the start of the prompt.
    pub fn filename(&self) -> String {
        let head: String = self.prompt.chars().take(FILENAME_PROMPT_CHARS).collect();
        format!("{}.pptx", sanitize_filename(&head))
    }
}

/// Build a deck from the first table in a chunk of HTML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    pub table_html: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl TableRequest {
    pub fn new(table_html: impl Into<String>) -> Self {
        Self {
            table_html: table_html.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_html.trim().is_empty() {
            return Err(Error::InvalidInput("tableHtml must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn filename(&self) -> String {
        format!("{}.pptx", self.title().unwrap_or("Table_Presentation"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// 0 (opaque) to 100 (invisible).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
}

/// Partial color scheme supplied with a template request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Logo box geometry in inches. Missing fields take the template defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogoPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

/// Build a reusable master with one demonstration slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterTemplateRequest {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontSpec>,

    /// Accepted for compatibility; only a labelled box is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_position: Option<LogoPosition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl MasterTemplateRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn filename(&self) -> String {
        format!("{}_Template.pptx", self.title)
    }
}

/// Payload of a successful prompt generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDeck {
    /// Base64 of the package bytes.
    pub presentation: String,
    pub format: String,
    pub filename: String,
    pub slide_count: usize,
    pub theme: Theme,
    pub used_fallback: bool,
}

/// Payload of a successful table import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDeck {
    pub presentation: String,
    pub format: String,
    pub filename: String,
}

/// Payload of a successful template build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterTemplate {
    pub template: String,
    pub format: String,
    pub filename: String,
    pub master_name: String,
}

/// Response envelope shared by all operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success {
        success: bool,
        message: String,
        data: T,
    },
    Failure {
        success: bool,
        message: String,
        error: String,
        #[serde(skip)]
        status: u16,
    },
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::Success {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Wrap a terminal error; `context` prefixes the message.
    pub fn failed(context: &str, error: &Error) -> Self {
        let status = if error.is_validation() { 400 } else { 500 };
        Self::Failure {
            success: false,
            message: format!("{}: {}", context, error),
            error: error.to_string(),
            status,
        }
    }

    pub fn from_result(result: Result<T>, message: &str, context: &str) -> Self {
        match result {
            Ok(data) => Self::ok(message, data),
            Err(e) => Self::failed(context, &e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { status, .. } => *status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

/// Decompose, then replace everything but ASCII letters and digits with `_`.
pub fn sanitize_filename(text: &str) -> String {
    text.nfkd()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
