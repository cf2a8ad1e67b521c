//! Error types for slide-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal errors surfaced by the deck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The request failed validation (empty prompt, empty markup, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The table markup did not contain a `<table>` element.
    #[error("No table found in provided HTML")]
    NoTableFound,

    /// The generation service call itself failed.
    #[error("Generation service error: {0}")]
    Upstream(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML emission or parsing failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is the caller's fault rather than ours.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::NoTableFound)
    }
}

/// Failure while emitting a single visual element.
///
/// Never escapes a slide: the slide assembler swaps the element for a
/// labelled placeholder and keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Position or size is not a finite, non-negative, in-range number.
    #[error("invalid geometry for {element}: {detail}")]
    InvalidGeometry {
        element: &'static str,
        detail: String,
    },

    /// Font size or line spacing outside what a package can carry.
    #[error("invalid text style for {element}: {detail}")]
    InvalidTextStyle {
        element: &'static str,
        detail: String,
    },

    /// Chart labels and values disagree in length.
    #[error("chart '{title}' has {labels} labels but {values} values")]
    SeriesMismatch {
        title: String,
        labels: usize,
        values: usize,
    },

    /// A chart value is NaN or infinite.
    #[error("chart '{0}' contains a non-finite value")]
    NonFiniteValue(String),

    /// A table has no columns.
    #[error("table has no columns")]
    EmptyTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidInput("prompt".into()).is_validation());
        assert!(Error::NoTableFound.is_validation());
        assert!(!Error::Upstream("timeout".into()).is_validation());
        assert!(!Error::Zip("bad".into()).is_validation());
    }

    #[test]
    fn test_render_error_messages() {
        let err = RenderError::SeriesMismatch {
            title: "Sales".into(),
            labels: 3,
            values: 2,
        };
        assert_eq!(err.to_string(), "chart 'Sales' has 3 labels but 2 values");
        let err = RenderError::InvalidTextStyle {
            element: "title",
            detail: "font size 1000000000".into(),
        };
        assert_eq!(err.to_string(), "invalid text style for title: font size 1000000000");
    }
}
