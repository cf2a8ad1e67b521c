//! Core document model and the text-to-document half of deck generation:
//! response interpretation, fallback synthesis, defaulting and theme merge.

pub mod defaults;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod instruction;
pub mod interpret;
mod lenient;
pub mod request;
pub mod table;
pub mod theme;
pub mod types;

pub use defaults::{apply_defaults, apply_sections, reconcile_slide_count, Canvas, Region};
pub use error::{Error, RenderError, Result};
pub use generator::TextGenerator;
pub use instruction::build_instruction;
pub use interpret::{interpret, Interpretation};
pub use request::{
    ApiResponse, GenerateRequest, GeneratedDeck, MasterTemplate, MasterTemplateRequest,
    TableDeck, TableRequest,
};
pub use table::{parse_table, HtmlTable};
pub use theme::ThemeOverride;
pub use types::{
    Align, ChartData, ChartElement, ColorScheme, Document, Fonts, ImageData, Placement, Section,
    SeriesData, ShapeElement, Slide, SlideType, TableData, TextElement, Theme, VisualElement,
};
