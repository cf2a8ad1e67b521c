//! PPTX (Office Open XML) backend for deck generation.
//!
//! Renders a [`deck_core::Document`] into drawables, serializes them as a
//! .pptx ZIP package and reads packages back for inspection.

pub mod drawing;
pub mod generate;
pub mod inspect;
pub mod master;
pub mod render;
pub mod writer;

pub use generate::{
    create_master_template, generate_from_table, respond_to_table, respond_to_template,
    DeckGenerator, PreparedDocument,
};
pub use inspect::{inspect_package, PackageSummary, SlideSummary};
pub use master::Master;
pub use render::{render_document, RenderOptions, RenderedDeck};
pub use writer::{write_package, Metadata};
