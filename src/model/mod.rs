//! Document model for classified page content.
//!
//! These types are the output of the page pipeline and map one-to-one onto
//! the JSON written by [`crate::render::to_json`].

mod block;
mod document;
mod page;

pub use block::{BlockKind, ContentBlock};
pub use document::{Document, ExtractionStage, PageFailure};
pub use page::Page;
