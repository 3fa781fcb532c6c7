//! Page sources and the document-level parser.

mod backend;
mod document_parser;
mod layout;
mod memory;
mod options;

pub use backend::{ImageDescriptor, LopdfSource, PageSource};
pub use document_parser::DocumentParser;
pub use memory::{ExtractedPage, MemorySource};
pub use options::{ErrorMode, PageSelection, ParseOptions};
