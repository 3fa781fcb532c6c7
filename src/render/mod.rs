//! Rendering module for serializing classified documents.

mod json;

pub use json::{to_json, write_json, write_to, JsonFormat};
