//! JSON rendering for classified documents.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_to(doc, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

/// Write a document as JSON to any writer.
pub fn write_to<W: Write>(doc: &Document, format: JsonFormat, writer: W) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
            doc.serialize(&mut ser)
        }
        JsonFormat::Compact => serde_json::to_writer(writer, doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write a document as JSON to a file, replacing it if present.
pub fn write_json<P: AsRef<Path>>(doc: &Document, path: P, format: JsonFormat) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(doc, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}
