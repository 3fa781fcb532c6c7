//! # pdfblocks
//!
//! Structured content extraction from PDF documents.
//!
//! Every page's text lines and embedded images are classified into typed
//! content blocks: paragraphs tagged with their section and subsection,
//! tables rebuilt from whitespace-aligned text, and chart placeholders for
//! images. The result serializes to JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfblocks::{parse_file, render};
//!
//! fn main() -> pdfblocks::Result<()> {
//!     let doc = parse_file("factsheet.pdf")?;
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section tracking**: Upper-case and outline-numbered headings, `x.y` subsections
//! - **Table reconstruction**: Wrapped rows joined until a trailing number closes them
//! - **Chart placeholders**: One block per embedded image, in resource order
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **Pluggable input**: Any [`PageSource`], including pre-extracted JSON

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{BlockKind, ContentBlock, Document, ExtractionStage, Page, PageFailure};
pub use parser::{
    DocumentParser, ErrorMode, ExtractedPage, ImageDescriptor, LopdfSource, MemorySource,
    PageSelection, PageSource, ParseOptions,
};
pub use pipeline::{DensityThresholds, PageAssembler};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Parse a PDF file and return a classified document.
///
/// # Example
///
/// ```no_run
/// use pdfblocks::parse_file;
///
/// let doc = parse_file("factsheet.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfblocks::{parse_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .strict()
///     .with_pages(PageSelection::Range(1..=3));
/// let doc = parse_file_with_options("factsheet.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    log::debug!("{} detected in {}", format, path.display());
    let source = LopdfSource::load_file(path)?;
    parse_source(source, options)
}

/// Parse a PDF from bytes.
///
/// # Example
///
/// ```no_run
/// use pdfblocks::parse_bytes;
///
/// let data = std::fs::read("factsheet.pdf").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    parse_bytes_with_options(data, ParseOptions::default())
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    detect_format_from_bytes(data)?;
    let source = LopdfSource::load_bytes(data)?;
    parse_source(source, options)
}

/// Parse a PDF from a reader.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_bytes(&data)
}

/// Run the page pipeline over any page source.
///
/// # Example
///
/// ```
/// use pdfblocks::{parse_source, ExtractedPage, MemorySource, ParseOptions};
///
/// let source = MemorySource::new(vec![
///     ExtractedPage::new(["OVERVIEW", "The fund invests globally"]).with_images(1),
/// ]);
/// let doc = parse_source(source, ParseOptions::default()).unwrap();
/// assert_eq!(doc.pages[0].content.len(), 2);
/// ```
pub fn parse_source<S: PageSource>(source: S, options: ParseOptions) -> Result<Document> {
    DocumentParser::with_options(source, options).parse()
}

/// Run the page pipeline over pre-extracted pages stored as JSON.
pub fn parse_extracted_file<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let source = MemorySource::from_json_file(path)?;
    parse_source(source, options)
}

/// Convert a PDF to JSON.
///
/// # Example
///
/// ```no_run
/// use pdfblocks::{to_json, JsonFormat};
///
/// let json = to_json("factsheet.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("factsheet.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing documents and rendering the result.
///
/// # Example
///
/// ```no_run
/// use pdfblocks::{JsonFormat, PdfBlocks};
///
/// let json = PdfBlocks::new()
///     .strict()
///     .with_threads(4)
///     .parse("factsheet.pdf")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), pdfblocks::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfBlocks {
    parse_options: ParseOptions,
}

impl PdfBlocks {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record page failures and keep going (the default).
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Fail on the first page extraction error.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Use a dedicated worker pool of the given size.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.parse_options = self.parse_options.with_threads(threads);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set numeric-density thresholds.
    pub fn with_density(mut self, density: DensityThresholds) -> Self {
        self.parse_options = self.parse_options.with_density(density);
        self
    }

    /// Options that will be used for parsing.
    pub fn options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Parse a PDF file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<PdfBlocksResult> {
        let document = parse_file_with_options(path, self.parse_options)?;
        Ok(PdfBlocksResult { document })
    }

    /// Parse a PDF from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<PdfBlocksResult> {
        let document = parse_bytes_with_options(data, self.parse_options)?;
        Ok(PdfBlocksResult { document })
    }

    /// Parse any page source.
    pub fn parse_source<S: PageSource>(self, source: S) -> Result<PdfBlocksResult> {
        let document = parse_source(source, self.parse_options)?;
        Ok(PdfBlocksResult { document })
    }
}

/// Result of parsing a document.
#[derive(Debug, Clone)]
pub struct PdfBlocksResult {
    /// The parsed document
    pub document: Document,
}

impl PdfBlocksResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Write JSON to a file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P, format: JsonFormat) -> Result<()> {
        render::write_json(&self.document, path, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page failures recorded in lenient mode.
    pub fn failures(&self) -> &[PageFailure] {
        &self.document.failures
    }
}
