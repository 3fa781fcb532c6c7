//! Pre-extracted page input.
//!
//! [`MemorySource`] feeds the pipeline from lines and image lists that were
//! extracted elsewhere, either built in code or read from JSON of the form
//! `{ "pages": [ { "lines": [...], "images": [...] } ] }`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::backend::{ImageDescriptor, PageSource};
use crate::error::{Error, Result};

/// Text lines and images of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Raw text lines in reading order
    #[serde(default)]
    pub lines: Vec<String>,
    /// Embedded images in resource order
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
}

impl ExtractedPage {
    /// Create a page from text lines.
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            images: Vec::new(),
        }
    }

    /// Create a page from a block of text, split on newlines.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Add an image.
    pub fn with_image(mut self, image: ImageDescriptor) -> Self {
        self.images.push(image);
        self
    }

    /// Add `count` anonymous images.
    pub fn with_images(mut self, count: usize) -> Self {
        let start = self.images.len();
        self.images
            .extend((start..start + count).map(|i| ImageDescriptor::named(format!("Im{}", i + 1))));
        self
    }
}

/// In-memory [`PageSource`]; page `n` is the `n`-th entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySource {
    /// Pages in order
    pub pages: Vec<ExtractedPage>,
}

impl MemorySource {
    /// Create a source from pages.
    pub fn new(pages: Vec<ExtractedPage>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn push(&mut self, page: ExtractedPage) {
        self.pages.push(page);
    }

    /// Read pre-extracted pages from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))
    }

    /// Read pre-extracted pages from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    fn page(&self, page: u32) -> Result<&ExtractedPage> {
        (page as usize)
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }
}

impl PageSource for MemorySource {
    fn page_numbers(&self) -> Vec<u32> {
        (1..=self.pages.len() as u32).collect()
    }

    fn lines(&self, page: u32) -> Result<Vec<String>> {
        Ok(self.page(page)?.lines.clone())
    }

    fn images(&self, page: u32) -> Result<Vec<ImageDescriptor>> {
        Ok(self.page(page)?.images.clone())
    }
}
