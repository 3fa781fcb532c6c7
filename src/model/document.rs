//! Document-level types.

use super::{BlockKind, Page};
use serde::{Deserialize, Serialize};

/// A classified document: one entry per processed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in ascending page-number order
    pub pages: Vec<Page>,

    /// Pages whose extraction failed and were degraded to partial output
    #[serde(skip)]
    pub failures: Vec<PageFailure>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by its page number.
    pub fn get_page(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Count blocks of one kind across all pages.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.pages.iter().map(|p| p.count(kind)).sum()
    }

    /// Check if any page failed during extraction.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Which upstream call failed for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStage {
    /// Text line extraction
    Text,
    /// Image enumeration
    Images,
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStage::Text => f.write_str("text"),
            ExtractionStage::Images => f.write_str("images"),
        }
    }
}

/// A per-page extraction failure that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Page the failure belongs to
    pub page_number: u32,
    /// Stage that failed
    pub stage: ExtractionStage,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for PageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "page {} ({}): {}",
            self.page_number, self.stage, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentBlock;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert!(!doc.has_failures());
    }

    #[test]
    fn test_get_page_by_number() {
        let mut doc = Document::new();
        doc.add_page(Page::new(2));
        doc.add_page(Page::new(5));

        assert!(doc.get_page(1).is_none());
        assert_eq!(doc.get_page(5).map(|p| p.page_number), Some(5));
    }

    #[test]
    fn test_failures_are_not_serialized() {
        let mut doc = Document::new();
        let mut page = Page::new(1);
        page.add_block(ContentBlock::chart("Detected image #1, possible chart or graphic"));
        doc.add_page(page);
        doc.failures.push(PageFailure {
            page_number: 1,
            stage: ExtractionStage::Text,
            message: "bad stream".into(),
        });

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("failures").is_none());
        assert_eq!(json["pages"][0]["page_number"], 1);
        assert_eq!(doc.count(BlockKind::Chart), 1);
        assert_eq!(doc.failures[0].to_string(), "page 1 (text): bad stream");
    }
}
