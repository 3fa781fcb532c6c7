//! Page-level types.

use super::{BlockKind, ContentBlock};
use serde::{Deserialize, Serialize};

/// The classified content of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Content blocks in output order
    pub content: Vec<ContentBlock>,
}

impl Page {
    /// Create an empty page.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            content: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: ContentBlock) {
        self.content.push(block);
    }

    /// Append several blocks, keeping their order.
    pub fn extend_blocks(&mut self, blocks: impl IntoIterator<Item = ContentBlock>) {
        self.content.extend(blocks);
    }

    /// Check if the page has no content blocks.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.content.len()
    }

    /// Count blocks of one kind.
    pub fn count(&self, kind: BlockKind) -> usize {
        self.content.iter().filter(|b| b.kind() == kind).count()
    }

    /// Iterate over the paragraph texts on this page.
    pub fn paragraph_texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
