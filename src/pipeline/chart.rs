//! Chart placeholders for embedded images.

use crate::model::ContentBlock;
use crate::parser::ImageDescriptor;

/// Emits one chart block per embedded image, in image order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartDetector;

impl ChartDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Map a page's images to chart placeholders numbered from 1.
    pub fn detect(&self, images: &[ImageDescriptor]) -> Vec<ContentBlock> {
        (1..=images.len())
            .map(|index| ContentBlock::chart(chart_description(index)))
            .collect()
    }
}

/// Description for the `index`-th image on a page (1-based).
pub fn chart_description(index: usize) -> String {
    format!("Detected image #{}, possible chart or graphic", index)
}
