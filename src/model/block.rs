//! Typed content blocks.

use serde::{Deserialize, Serialize};

/// One typed unit of page output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A line of prose with the section context it was read under
    Paragraph {
        /// Current section title
        section: Option<String>,
        /// Current subsection title
        sub_section: Option<String>,
        /// Line text
        text: String,
    },

    /// Rows reconstructed from whitespace-aligned text
    Table {
        /// Section current when the table was emitted
        section: Option<String>,
        /// Human-readable label
        description: String,
        /// Rows of cell strings, never empty
        #[serde(rename = "table_data")]
        rows: Vec<Vec<String>>,
    },

    /// Placeholder for an embedded image
    Chart {
        /// Human-readable label referencing the image index
        description: String,
        /// Always empty; chart content is not interpreted
        table_data: Vec<Vec<String>>,
    },
}

impl ContentBlock {
    /// Create a paragraph block.
    pub fn paragraph(
        section: Option<&str>,
        sub_section: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        ContentBlock::Paragraph {
            section: section.map(String::from),
            sub_section: sub_section.map(String::from),
            text: text.into(),
        }
    }

    /// Create a table block.
    pub fn table(
        section: Option<&str>,
        description: impl Into<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        ContentBlock::Table {
            section: section.map(String::from),
            description: description.into(),
            rows,
        }
    }

    /// Create a chart placeholder.
    pub fn chart(description: impl Into<String>) -> Self {
        ContentBlock::Chart {
            description: description.into(),
            table_data: Vec::new(),
        }
    }

    /// The variant of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Paragraph { .. } => BlockKind::Paragraph,
            ContentBlock::Table { .. } => BlockKind::Table,
            ContentBlock::Chart { .. } => BlockKind::Chart,
        }
    }

    /// Section title, for blocks that carry one.
    pub fn section(&self) -> Option<&str> {
        match self {
            ContentBlock::Paragraph { section, .. } | ContentBlock::Table { section, .. } => {
                section.as_deref()
            }
            ContentBlock::Chart { .. } => None,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentBlock::Paragraph { .. })
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, ContentBlock::Table { .. })
    }

    /// Check if this block is a chart.
    pub fn is_chart(&self) -> bool {
        matches!(self, ContentBlock::Chart { .. })
    }
}

/// Discriminant of [`ContentBlock`], used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Paragraph block
    Paragraph,
    /// Table block
    Table,
    /// Chart block
    Chart,
}
