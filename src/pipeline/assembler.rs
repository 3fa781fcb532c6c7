//! Per-page orchestration of the classifiers.

use super::chart::ChartDetector;
use super::density::{DensityThresholds, NumericDensityFilter};
use super::line::{LineClassifier, LineKind, SectionContext};
use super::table_rows::TableRowReconstructor;
use crate::model::{ContentBlock, Page};
use crate::parser::ImageDescriptor;

/// Builds a [`Page`] from its raw lines and image list.
///
/// Output order is fixed: paragraphs in line order, then at most one table,
/// then one chart per image. The assembler holds no per-page state, so one
/// instance can serve many pages concurrently.
#[derive(Debug, Clone, Default)]
pub struct PageAssembler {
    classifier: LineClassifier,
    density: NumericDensityFilter,
    charts: ChartDetector,
}

impl PageAssembler {
    /// Create an assembler with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler with custom numeric-density thresholds.
    pub fn with_thresholds(thresholds: DensityThresholds) -> Self {
        Self {
            density: NumericDensityFilter::with_thresholds(thresholds),
            ..Self::default()
        }
    }

    /// Assemble one page.
    pub fn assemble<S: AsRef<str>>(
        &self,
        page_number: u32,
        lines: &[S],
        images: &[ImageDescriptor],
    ) -> Page {
        let mut page = Page::new(page_number);
        let mut context = SectionContext::new();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if self.classifier.observe(line, &mut context) != LineKind::Body {
                continue;
            }
            if let Some(paragraph) = self.density.filter(line, &context) {
                page.add_block(paragraph);
            }
        }

        let reconstructed = TableRowReconstructor::reconstruct(lines);
        if let Some(dropped) = &reconstructed.discarded {
            log::debug!(
                "page {}: dropping unterminated table continuation {:?}",
                page_number,
                dropped
            );
        }
        if !reconstructed.is_empty() {
            page.add_block(ContentBlock::table(
                context.section(),
                table_description(1, page_number),
                reconstructed.rows,
            ));
        }

        page.extend_blocks(self.charts.detect(images));

        log::debug!(
            "page {}: {} lines, {} images -> {} blocks",
            page_number,
            lines.len(),
            images.len(),
            page.block_count()
        );
        page
    }
}

/// Description for the `index`-th table on a page.
pub fn table_description(index: usize, page_number: u32) -> String {
    format!("Text-based Table #{} on page {}", index, page_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn images(n: usize) -> Vec<ImageDescriptor> {
        (0..n)
            .map(|i| ImageDescriptor::named(format!("Im{}", i)))
            .collect()
    }

    #[test]
    fn test_heading_prose_and_chart() {
        let assembler = PageAssembler::new();
        let page = assembler.assemble(1, &["OVERVIEW", "The fund seeks growth."], &images(1));

        assert_eq!(
            page.content,
            vec![
                ContentBlock::paragraph(Some("OVERVIEW"), None, "The fund seeks growth."),
                ContentBlock::chart("Detected image #1, possible chart or graphic"),
            ]
        );
    }

    #[test]
    fn test_empty_page_with_images() {
        let page = PageAssembler::new().assemble::<&str>(2, &[], &images(2));
        assert_eq!(page.page_number, 2);
        assert_eq!(page.count(BlockKind::Chart), 2);
        assert_eq!(page.block_count(), 2);
    }

    #[test]
    fn test_paragraph_context_is_taken_when_line_is_read() {
        let page = PageAssembler::new().assemble(
            1,
            &["INTRO", "first", "2.1", "second", "RISKS", "third"],
            &[],
        );
        let paragraphs: Vec<_> = page
            .content
            .iter()
            .filter(|b| b.is_paragraph())
            .cloned()
            .collect();
        assert_eq!(
            paragraphs,
            vec![
                ContentBlock::paragraph(Some("INTRO"), None, "first"),
                ContentBlock::paragraph(Some("INTRO"), Some("2.1"), "second"),
                ContentBlock::paragraph(Some("RISKS"), None, "third"),
            ]
        );
        // "2.1" ends in a number, so it also closes a table row
        assert!(page.content[3].is_table());
    }

    #[test]
    fn test_table_follows_paragraphs_and_uses_final_section() {
        let lines = [
            "ASSET ALLOCATION",
            "Equity    45.2    30.1",
            "Debt    30.0    12.4",
            "Cash and",
            "equivalents  24.8  1.2",
        ];
        let page = PageAssembler::new().assemble(4, &lines, &images(1));

        assert_eq!(page.block_count(), 3);
        assert_eq!(
            page.content[0],
            ContentBlock::paragraph(Some("ASSET ALLOCATION"), None, "Cash and")
        );
        match &page.content[1] {
            ContentBlock::Table {
                section,
                description,
                rows,
            } => {
                assert_eq!(section.as_deref(), Some("ASSET ALLOCATION"));
                assert_eq!(description, "Text-based Table #1 on page 4");
                assert_eq!(
                    rows,
                    &vec![
                        vec!["ASSET ALLOCATION Equity", "45.2", "30.1"],
                        vec!["Debt", "30.0", "12.4"],
                        vec!["Cash and equivalents", "24.8", "1.2"],
                    ]
                );
            }
            other => panic!("expected table, got {:?}", other),
        }
        assert!(page.content[2].is_chart());
    }

    #[test]
    fn test_numeric_line_can_be_table_row_but_not_paragraph() {
        let page = PageAssembler::new().assemble(1, &["1.5  2.0  3.5"], &[]);
        // "1.5  2.0  3.5" has an outline prefix, so it is consumed as a heading
        // for prose, while still closing a table row.
        assert_eq!(page.count(BlockKind::Paragraph), 0);
        assert_eq!(page.count(BlockKind::Table), 1);
        assert_eq!(page.content[0].section(), Some("1.5  2.0  3.5"));
    }

    #[test]
    fn test_dense_body_line_suppressed_from_prose() {
        let page = PageAssembler::new().assemble(1, &["Nav 12.5 13.1 14.0"], &[]);
        assert_eq!(page.count(BlockKind::Paragraph), 0);
        assert_eq!(page.count(BlockKind::Table), 1);
    }

    #[test]
    fn test_idempotent() {
        let assembler = PageAssembler::new();
        let lines = ["FACTS", "Launched in 2010", "AUM  1200.5", "trailing note"];
        let first = assembler.assemble(7, &lines, &images(3));
        let second = assembler.assemble(7, &lines, &images(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_thresholds_change_suppression() {
        let strict = PageAssembler::with_thresholds(DensityThresholds {
            min_numeric_tokens: 1,
            max_numeric_ratio: 0.1,
        });
        let page = strict.assemble(1, &["Revenue grew by 12% this quarter"], &[]);
        assert_eq!(page.count(BlockKind::Paragraph), 0);
    }
}
