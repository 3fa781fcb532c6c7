//! Suppression of number-heavy lines from prose output.

use super::line::SectionContext;
use super::patterns::count_numeric_tokens;
use crate::model::ContentBlock;

/// Thresholds above which a body line is treated as a table fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityThresholds {
    /// Minimum number of numeric tokens
    pub min_numeric_tokens: usize,
    /// Numeric tokens per word that must be exceeded
    pub max_numeric_ratio: f64,
}

impl Default for DensityThresholds {
    fn default() -> Self {
        Self {
            min_numeric_tokens: 2,
            max_numeric_ratio: 0.3,
        }
    }
}

/// Keeps stray table rows out of the paragraph stream.
///
/// This never produces tables; rows are rebuilt separately by
/// [`super::TableRowReconstructor`].
#[derive(Debug, Clone, Default)]
pub struct NumericDensityFilter {
    thresholds: DensityThresholds,
}

impl NumericDensityFilter {
    /// Create a filter with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with custom thresholds.
    pub fn with_thresholds(thresholds: DensityThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> DensityThresholds {
        self.thresholds
    }

    /// Check whether a body line looks like part of a table.
    pub fn is_table_fragment(&self, line: &str) -> bool {
        let words = line.split_whitespace().count();
        if words == 0 {
            return false;
        }

        let numeric = count_numeric_tokens(line);
        numeric >= self.thresholds.min_numeric_tokens
            && numeric as f64 / words as f64 > self.thresholds.max_numeric_ratio
    }

    /// Turn a body line into a paragraph, or `None` if it is suppressed.
    pub fn filter(&self, line: &str, context: &SectionContext) -> Option<ContentBlock> {
        if self.is_table_fragment(line) {
            log::debug!("suppressing numeric line from prose: {:?}", line);
            return None;
        }
        Some(ContentBlock::paragraph(
            context.section(),
            context.sub_section(),
            line,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppresses_dense_numbers() {
        let filter = NumericDensityFilter::new();
        assert!(filter.is_table_fragment("1.5 2.0 3.5 text"));
        assert!(filter.is_table_fragment("Equity 45.2 30.1"));
    }

    #[test]
    fn test_keeps_prose_with_single_number() {
        let filter = NumericDensityFilter::new();
        assert!(!filter.is_table_fragment("Revenue grew by 12% this quarter"));
    }

    #[test]
    fn test_ratio_must_strictly_exceed() {
        let filter = NumericDensityFilter::new();
        // 3 tokens over 10 words is exactly 0.3
        assert!(!filter.is_table_fragment("a b c d e f g 1 2 3"));
        // 3 over 9 is above
        assert!(filter.is_table_fragment("a b c d e f 1 2 3"));
    }

    #[test]
    fn test_count_floor() {
        let filter = NumericDensityFilter::new();
        // ratio 1.0 but only one token
        assert!(!filter.is_table_fragment("42"));
    }

    #[test]
    fn test_filter_carries_context() {
        let filter = NumericDensityFilter::new();
        let mut ctx = SectionContext::new();
        ctx.enter_section("OVERVIEW");
        ctx.enter_subsection("2.1");

        let block = filter.filter("The scheme is open ended.", &ctx).unwrap();
        assert_eq!(
            block,
            ContentBlock::paragraph(Some("OVERVIEW"), Some("2.1"), "The scheme is open ended.")
        );
        assert!(filter.filter("1.5 2.0 3.5 text", &ctx).is_none());
    }

    #[test]
    fn test_custom_thresholds() {
        let filter = NumericDensityFilter::with_thresholds(DensityThresholds {
            min_numeric_tokens: 1,
            max_numeric_ratio: 0.1,
        });
        assert!(filter.is_table_fragment("Revenue grew by 12% this quarter"));
    }
}
