//! Page content classification.
//!
//! The pipeline turns one page's raw lines and image list into ordered
//! content blocks:
//!
//! - [`LineClassifier`] spots headings and subsections and keeps the
//!   [`SectionContext`] current
//! - [`NumericDensityFilter`] drops number-heavy body lines from prose
//! - [`TableRowReconstructor`] rebuilds wrapped table rows from the same lines
//! - [`ChartDetector`] turns each embedded image into a chart placeholder
//! - [`PageAssembler`] runs all of the above for a page

mod assembler;
mod chart;
mod density;
mod line;
pub mod patterns;
mod table_rows;

pub use assembler::{table_description, PageAssembler};
pub use chart::{chart_description, ChartDetector};
pub use density::{DensityThresholds, NumericDensityFilter};
pub use line::{is_heading, LineClassifier, LineKind, SectionContext};
pub use table_rows::{PendingRow, ReconstructedRows, TableRowReconstructor};
