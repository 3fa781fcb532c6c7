//! Reconstruction of table rows from wrapped, whitespace-aligned lines.
//!
//! A line ending in a number closes a row; anything else is held back as a
//! continuation and prefixed to the next closing line. The merged line is
//! split into cells on runs of two or more whitespace characters, so the
//! upstream extractor must preserve inter-column spacing for rows to have
//! more than one cell.

use super::patterns::{ends_with_number, split_columns};

/// Continuation text waiting for a row-closing line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRow {
    text: String,
}

impl PendingRow {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Pending text so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Add a continuation fragment, space-joined to any previous one.
    pub fn append(&mut self, fragment: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    /// Take the pending text, leaving the accumulator empty.
    pub fn flush(&mut self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.text))
        }
    }
}

/// Rows rebuilt from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructedRows {
    /// Completed rows, each split into cells
    pub rows: Vec<Vec<String>>,
    /// Continuation text left without a closing line; not part of any row
    pub discarded: Option<String>,
}

impl ReconstructedRows {
    /// Check if no row was completed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Merges consecutive lines of one page into table rows.
#[derive(Debug, Clone, Default)]
pub struct TableRowReconstructor {
    pending: PendingRow,
    rows: Vec<Vec<String>>,
}

impl TableRowReconstructor {
    /// Create a reconstructor with no state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line of the page. Blank lines are ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if ends_with_number(line) {
            let row = match self.pending.flush() {
                Some(prefix) => split_columns(&format!("{} {}", prefix, line)),
                None => split_columns(line),
            };
            self.rows.push(row);
        } else {
            self.pending.append(line);
        }
    }

    /// Rows completed so far.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Continuation text currently held back.
    pub fn pending(&self) -> &PendingRow {
        &self.pending
    }

    /// Finish the page.
    ///
    /// Pending text with no closing line after it is returned as
    /// `discarded` and does not appear in any row.
    pub fn finish(mut self) -> ReconstructedRows {
        ReconstructedRows {
            discarded: self.pending.flush(),
            rows: self.rows,
        }
    }

    /// Run a whole page of lines through a fresh reconstructor.
    pub fn reconstruct<S: AsRef<str>>(lines: &[S]) -> ReconstructedRows {
        let mut reconstructor = Self::new();
        for line in lines {
            reconstructor.push_line(line.as_ref());
        }
        reconstructor.finish()
    }
}
