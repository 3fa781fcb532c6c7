//! Heading and subsection detection for single lines.

use super::patterns::{has_outline_prefix, has_two_level_outline, is_all_upper};

/// Classification of one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Top-level section title
    Heading,
    /// Second-level outline entry
    Subsection,
    /// Ordinary text
    Body,
}

/// Classifies lines as heading, subsection, or body text.
///
/// Rules are evaluated in a fixed order and the first match wins:
///
/// 1. all upper case → [`LineKind::Heading`]
/// 2. outline prefix (`3 `, `2.1 `, `1.2.3 `) → [`LineKind::Heading`]
/// 3. two-level outline (`2.1`, `2.1Overview`) → [`LineKind::Subsection`]
///
/// Rule 2 covers every line rule 3 would match when a space follows the
/// number, so `2.1 Overview` is a heading. Only outline numbers glued to
/// text or standing alone reach rule 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier;

impl LineClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify a trimmed, non-empty line.
    pub fn classify(&self, line: &str) -> LineKind {
        if is_heading(line) {
            LineKind::Heading
        } else if has_two_level_outline(line) {
            LineKind::Subsection
        } else {
            LineKind::Body
        }
    }

    /// Classify a line and apply its effect on the section context.
    pub fn observe(&self, line: &str, context: &mut SectionContext) -> LineKind {
        let kind = self.classify(line);
        match kind {
            LineKind::Heading => context.enter_section(line),
            LineKind::Subsection => context.enter_subsection(line),
            LineKind::Body => {}
        }
        kind
    }
}

/// Heading rule: upper case or numeric outline prefix.
pub fn is_heading(line: &str) -> bool {
    is_all_upper(line) || has_outline_prefix(line)
}

/// The section and subsection a page walk is currently inside.
///
/// Owned by a single page assembly; a new page always starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionContext {
    section: Option<String>,
    sub_section: Option<String>,
}

impl SectionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current section title.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Current subsection title.
    pub fn sub_section(&self) -> Option<&str> {
        self.sub_section.as_deref()
    }

    /// Start a new section; clears the subsection.
    pub fn enter_section(&mut self, title: &str) {
        self.section = Some(title.to_string());
        self.sub_section = None;
    }

    /// Start a new subsection within the current section.
    pub fn enter_subsection(&mut self, title: &str) {
        self.sub_section = Some(title.to_string());
    }
}
