//! Visual line reconstruction from page content streams.
//!
//! Text-showing operators are replayed against a tracked text matrix to get
//! positioned spans. Spans sharing a baseline form one line, read left to
//! right; lines are read top to bottom. Wide horizontal gaps inside a line
//! become two spaces so column boundaries survive into the line text.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Baseline tolerance, as a fraction of the font size.
const BASELINE_TOLERANCE: f32 = 0.3;
/// Gap (in average character widths) that separates words.
const WORD_GAP: f32 = 0.2;
/// Gap (in average character widths) that separates columns.
const COLUMN_GAP: f32 = 2.0;

/// A run of text at a fixed position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Decoded text
    pub text: String,
    /// X of the span start in user space
    pub x: f32,
    /// Baseline Y in user space (bottom-up)
    pub y: f32,
    /// Advance width in user space
    pub width: f32,
    /// Effective font size
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span.
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            font_size,
        }
    }

    fn end(&self) -> f32 {
        self.x + self.width
    }

    fn avg_char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars > 0 && self.width > 0.0 {
            self.width / chars as f32
        } else {
            self.font_size * 0.5
        }
    }
}

/// Extract positioned spans for one page.
pub fn extract_page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::TextExtract(e.to_string()))?;
    let content = doc
        .get_page_content(page_id)
        .map_err(|e| Error::TextExtract(e.to_string()))?;
    let content = Content::decode(&content).map_err(|e| Error::TextExtract(e.to_string()))?;

    let mut collector = SpanCollector::new(doc, &fonts);
    for op in &content.operations {
        collector.apply(&op.operator, &op.operands);
    }
    Ok(collector.spans)
}

/// Group spans into text lines, top to bottom.
pub fn group_lines(mut spans: Vec<TextSpan>) -> Vec<String> {
    // Stable sort keeps stream order for spans at the same position
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut baseline: Option<f32> = None;

    for span in spans {
        match baseline {
            Some(y) if (span.y - y).abs() <= span.font_size.max(1.0) * BASELINE_TOLERANCE => {
                current.push(span);
            }
            _ => {
                if !current.is_empty() {
                    lines.push(join_spans(std::mem::take(&mut current)));
                }
                baseline = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(join_spans(current));
    }

    lines
}

/// Join one line's spans, inserting a space or a column gap by distance.
fn join_spans(mut spans: Vec<TextSpan>) -> String {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    let mut text = String::new();
    let mut prev: Option<&TextSpan> = None;
    for span in &spans {
        if let Some(prev) = prev {
            let gap = span.x - prev.end();
            let char_width = prev.avg_char_width().max(span.avg_char_width());
            if gap >= char_width * COLUMN_GAP {
                text.truncate(text.trim_end().len());
                text.push_str("  ");
            } else if gap > char_width * WORD_GAP
                && !text.ends_with(char::is_whitespace)
                && !span.text.starts_with(char::is_whitespace)
                && !(text.ends_with(is_spaceless_script_char)
                    && span.text.starts_with(is_spaceless_script_char))
            {
                text.push(' ');
            }
        }
        if text.ends_with("  ") {
            text.push_str(span.text.trim_start());
        } else {
            text.push_str(&span.text);
        }
        prev = Some(span);
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    /// User-space point `advance` text-space units along the baseline.
    fn point(&self, advance: f32) -> (f32, f32) {
        (self.e + advance * self.a, self.f + advance * self.b)
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Glyph advance widths of a simple font, in thousandths of an em.
#[derive(Debug, Clone)]
struct FontMetrics {
    first_char: i64,
    widths: Vec<f32>,
    default_width: f32,
    two_byte: bool,
}

impl FontMetrics {
    fn from_dict(doc: &LopdfDocument, dict: &Dictionary) -> Self {
        let name_of = |key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_default()
        };
        let base_font = name_of(b"BaseFont");
        let two_byte = name_of(b"Subtype") == "Type0";

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let widths = dict
            .get(b"Widths")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(get_number).collect())
            .unwrap_or_default();

        Self {
            first_char,
            widths,
            default_width: if base_font.contains("Courier") { 600.0 } else { 500.0 },
            two_byte,
        }
    }

    /// Width of an encoded string in text-space units for a 1pt font.
    fn measure(&self, bytes: &[u8]) -> f32 {
        if self.two_byte {
            return bytes.len().div_ceil(2) as f32 * self.default_width / 1000.0;
        }
        let total: f32 = bytes
            .iter()
            .map(|&code| {
                usize::try_from(i64::from(code) - self.first_char)
                    .ok()
                    .and_then(|i| self.widths.get(i))
                    .copied()
                    .filter(|w| *w > 0.0)
                    .unwrap_or(self.default_width)
            })
            .sum();
        total / 1000.0
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            first_char: 0,
            widths: Vec::new(),
            default_width: 500.0,
            two_byte: false,
        }
    }
}

/// Replays text operators and records spans.
struct SpanCollector<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: BTreeMap<Vec<u8>, FontMetrics>,
    spans: Vec<TextSpan>,
    line_matrix: TextMatrix,
    /// Distance shown since the last line move, in text space
    advance: f32,
    font: Option<Vec<u8>>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl<'a> SpanCollector<'a> {
    fn new(doc: &'a LopdfDocument, fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        let metrics = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            metrics,
            spans: Vec::new(),
            line_matrix: TextMatrix::default(),
            advance: 0.0,
            font: None,
            font_size: 12.0,
            leading: 0.0,
            in_text: false,
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        let num = |i: usize| operands.get(i).and_then(get_number);

        match operator {
            "BT" => {
                self.in_text = true;
                self.line_matrix = TextMatrix::default();
                self.advance = 0.0;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.font = Some(name.clone());
                }
                self.font_size = num(1).unwrap_or(self.font_size);
            }
            "TL" => self.leading = num(0).unwrap_or(self.leading),
            "Td" | "TD" => {
                let (tx, ty) = (num(0).unwrap_or(0.0), num(1).unwrap_or(0.0));
                if operator == "TD" {
                    self.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                self.line_matrix = TextMatrix {
                    a: num(0).unwrap_or(1.0),
                    b: num(1).unwrap_or(0.0),
                    c: num(2).unwrap_or(0.0),
                    d: num(3).unwrap_or(1.0),
                    e: num(4).unwrap_or(0.0),
                    f: num(5).unwrap_or(0.0),
                };
                self.advance = 0.0;
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = get_number(other) {
                                    self.adjust(adjust);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix.translate(tx, ty);
        self.advance = 0.0;
    }

    /// `T*`, falling back to the font size when no leading is set.
    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.move_line(0.0, -leading);
    }

    /// A TJ number: move back by `value` thousandths of an em. Word-sized
    /// moves surface as gaps when the line is joined.
    fn adjust(&mut self, value: f32) {
        self.advance -= value / 1000.0 * self.font_size;
    }

    fn show(&mut self, bytes: &[u8]) {
        if !self.in_text {
            return;
        }
        let metrics = self
            .font
            .as_ref()
            .and_then(|f| self.metrics.get(f))
            .cloned()
            .unwrap_or_default();
        let text_width = metrics.measure(bytes) * self.font_size;
        let text = self.decode(bytes);

        if !text.trim().is_empty() {
            let (x, y) = self.line_matrix.point(self.advance);
            self.spans.push(TextSpan::new(
                text,
                x,
                y,
                text_width * self.line_matrix.horizontal_scale(),
                self.font_size * self.line_matrix.vertical_scale(),
            ));
        }
        self.advance += text_width;
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .font
            .as_ref()
            .and_then(|f| self.fonts.get(f))
            .and_then(|dict| dict.get_font_encoding(self.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }
}

/// Scripts written without spaces between words.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'   // Hiragana, Katakana
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility
        | '\u{0E00}'..='\u{0E7F}' // Thai
    )
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a string with no usable font encoding: UTF-16BE with BOM, UTF-8,
/// then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        // 6pt per character, as for 10pt Courier
        TextSpan::new(text, x, y, text.chars().count() as f32 * 6.0, 10.0)
    }

    #[test]
    fn test_lines_split_on_baseline() {
        let lines = group_lines(vec![
            span("OVERVIEW", 72.0, 720.0),
            span("The fund seeks growth.", 72.0, 704.0),
            span("Second prose line.", 72.0, 688.0),
        ]);
        assert_eq!(
            lines,
            vec!["OVERVIEW", "The fund seeks growth.", "Second prose line."]
        );
    }

    #[test]
    fn test_lines_read_top_to_bottom_left_to_right() {
        let lines = group_lines(vec![
            span("bottom", 72.0, 100.0),
            span("right", 200.0, 500.0),
            span("left", 72.0, 501.0),
        ]);
        assert_eq!(lines, vec!["left  right", "bottom"]);
    }

    #[test]
    fn test_wide_gap_becomes_column_separator() {
        let lines = group_lines(vec![
            span("Equity", 72.0, 600.0),
            span("45.2", 272.0, 600.0),
            span("30.1", 340.0, 600.0),
        ]);
        assert_eq!(lines, vec!["Equity  45.2  30.1"]);
    }

    #[test]
    fn test_small_gap_is_word_space() {
        // "Net" ends at 90; 3pt gap is half a character
        let lines = group_lines(vec![span("Net", 72.0, 600.0), span("assets", 93.0, 600.0)]);
        assert_eq!(lines, vec!["Net assets"]);
    }

    #[test]
    fn test_adjacent_spans_concatenate() {
        let lines = group_lines(vec![span("Gro", 72.0, 600.0), span("wth", 90.0, 600.0)]);
        assert_eq!(lines, vec!["Growth"]);
    }

    #[test]
    fn test_cjk_spans_join_without_space() {
        let lines = group_lines(vec![span("基金", 72.0, 600.0), span("概要", 86.0, 600.0)]);
        assert_eq!(lines, vec!["基金概要"]);
    }

    #[test]
    fn test_text_matrix_translate_and_point() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 720.0);
        m.translate(0.0, -16.0);
        assert_eq!(m.point(10.0), (82.0, 704.0));

        let scaled = TextMatrix {
            a: 2.0,
            d: 2.0,
            ..TextMatrix::default()
        };
        assert_eq!(scaled.horizontal_scale(), 2.0);
        assert_eq!(scaled.vertical_scale(), 2.0);
    }

    #[test]
    fn test_font_metrics_measure() {
        let metrics = FontMetrics {
            first_char: 65,
            widths: vec![700.0, 600.0],
            default_width: 500.0,
            two_byte: false,
        };
        // A, B from the table; space falls back to the default
        assert!((metrics.measure(b"AB ") - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"plain"), "plain");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }
}
