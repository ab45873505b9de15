//! Per-call view of the editor text: cached line split, byte-offset to
//! (line, column) conversion, and the structural-classification index.
//! Built fresh for each locate call and discarded at the end.

use crate::classify::{StructuralIndex, is_structural_occurrence};
use crate::types::Position;

/// One locate call's view of the serialized text. The text is immutable for
/// the duration of the call; lines and the structural index are computed
/// once up front.
#[derive(Debug)]
pub struct Document<'a> {
    index: StructuralIndex,
    line_starts: Vec<usize>,
    lines: Vec<&'a str>,
    text: &'a str,
}

impl<'a> Document<'a> {
    /// Split the text into lines and build the structural index.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = Vec::new();
        let mut lines = Vec::new();
        let mut start = 0_usize;

        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(start);
                lines.push(text.get(start..i).unwrap_or(""));
                start = i.saturating_add(1);
            }
        }
        if start < text.len() {
            line_starts.push(start);
            lines.push(text.get(start..).unwrap_or(""));
        }

        return Self {
            index: StructuralIndex::build(text),
            line_starts,
            lines,
            text,
        };
    }

    /// The full text.
    pub fn text(&self) -> &'a str {
        return self.text;
    }

    /// The cached line split. Trailing-newline documents don't grow a
    /// phantom empty line, matching `str::lines`.
    pub fn lines(&self) -> &[&'a str] {
        return &self.lines;
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        return self.lines.len();
    }

    /// Byte span of a line, newline excluded.
    pub fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line)?;
        let len = self.lines.get(line)?.len();
        return Some((start, start.saturating_add(len)));
    }

    /// Convert a byte offset into a zero-based (line, column) pair. Offsets
    /// past the end clamp to the last position.
    pub fn position_at(&self, offset: usize) -> Position {
        let line = self
            .line_starts
            .partition_point(|&s| return s <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        return Position {
            column: offset.saturating_sub(line_start),
            line,
        };
    }

    /// Whether the occurrence at `offset..offset + length` is structural.
    pub fn is_structural(&self, offset: usize, length: usize) -> bool {
        return is_structural_occurrence(self.text, &self.index, offset, length);
    }
}
