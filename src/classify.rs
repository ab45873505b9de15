//! Structural classification: decide whether a raw substring match plays a
//! subject/predicate/JSON-key role or is incidental content inside a string
//! literal. Operates on byte offsets into the document.

/// Per-call index over the document. Triple-quote delimiter positions are
/// collected in one pass so each candidate answers its parity query by
/// binary search instead of rescanning the text prefix.
#[derive(Debug)]
pub struct StructuralIndex {
    /// Byte offsets where an unescaped `"""` delimiter starts, ascending.
    triple_toggles: Vec<usize>,
}

impl StructuralIndex {
    /// Scan the whole text once and record every unescaped `"""` delimiter.
    pub fn build(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut triple_toggles = Vec::new();
        let mut i = 0_usize;

        while i < bytes.len() {
            let is_triple = bytes.get(i) == Some(&b'"')
                && bytes.get(i.saturating_add(1)) == Some(&b'"')
                && bytes.get(i.saturating_add(2)) == Some(&b'"')
                && !is_escaped(bytes, i);
            if is_triple {
                triple_toggles.push(i);
                i = i.saturating_add(3);
            } else {
                i = i.saturating_add(1);
            }
        }

        return Self { triple_toggles };
    }

    /// Whether a byte offset falls inside a triple-quoted literal: an odd
    /// number of delimiters precede it.
    pub fn inside_triple_quoted(&self, offset: usize) -> bool {
        let preceding = self.triple_toggles.partition_point(|&t| return t < offset);
        return preceding % 2 == 1;
    }

    /// Whether a quote at `offset` is part of a recorded `"""` delimiter.
    fn part_of_triple_delimiter(&self, offset: usize) -> bool {
        let idx = self.triple_toggles.partition_point(|&t| return t <= offset);
        let Some(start) = idx.checked_sub(1).and_then(|i| return self.triple_toggles.get(i)) else {
            return false;
        };
        return offset < start.saturating_add(3);
    }
}

/// Decide whether the occurrence at `offset..offset + length` is structural:
/// a subject, predicate, or JSON-LD key — never content inside an ordinary
/// string literal. Rule order matters: the JSON-key check runs before the
/// triple-quote rejection so quoted keys survive inside JSON documents.
pub fn is_structural_occurrence(
    text: &str,
    index: &StructuralIndex,
    offset: usize,
    length: usize,
) -> bool {
    if length == 0 || offset.saturating_add(length) > text.len() {
        return false;
    }

    if is_json_key(text, offset, length) {
        return true;
    }

    if index.inside_triple_quoted(offset) {
        return false;
    }

    if inside_line_literal(text, index, offset) {
        return false;
    }

    return passes_positional_rule(text, offset, length);
}

/// A quoted spelling immediately followed (modulo whitespace) by a colon is
/// a JSON-LD key. Checked both when the match includes the surrounding
/// quotes and when it is the inner content between them.
fn is_json_key(text: &str, offset: usize, length: usize) -> bool {
    let bytes = text.as_bytes();
    let end = offset.saturating_add(length);

    let includes_quotes = length >= 2
        && bytes.get(offset) == Some(&b'"')
        && bytes.get(end.saturating_sub(1)) == Some(&b'"');
    if includes_quotes {
        return next_nonspace_is_colon(bytes, end);
    }

    let between_quotes = offset
        .checked_sub(1)
        .is_some_and(|i| return bytes.get(i) == Some(&b'"'))
        && bytes.get(end) == Some(&b'"');
    if between_quotes {
        return next_nonspace_is_colon(bytes, end.saturating_add(1));
    }
    return false;
}

/// Skip spaces and tabs from `from` and test for `:`.
fn next_nonspace_is_colon(bytes: &[u8], from: usize) -> bool {
    let mut i = from;
    while let Some(&b) = bytes.get(i) {
        if b == b' ' || b == b'\t' {
            i = i.saturating_add(1);
            continue;
        }
        return b == b':';
    }
    return false;
}

/// Whether `offset` sits inside an ordinary quoted literal on its own line:
/// an odd number of unescaped quotes precede it on the line. Quotes that
/// are part of a `"""` delimiter don't count — they are tracked by the
/// triple-quote parity instead.
fn inside_line_literal(text: &str, index: &StructuralIndex, offset: usize) -> bool {
    let bytes = text.as_bytes();
    let line_start = text
        .get(..offset)
        .and_then(|prefix| return prefix.rfind('\n'))
        .map_or(0, |i| return i.saturating_add(1));

    let mut parity = 0_usize;
    let mut i = line_start;
    while i < offset {
        if bytes.get(i) == Some(&b'"')
            && !is_escaped(bytes, i)
            && !index.part_of_triple_delimiter(i)
        {
            parity = parity.saturating_add(1);
        }
        i = i.saturating_add(1);
    }
    return parity % 2 == 1;
}

/// Turtle/TriG positional rule: structural iff the match is flanked by
/// whitespace-ish boundaries (or starts the text / ends the text), with
/// `;` and `{` also accepted before the match — or the match is itself a
/// full bracketed IRI, which is accepted in any position.
fn passes_positional_rule(text: &str, offset: usize, length: usize) -> bool {
    let matched = text.get(offset..offset.saturating_add(length)).unwrap_or("");
    if matched.starts_with('<') && matched.ends_with('>') {
        return true;
    }

    let before_ok = match text.get(..offset).and_then(|p| return p.chars().next_back()) {
        None => true,
        Some(c) => c.is_whitespace() || c == ';' || c == '{',
    };
    let after_ok = match text
        .get(offset.saturating_add(length)..)
        .and_then(|s| return s.chars().next())
    {
        None => true,
        Some(c) => c.is_whitespace(),
    };
    return before_ok && after_ok;
}

/// Whether the byte at `offset` is escaped: preceded by an odd run of
/// backslashes. Escaped quotes never toggle quote parity.
fn is_escaped(bytes: &[u8], offset: usize) -> bool {
    let mut backslashes = 0_usize;
    let mut i = offset;
    while let Some(prev) = i.checked_sub(1) {
        if bytes.get(prev) == Some(&b'\\') {
            backslashes = backslashes.saturating_add(1);
            i = prev;
        } else {
            break;
        }
    }
    return backslashes % 2 == 1;
}
