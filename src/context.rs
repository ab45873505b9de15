//! Context scanning: find the lines that belong to one subject's statement
//! block, so predicate search can be scoped to that block instead of the
//! whole document.

use std::collections::BTreeSet;

use crate::prefixes::{PrefixShrink, PrefixTable};
use crate::types::Term;
use crate::variants;

/// Hard cap on context-line hits. More than ten matches means the document
/// is pathological or the subject spelling is ambiguous — scanning further
/// buys nothing, so the scan gives up at eleven.
pub const MAX_CONTEXT_MATCHES: usize = 11;

/// How many lines after a context line belong to its block at most.
const BLOCK_WINDOW: usize = 19;

/// The resolved scope of one context subject: its anchor line (with the
/// matched subject spelling's position), all context lines, and the full
/// set of block lines to search.
#[derive(Debug, Clone)]
pub struct ContextScope {
    /// Byte column of the subject spelling on the anchor line.
    pub anchor_column: usize,
    /// Length of the matched subject spelling.
    pub anchor_length: usize,
    /// First context line — the scroll anchor.
    pub anchor_line: usize,
    /// All lines belonging to the subject's statement blocks.
    pub block: BTreeSet<usize>,
    /// The context lines themselves, ascending, at most eleven.
    pub context_lines: Vec<usize>,
}

/// Find the lines whose trimmed text starts with a spelling of the context
/// subject. Subject position requires start-of-line anchoring — substring
/// containment would match objects and literals. A relaxed second pass with
/// guessed conventional prefixes runs only when the primary pass finds
/// nothing. Returns at most `MAX_CONTEXT_MATCHES` indices, ascending.
pub fn find_context_lines(
    lines: &[&str],
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Vec<usize> {
    return context_hits(lines, term, table, shrink, quoted)
        .into_iter()
        .map(|(idx, _)| return idx)
        .collect();
}

/// Resolve the full scope for a context subject, or `None` when no line in
/// the document starts with any of its spellings.
pub fn scope_for(
    lines: &[&str],
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Option<ContextScope> {
    let hits = context_hits(lines, term, table, shrink, quoted);
    let &(anchor_line, anchor_length) = hits.first()?;

    let anchor_column = lines
        .get(anchor_line)
        .map_or(0, |l| return l.len().saturating_sub(l.trim_start().len()));
    let context_lines: Vec<usize> = hits.iter().map(|&(idx, _)| return idx).collect();
    let block = lines_to_search(lines, &context_lines);

    return Some(ContextScope {
        anchor_column,
        anchor_length,
        anchor_line,
        block,
        context_lines,
    });
}

/// Primary-then-relaxed context matching, recording the matched spelling
/// length per hit line. The locator also uses this directly for
/// subject-anchored search without a context.
pub(crate) fn context_hits(
    lines: &[&str],
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Vec<(usize, usize)> {
    let primary = variants::variants_for(term, table, shrink, quoted);
    let primary_spellings: Vec<&str> = primary.iter().map(|v| return v.text.as_str()).collect();
    let hits = lines_starting_with(lines, &primary_spellings);
    if !hits.is_empty() {
        return hits;
    }

    let relaxed = relaxed_subject_spellings(term);
    let relaxed_refs: Vec<&str> = relaxed.iter().map(String::as_str).collect();
    return lines_starting_with(lines, &relaxed_refs);
}

/// Expand context lines into the full set of lines to search: each context
/// line plus up to `BLOCK_WINDOW` following lines, stopping early when a
/// later line starts a new top-level statement block.
pub fn lines_to_search(lines: &[&str], context_lines: &[usize]) -> BTreeSet<usize> {
    let mut selected = BTreeSet::new();

    for &start in context_lines {
        if start >= lines.len() {
            continue;
        }
        selected.insert(start);

        for step in 1..=BLOCK_WINDOW {
            let idx = start.saturating_add(step);
            let Some(line) = lines.get(idx) else {
                break;
            };
            if starts_new_top_level_block(line) {
                break;
            }
            selected.insert(idx);
        }
    }

    return selected;
}

/// A new non-indented, non-continuation line starts a new subject block:
/// non-whitespace at column 0 that is not an `@` directive.
fn starts_new_top_level_block(line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return false;
    };
    return !first.is_whitespace() && first != '@';
}

/// Collect (line index, matched spelling length) pairs where the trimmed
/// line starts with any spelling, bounded at `MAX_CONTEXT_MATCHES`.
fn lines_starting_with(lines: &[&str], spellings: &[&str]) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        let matched = spellings
            .iter()
            .find(|s| return !s.is_empty() && trimmed.starts_with(*s));
        if let Some(spelling) = matched {
            hits.push((idx, spelling.len()));
            if hits.len() >= MAX_CONTEXT_MATCHES {
                break;
            }
        }
    }
    return hits;
}

/// Relaxed subject spellings: conventional guessed prefixes applied to the
/// local name, plus the Turtle default-prefix form. Last resort only.
fn relaxed_subject_spellings(term: &Term) -> Vec<String> {
    let mut spellings = variants::guessed_prefix_spellings(term);
    let local = term.local_name();
    if !local.is_empty() && local != term.0 {
        spellings.push(format!(":{local}"));
    }
    return spellings;
}
