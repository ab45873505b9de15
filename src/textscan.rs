//! Text-fallback matching: when the quad model is absent or silent about a
//! term, scan dialect-heuristic variants directly against the text. Also
//! hosts the raw occurrence scan shared with the quad-backed matcher.

use std::collections::BTreeSet;

use crate::context::ContextScope;
use crate::document::Document;
use crate::prefixes::{PrefixShrink, PrefixTable};
use crate::types::{
    CandidateOccurrence, LocateOutcome, LocateResult, Position, RoleHint, Term, TextRange,
    Variant,
};
use crate::variants;

/// Scan for every structurally valid occurrence of any variant, ascending
/// by offset. With a line scope, only those lines are searched; without
/// one, the whole text. Overlapping hits from different spellings at the
/// same offset collapse to the first.
pub fn collect_structural_occurrences(
    doc: &Document<'_>,
    scope: Option<&BTreeSet<usize>>,
    spellings: &[Variant],
) -> Vec<CandidateOccurrence> {
    let mut found = Vec::new();

    match scope {
        None => {
            for variant in spellings {
                collect_in_span(doc, 0, doc.text(), variant, &mut found);
            }
        },
        Some(lines) => {
            for &line in lines {
                let Some((start, end)) = doc.line_span(line) else {
                    continue;
                };
                let Some(slice) = doc.text().get(start..end) else {
                    continue;
                };
                for variant in spellings {
                    collect_in_span(doc, start, slice, variant, &mut found);
                }
            }
        },
    }

    // Overlapping spellings (a quoted key and its inner content) collapse
    // to the outermost match; at equal length the stricter role wins.
    found.sort_by_key(|c| {
        return (c.offset, std::cmp::Reverse(c.length), role_rank(c.spelling.role));
    });
    let mut kept: Vec<CandidateOccurrence> = Vec::new();
    let mut covered_until = 0_usize;
    for candidate in found {
        if kept.is_empty() || candidate.offset >= covered_until {
            covered_until = candidate.offset.saturating_add(candidate.length);
            kept.push(candidate);
        }
    }
    return kept;
}

/// Locate a term by scanning heuristic variants against the text. When a
/// context scope was given and the term itself cannot be found inside it,
/// the context subject's own range is returned instead of nothing — the
/// caller still gets a usable anchor.
pub fn locate_by_text(
    doc: &Document<'_>,
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
    scope: Option<&ContextScope>,
) -> LocateResult {
    let spellings = variants::variants_for(term, table, shrink, quoted);
    let found = collect_structural_occurrences(doc, scope.map(|s| return &s.block), &spellings);

    let anchor = scope.map(|s| {
        return Position {
            column: 0,
            line: s.anchor_line,
        };
    });

    if !found.is_empty() {
        return LocateResult {
            context_anchor: anchor,
            outcome: LocateOutcome::Matched,
            ranges: occurrences_to_ranges(doc, &found),
        };
    }

    if let Some(s) = scope {
        return LocateResult {
            context_anchor: anchor,
            outcome: LocateOutcome::ContextFallback,
            ranges: context_subject_range(doc, s).into_iter().collect(),
        };
    }

    return LocateResult::empty(LocateOutcome::NotFound);
}

/// Convert raw occurrences into output ranges.
pub fn occurrences_to_ranges(doc: &Document<'_>, found: &[CandidateOccurrence]) -> Vec<TextRange> {
    return found
        .iter()
        .map(|c| {
            return TextRange {
                end: doc.position_at(c.offset.saturating_add(c.length)),
                start: doc.position_at(c.offset),
            };
        })
        .collect();
}

/// The range of the context subject's own spelling on its anchor line.
fn context_subject_range(doc: &Document<'_>, scope: &ContextScope) -> Option<TextRange> {
    let (line_start, _) = doc.line_span(scope.anchor_line)?;
    let offset = line_start.saturating_add(scope.anchor_column);
    if scope.anchor_length == 0 || !doc.is_structural(offset, scope.anchor_length) {
        return None;
    }
    return Some(TextRange {
        end: doc.position_at(offset.saturating_add(scope.anchor_length)),
        start: doc.position_at(offset),
    });
}

/// Tie-break order for equal-offset, equal-length occurrences: exact forms
/// before loose ones.
fn role_rank(role: RoleHint) -> u8 {
    return match role {
        RoleHint::BracketedIri => 0,
        RoleHint::QuotedJsonKey => 1,
        RoleHint::PrefixedName => 2,
        RoleHint::BareLocalName => 3,
    };
}

/// Find all structural matches of one variant inside a text span that
/// begins at `base` in the document.
fn collect_in_span(
    doc: &Document<'_>,
    base: usize,
    span: &str,
    variant: &Variant,
    found: &mut Vec<CandidateOccurrence>,
) {
    if variant.text.is_empty() {
        return;
    }
    for (rel, matched) in span.match_indices(variant.text.as_str()) {
        let offset = base.saturating_add(rel);
        if doc.is_structural(offset, matched.len()) {
            found.push(CandidateOccurrence {
                length: matched.len(),
                offset,
                spelling: variant.clone(),
            });
        }
    }
    return;
}

#[cfg(test)]
mod tests {
    use super::locate_by_text;
    use crate::context;
    use crate::document::Document;
    use crate::prefixes::{PrefixTable, shrink_with_table};
    use crate::types::{LocateOutcome, Term};

    #[test]
    fn finds_bracketed_predicate() {
        let doc = Document::new("<urn:a> <urn:p> \"x\" .\n");
        let result = locate_by_text(
            &doc,
            &Term("urn:p".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
            None,
        );
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.column, 8);
        assert_eq!(result.ranges[0].end.column, 15);
    }

    #[test]
    fn literal_only_occurrence_yields_zero_ranges() {
        let doc = Document::new("<urn:a> <urn:q> \"mentions <urn:p> here\" .\n");
        let result = locate_by_text(
            &doc,
            &Term("urn:p".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
            None,
        );
        assert_eq!(result.outcome, LocateOutcome::NotFound);
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn scoped_scan_ignores_other_blocks() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:b> <urn:p> \"y\" .\n";
        let doc = Document::new(text);
        let scope = context::scope_for(
            doc.lines(),
            &Term("urn:b".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("context found");
        let result = locate_by_text(
            &doc,
            &Term("urn:p".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
            Some(&scope),
        );
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.line, 1);
        assert_eq!(result.context_anchor.unwrap().line, 1);
    }

    #[test]
    fn falls_back_to_context_subject_range() {
        let text = "<urn:a> <urn:other> \"x\" .\n";
        let doc = Document::new(text);
        let scope = context::scope_for(
            doc.lines(),
            &Term("urn:a".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("context found");
        let result = locate_by_text(
            &doc,
            &Term("urn:missing".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            false,
            Some(&scope),
        );
        assert_eq!(result.outcome, LocateOutcome::ContextFallback);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.column, 0);
        assert_eq!(result.ranges[0].end.column, "<urn:a>".len());
    }

    #[test]
    fn jsonld_key_with_guessed_prefix() {
        let text = "{\"schema:publisher\": \"x\"}";
        let doc = Document::new(text);
        let result = locate_by_text(
            &doc,
            &Term("https://schema.org/publisher".to_string()),
            &PrefixTable::default(),
            shrink_with_table,
            true,
            None,
        );
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        // The range covers the quoted key including quotes.
        assert_eq!(result.ranges[0].start.column, 1);
        assert_eq!(result.ranges[0].end.column, 1 + "\"schema:publisher\"".len());
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:a> <urn:p> \"y\" .\n";
        let doc = Document::new(text);
        let term = Term("urn:p".to_string());
        let first = locate_by_text(&doc, &term, &PrefixTable::default(), shrink_with_table, false, None);
        let second = locate_by_text(&doc, &term, &PrefixTable::default(), shrink_with_table, false, None);
        assert_eq!(first.ranges, second.ranges);
        assert_eq!(first.ranges.len(), 2);
    }
}
