//! Quad-backed matching: when the live quad model is available, it
//! authoritatively supplies both the expected spellings and the expected
//! occurrence count for a predicate — no guessing from text.

use crate::context::ContextScope;
use crate::document::Document;
use crate::prefixes::{PrefixShrink, PrefixTable};
use crate::textscan;
use crate::types::{LocateOutcome, LocateResult, Position, Quad, Term};
use crate::variants;

/// Locate a predicate using the quad snapshot. The number of quads with
/// this predicate (under the context subject, when given) bounds the number
/// of returned ranges: naive text search can find more when literal text
/// coincidentally matches a prefixed form, but never the model fewer.
///
/// Returns `None` when the snapshot has no matching quad (stale or
/// unloaded model) or when no structural occurrence was found — the caller
/// falls back to the text matcher either way.
pub fn locate_predicate(
    doc: &Document<'_>,
    quads: &[Quad],
    term: &Term,
    context: Option<&Term>,
    scope: Option<&ContextScope>,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Option<LocateResult> {
    let expected = quads
        .iter()
        .filter(|q| return q.predicate == *term)
        .filter(|q| return context.is_none_or(|c| return q.subject == *c))
        .count();
    if expected == 0 {
        return None;
    }

    let spellings = variants::quad_derived_variants(term, table, shrink, quoted);
    let mut found = textscan::collect_structural_occurrences(
        doc,
        scope.map(|s| return &s.block),
        &spellings,
    );
    if found.is_empty() {
        return None;
    }
    found.truncate(expected);

    let anchor = scope.map(|s| {
        return Position {
            column: 0,
            line: s.anchor_line,
        };
    });
    return Some(LocateResult {
        context_anchor: anchor,
        outcome: LocateOutcome::Matched,
        ranges: textscan::occurrences_to_ranges(doc, &found),
    });
}

#[cfg(test)]
mod tests {
    use super::locate_predicate;
    use crate::context;
    use crate::document::Document;
    use crate::prefixes::{PrefixTable, shrink_with_table};
    use crate::types::{Quad, QuadObject, Term};

    fn quad(subject: &str, predicate: &str) -> Quad {
        return Quad {
            graph: None,
            object: QuadObject::Literal("x".to_string()),
            predicate: Term(predicate.to_string()),
            subject: Term(subject.to_string()),
        };
    }

    #[test]
    fn scoped_predicate_found_on_context_line_only() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:b> <urn:p2> \"y\" .\n";
        let doc = Document::new(text);
        let quads = vec![quad("urn:a", "urn:p")];
        let term = Term("urn:p".to_string());
        let ctx = Term("urn:a".to_string());
        let scope = context::scope_for(
            doc.lines(),
            &ctx,
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("context found");

        let result = locate_predicate(
            &doc,
            &quads,
            &term,
            Some(&ctx),
            Some(&scope),
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("quad-backed hit");
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.line, 0);
        assert_eq!(result.ranges[0].start.column, 8);
    }

    #[test]
    fn truncates_to_quad_count() {
        // The predicate is written twice but the model records it once:
        // only the first occurrence is returned.
        let text = "<urn:a> <urn:p> \"x\" ;\n  <urn:p> \"y\" .\n";
        let doc = Document::new(text);
        let quads = vec![quad("urn:a", "urn:p")];
        let term = Term("urn:p".to_string());

        let result = locate_predicate(
            &doc,
            &quads,
            &term,
            None,
            None,
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("quad-backed hit");
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.line, 0);
    }

    #[test]
    fn returns_all_up_to_count_in_offset_order() {
        let text = "<urn:a> <urn:p> \"x\" ;\n  <urn:p> \"y\" .\n";
        let doc = Document::new(text);
        let quads = vec![quad("urn:a", "urn:p"), quad("urn:a", "urn:p")];
        let term = Term("urn:p".to_string());

        let result = locate_predicate(
            &doc,
            &quads,
            &term,
            None,
            None,
            &PrefixTable::default(),
            shrink_with_table,
            false,
        )
        .expect("quad-backed hit");
        assert_eq!(result.ranges.len(), 2);
        assert!(result.ranges[0].start.line < result.ranges[1].start.line);
    }

    #[test]
    fn absent_predicate_defers_to_fallback() {
        let doc = Document::new("<urn:a> <urn:p> \"x\" .\n");
        let quads = vec![quad("urn:a", "urn:p")];
        let term = Term("urn:unknown".to_string());
        let result = locate_predicate(
            &doc,
            &quads,
            &term,
            None,
            None,
            &PrefixTable::default(),
            shrink_with_table,
            false,
        );
        assert!(result.is_none());
    }

    #[test]
    fn context_filter_excludes_other_subjects() {
        let doc = Document::new("<urn:b> <urn:p> \"y\" .\n");
        let quads = vec![quad("urn:b", "urn:p")];
        let term = Term("urn:p".to_string());
        let ctx = Term("urn:a".to_string());
        // No quad has subject urn:a — the model is silent for this pair.
        let result = locate_predicate(
            &doc,
            &quads,
            &term,
            Some(&ctx),
            None,
            &PrefixTable::default(),
            shrink_with_table,
            false,
        );
        assert!(result.is_none());
    }
}
