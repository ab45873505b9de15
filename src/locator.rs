//! Locator: orchestrates context scanning and the quad-backed and
//! text-fallback matchers into one answer — "where is term T, optionally
//! within context C?". Everything here is per-call: no state survives a
//! locate operation.

use regex::Regex;

use crate::context::{self, ContextScope};
use crate::dialect::Dialect;
use crate::document::Document;
use crate::error::Error;
use crate::prefixes::{PrefixShrink, PrefixTable};
use crate::quadmatch;
use crate::textscan;
use crate::types::{
    GraphModel, LocateOutcome, LocateResult, Position, Quad, Term, TextRange, Variant,
};
use crate::variants;

/// Hard ceiling on document size. Beyond this the scan is skipped entirely
/// and the call returns an empty result — worst-case cost stays bounded.
pub const MAX_DOCUMENT_LINES: usize = 10_000;

/// The SHACL path predicate, special-cased for shapes graphs: the
/// structural anchor there is the *value* of a `sh:path` statement.
const SHACL_PATH: &str = "http://www.w3.org/ns/shacl#path";

/// One locate call's inputs, assembled by the host.
#[derive(Debug)]
pub struct LocateRequest<'a> {
    /// Focus-node or shape subject scoping the search, if any.
    pub context: Option<Term>,
    /// Serialization dialect of the text.
    pub dialect: Dialect,
    /// Whether the editor holds a shapes graph or a data graph.
    pub model: GraphModel,
    /// Host-supplied prefix table, read-only.
    pub prefixes: &'a PrefixTable,
    /// The live quad model, absent when the host hasn't parsed the text.
    pub quads: Option<&'a [Quad]>,
    /// Injected prefix-shrink function.
    pub shrink: PrefixShrink,
    /// The term to locate.
    pub term: Term,
    /// Current editor buffer content.
    pub text: &'a str,
}

/// Resolve a term to the character ranges that represent it in the text.
///
/// "Not found" is a valid empty result, never an error. The only error
/// surface is a contract violation: a matcher emitting a zero-length range.
///
/// # Errors
///
/// Returns `Error::InvalidRange` if a produced range is empty.
pub fn locate(request: &LocateRequest<'_>) -> Result<LocateResult, Error> {
    let doc = Document::new(request.text);
    if doc.line_count() > MAX_DOCUMENT_LINES {
        let count = doc.line_count();
        eprintln!("termloc: document has {count} lines (max {MAX_DOCUMENT_LINES}), scan skipped");
        return Ok(LocateResult::empty(LocateOutcome::DocumentTooLarge));
    }

    let quoted = request.dialect.quoted_keys();
    let result = match &request.context {
        Some(ctx) => locate_with_context(request, &doc, ctx, quoted),
        None => locate_without_context(request, &doc, quoted),
    };
    return validated(result);
}

/// Context-given strategies: shapes-path for shapes graphs, quad-backed
/// then text for data graphs. A context whose block cannot be found at all
/// degrades to an unscoped search.
fn locate_with_context(
    request: &LocateRequest<'_>,
    doc: &Document<'_>,
    ctx: &Term,
    quoted: bool,
) -> LocateResult {
    let scope = context::scope_for(doc.lines(), ctx, request.prefixes, request.shrink, quoted);

    if request.model == GraphModel::Shapes {
        if let Some(s) = &scope {
            if let Some(result) = locate_shapes_path(request, doc, s, quoted) {
                return result;
            }
        }
        // No path statement matched — the scoped text scan still gives the
        // context-anchor fallback.
        return textscan::locate_by_text(
            doc,
            &request.term,
            request.prefixes,
            request.shrink,
            quoted,
            scope.as_ref(),
        );
    }

    if let Some(quads) = request.quads {
        let hit = quadmatch::locate_predicate(
            doc,
            quads,
            &request.term,
            Some(ctx),
            scope.as_ref(),
            request.prefixes,
            request.shrink,
            quoted,
        );
        if let Some(result) = hit {
            return result;
        }
    }

    return textscan::locate_by_text(
        doc,
        &request.term,
        request.prefixes,
        request.shrink,
        quoted,
        scope.as_ref(),
    );
}

/// No-context chain: subject-anchored match, then predicate match, then
/// progressively looser local-name matches. Each step runs only when the
/// previous produced zero ranges.
fn locate_without_context(
    request: &LocateRequest<'_>,
    doc: &Document<'_>,
    quoted: bool,
) -> LocateResult {
    // A click on a shape node or focus node carries no path — the term is
    // a subject.
    let subject_ranges = subject_anchored_ranges(request, doc, quoted);
    if !subject_ranges.is_empty() {
        return LocateResult {
            context_anchor: None,
            outcome: LocateOutcome::Matched,
            ranges: subject_ranges,
        };
    }

    if let Some(quads) = request.quads {
        let hit = quadmatch::locate_predicate(
            doc,
            quads,
            &request.term,
            None,
            None,
            request.prefixes,
            request.shrink,
            quoted,
        );
        if let Some(result) = hit {
            return result;
        }
    }

    let by_text = textscan::locate_by_text(
        doc,
        &request.term,
        request.prefixes,
        request.shrink,
        quoted,
        None,
    );
    if !by_text.ranges.is_empty() {
        return by_text;
    }

    return local_name_last_resort(request, doc);
}

/// Ranges of the term's own subject spellings at line starts.
fn subject_anchored_ranges(
    request: &LocateRequest<'_>,
    doc: &Document<'_>,
    quoted: bool,
) -> Vec<TextRange> {
    let hits = context::context_hits(
        doc.lines(),
        &request.term,
        request.prefixes,
        request.shrink,
        quoted,
    );

    let mut ranges = Vec::new();
    for (line, length) in hits {
        let Some((line_start, _)) = doc.line_span(line) else {
            continue;
        };
        let indent = doc
            .lines()
            .get(line)
            .map_or(0, |l| return l.len().saturating_sub(l.trim_start().len()));
        let offset = line_start.saturating_add(indent);
        // A line inside a multi-line literal can start with the spelling
        // too — structural filtering still applies to subject hits.
        if !doc.is_structural(offset, length) {
            continue;
        }
        ranges.push(TextRange {
            end: doc.position_at(offset.saturating_add(length)),
            start: doc.position_at(offset),
        });
    }
    return ranges;
}

/// Last resort: the bare local name, structurally filtered. Kept strictly
/// separate from the primary variant set — it is only reached when every
/// stricter step produced nothing.
fn local_name_last_resort(request: &LocateRequest<'_>, doc: &Document<'_>) -> LocateResult {
    let Some(bare) = variants::local_name_variant(&request.term) else {
        return LocateResult::empty(LocateOutcome::NotFound);
    };
    let found = textscan::collect_structural_occurrences(doc, None, &[bare]);
    if found.is_empty() {
        return LocateResult::empty(LocateOutcome::NotFound);
    }
    return LocateResult {
        context_anchor: None,
        outcome: LocateOutcome::Matched,
        ranges: textscan::occurrences_to_ranges(doc, &found),
    };
}

/// Shapes-graph special case: the target is the value of a `sh:path`
/// statement inside the shape's block. The `sh:path` anchor itself is the
/// structural evidence, so only the triple-quote rejection applies to the
/// captured value; the highlight covers the value portion alone.
///
/// # Panics
///
/// Panics if the generated spellings produce an invalid regex — prevented
/// by construction, every alternative is `regex::escape`d.
fn locate_shapes_path(
    request: &LocateRequest<'_>,
    doc: &Document<'_>,
    scope: &ContextScope,
    quoted: bool,
) -> Option<LocateResult> {
    let path_term = Term(SHACL_PATH.to_string());
    let path_spellings =
        variants::variants_for(&path_term, request.prefixes, request.shrink, quoted);
    let value_spellings =
        variants::variants_for(&request.term, request.prefixes, request.shrink, quoted);

    let pattern = shapes_path_pattern(&path_spellings, &value_spellings);
    let matcher = Regex::new(&pattern).expect("escaped alternation is a valid regex");

    let mut ranges = Vec::new();
    for &line in &scope.block {
        let Some((line_start, line_end)) = doc.line_span(line) else {
            continue;
        };
        let Some(slice) = doc.text().get(line_start..line_end) else {
            continue;
        };
        for cap in matcher.captures_iter(slice) {
            let Some(value) = cap.name("value") else {
                continue;
            };
            let offset = line_start.saturating_add(value.start());
            if value.is_empty() {
                continue;
            }
            ranges.push(TextRange {
                end: doc.position_at(offset.saturating_add(value.len())),
                start: doc.position_at(offset),
            });
        }
    }

    if ranges.is_empty() {
        return None;
    }
    return Some(LocateResult {
        context_anchor: Some(Position {
            column: 0,
            line: scope.anchor_line,
        }),
        outcome: LocateOutcome::Matched,
        ranges,
    });
}

/// `(?:<path spellings>)\s*:?\s*(?P<value><value spellings>)` with every
/// alternative escaped. The optional colon covers the JSON-LD key form.
fn shapes_path_pattern(path_spellings: &[Variant], value_spellings: &[Variant]) -> String {
    let paths = alternation(path_spellings);
    let values = alternation(value_spellings);
    return format!("(?:{paths})[ \\t]*:?[ \\t]*(?P<value>{values})");
}

/// Escape spellings and join them into a regex alternation, longest first
/// so a bracketed form wins over a prefix of itself.
fn alternation(spellings: &[Variant]) -> String {
    let mut escaped: Vec<String> = spellings
        .iter()
        .filter(|v| return !v.text.is_empty())
        .map(|v| return regex::escape(&v.text))
        .collect();
    escaped.sort_by_key(|s| return std::cmp::Reverse(s.len()));
    return escaped.join("|");
}

/// Enforce the output contract: every range is non-empty. A zero-length
/// range aborts the call — it can only come from a matcher bug.
fn validated(result: LocateResult) -> Result<LocateResult, Error> {
    for range in &result.ranges {
        if range.start == range.end {
            return Err(Error::InvalidRange {
                column: range.start.column,
                line: range.start.line,
            });
        }
    }
    return Ok(result);
}

#[cfg(test)]
mod tests {
    use super::{LocateRequest, MAX_DOCUMENT_LINES, locate};
    use crate::dialect::Dialect;
    use crate::prefixes::{PrefixTable, shrink_with_table};
    use crate::types::{GraphModel, LocateOutcome, Quad, QuadObject, Term};

    fn quad(subject: &str, predicate: &str) -> Quad {
        return Quad {
            graph: None,
            object: QuadObject::Literal("x".to_string()),
            predicate: Term(predicate.to_string()),
            subject: Term(subject.to_string()),
        };
    }

    fn request<'a>(
        text: &'a str,
        term: &str,
        context: Option<&str>,
        quads: Option<&'a [Quad]>,
        prefixes: &'a PrefixTable,
        model: GraphModel,
        dialect: Dialect,
    ) -> LocateRequest<'a> {
        return LocateRequest {
            context: context.map(|c| return Term(c.to_string())),
            dialect,
            model,
            prefixes,
            quads,
            shrink: shrink_with_table,
            term: Term(term.to_string()),
            text,
        };
    }

    #[test]
    fn quad_backed_predicate_with_context() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:b> <urn:p2> \"y\" .";
        let quads = vec![quad("urn:a", "urn:p")];
        let table = PrefixTable::default();
        let result = locate(&request(
            text,
            "urn:p",
            Some("urn:a"),
            Some(&quads),
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.line, 0);
        assert_eq!(result.ranges[0].start.column, 8);
        assert_eq!(result.context_anchor.unwrap().line, 0);
    }

    #[test]
    fn jsonld_key_located_without_context() {
        let text = "{\"schema:publisher\": \"x\"}";
        let quads = vec![quad("urn:doc", "https://schema.org/publisher")];
        let table = PrefixTable::from_pairs([(
            "schema".to_string(),
            "https://schema.org/".to_string(),
        )]);
        let result = locate(&request(
            text,
            "https://schema.org/publisher",
            None,
            Some(&quads),
            &table,
            GraphModel::Data,
            Dialect::JsonLd,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        // The range covers the quoted key, quotes included.
        assert_eq!(result.ranges[0].start.column, 1);
        assert_eq!(result.ranges[0].end.column, 1 + "\"schema:publisher\"".len());
    }

    #[test]
    fn document_over_ceiling_returns_empty() {
        let text = "<urn:a> <urn:p> \"x\" .\n".repeat(MAX_DOCUMENT_LINES + 1);
        let table = PrefixTable::default();
        let result = locate(&request(
            &text,
            "urn:p",
            None,
            None,
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::DocumentTooLarge);
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn triple_quoted_literal_never_matches() {
        let text = "<urn:a> <urn:q> \"\"\"\n<urn:p> inside a literal\n\"\"\" .";
        let table = PrefixTable::default();
        let result = locate(&request(
            text,
            "urn:p",
            None,
            None,
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::NotFound);
        assert!(result.ranges.is_empty());
    }

    #[test]
    fn subject_click_matches_block_head() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:b> <urn:p2> \"y\" .";
        let table = PrefixTable::default();
        let result = locate(&request(
            text,
            "urn:b",
            None,
            None,
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.line, 1);
        assert_eq!(result.ranges[0].start.column, 0);
    }

    #[test]
    fn shapes_path_value_highlighted() {
        let text = "@prefix sh: <http://www.w3.org/ns/shacl#> .\n@prefix ex: <http://example.org/ns#> .\nex:PersonShape a sh:NodeShape ;\n  sh:property [\n    sh:path ex:name ;\n  ] .";
        let table = PrefixTable::from_pairs([
            ("ex".to_string(), "http://example.org/ns#".to_string()),
            ("sh".to_string(), "http://www.w3.org/ns/shacl#".to_string()),
        ]);
        let result = locate(&request(
            text,
            "http://example.org/ns#name",
            Some("http://example.org/ns#PersonShape"),
            None,
            &table,
            GraphModel::Shapes,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        // Only the value portion, not the sh:path keyword.
        assert_eq!(result.ranges[0].start.line, 4);
        assert_eq!(result.ranges[0].start.column, 12);
        assert_eq!(result.ranges[0].end.column, 12 + "ex:name".len());
        assert_eq!(result.context_anchor.unwrap().line, 2);
    }

    #[test]
    fn missing_predicate_with_context_falls_back_to_anchor() {
        let text = "<urn:a> <urn:other> \"x\" .";
        let table = PrefixTable::default();
        let result = locate(&request(
            text,
            "urn:missing",
            Some("urn:a"),
            None,
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::ContextFallback);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.column, 0);
    }

    #[test]
    fn local_name_reached_only_as_last_resort() {
        // The full IRI and prefixed forms are absent; only the bare local
        // name appears, as a standalone token.
        let text = "<urn:a> knows <urn:b> .";
        let table = PrefixTable::default();
        let result = locate(&request(
            text,
            "http://xmlns.com/foaf/0.1/knows",
            None,
            None,
            &table,
            GraphModel::Data,
            Dialect::Turtle,
        ))
        .unwrap();
        assert_eq!(result.outcome, LocateOutcome::Matched);
        assert_eq!(result.ranges.len(), 1);
        assert_eq!(result.ranges[0].start.column, 8);
    }

    #[test]
    fn idempotent_across_calls() {
        let text = "<urn:a> <urn:p> \"x\" .\n<urn:a> <urn:p> \"y\" .";
        let quads = vec![quad("urn:a", "urn:p"), quad("urn:a", "urn:p")];
        let table = PrefixTable::default();
        let build = || {
            return locate(&request(
                text,
                "urn:p",
                Some("urn:a"),
                Some(&quads),
                &table,
                GraphModel::Data,
                Dialect::Turtle,
            ))
            .unwrap();
        };
        let first = build();
        let second = build();
        assert_eq!(first.ranges, second.ranges);
        assert_eq!(first.ranges.len(), 2);
    }
}
