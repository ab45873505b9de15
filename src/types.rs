/// Core domain types for termloc terms, quads, variants, and locate results.
use serde::{Deserialize, Serialize};

/// An absolute IRI string. Passed by value, never mutated by the engine.
/// Newtype prevents mixing with arbitrary spellings found in text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(
    /// The absolute IRI.
    pub String,
);

impl Term {
    /// The segment after the last `#` or `/` — the conventional local name.
    /// Returns the whole IRI when neither separator is present or the IRI
    /// ends with a separator.
    pub fn local_name(&self) -> &str {
        let split_at = self.0.rfind(['#', '/']).map(|i| return i.saturating_add(1));
        return match split_at.and_then(|i| return self.0.get(i..)) {
            Some(rest) if !rest.is_empty() => rest,
            _ => self.0.as_str(),
        };
    }

    /// The namespace portion up to and including the last `#` or `/`.
    /// Empty when the IRI has no separator.
    pub fn namespace(&self) -> &str {
        let split_at = self.0.rfind(['#', '/']).map(|i| return i.saturating_add(1));
        return split_at.and_then(|i| return self.0.get(..i)).unwrap_or("");
    }
}

/// One RDF statement from the host's quad snapshot. The engine reads only
/// `subject` and `predicate`; objects ride along so sidecars stay
/// self-describing. Treated as a read-only snapshot that may be stale
/// relative to the text — an accepted inconsistency, not a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quad {
    /// Named graph, absent for the default graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<Term>,
    /// Object value — IRI or literal lexical form.
    pub object: QuadObject,
    /// Predicate IRI.
    pub predicate: Term,
    /// Subject IRI (or blank-node label as written).
    pub subject: Term,
}

/// Object of a quad, externally tagged in JSON as `{"iri": ...}` or
/// `{"literal": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadObject {
    /// An IRI object.
    Iri(Term),
    /// A literal object, lexical form only.
    Literal(String),
}

/// A zero-based (line, column) pair derived from a character offset.
/// Rendered one-based at the CLI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based column within the line.
    pub column: usize,
    /// Zero-based line index.
    pub line: usize,
}

/// A half-open character range in the document. Guaranteed non-empty by
/// construction in the locator — zero-length ranges fail the call instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    /// Exclusive end position.
    pub end: Position,
    /// Inclusive start position.
    pub start: Position,
}

/// Structural role a variant spelling plays when matched in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleHint {
    /// Bare local name — last-resort only, never a primary predicate variant.
    BareLocalName,
    /// Full `<iri>` form.
    BracketedIri,
    /// `prefix:localName` form.
    PrefixedName,
    /// `"spelling"` form used as a JSON-LD key.
    QuotedJsonKey,
}

/// A candidate textual spelling of a term. Generated fresh per call — the
/// prefix table may change between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Structural role this spelling would play.
    pub role: RoleHint,
    /// The literal text to search for.
    pub text: String,
}

/// A raw substring match before structural filtering.
#[derive(Debug, Clone)]
pub struct CandidateOccurrence {
    /// Match length in characters.
    pub length: usize,
    /// Character offset of the match start.
    pub offset: usize,
    /// The spelling that matched.
    pub spelling: Variant,
}

/// Which kind of graph the editor holds. Drives the locator strategy:
/// shapes graphs get the `sh:path` value special case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphModel {
    /// A data graph — targets are predicates under focus-node subjects.
    Data,
    /// A SHACL shapes graph — targets are path values inside shape blocks.
    Shapes,
}

/// How a locate call terminated. Never an error: empty ranges is a valid
/// terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocateOutcome {
    /// Nothing matched inside the context block; the context subject's own
    /// range was returned as a scroll anchor instead.
    ContextFallback,
    /// Document exceeded the line ceiling — scan skipped, ranges empty.
    DocumentTooLarge,
    /// At least one structural occurrence of the term itself was found.
    Matched,
    /// No structural occurrence anywhere in scope.
    NotFound,
}

/// Ordered result of one locate call.
#[derive(Debug, Clone, Serialize)]
pub struct LocateResult {
    /// First line of the context block when one was used — scroll anchor.
    pub context_anchor: Option<Position>,
    /// Terminal condition of the call.
    pub outcome: LocateOutcome,
    /// Matched ranges, ascending by text offset.
    pub ranges: Vec<TextRange>,
}

impl LocateResult {
    /// An empty result with the given terminal condition.
    pub fn empty(outcome: LocateOutcome) -> Self {
        return Self {
            context_anchor: None,
            outcome,
            ranges: Vec::new(),
        };
    }
}
