//! Variant generation: the textual spellings a term could legally take in
//! the current serialization dialect. Variants are generated fresh per call
//! — the prefix table may change between calls.

use crate::prefixes::{PrefixShrink, PrefixTable};
use crate::types::{RoleHint, Term, Variant};

/// Conventional prefixes for well-known vocabulary namespaces. Consulted
/// only when the injected shrink function finds nothing — a best-effort
/// guess, not guaranteed correct, and never used on the quad-backed path.
const WELL_KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://schema.org/", "schema"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("http://www.w3.org/2000/01/rdf-schema#", "rdfs"),
    ("http://www.w3.org/2001/XMLSchema#", "xsd"),
    ("http://www.w3.org/2002/07/owl#", "owl"),
    ("http://www.w3.org/2004/02/skos/core#", "skos"),
    ("http://www.w3.org/ns/shacl#", "sh"),
    ("http://xmlns.com/foaf/0.1/", "foaf"),
    ("https://schema.org/", "schema"),
];

/// Generate the primary spellings for a term: the bracketed full-IRI form,
/// the shrunk prefixed form when the table covers the namespace, and
/// guessed conventional prefixes as a last resort when it doesn't. With
/// `quoted` set (JSON-LD), each non-bracketed spelling is also emitted
/// wrapped in double quotes, plus the quoted bare IRI — JSON-LD keys may
/// carry the full IRI without angle brackets.
///
/// The bare local name is deliberately absent: as a predicate spelling it
/// produces far too many false positives. See `local_name_variant`.
pub fn variants_for(
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Vec<Variant> {
    let mut out = Vec::new();
    push_unique(&mut out, RoleHint::BracketedIri, format!("<{}>", term.0));

    let shrunk = shrink(&term.0, table).filter(|s| return *s != term.0);
    let prefixed: Vec<String> = match shrunk {
        Some(s) => vec![s],
        None => guessed_prefix_spellings(term),
    };
    for spelling in &prefixed {
        push_unique(&mut out, RoleHint::PrefixedName, spelling.clone());
    }

    if quoted {
        push_unique(&mut out, RoleHint::QuotedJsonKey, format!("\"{}\"", term.0));
        for spelling in &prefixed {
            push_unique(&mut out, RoleHint::QuotedJsonKey, format!("\"{spelling}\""));
        }
    }

    return out;
}

/// Spellings derived for the quad-backed path: bracketed and table-shrunk
/// forms only — no guessed prefixes. The quad model is authoritative; a
/// guess that isn't in the prefix table can't be how the text spells the
/// term the host itself serialized.
pub fn quad_derived_variants(
    term: &Term,
    table: &PrefixTable,
    shrink: PrefixShrink,
    quoted: bool,
) -> Vec<Variant> {
    let mut out = Vec::new();
    push_unique(&mut out, RoleHint::BracketedIri, format!("<{}>", term.0));

    if let Some(spelling) = shrink(&term.0, table).filter(|s| return *s != term.0) {
        push_unique(&mut out, RoleHint::PrefixedName, spelling.clone());
        if quoted {
            push_unique(&mut out, RoleHint::QuotedJsonKey, format!("\"{spelling}\""));
        }
    }
    if quoted {
        push_unique(&mut out, RoleHint::QuotedJsonKey, format!("\"{}\"", term.0));
    }

    return out;
}

/// The bare local name as an explicit last-resort spelling. Only the
/// locator's final fallback chain and the context scanner's relaxed pass
/// may use this — it never joins the primary variant set.
pub fn local_name_variant(term: &Term) -> Option<Variant> {
    let local = term.local_name();
    if local.is_empty() || local == term.0 {
        return None;
    }
    return Some(Variant {
        role: RoleHint::BareLocalName,
        text: local.to_string(),
    });
}

/// Conventional prefixed spellings guessed from the well-known namespace
/// table. Empty when the term's namespace is not a known vocabulary.
pub fn guessed_prefix_spellings(term: &Term) -> Vec<String> {
    let namespace = term.namespace();
    let local = term.local_name();
    if namespace.is_empty() || local.is_empty() || local == term.0 {
        return Vec::new();
    }

    return WELL_KNOWN_NAMESPACES
        .iter()
        .filter(|(ns, _)| return *ns == namespace)
        .map(|(_, label)| return format!("{label}:{local}"))
        .collect();
}

/// Append a spelling unless it is empty (a malformed variant — skipped,
/// never propagated) or already present.
fn push_unique(out: &mut Vec<Variant>, role: RoleHint, text: String) {
    if text.is_empty() || text == "<>" || text == "\"\"" {
        return;
    }
    let variant = Variant { role, text };
    if !out.contains(&variant) {
        out.push(variant);
    }
    return;
}
