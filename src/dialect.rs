/// Serialization dialect resolution by file extension or content sniffing.
use std::path::Path;

use crate::error::Error;

/// Supported graph serialization dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// JSON-LD — terms appear as quoted keys.
    JsonLd,
    /// TriG — Turtle plus named graph blocks.
    Trig,
    /// Turtle.
    Turtle,
}

impl Dialect {
    /// Whether term spellings can appear as quoted JSON keys.
    pub fn quoted_keys(self) -> bool {
        return matches!(self, Dialect::JsonLd);
    }
}

/// Map a file extension to its serialization dialect.
///
/// # Errors
///
/// Returns `Error::UnsupportedDialect` for unknown extensions.
pub fn dialect_for_path(path: &Path) -> Result<Dialect, Error> {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");

    return match ext {
        "json" | "jsonld" => Ok(Dialect::JsonLd),
        "trig" => Ok(Dialect::Trig),
        "ttl" | "turtle" => Ok(Dialect::Turtle),
        _ => Err(Error::UnsupportedDialect {
            ext: ext.to_string(),
        }),
    };
}

/// Guess the dialect from document content when no extension is available.
/// A document opening with `{` or `[` is JSON-LD; a top-level graph block
/// makes it TriG; everything else is treated as Turtle.
pub fn sniff(text: &str) -> Dialect {
    let first = text.chars().find(|c| return !c.is_whitespace());
    if matches!(first, Some('{' | '[')) {
        return Dialect::JsonLd;
    }

    let has_graph_block = text.lines().any(|line| {
        let trimmed = line.trim_start();
        return trimmed.starts_with("GRAPH ") || trimmed.starts_with("graph ");
    });
    if has_graph_block {
        return Dialect::Trig;
    }
    return Dialect::Turtle;
}
