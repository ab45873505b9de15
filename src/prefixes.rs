//! Prefix table: configured labels, document-declared labels, and IRI
//! shrinking. The table is host-supplied and read-only to the engine.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::Error;

/// Injected pure function that shrinks an IRI to a prefixed name, or `None`
/// when no configured namespace covers it. The engine never assumes a
/// particular implementation; `shrink_with_table` is the default the CLI
/// injects.
pub type PrefixShrink = fn(&str, &PrefixTable) -> Option<String>;

/// Mapping from prefix label to namespace IRI. Labels may be empty (the
/// Turtle default prefix, written `:name`).
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

/// Raw TOML structure for `.termloc.toml`.
#[derive(serde::Deserialize)]
struct PrefixTomlFile {
    #[serde(default)]
    prefixes: BTreeMap<String, String>,
}

impl PrefixTable {
    /// Build a table from (label, namespace) pairs. Later pairs win.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        return Self {
            entries: pairs.into_iter().collect(),
        };
    }

    /// Load the prefix table from `.termloc.toml` in the given directory.
    /// Returns an empty table if the file doesn't exist. Returns an error if
    /// the file exists but is malformed — never silently falls back to
    /// defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        return Self::from_file(&root.join(CONFIG_FILE_NAME));
    }

    /// Load the prefix table from an explicit TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: PrefixTomlFile = toml::from_str(&content)?;
        return Ok(Self { entries: raw.prefixes });
    }

    /// Extract prefix declarations from the document itself: Turtle/TriG
    /// `@prefix` and SPARQL-style `PREFIX` directives, and the top-level
    /// JSON-LD `@context` object when the document parses as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded directive regexes are invalid (compile-time
    /// invariant).
    pub fn from_document(text: &str) -> Self {
        let mut entries = BTreeMap::new();

        let at_prefix = Regex::new(r"(?m)^\s*@prefix\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>\s*\.")
            .expect("valid regex");
        let sparql_prefix =
            Regex::new(r"(?mi)^\s*PREFIX\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>").expect("valid regex");

        for pattern in [&at_prefix, &sparql_prefix] {
            for cap in pattern.captures_iter(text) {
                let label = cap.get(1).map_or("", |m| return m.as_str());
                if let Some(ns) = cap.get(2) {
                    entries.insert(label.to_string(), ns.as_str().to_string());
                }
            }
        }

        collect_jsonld_context_entries(text, &mut entries);
        return Self::from_pairs(entries);
    }

    /// Overlay `other` on top of this table. Entries in `other` win — used
    /// to let an explicit prefix file override document declarations.
    pub fn merged_with(mut self, other: &Self) -> Self {
        for (label, ns) in &other.entries {
            self.entries.insert(label.clone(), ns.clone());
        }
        return self;
    }

    /// Namespace for a prefix label, if configured.
    pub fn namespace_for(&self, label: &str) -> Option<&str> {
        return self.entries.get(label).map(String::as_str);
    }

    /// Iterate over (label, namespace) pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        return self
            .entries
            .iter()
            .map(|(label, ns)| return (label.as_str(), ns.as_str()));
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}

/// Shrink an IRI to a prefixed name using the longest matching namespace.
/// The default `PrefixShrink` implementation. Returns `None` when no
/// namespace covers the IRI or the remainder would be empty.
pub fn shrink_with_table(iri: &str, table: &PrefixTable) -> Option<String> {
    let mut best: Option<(&str, &str)> = None;
    for (label, ns) in table.iter() {
        if ns.is_empty() || !iri.starts_with(ns) {
            continue;
        }
        let longer = best.is_none_or(|(_, prev)| return ns.len() > prev.len());
        if longer {
            best = Some((label, ns));
        }
    }

    let (label, ns) = best?;
    let rest = iri.get(ns.len()..).filter(|r| return !r.is_empty())?;
    // A remainder with IRI structure would not be a legal local name.
    if rest.contains(['/', '#']) {
        return None;
    }
    return Some(format!("{label}:{rest}"));
}

/// Pull prefix-like entries out of a JSON-LD `@context` object. String
/// values only — term definitions with objects are not prefix declarations.
fn collect_jsonld_context_entries(text: &str, entries: &mut BTreeMap<String, String>) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };
    let Some(context) = value.get("@context").and_then(serde_json::Value::as_object) else {
        return;
    };
    for (label, v) in context {
        if label.starts_with('@') {
            continue;
        }
        if let Some(ns) = v.as_str() {
            entries.insert(label.clone(), ns.to_string());
        }
    }
    return;
}

// ── CLI commands ──────────────────────────────────────────────────────

/// Name of the prefix config file looked up in the working directory.
const CONFIG_FILE_NAME: &str = ".termloc.toml";

/// List all configured prefixes, sorted alphabetically.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn cmd_list() -> Result<(), Error> {
    let table = PrefixTable::load(&PathBuf::from("."))?;

    if table.is_empty() {
        println!("No prefixes configured.");
        return Ok(());
    }

    for (label, ns) in table.iter() {
        println!("{label}: -> <{ns}>");
    }
    return Ok(());
}

/// Add a prefix mapping to the config file.
///
/// # Errors
///
/// Returns errors from config reading or writing.
pub fn cmd_add(label: &str, namespace: &str) -> Result<(), Error> {
    let (config_path, mut doc) = read_config_doc(&PathBuf::from("."))?;

    if !doc.contains_key("prefixes") {
        doc["prefixes"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["prefixes"][label] = toml_edit::value(namespace);

    std::fs::write(&config_path, doc.to_string())?;
    println!("Added prefix: {label}: -> <{namespace}>");
    return Ok(());
}

/// Remove a prefix mapping from the config file.
///
/// # Errors
///
/// Returns `Error::UnknownPrefix` if the label isn't configured,
/// or errors from config reading or writing.
pub fn cmd_remove(label: &str) -> Result<(), Error> {
    let (config_path, mut doc) = read_config_doc(&PathBuf::from("."))?;

    let removed = doc
        .get_mut("prefixes")
        .and_then(toml_edit::Item::as_table_mut)
        .and_then(|t| return t.remove(label));
    if removed.is_none() {
        return Err(Error::UnknownPrefix {
            name: label.to_string(),
        });
    }

    std::fs::write(&config_path, doc.to_string())?;
    println!("Removed prefix: {label}");
    return Ok(());
}

/// Parse `.termloc.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::PrefixFileCorrupt` on
/// parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), Error> {
    let config_path = root.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
    };

    let doc: toml_edit::DocumentMut =
        content.parse().map_err(|e: toml_edit::TomlError| {
            return Error::PrefixFileCorrupt {
                path: config_path.clone(),
                reason: e.to_string(),
            };
        })?;

    return Ok((config_path, doc));
}
