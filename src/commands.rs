//! Core CLI commands for termloc: locate, variants, context, scan.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::context;
use crate::dialect::{self, Dialect};
use crate::document::Document;
use crate::error::Error;
use crate::locator::{self, LocateRequest, MAX_DOCUMENT_LINES};
use crate::prefixes::{PrefixTable, shrink_with_table};
use crate::snapshot::QuadSnapshot;
use crate::types::{GraphModel, LocateOutcome, LocateResult, Position, RoleHint, Term};
use crate::variants;

/// Inputs to the locate command, assembled by argument parsing.
pub struct LocateArgs {
    /// Focus-node or shape subject IRI scoping the search.
    pub context: Option<String>,
    /// Path to the serialized graph file.
    pub file: PathBuf,
    /// Emit the result as JSON instead of human-readable lines.
    pub json: bool,
    /// Whether the file holds a shapes graph or a data graph.
    pub model: GraphModel,
    /// Explicit prefix TOML file, overriding `.termloc.toml` lookup.
    pub prefix_file: Option<PathBuf>,
    /// Path to a quad snapshot sidecar, if the host produced one.
    pub quads: Option<PathBuf>,
    /// The term IRI to locate.
    pub term: String,
}

/// Prefixes declared in the document itself, overlaid with the configured
/// table — explicit configuration wins over document declarations.
///
/// # Errors
///
/// Returns errors from prefix file reading or parsing.
fn build_prefix_table(text: &str, explicit: Option<&Path>) -> Result<PrefixTable, Error> {
    let document_table = PrefixTable::from_document(text);
    let overlay = match explicit {
        Some(path) => PrefixTable::from_file(path)?,
        None => PrefixTable::load(Path::new("."))?,
    };
    return Ok(document_table.merged_with(&overlay));
}

/// Display name for a dialect.
fn dialect_label(dialect: Dialect) -> &'static str {
    return match dialect {
        Dialect::JsonLd => "json-ld",
        Dialect::Trig => "trig",
        Dialect::Turtle => "turtle",
    };
}

/// Exit code for a locate outcome: 0 when something usable was found (a
/// match or a context anchor), 1 otherwise.
pub(crate) fn exit_code_for(outcome: LocateOutcome) -> ExitCode {
    return match outcome {
        LocateOutcome::ContextFallback | LocateOutcome::Matched => ExitCode::SUCCESS,
        LocateOutcome::DocumentTooLarge | LocateOutcome::NotFound => ExitCode::from(1),
    };
}

/// One-based `line:column` rendering of a zero-based position.
pub(crate) fn fmt_position(position: Position) -> String {
    let line = position.line.saturating_add(1);
    let column = position.column.saturating_add(1);
    return format!("{line}:{column}");
}

/// Resolve a term to character ranges in a graph file and print them.
///
/// # Errors
///
/// Returns errors from file reading, dialect resolution, prefix loading,
/// snapshot parsing, or range validation.
pub fn locate(args: &LocateArgs) -> Result<ExitCode, Error> {
    let result = locate_result(args)?;
    print_locate_result(&result, args.json)?;
    return Ok(exit_code_for(result.outcome));
}

/// Run the locate pipeline for CLI arguments without printing: read the
/// file, resolve dialect and prefixes, load and staleness-check the quad
/// snapshot, and locate.
///
/// # Errors
///
/// Returns errors from file reading, dialect resolution, prefix loading,
/// snapshot parsing, or range validation.
pub fn locate_result(args: &LocateArgs) -> Result<LocateResult, Error> {
    let text = read_graph_file(&args.file)?;
    let graph_dialect = dialect::dialect_for_path(&args.file)?;
    let table = build_prefix_table(&text, args.prefix_file.as_deref())?;

    let snapshot = match &args.quads {
        Some(path) => Some(QuadSnapshot::read(path)?),
        None => None,
    };
    if snapshot.as_ref().is_some_and(|s| return s.is_stale(&text)) {
        eprintln!("termloc: quad snapshot is stale for this text, using text scan");
    }
    let quads = snapshot.as_ref().and_then(|s| return s.live_quads(&text));

    let request = LocateRequest {
        context: args.context.clone().map(Term),
        dialect: graph_dialect,
        model: args.model,
        prefixes: &table,
        quads,
        shrink: shrink_with_table,
        term: Term(args.term.clone()),
        text: &text,
    };
    return locator::locate(&request);
}

/// Print a locate result, as JSON or as human-readable lines with 1-based
/// coordinates.
///
/// # Errors
///
/// Returns `Error::JsonDe` if JSON serialization fails.
pub(crate) fn print_locate_result(result: &LocateResult, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result.outcome {
        LocateOutcome::ContextFallback => {
            println!("no direct match; highlighting the context subject");
        },
        LocateOutcome::DocumentTooLarge => {
            println!("document too large; scan skipped");
        },
        LocateOutcome::Matched => {
            let count = result.ranges.len();
            println!("{count} match(es)");
        },
        LocateOutcome::NotFound => println!("not found"),
    }

    for range in &result.ranges {
        println!("  {}..{}", fmt_position(range.start), fmt_position(range.end));
    }
    if let Some(anchor) = result.context_anchor {
        let line = anchor.line.saturating_add(1);
        println!("context anchor at line {line}");
    }
    return Ok(());
}

/// Read a graph file, mapping a missing file to `FileNotFound`.
///
/// # Errors
///
/// Returns `Error::FileNotFound` or `Error::Io`.
fn read_graph_file(path: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
        Ok(content) => Ok(content),
    };
}

/// Display name for a variant's structural role.
fn role_label(role: RoleHint) -> &'static str {
    return match role {
        RoleHint::BareLocalName => "local-name",
        RoleHint::BracketedIri => "bracketed",
        RoleHint::PrefixedName => "prefixed",
        RoleHint::QuotedJsonKey => "json-key",
    };
}

/// Walk a directory tree over graph files. Without a term, report each
/// file: dialect, line count, declared prefixes, and whether it exceeds the
/// scan ceiling. With a term, locate it in every file and list the files
/// where it matched.
///
/// # Errors
///
/// Returns errors from prefix config loading or range validation.
pub fn scan(root: &Path, term: Option<&str>) -> Result<ExitCode, Error> {
    let mut total = 0_usize;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Err(e) => {
                eprintln!("scan: {e}");
                continue;
            },
            Ok(e) => e,
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(graph_dialect) = dialect::dialect_for_path(entry.path()) else {
            continue;
        };
        let Ok(text) = std::fs::read_to_string(entry.path()) else {
            eprintln!("scan: cannot read {}", entry.path().display());
            continue;
        };
        total = total.saturating_add(1);

        let Some(term) = term else {
            let doc = Document::new(&text);
            let line_count = doc.line_count();
            let prefix_count = PrefixTable::from_document(&text).iter().count();
            let oversized = if line_count > MAX_DOCUMENT_LINES { "  OVERSIZED" } else { "" };
            println!(
                "{}  {}  {line_count} lines  {prefix_count} prefixes{oversized}",
                entry.path().display(),
                dialect_label(graph_dialect),
            );
            continue;
        };

        let table = build_prefix_table(&text, None)?;
        let request = LocateRequest {
            context: None,
            dialect: graph_dialect,
            model: GraphModel::Data,
            prefixes: &table,
            quads: None,
            shrink: shrink_with_table,
            term: Term(term.to_string()),
            text: &text,
        };
        let result = locator::locate(&request)?;
        if !result.ranges.is_empty() {
            let count = result.ranges.len();
            println!("{}  {count} match(es)", entry.path().display());
        }
    }

    println!("{total} graph files");
    return Ok(ExitCode::SUCCESS);
}

/// Show the context block a subject IRI resolves to: anchor line, context
/// lines, and block size. Exit code 1 when no line starts with any spelling
/// of the subject.
///
/// # Errors
///
/// Returns errors from file reading or prefix loading.
pub fn show_context(file: &Path, subject: &str) -> Result<ExitCode, Error> {
    let text = read_graph_file(file)?;
    let quoted = dialect::dialect_for_path(file)
        .map(Dialect::quoted_keys)
        .unwrap_or_else(|_| return dialect::sniff(&text).quoted_keys());
    let table = build_prefix_table(&text, None)?;
    let doc = Document::new(&text);

    let subject_term = Term(subject.to_string());
    let hits = context::find_context_lines(
        doc.lines(),
        &subject_term,
        &table,
        shrink_with_table,
        quoted,
    );
    if hits.is_empty() {
        println!("no context block for {subject}");
        return Ok(ExitCode::from(1));
    }

    let scope = context::scope_for(doc.lines(), &subject_term, &table, shrink_with_table, quoted);
    if let Some(scope) = scope {
        let anchor = scope.anchor_line.saturating_add(1);
        println!("anchor line {anchor}");
        let listed: Vec<String> = scope
            .context_lines
            .iter()
            .map(|&l| return l.saturating_add(1).to_string())
            .collect();
        println!("context lines: {}", listed.join(", "));
        let block_size = scope.block.len();
        println!("block: {block_size} lines");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the spellings that would be searched for a term. With a graph
/// file, its declared prefixes and dialect shape the set; without one, only
/// the configured table applies.
///
/// # Errors
///
/// Returns errors from file reading or prefix loading.
pub fn show_variants(term: &str, file: Option<&Path>) -> Result<(), Error> {
    let (table, quoted) = match file {
        None => (PrefixTable::load(Path::new("."))?, false),
        Some(path) => {
            let text = read_graph_file(path)?;
            let quoted = dialect::dialect_for_path(path)
                .map(Dialect::quoted_keys)
                .unwrap_or_else(|_| return dialect::sniff(&text).quoted_keys());
            (build_prefix_table(&text, None)?, quoted)
        },
    };

    let term = Term(term.to_string());
    for variant in variants::variants_for(&term, &table, shrink_with_table, quoted) {
        println!("{:10}  {}", role_label(variant.role), variant.text);
    }
    if let Some(bare) = variants::local_name_variant(&term) {
        println!("{:10}  {}  (last resort)", role_label(bare.role), bare.text);
    }
    return Ok(());
}
