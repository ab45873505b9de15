//! Markdown rendering of errors for stderr.

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where one exists,
/// how to fix it. Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!(
            "\
# Error: File Not Found

`{}` does not exist.
",
            path.display()
        ),

        Error::InvalidRange { column, line } => format!(
            "\
# Error: Invalid Range

A matcher produced a zero-length range at line {line}, column {column}.
This is a bug in the range computation, not a property of the document.
"
        ),

        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),

        Error::JsonDe(e) => format!(
            "\
# Error: Invalid JSON

{e}
"
        ),

        Error::PrefixFileCorrupt { path, reason } => format!(
            "\
# Error: Prefix File Corrupt

Could not parse `{}`: {reason}

## Fix

Repair or delete the file, then re-add prefixes:

    termloc prefix add ex http://example.org/
",
            path.display()
        ),

        Error::SnapshotCorrupt { reason } => format!(
            "\
# Error: Quad Snapshot Corrupt

{reason}

## Fix

Regenerate the snapshot from the validator that produced it, or run
without `--quads` to fall back to text-only matching.
"
        ),

        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}
"
        ),

        Error::UnknownPrefix { name } => format!(
            "\
# Error: Unknown Prefix

Prefix `{name}` is not configured.

## Fix

Add it:

    termloc prefix add {name} http://example.org/{name}#
"
        ),

        Error::UnsupportedDialect { ext } => format!(
            "\
# Error: Unsupported Dialect

No serialization dialect for `.{ext}` files.

## Supported extensions

- `.ttl`, `.turtle` — Turtle
- `.trig` — TriG
- `.json`, `.jsonld` — JSON-LD
"
        ),

        Error::WatchSetup { reason } => format!(
            "\
# Error: Watch Setup Failed

{reason}
"
        ),
    };
}
