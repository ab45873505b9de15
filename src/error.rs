/// Crate-level error types for termloc diagnostics.
use std::path::PathBuf;

/// All errors carry enough context to produce a useful diagnostic without a
/// debugger. Ordinary "not found" conditions are locate outcomes, not
/// errors — only contract violations and malformed inputs land here.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced graph or sidecar file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A matcher produced a zero-length range. This is a programming-
    /// contract violation, never an ordinary miss.
    #[error("invalid range: zero length at line {line}, column {column}")]
    InvalidRange {
        /// Zero-based column of the malformed range.
        column: usize,
        /// Zero-based line of the malformed range.
        line: usize,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON deserialization failed.
    #[error("json deserialize: {0}")]
    JsonDe(
        /// The wrapped JSON deserialization error.
        #[from]
        serde_json::Error,
    ),

    /// Prefix table file exists but cannot be parsed or edited.
    #[error("prefix file corrupt: {}: {reason}", path.display())]
    PrefixFileCorrupt {
        /// Path to the prefix file.
        path: PathBuf,
        /// Description of the corruption.
        reason: String,
    },

    /// Quad snapshot sidecar exists but is not a valid snapshot.
    #[error("quad snapshot corrupt: {reason}")]
    SnapshotCorrupt {
        /// Description of the corruption.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No configured prefix label matches the given name.
    #[error("unknown prefix: `{name}`")]
    UnknownPrefix {
        /// Prefix label that was not found.
        name: String,
    },

    /// File extension maps to no supported serialization dialect.
    #[error("no dialect for extension: .{ext}")]
    UnsupportedDialect {
        /// File extension without the leading dot.
        ext: String,
    },

    /// Filesystem watcher could not be created or attached.
    #[error("watch setup failed: {reason}")]
    WatchSetup {
        /// Description of the watcher failure.
        reason: String,
    },
}
