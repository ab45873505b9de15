//! Quad snapshot sidecar: the host's parsed statements plus a fingerprint
//! of the text they were parsed from. A fingerprint mismatch means the
//! editor buffer moved on since the parse — the snapshot is demoted to
//! absent and the engine falls back to text scanning, never erroring.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::Error;
use crate::types::Quad;

/// A text fingerprint — 64 hex chars, always lowercase.
/// Newtype prevents mixing with arbitrary strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFingerprint(
    /// The hex-encoded SHA-256 digest string.
    pub String,
);

impl TextFingerprint {
    /// Fingerprint of the exact text a snapshot was parsed from.
    pub fn of_text(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        return Self(format!("{digest:x}"));
    }
}

/// The quad model as last parsed by the host, read from a JSON sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadSnapshot {
    /// Fingerprint of the text the quads were parsed from. Absent
    /// fingerprints are trusted as fresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<TextFingerprint>,
    /// The parsed statements.
    pub quads: Vec<Quad>,
}

impl QuadSnapshot {
    /// Parse a snapshot from JSON content.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonDe` if the content is not valid JSON, or
    /// `Error::SnapshotCorrupt` if the fingerprint is not 64 lowercase hex
    /// characters.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let snapshot: Self = serde_json::from_str(content)?;
        if let Some(TextFingerprint(hex)) = &snapshot.fingerprint {
            let well_formed =
                hex.len() == 64 && hex.chars().all(|c| return c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
            if !well_formed {
                return Err(Error::SnapshotCorrupt {
                    reason: format!("fingerprint is not 64 lowercase hex chars: `{hex}`"),
                });
            }
        }
        return Ok(snapshot);
    }

    /// Read and parse a snapshot sidecar from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or parse errors from `parse`.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Whether the snapshot predates the given text.
    pub fn is_stale(&self, text: &str) -> bool {
        return match &self.fingerprint {
            None => false,
            Some(recorded) => *recorded != TextFingerprint::of_text(text),
        };
    }

    /// The quads, or `None` when the snapshot is stale for this text.
    /// Staleness is a silent demotion — the caller scans text instead.
    pub fn live_quads(&self, text: &str) -> Option<&[Quad]> {
        if self.is_stale(text) {
            return None;
        }
        return Some(&self.quads);
    }
}
