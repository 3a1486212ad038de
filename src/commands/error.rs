//! Error types for command table loading.

use std::path::PathBuf;

use thiserror::Error;

use super::key::{ChordParseError, KeyChord};

/// Errors that abort startup while building the command table.
#[derive(Debug, Error)]
pub enum CommandTableError {
    /// Error reading the command file.
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    /// Error parsing TOML syntax or record fields.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error parsing JSON syntax or record fields.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported command file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// A record has an empty name.
    #[error("command #{index} has an empty name")]
    EmptyName { index: usize },

    /// Two records share a name.
    #[error("duplicate command name '{0}'")]
    DuplicateName(String),

    /// A shortcut string could not be turned into a key chord.
    #[error("invalid shortcut '{shortcut}' for command '{name}': {error}")]
    InvalidShortcut {
        name: String,
        shortcut: String,
        error: ChordParseError,
    },

    /// Two records bind the same key chord.
    #[error("shortcut {chord} is bound to both '{first}' and '{second}'")]
    DuplicateShortcut {
        chord: KeyChord,
        first: String,
        second: String,
    },

    /// Two records share a long command.
    #[error("long command '{long_cmd}' is used by both '{first}' and '{second}'")]
    DuplicateLongCommand {
        long_cmd: String,
        first: String,
        second: String,
    },
}
