// Command table - declarative bindings loaded once at startup
use super::error::CommandTableError;
use super::key::KeyChord;
use crate::state::Mode;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_COMMANDS: &str = include_str!("../../assets/commands.toml");

/// One binding of a name, shortcut, long command and target mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub shortcut: Option<KeyChord>,
    pub long_cmd: String,
    pub state: Mode,
}

/// Raw record as written in the command file.
#[derive(Debug, Deserialize)]
struct CommandRecord {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Shortcut", default)]
    shortcut: Option<String>,
    #[serde(alias = "LongCmd", alias = "long_command", default)]
    long_cmd: String,
    #[serde(alias = "State")]
    state: Mode,
}

#[derive(Debug, Deserialize)]
struct CommandFile {
    #[serde(rename = "command", alias = "commands", default)]
    commands: Vec<CommandRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCommands {
    List(Vec<CommandRecord>),
    File(CommandFile),
}

/// Immutable lookup structure over all configured commands.
///
/// Names, shortcuts and non-empty long commands are unique; lookups are
/// exact matches.
#[derive(Clone, Debug, Default)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    by_name: HashMap<String, usize>,
    by_shortcut: HashMap<KeyChord, usize>,
    by_long_cmd: HashMap<String, usize>,
}

impl CommandTable {
    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, CommandTableError> {
        Self::from_toml_str(BUILTIN_COMMANDS)
    }

    /// Load a table from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, CommandTableError> {
        let contents = fs::read_to_string(path).map_err(|error| CommandTableError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let table = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => return Err(CommandTableError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), commands = table.len(), "loaded command table");
        Ok(table)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CommandTableError> {
        let file: CommandFile = toml::from_str(contents)?;
        Self::from_records(file.commands)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, CommandTableError> {
        let records = match serde_json::from_str::<JsonCommands>(contents)? {
            JsonCommands::List(records) => records,
            JsonCommands::File(file) => file.commands,
        };
        Self::from_records(records)
    }

    fn from_records(records: Vec<CommandRecord>) -> Result<Self, CommandTableError> {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let shortcut = match record.shortcut.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(text) => Some(text.parse::<KeyChord>().map_err(|error| {
                    CommandTableError::InvalidShortcut {
                        name: record.name.clone(),
                        shortcut: text.to_string(),
                        error,
                    }
                })?),
            };
            entries.push(CommandEntry {
                name: record.name.trim().to_string(),
                shortcut,
                long_cmd: record.long_cmd.trim().to_string(),
                state: record.state,
            });
        }
        Self::from_entries(entries)
    }

    /// Build a table from already typed entries, enforcing uniqueness.
    pub fn from_entries(entries: Vec<CommandEntry>) -> Result<Self, CommandTableError> {
        let mut table = CommandTable::default();

        for (index, entry) in entries.into_iter().enumerate() {
            if entry.name.is_empty() {
                return Err(CommandTableError::EmptyName { index });
            }
            if table.by_name.contains_key(&entry.name) {
                return Err(CommandTableError::DuplicateName(entry.name));
            }
            if let Some(chord) = entry.shortcut {
                if let Some(&other) = table.by_shortcut.get(&chord) {
                    return Err(CommandTableError::DuplicateShortcut {
                        chord,
                        first: table.entries[other].name.clone(),
                        second: entry.name,
                    });
                }
            }
            if !entry.long_cmd.is_empty() {
                if let Some(&other) = table.by_long_cmd.get(&entry.long_cmd) {
                    return Err(CommandTableError::DuplicateLongCommand {
                        long_cmd: entry.long_cmd,
                        first: table.entries[other].name.clone(),
                        second: entry.name,
                    });
                }
            }

            let slot = table.entries.len();
            debug!(
                name = %entry.name,
                shortcut = ?entry.shortcut.map(|c| c.to_string()),
                long_cmd = %entry.long_cmd,
                state = %entry.state,
                "binding command"
            );
            table.by_name.insert(entry.name.clone(), slot);
            if let Some(chord) = entry.shortcut {
                table.by_shortcut.insert(chord, slot);
            }
            if !entry.long_cmd.is_empty() {
                table.by_long_cmd.insert(entry.long_cmd.clone(), slot);
            }
            table.entries.push(entry);
        }

        Ok(table)
    }

    pub fn by_shortcut(&self, chord: &KeyChord) -> Option<&CommandEntry> {
        self.by_shortcut.get(chord).map(|&i| &self.entries[i])
    }

    pub fn by_long_command(&self, text: &str) -> Option<&CommandEntry> {
        self.by_long_cmd.get(text).map(|&i| &self.entries[i])
    }

    /// First entry (in file order) whose target mode is `mode`.
    pub fn by_mode(&self, mode: Mode) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.state == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
