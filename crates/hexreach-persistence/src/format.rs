//! The on-disk save file container and its errors.

use serde::{Deserialize, Serialize};

use crate::snapshot::GameStateSnapshot;

/// Current file format version. Increment when the schema changes.
pub const FORMAT_VERSION: u32 = 1;

/// Top-level file container for a saved galaxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateFile {
    /// File format version (for future migration).
    pub format_version: u32,
    /// Display name, set by the caller — not derived from anything in
    /// `GameState` itself.
    #[serde(default)]
    pub name: String,
    pub snapshot: GameStateSnapshot,
}

impl GameStateFile {
    #[must_use]
    pub fn new(name: impl Into<String>, snapshot: GameStateSnapshot) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            name: name.into(),
            snapshot,
        }
    }
}

/// Error type for save/load operations.
#[derive(Debug)]
pub enum PersistenceError {
    /// File system error.
    Io(std::io::Error),
    /// RON serialization failure.
    Serialize(ron::Error),
    /// RON deserialization failure.
    Deserialize(ron::error::SpannedError),
    /// File was written by a newer version of hexreach.
    UnsupportedVersion { found: u32, max: u32 },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "deserialization error: {e}"),
            Self::UnsupportedVersion { found, max } => {
                write!(f, "unsupported file format version {found} (max supported: {max})")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Serializes `file` to a RON string.
pub fn to_ron_string(file: &GameStateFile) -> Result<String, PersistenceError> {
    ron::ser::to_string_pretty(file, ron::ser::PrettyConfig::default()).map_err(PersistenceError::Serialize)
}

/// Parses a RON string, rejecting files newer than [`FORMAT_VERSION`].
pub fn from_ron_str(contents: &str) -> Result<GameStateFile, PersistenceError> {
    let file: GameStateFile = ron::from_str(contents).map_err(PersistenceError::Deserialize)?;
    if file.format_version > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.format_version,
            max: FORMAT_VERSION,
        });
    }
    Ok(file)
}
