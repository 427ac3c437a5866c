//! Storage backend abstraction and the default filesystem provider.

use std::path::{Path, PathBuf};

use crate::format::{GameStateFile, PersistenceError, FORMAT_VERSION};

/// How the base directory was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSource {
    /// `macos` feature flag — `~/Library/Application Support/hexreach/`.
    MacOs,
    /// `xdg` feature flag — `$XDG_DATA_HOME/hexreach/`.
    Xdg,
    /// Project-local `.state/{version}/` (default dev mode).
    ProjectLocal,
}

/// Resolved storage configuration. Describes where saved galaxies live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
    pub source: StorageSource,
}

/// Metadata about a saved galaxy on disk.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Human-readable project name (derived from filename stem).
    pub name: String,
    /// Full path to the `.hexreach` file.
    pub path: PathBuf,
}

/// Trait for storage backends. Object-safe, `Send + Sync`.
pub trait StorageProvider: Send + Sync + std::fmt::Debug {
    /// Save a file to the base directory, returning the written path. The
    /// provider derives the filename from `name`.
    fn save(&self, name: &str, data: &GameStateFile) -> Result<PathBuf, PersistenceError>;

    /// Save a file to a specific path (overwrite an existing save).
    fn save_at(&self, path: &Path, data: &GameStateFile) -> Result<(), PersistenceError>;

    /// Load a file from a specific path.
    fn load(&self, path: &Path) -> Result<GameStateFile, PersistenceError>;

    /// List every `.hexreach` save in the base directory.
    fn list(&self) -> Result<Vec<ProjectEntry>, PersistenceError>;

    /// Delete a saved galaxy by path.
    fn delete(&self, path: &Path) -> Result<(), PersistenceError>;

    /// The base directory this provider operates on.
    fn base_dir(&self) -> &Path;
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Storage backend that reads and writes `.hexreach` files on the local
/// filesystem, using RON serialization.
#[derive(Debug)]
pub struct FilesystemProvider {
    config: StorageConfig,
}

impl FilesystemProvider {
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl StorageProvider for FilesystemProvider {
    fn save(&self, name: &str, data: &GameStateFile) -> Result<PathBuf, PersistenceError> {
        let sanitized = sanitize_filename(name);
        let path = self.config.base_dir.join(format!("{sanitized}.hexreach"));
        std::fs::create_dir_all(&self.config.base_dir)?;
        self.save_at(&path, data)?;
        Ok(path)
    }

    fn save_at(&self, path: &Path, data: &GameStateFile) -> Result<(), PersistenceError> {
        let ron_str = crate::format::to_ron_string(data)?;
        std::fs::write(path, ron_str)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<GameStateFile, PersistenceError> {
        let contents = std::fs::read_to_string(path)?;
        crate::format::from_ron_str(&contents)
    }

    fn list(&self) -> Result<Vec<ProjectEntry>, PersistenceError> {
        let dir = &self.config.base_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "hexreach") {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Unknown")
                    .to_string();
                entries.push(ProjectEntry { name, path });
            }
        }
        Ok(entries)
    }

    fn delete(&self, path: &Path) -> Result<(), PersistenceError> {
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }
}

/// Resolve storage configuration from compile-time feature flags.
///
/// Resolution order:
/// 1. `macos` feature → `~/Library/Application Support/hexreach/`
/// 2. `xdg` feature → `$XDG_DATA_HOME/hexreach/`
/// 3. Default → `{CARGO_MANIFEST_DIR}/.state/{CARGO_PKG_VERSION}`
#[must_use]
pub fn resolve_storage_config() -> StorageConfig {
    #[cfg(feature = "macos")]
    {
        if let Some(data) = dirs::data_dir() {
            return StorageConfig {
                base_dir: data.join("hexreach"),
                source: StorageSource::MacOs,
            };
        }
    }

    #[cfg(feature = "xdg")]
    {
        if let Some(data) = dirs::data_dir() {
            return StorageConfig {
                base_dir: data.join("hexreach"),
                source: StorageSource::Xdg,
            };
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let version = env!("CARGO_PKG_VERSION");
    StorageConfig {
        base_dir: manifest_dir.join(".state").join(version),
        source: StorageSource::ProjectLocal,
    }
}
