//! `hexreach list`: enumerates `.hexreach` saves in a directory.

use std::path::Path;

use anyhow::Context;
use hexreach_persistence::{FilesystemProvider, StorageConfig, StorageProvider, StorageSource};

pub fn run(save_dir: &Path) -> anyhow::Result<()> {
    let provider = FilesystemProvider::new(StorageConfig {
        base_dir: save_dir.to_path_buf(),
        source: StorageSource::ProjectLocal,
    });
    let entries = provider.list().context("listing saves")?;
    if entries.is_empty() {
        println!("No saves in {}", save_dir.display());
        return Ok(());
    }
    for entry in entries {
        println!("{}\t{}", entry.name, entry.path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_lists_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path()).is_ok());
    }

    #[test]
    fn lists_saves_written_by_the_storage_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FilesystemProvider::new(StorageConfig {
            base_dir: dir.path().to_path_buf(),
            source: StorageSource::ProjectLocal,
        });

        let mut store = hexreach_contracts::Store::new();
        let star_map = hexreach_map::generate(&mut store, 1, 0, 1);
        let state = hexreach_model::GameState::new(store, star_map);
        let snapshot = hexreach_persistence::capture(&state, 1);
        let file = hexreach_persistence::GameStateFile::new("A Galaxy", snapshot);
        provider.save("A Galaxy", &file).unwrap();

        assert!(run(dir.path()).is_ok());
        let entries = provider.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "A Galaxy");
    }
}
