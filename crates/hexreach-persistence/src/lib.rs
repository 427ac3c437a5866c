//! Versioned RON save/load for `GameState`, with a pluggable storage
//! backend. A reload has to reallocate every entity and rewrite the
//! ids it embeds rather than deserializing straight into a live `World`.

mod format;
mod remap;
mod snapshot;
mod storage;

pub use format::{from_ron_str, to_ron_string, GameStateFile, PersistenceError, FORMAT_VERSION};
pub use remap::{EntityTable, Remap};
pub use snapshot::{capture, restore, GameStateSnapshot};
pub use storage::{resolve_storage_config, FilesystemProvider, ProjectEntry, StorageConfig, StorageProvider, StorageSource};

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Colony, Fleet, GameState, House};

    #[test]
    fn save_and_load_a_populated_galaxy_through_a_filesystem_provider() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 7);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let hub = state.star_map.hub;
        state.spawn_colony(Colony::new(house, hub, hexreach_model::colony::PlanetClass::Terran, 5));
        state.spawn_fleet(Fleet::new(house, hub));
        state.turn = 12;

        let snapshot = capture(&state, 7);
        let file = GameStateFile::new("Campaign", snapshot);

        let dir = std::env::temp_dir().join("hexreach_persistence_lib_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let provider = FilesystemProvider::new(StorageConfig {
            base_dir: dir.clone(),
            source: StorageSource::ProjectLocal,
        });

        let path = provider.save("Campaign", &file).expect("save");
        let loaded = provider.load(&path).expect("load");
        let (restored, seed) = restore(loaded.snapshot);

        assert_eq!(seed, 7);
        assert_eq!(restored.turn, 12);
        assert_eq!(restored.houses.len(), 1);
        assert!(restored.check_index_integrity());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
