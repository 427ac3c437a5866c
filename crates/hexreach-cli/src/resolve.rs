//! `hexreach resolve`: loads a save, loads the per-house order packets
//! submitted for this turn, drives [`hexreach_sim::resolve_turn`], prints
//! the event log, and writes the resolved state back out.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy_log::info;
use hexreach_config::ConfigSnapshot;
use hexreach_persistence::{capture, restore, FilesystemProvider, GameStateFile, StorageProvider};

use crate::orders_io;

pub fn run(save: &Path, order_paths: &[PathBuf], config_path: Option<&Path>, out: Option<&Path>) -> anyhow::Result<()> {
    let provider = provider_for(save);
    let file = provider.load(save).with_context(|| format!("loading save {}", save.display()))?;
    let (mut state, master_seed) = restore(file.snapshot);

    let config = match config_path {
        Some(path) => ConfigSnapshot::load(path)?,
        None => ConfigSnapshot::default(),
    };

    let orders = orders_io::load_all(order_paths)?;
    let turn = state.turn;
    info!(turn, orders = orders.len(), "resolving turn via CLI");

    let events = hexreach_sim::resolve_turn(&mut state, &orders, &config, master_seed);

    println!("Resolved turn {turn} -> {} ({} events):", state.turn, events.len());
    for event in &events {
        println!(
            "  [{:?} #{}] houses={:?} system={:?} colony={:?} fleet={:?} {:?}",
            event.phase, event.sequence, event.houses, event.system, event.colony, event.fleet, event.kind
        );
    }

    let snapshot = capture(&state, master_seed);
    let out_path = out.unwrap_or(save);
    let resolved_file = GameStateFile::new(file.name, snapshot);
    provider.save_at(out_path, &resolved_file).with_context(|| format!("writing resolved save {}", out_path.display()))?;
    println!("Wrote {}", out_path.display());

    Ok(())
}

/// `FilesystemProvider::load`/`save_at` both accept arbitrary paths
/// regardless of `base_dir` — only `save`/`list` use it — so the base dir
/// here is cosmetic (it only matters if a future caller asks this
/// provider to `list()`).
fn provider_for(save: &Path) -> FilesystemProvider {
    let base_dir = save.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    FilesystemProvider::new(hexreach_persistence::StorageConfig {
        base_dir,
        source: hexreach_persistence::StorageSource::ProjectLocal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_bare_filename_resolves_its_provider_to_the_current_dir() {
        let provider = provider_for(Path::new("standalone.hexreach"));
        assert_eq!(provider.base_dir(), Path::new("."));
    }

    #[test]
    fn resolve_round_trips_through_a_real_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = hexreach_contracts::Store::new();
        let star_map = hexreach_map::generate(&mut store, 2, 1, 11);
        let state = hexreach_model::GameState::new(store, star_map);
        let snapshot = hexreach_persistence::capture(&state, 11);
        let file = hexreach_persistence::GameStateFile::new("Resolve Test", snapshot);

        let provider = provider_for(&dir.path().join("placeholder"));
        let save_path = provider.save("Resolve Test", &file).unwrap();

        run(&save_path, &[], None, None).unwrap();

        let reloaded = provider.load(&save_path).unwrap();
        assert_eq!(reloaded.snapshot.turn, 1);
    }
}
