//! `hexreach fog`: loads a save, refreshes one house's intelligence
//! database against current visibility, and prints the projected
//! [`hexreach_intel::FogOfWarView`].

use std::path::Path;

use anyhow::{bail, Context};
use hexreach_contracts::HouseId;
use hexreach_model::{GameState, House};
use hexreach_persistence::{restore, FilesystemProvider, StorageConfig, StorageProvider, StorageSource};

pub fn run(save: &Path, house_name: &str) -> anyhow::Result<()> {
    let base_dir = save.parent().map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
    let provider = FilesystemProvider::new(StorageConfig { base_dir, source: StorageSource::ProjectLocal });
    let file = provider.load(save).with_context(|| format!("loading save {}", save.display()))?;
    let (mut state, _seed) = restore(file.snapshot);

    let house_id = find_house(&state, house_name).with_context(|| format!("no house named {house_name:?} in this save"))?;

    hexreach_intel::refresh_intelligence(&mut state, house_id);
    let view = hexreach_intel::project_fog_of_war(&state, house_id);

    let rendered = ron::ser::to_string_pretty(&view, ron::ser::PrettyConfig::default()).context("rendering fog-of-war view")?;
    println!("{rendered}");
    Ok(())
}

fn find_house(state: &GameState, name: &str) -> anyhow::Result<HouseId> {
    for &id in &state.houses {
        if let Some(house) = state.store.get::<House>(id.0) {
            if house.name == name {
                return Ok(id);
            }
        }
    }
    bail!("house not found")
}
