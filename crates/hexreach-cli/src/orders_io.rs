//! Loads RON-encoded [`OrderPacket`]s from disk. Orders are the one input
//! this binary doesn't own the format of — a transport layer would hand these over the
//! wire instead, but the administrative CLI reads them straight from
//! files.

use std::path::Path;

use anyhow::Context;
use hexreach_model::OrderPacket;

pub fn load_all(paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<OrderPacket>> {
    paths.iter().map(|p| load_one(p)).collect()
}

fn load_one(path: &Path) -> anyhow::Result<OrderPacket> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading order packet {}", path.display()))?;
    ron::from_str(&contents).with_context(|| format!("parsing order packet {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::HouseId;
    use std::io::Write;

    fn write_packet(dir: &std::path::Path, name: &str, house: HouseId) -> std::path::PathBuf {
        let packet = OrderPacket {
            house: Some(house),
            turn: 3,
            ..Default::default()
        };
        let rendered = ron::to_string(&packet).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(rendered.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_a_single_order_packet() {
        let dir = tempfile::tempdir().unwrap();
        let house = HouseId(bevy_ecs::entity::Entity::PLACEHOLDER);
        let path = write_packet(dir.path(), "house_a.ron", house);

        let loaded = load_one(&path).unwrap();
        assert_eq!(loaded.house, Some(house));
        assert_eq!(loaded.turn, 3);
    }

    #[test]
    fn loads_every_path_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let house = HouseId(bevy_ecs::entity::Entity::PLACEHOLDER);
        let path_a = write_packet(dir.path(), "a.ron", house);
        let path_b = write_packet(dir.path(), "b.ron", house);

        let loaded = load_all(&[path_a, path_b]).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].house, Some(house));
        assert_eq!(loaded[1].house, Some(house));
    }

    #[test]
    fn missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ron");
        assert!(load_one(&missing).is_err());
    }
}
