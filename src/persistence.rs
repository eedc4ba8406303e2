//! Save-file model
//!
//! The core exchanges a [`MazeFile`] with the host's transport layer; how
//! that file travels (download, compressed URL, remote storage) is the
//! host's business. Field names match the original app's JSON saves,
//! including the legacy alias where `playerPos` stood in for `startPos`.
//!
//! Raster blobs here are raw row-major opacity bytes as produced by
//! [`RasterSurface::dump`]; a transport that wants PNG or base64 re-encodes
//! around this model.
//!
//! [`RasterSurface::dump`]: crate::maze::RasterSurface::dump

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::maze::layer::{Layer, LayerId, LayerKind};
use crate::maze::state::{MazeState, Mode};
use crate::rect::Rect;

/// One layer's record in a save file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: LayerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub rect: Rect,
    /// Raw opacity bytes; may be empty for a blank surface
    #[serde(default)]
    pub raster: Vec<u8>,
}

/// A complete maze save
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeFile {
    /// Legacy saves stored the spawn as `playerPos`
    #[serde(alias = "playerPos")]
    pub start_pos: Vec2,
    pub end_pos: Vec2,
    #[serde(default)]
    pub placed_ids: Vec<LayerId>,
    pub layers: Vec<LayerRecord>,
}

impl MazeFile {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("maze file serialization cannot fail")
    }

    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("failed to parse maze file: {e}");
                None
            }
        }
    }
}

impl MazeState {
    /// Snapshot the session for the persistence collaborator
    pub fn serialize(&self) -> MazeFile {
        MazeFile {
            start_pos: self.start_pos,
            end_pos: self.end_pos,
            placed_ids: self.placed_ids.clone(),
            layers: self
                .store
                .layers()
                .iter()
                .map(|l| LayerRecord {
                    id: l.id,
                    name: l.name.clone(),
                    kind: l.kind,
                    rect: l.rect,
                    raster: self.dump_raster(l.id).unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Replace the session contents from a save.
    ///
    /// The file is validated in full before anything is touched; on any
    /// violation the session is left exactly as it was and `false` comes
    /// back. A successful load lands in editing mode with the player at the
    /// loaded start point.
    pub fn deserialize(&mut self, file: MazeFile) -> bool {
        if let Err(reason) = validate(&file) {
            log::warn!("rejecting maze file: {reason}");
            return false;
        }

        let mut fresh = MazeState {
            store: crate::maze::layer::LayerStore::new(),
            placed_ids: Vec::new(),
            active_layer_id: None,
            mode: Mode::Editing,
            start_pos: file.start_pos,
            end_pos: file.end_pos,
            player_pos: file.start_pos,
        };

        for record in &file.layers {
            let layer = Layer {
                id: record.id,
                name: record.name.clone(),
                kind: record.kind,
                rect: record.rect,
            };
            match fresh.store.insert_layer(layer, &record.raster) {
                Ok(true) => {}
                Ok(false) => {
                    log::warn!("rejecting maze file: bad raster blob for {:?}", record.id);
                    return false;
                }
                Err(e) => {
                    log::error!("import failed: {e}");
                    return false;
                }
            }
        }

        fresh.placed_ids = file.placed_ids;
        fresh.active_layer_id = fresh.store.base_id();

        *self = fresh;
        log::info!("loaded maze with {} layers", self.store.layers().len());
        true
    }

    /// Raw opacity bytes for one layer's surface
    pub fn dump_raster(&self, id: LayerId) -> Option<Vec<u8>> {
        self.store.surface(id).map(|s| s.dump())
    }

    /// Replace one layer's surface contents from a dumped blob
    pub fn load_raster(&mut self, id: LayerId, blob: &[u8]) -> bool {
        match self.store.surface_mut(id) {
            Some(surface) => surface.load(blob),
            None => false,
        }
    }
}

/// Structural checks that must hold before any state is replaced
fn validate(file: &MazeFile) -> Result<(), String> {
    let bases: Vec<&LayerRecord> = file
        .layers
        .iter()
        .filter(|l| l.kind == LayerKind::Base)
        .collect();
    let &[base] = &bases[..] else {
        return Err(format!("expected exactly one base layer, found {}", bases.len()));
    };
    let base_id = base.id;
    let workspace = Rect::new(0.0, 0.0, crate::consts::WORKSPACE_SIZE, crate::consts::WORKSPACE_SIZE);
    if base.rect != workspace {
        return Err(format!("base layer rect {:?} does not cover the workspace", base.rect));
    }

    for (i, record) in file.layers.iter().enumerate() {
        if file.layers[..i].iter().any(|other| other.id == record.id) {
            return Err(format!("duplicate layer id {:?}", record.id));
        }
        if !record.raster.is_empty() {
            let expected =
                record.rect.width.max(0.0).ceil() as usize * record.rect.height.max(0.0).ceil() as usize;
            if record.raster.len() != expected {
                return Err(format!(
                    "raster blob for {:?} has {} bytes, surface needs {expected}",
                    record.id,
                    record.raster.len()
                ));
            }
        }
    }

    for (i, id) in file.placed_ids.iter().enumerate() {
        if !file.layers.iter().any(|l| l.id == *id) {
            return Err(format!("placed id {id:?} has no layer"));
        }
        if file.placed_ids[..i].contains(id) {
            return Err(format!("placed id {id:?} appears twice"));
        }
    }
    match file.placed_ids.first() {
        Some(first) if *first == base_id => Ok(()),
        Some(_) => Err("base layer must be placed at the bottom".to_string()),
        None => Err("base layer must be placed".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::raster::StampMode;

    fn sample_maze() -> MazeState {
        let mut maze = MazeState::new().unwrap();
        maze.set_end(Vec2::new(900.0, 900.0));
        let a = maze.create_block(Rect::new(100.0, 100.0, 80.0, 60.0)).unwrap();
        maze.stamp_stroke(
            Vec2::new(120.0, 120.0),
            Vec2::new(160.0, 140.0),
            StampMode::Paint,
            8.0,
        );
        assert!(maze.lift_block(a));
        maze.create_block(Rect::new(300.0, 300.0, 50.0, 50.0)).unwrap();
        maze
    }

    #[test]
    fn save_then_load_restores_session() {
        let original = sample_maze();
        let file = original.serialize();

        let mut loaded = MazeState::new().unwrap();
        assert!(loaded.deserialize(file));

        assert_eq!(loaded.start_pos(), original.start_pos());
        assert_eq!(loaded.end_pos(), original.end_pos());
        assert_eq!(loaded.placed_ids(), original.placed_ids());
        assert_eq!(loaded.lifted_ids(), original.lifted_ids());
        assert_eq!(loaded.mode(), Mode::Editing);

        // Painted content survived on the lifted block's surface
        let a = original.lifted_ids()[0];
        assert_eq!(loaded.dump_raster(a), original.dump_raster(a));
    }

    #[test]
    fn dangling_placed_id_leaves_session_untouched() {
        let mut file = sample_maze().serialize();
        file.placed_ids.push(LayerId(999));

        let mut maze = sample_maze();
        let before = maze.serialize();
        assert!(!maze.deserialize(file));
        let after = maze.serialize();
        assert_eq!(before.placed_ids, after.placed_ids);
        assert_eq!(before.layers.len(), after.layers.len());
    }

    #[test]
    fn duplicate_base_is_rejected() {
        let mut file = sample_maze().serialize();
        let mut extra = file.layers[0].clone();
        extra.id = LayerId(999);
        file.layers.push(extra);
        assert!(!MazeState::new().unwrap().deserialize(file));
    }

    #[test]
    fn missing_or_buried_base_is_rejected() {
        let mut file = sample_maze().serialize();
        file.placed_ids.clear();
        assert!(!MazeState::new().unwrap().deserialize(file.clone()));

        // Base present but above a block
        let block = file.layers.iter().find(|l| l.kind == LayerKind::Block).unwrap().id;
        let base = file.layers.iter().find(|l| l.kind == LayerKind::Base).unwrap().id;
        file.placed_ids = vec![block, base];
        assert!(!MazeState::new().unwrap().deserialize(file));
    }

    #[test]
    fn short_raster_blob_is_rejected() {
        let mut file = sample_maze().serialize();
        file.layers[1].raster.pop();
        assert!(!MazeState::new().unwrap().deserialize(file));
    }

    #[test]
    fn legacy_player_pos_field_loads_as_start() {
        let json = r#"{
            "playerPos": [50.0, 60.0],
            "endPos": [700.0, 800.0],
            "placedIds": [0],
            "layers": [
                { "id": 0, "name": "Base Layer", "type": "base",
                  "rect": { "x": 0.0, "y": 0.0, "width": 5000.0, "height": 5000.0 } }
            ]
        }"#;
        let file = MazeFile::from_json(json).unwrap();
        assert_eq!(file.start_pos, Vec2::new(50.0, 60.0));

        let mut maze = MazeState::new().unwrap();
        assert!(maze.deserialize(file));
        assert_eq!(maze.start_pos(), Vec2::new(50.0, 60.0));
        assert_eq!(maze.player_pos(), Vec2::new(50.0, 60.0));
    }

    #[test]
    fn garbage_json_is_reported_as_none() {
        assert!(MazeFile::from_json("{not json").is_none());
        assert!(MazeFile::from_json(r#"{"endPos": null}"#).is_none());
    }
}
