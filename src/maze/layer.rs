//! Layer records and the store that owns them
//!
//! The store is the single owner of every layer and its raster surface.
//! Other components (stack resolution, placement, collision) reach surfaces
//! only by id lookup here, never by holding their own reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::WORKSPACE_SIZE;
use crate::error::MazeError;
use crate::maze::raster::RasterSurface;
use crate::rect::Rect;

/// Stable layer identifier, unique within one maze session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

/// Layer kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// The one immovable sheet covering the whole workspace
    Base,
    /// A movable sheet the player can lift and place
    Block,
}

/// A drawable sheet of paper. The rect is fixed at creation; blocks change
/// connectivity by being lifted and placed, never by moving or resizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub rect: Rect,
}

/// Owner of all layers and their surfaces
#[derive(Debug, Default)]
pub struct LayerStore {
    layers: Vec<Layer>,
    surfaces: HashMap<LayerId, RasterSurface>,
    next_id: u32,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new id
    fn next_layer_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a layer with a fresh transparent surface.
    ///
    /// The base layer always gets the full-workspace rect; asking for a
    /// second base returns the existing one's id, so at most one base layer
    /// can ever exist. Blocks use the rect as given.
    pub fn create_layer(&mut self, kind: LayerKind, rect: Rect) -> Result<LayerId, MazeError> {
        if kind == LayerKind::Base {
            if let Some(id) = self.base_id() {
                log::warn!("base layer already exists, reusing {id:?}");
                return Ok(id);
            }
        }

        let rect = match kind {
            LayerKind::Base => Rect::new(0.0, 0.0, WORKSPACE_SIZE, WORKSPACE_SIZE),
            LayerKind::Block => rect,
        };
        let name = match kind {
            LayerKind::Base => "Base Layer".to_string(),
            LayerKind::Block => format!("Block {}", self.layers.len()),
        };

        let surface = RasterSurface::new(rect.width, rect.height)?;
        let id = self.next_layer_id();
        self.layers.push(Layer {
            id,
            name,
            kind,
            rect,
        });
        self.surfaces.insert(id, surface);
        log::debug!("created {kind:?} layer {id:?} at {rect:?}");
        Ok(id)
    }

    /// Insert a fully-formed layer with its raster blob, used by import.
    /// The caller has already validated kind/rect/blob consistency.
    pub(crate) fn insert_layer(&mut self, layer: Layer, blob: &[u8]) -> Result<bool, MazeError> {
        let mut surface = RasterSurface::new(layer.rect.width, layer.rect.height)?;
        if !blob.is_empty() && !surface.load(blob) {
            return Ok(false);
        }
        self.next_id = self.next_id.max(layer.id.0 + 1);
        self.surfaces.insert(layer.id, surface);
        self.layers.push(layer);
        Ok(true)
    }

    /// Delete a layer and release its surface. The base layer is never
    /// deletable; that case is a logged no-op.
    pub fn delete_layer(&mut self, id: LayerId) {
        if self.layer(id).map(|l| l.kind) == Some(LayerKind::Base) {
            log::warn!("refusing to delete base layer {id:?}");
            return;
        }
        self.layers.retain(|l| l.id != id);
        self.surfaces.remove(&id);
    }

    /// All layers in creation order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// The base layer's id, if one has been created
    pub fn base_id(&self) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|l| l.kind == LayerKind::Base)
            .map(|l| l.id)
    }

    pub fn surface(&self, id: LayerId) -> Option<&RasterSurface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: LayerId) -> Option<&mut RasterSurface> {
        self.surfaces.get_mut(&id)
    }
}
