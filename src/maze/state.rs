//! The maze session
//!
//! `MazeState` is the explicit session object handed to every operation:
//! the layer store, the placement order, the player, and the start/end
//! points. There are no process-wide singletons; hosts that run several
//! mazes hold several sessions. All mutation goes through `&mut self` and
//! completes within the call, so the host's single event loop is the only
//! serialization needed.

use glam::Vec2;

use crate::consts::{
    BLOCK_SAFETY_MARGIN, DEFAULT_END, DEFAULT_START, MIN_BLOCK_SIZE, WIN_DISTANCE,
};
use crate::error::MazeError;
use crate::maze::layer::{Layer, LayerId, LayerKind, LayerStore};
use crate::maze::raster::StampMode;
use crate::rect::Rect;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Drawing, block creation, and start/end editing are live
    Editing,
    /// The player moves and collision applies; the maze itself is frozen
    /// except for lift/place
    Playing,
}

/// One maze session: layers, placement order, player, goal
#[derive(Debug)]
pub struct MazeState {
    pub(crate) store: LayerStore,
    /// Layers currently in the world, bottom to top. The base layer is
    /// always present and never above any block.
    pub(crate) placed_ids: Vec<LayerId>,
    /// Most recently created or selected layer, for the host's layer panel
    pub active_layer_id: Option<LayerId>,
    pub(crate) mode: Mode,
    pub(crate) start_pos: Vec2,
    pub(crate) end_pos: Vec2,
    pub(crate) player_pos: Vec2,
}

impl MazeState {
    /// Fresh session with the base layer created, placed, and active
    pub fn new() -> Result<Self, MazeError> {
        let mut store = LayerStore::new();
        let base = store.create_layer(LayerKind::Base, Rect::new(0.0, 0.0, 0.0, 0.0))?;
        Ok(Self {
            store,
            placed_ids: vec![base],
            active_layer_id: Some(base),
            mode: Mode::Editing,
            start_pos: DEFAULT_START,
            end_pos: DEFAULT_END,
            player_pos: DEFAULT_START,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn start_pos(&self) -> Vec2 {
        self.start_pos
    }

    pub fn end_pos(&self) -> Vec2 {
        self.end_pos
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player_pos
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Placement order, bottom to top
    pub fn placed_ids(&self) -> &[LayerId] {
        &self.placed_ids
    }

    /// Layers not currently in the world (the inventory), in creation order
    pub fn lifted_ids(&self) -> Vec<LayerId> {
        self.store
            .layers()
            .iter()
            .map(|l| l.id)
            .filter(|id| !self.placed_ids.contains(id))
            .collect()
    }

    /// Resolve the single topmost placed layer at a world point.
    ///
    /// This is the one source of truth for "what surface is at this point":
    /// drawing targets it per interpolated stamp and collision samples read
    /// through it, so a stroke crossing a block edge lands on both sheets
    /// and the player collides with exactly what is visible.
    pub fn topmost_layer_at(&self, p: Vec2) -> Option<&Layer> {
        self.placed_ids
            .iter()
            .rev()
            .filter_map(|id| self.store.layer(*id))
            .find(|layer| layer.rect.contains(p))
    }

    /// Apply one drawing gesture segment from `from` to `to`.
    ///
    /// Disc centers are interpolated with a step of at most two thirds of
    /// the radius so fast drags and fat brushes leave no gaps, and the
    /// target layer is re-resolved at every step.
    pub fn stamp_stroke(&mut self, from: Vec2, to: Vec2, mode: StampMode, radius: f32) {
        let dist = from.distance(to);
        let step = (radius * 2.0 / 3.0).max(1.0);
        let steps = (dist / step).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = from.lerp(to, t);

            let Some(layer) = self.topmost_layer_at(p) else {
                continue;
            };
            let (id, local) = (layer.id, layer.rect.to_local(p));
            if let Some(surface) = self.store.surface_mut(id) {
                surface.stamp(local, radius, mode);
            }
        }
    }

    /// Commit a selection rect as a new block.
    ///
    /// Rejected (None) when the rect is degenerate or when, grown by the
    /// safety margin, it would contain the start or end point; a block
    /// created over the goal or spawn could seal it permanently. The new
    /// block starts placed on top and becomes the active layer.
    pub fn create_block(&mut self, rect: Rect) -> Option<LayerId> {
        if rect.width <= MIN_BLOCK_SIZE || rect.height <= MIN_BLOCK_SIZE {
            return None;
        }
        let guard = rect.expand(BLOCK_SAFETY_MARGIN);
        if guard.contains(self.start_pos) || guard.contains(self.end_pos) {
            log::info!("rejected block over start/end at {rect:?}");
            return None;
        }

        let id = match self.store.create_layer(LayerKind::Block, rect) {
            Ok(id) => id,
            Err(e) => {
                log::error!("block creation failed: {e}");
                return None;
            }
        };
        self.placed_ids.push(id);
        self.active_layer_id = Some(id);
        Some(id)
    }

    /// Delete a layer outright (editing affordance, distinct from lifting).
    /// The base layer survives this, as it survives everything.
    pub fn delete_layer(&mut self, id: LayerId) {
        self.store.delete_layer(id);
        if self.store.layer(id).is_none() {
            self.placed_ids.retain(|pid| *pid != id);
            if self.active_layer_id == Some(id) {
                self.active_layer_id = self.store.base_id();
            }
        }
    }

    /// Move the spawn point. Editing mode only.
    pub fn set_start(&mut self, p: Vec2) {
        if self.mode == Mode::Playing {
            log::warn!("ignoring set_start during play");
            return;
        }
        self.start_pos = p;
    }

    /// Move the goal point. Editing mode only.
    pub fn set_end(&mut self, p: Vec2) {
        if self.mode == Mode::Playing {
            log::warn!("ignoring set_end during play");
            return;
        }
        self.end_pos = p;
    }

    /// Switch between editing and playing. Entering play resets the player
    /// to the start point; leaving play changes nothing else.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        if mode == Mode::Playing {
            self.player_pos = self.start_pos;
        }
        log::info!("mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;
    }

    /// Whether the player has reached the end point. The host polls this
    /// after each movement tick and owns the win transition (typically
    /// `set_mode(Editing)` plus its own fanfare).
    pub fn player_at_end(&self) -> bool {
        self.player_pos.distance(self.end_pos) < WIN_DISTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WORKSPACE_SIZE;

    #[test]
    fn new_session_has_placed_base() {
        let maze = MazeState::new().unwrap();
        let base = maze.store().base_id().unwrap();
        assert_eq!(maze.placed_ids(), &[base]);
        assert_eq!(maze.active_layer_id, Some(base));
        assert_eq!(maze.mode(), Mode::Editing);
        assert!(maze.lifted_ids().is_empty());
    }

    #[test]
    fn resolver_prefers_topmost_block() {
        let mut maze = MazeState::new().unwrap();
        let a = maze.create_block(Rect::new(100.0, 100.0, 200.0, 200.0)).unwrap();
        let b = maze.create_block(Rect::new(150.0, 150.0, 200.0, 200.0)).unwrap();

        let p = Vec2::new(200.0, 200.0); // inside both
        assert_eq!(maze.topmost_layer_at(p).unwrap().id, b);
        let p = Vec2::new(110.0, 110.0); // only inside a
        assert_eq!(maze.topmost_layer_at(p).unwrap().id, a);
        let p = Vec2::new(600.0, 600.0); // neither: falls through to base
        assert_eq!(
            maze.topmost_layer_at(p).unwrap().id,
            maze.store().base_id().unwrap()
        );
    }

    #[test]
    fn resolver_ignores_lifted_blocks() {
        let mut maze = MazeState::new().unwrap();
        let a = maze.create_block(Rect::new(100.0, 100.0, 200.0, 200.0)).unwrap();
        assert!(maze.lift_block(a));
        let p = Vec2::new(200.0, 200.0);
        assert_eq!(
            maze.topmost_layer_at(p).unwrap().id,
            maze.store().base_id().unwrap()
        );
        assert_eq!(maze.lifted_ids(), vec![a]);
    }

    #[test]
    fn resolver_is_none_outside_workspace() {
        let maze = MazeState::new().unwrap();
        assert!(maze.topmost_layer_at(Vec2::new(-1.0, 100.0)).is_none());
        assert!(
            maze.topmost_layer_at(Vec2::new(WORKSPACE_SIZE, 0.0))
                .is_none()
        );
    }

    #[test]
    fn stroke_splits_across_block_boundary() {
        let mut maze = MazeState::new().unwrap();
        let block = maze.create_block(Rect::new(300.0, 100.0, 200.0, 200.0)).unwrap();

        // Horizontal stroke from base ground onto the block, fat brush
        maze.stamp_stroke(
            Vec2::new(200.0, 200.0),
            Vec2::new(400.0, 200.0),
            StampMode::Paint,
            20.0,
        );

        let base = maze.store().base_id().unwrap();
        let base_surface = maze.store().surface(base).unwrap();
        let block_surface = maze.store().surface(block).unwrap();

        // Base holds the part left of the block edge; the stroke center line
        // has no gaps anywhere along the way.
        assert!(base_surface.is_wall(Vec2::new(250.0, 200.0)));
        assert!(block_surface.is_wall(Vec2::new(350.0 - 300.0, 200.0 - 100.0)));
        for x in 200..=400 {
            let p = Vec2::new(x as f32, 200.0);
            let layer = maze.topmost_layer_at(p).unwrap();
            let surface = maze.store().surface(layer.id).unwrap();
            assert!(surface.is_wall(layer.rect.to_local(p)), "gap at x={x}");
        }
        // Nothing bled onto the block where the brush never reached
        assert!(!block_surface.is_wall(Vec2::new(150.0, 150.0)));
    }

    #[test]
    fn create_block_rejects_tiny_and_guarded_rects() {
        let mut maze = MazeState::new().unwrap();
        assert!(maze.create_block(Rect::new(0.0, 0.0, 5.0, 80.0)).is_none());
        assert!(maze.create_block(Rect::new(0.0, 0.0, 80.0, 3.0)).is_none());

        // DEFAULT_START is (2000, 2500); a rect ending 10 units shy of it is
        // still inside the 20-unit safety margin.
        assert!(
            maze.create_block(Rect::new(1890.0, 2450.0, 100.0, 100.0))
                .is_none()
        );
        // Past the margin it is allowed
        assert!(
            maze.create_block(Rect::new(1850.0, 2450.0, 100.0, 100.0))
                .is_some()
        );
    }

    #[test]
    fn start_end_frozen_during_play() {
        let mut maze = MazeState::new().unwrap();
        maze.set_mode(Mode::Playing);
        maze.set_start(Vec2::new(1.0, 1.0));
        maze.set_end(Vec2::new(2.0, 2.0));
        assert_eq!(maze.start_pos(), DEFAULT_START);
        assert_eq!(maze.end_pos(), DEFAULT_END);

        maze.set_mode(Mode::Editing);
        maze.set_end(Vec2::new(2.0, 2.0));
        assert_eq!(maze.end_pos(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn entering_play_resets_player_to_start() {
        let mut maze = MazeState::new().unwrap();
        maze.set_start(Vec2::new(500.0, 500.0));
        maze.set_mode(Mode::Playing);
        assert_eq!(maze.player_pos(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn player_at_end_uses_win_distance() {
        let mut maze = MazeState::new().unwrap();
        maze.set_start(maze.end_pos() + Vec2::new(WIN_DISTANCE + 1.0, 0.0));
        maze.set_mode(Mode::Playing);
        assert!(!maze.player_at_end());
        maze.player_pos = maze.end_pos + Vec2::new(WIN_DISTANCE - 1.0, 0.0);
        assert!(maze.player_at_end());
    }

    #[test]
    fn delete_layer_fixes_placement_and_active() {
        let mut maze = MazeState::new().unwrap();
        let a = maze.create_block(Rect::new(100.0, 100.0, 50.0, 50.0)).unwrap();
        assert_eq!(maze.active_layer_id, Some(a));
        maze.delete_layer(a);
        assert!(!maze.placed_ids().contains(&a));
        assert_eq!(maze.active_layer_id, maze.store().base_id());

        // Deleting the base is refused outright
        let base = maze.store().base_id().unwrap();
        maze.delete_layer(base);
        assert!(maze.placed_ids().contains(&base));
    }
}
