//! Fixed timestep player movement
//!
//! The host calls [`MazeState::tick_movement`] once per animation frame with
//! the currently held directions; there are no internal timers. Collision is
//! discrete point sampling against painted opacity, not geometric path
//! intersection: the player's circular footprint is sampled at its center
//! plus eight ring points, each resolved to the topmost layer at that point.
//!
//! The requested delta is resolved one axis at a time, X first, so that a
//! diagonal push against a wall slides along it instead of stopping dead.

use std::f32::consts::{FRAC_1_SQRT_2, TAU};

use glam::Vec2;

use crate::consts::{COLLISION_RADIUS, COLLISION_SAMPLES, MOVE_SPEED};
use crate::maze::state::{MazeState, Mode};

/// Directions held down for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    /// Raw per-tick delta before collision, diagonal normalized so pressing
    /// two keys is no faster than pressing one
    pub fn delta(&self) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= MOVE_SPEED;
        }
        if self.down {
            d.y += MOVE_SPEED;
        }
        if self.left {
            d.x -= MOVE_SPEED;
        }
        if self.right {
            d.x += MOVE_SPEED;
        }
        if d.x != 0.0 && d.y != 0.0 {
            d *= FRAC_1_SQRT_2;
        }
        d
    }
}

impl MazeState {
    /// Whether a player centered at `p` would intersect a wall.
    ///
    /// Samples the center plus `COLLISION_SAMPLES` points around the
    /// collision circle. Each sample reads the opacity of whichever layer
    /// is topmost there; a lifted block neither blocks nor shelters. Points
    /// outside every placed layer are clear.
    pub fn blocked_at(&self, p: Vec2) -> bool {
        if self.sample_is_wall(p) {
            return true;
        }
        for i in 0..COLLISION_SAMPLES {
            let angle = i as f32 / COLLISION_SAMPLES as f32 * TAU;
            let sample = p + Vec2::new(angle.cos(), angle.sin()) * COLLISION_RADIUS;
            if self.sample_is_wall(sample) {
                return true;
            }
        }
        false
    }

    fn sample_is_wall(&self, p: Vec2) -> bool {
        match self.topmost_layer_at(p) {
            Some(layer) => match self.store.surface(layer.id) {
                Some(surface) => surface.is_wall(layer.rect.to_local(p)),
                None => false,
            },
            None => false,
        }
    }

    /// Advance the player by one tick of held input and return the new
    /// position. Outside playing mode this is a no-op.
    ///
    /// X is resolved first; Y is then tried from the possibly-adjusted X,
    /// which is what produces sliding along walls.
    pub fn tick_movement(&mut self, input: &MoveInput) -> Vec2 {
        if self.mode != Mode::Playing {
            return self.player_pos;
        }

        let delta = input.delta();
        if delta == Vec2::ZERO {
            return self.player_pos;
        }

        let mut next = self.player_pos;

        let try_x = Vec2::new(next.x + delta.x, next.y);
        if !self.blocked_at(try_x) {
            next.x = try_x.x;
        }

        let try_y = Vec2::new(next.x, next.y + delta.y);
        if !self.blocked_at(try_y) {
            next.y = try_y.y;
        }

        self.player_pos = next;
        next
    }
}
