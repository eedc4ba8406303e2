//! Paper Maze - a puzzle maze built from stacked sheets of paper
//!
//! Users paint walls onto a base sheet and onto movable rectangular blocks,
//! then steer a ball through the composite maze, lifting and placing blocks
//! to change connectivity.
//!
//! Core modules:
//! - `maze`: Deterministic maze core (layer stack, raster surfaces, placement
//!   rules, player collision)
//! - `persistence`: Save-file model exchanged with the host's transport layer
//!
//! The crate is the simulation core only. Rendering, input plumbing, and
//! file/URL transport are owned by the embedding application, which drives a
//! [`maze::MazeState`] through its public operations from a single event loop
//! (none of the operations are safe to call concurrently on one session).

pub mod error;
pub mod maze;
pub mod persistence;
pub mod rect;

pub use error::MazeError;
pub use maze::{Layer, LayerId, LayerKind, MazeState, Mode, MoveInput, StampMode};
pub use persistence::{LayerRecord, MazeFile};
pub use rect::Rect;

/// Maze configuration constants
pub mod consts {
    use glam::Vec2;

    /// Side length of the square workspace; the base layer always covers it
    pub const WORKSPACE_SIZE: f32 = 5000.0;

    /// Rendered player circle radius
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Collision circle radius, slightly under the rendered radius so brushing
    /// a wall visually does not stop the player
    pub const COLLISION_RADIUS: f32 = 9.0;
    /// Ring sample count for the collision footprint (center is sampled too)
    pub const COLLISION_SAMPLES: u32 = 8;
    /// Player step per movement tick, in workspace units
    pub const MOVE_SPEED: f32 = 4.0;

    /// Stored opacity above this byte value counts as wall. Strictly above
    /// zero would turn anti-aliased fringes into phantom walls.
    pub const WALL_OPACITY_THRESHOLD: u8 = 100;

    /// Reaching within this distance of the end point wins the run
    pub const WIN_DISTANCE: f32 = 20.0;

    /// A new block's rect, grown by this margin, may not contain start/end
    pub const BLOCK_SAFETY_MARGIN: f32 = 20.0;
    /// Selection rects at or under this size in either dimension are ignored
    pub const MIN_BLOCK_SIZE: f32 = 5.0;

    /// Default spawn point for a fresh maze
    pub const DEFAULT_START: Vec2 = Vec2::new(2000.0, 2500.0);
    /// Default goal point for a fresh maze
    pub const DEFAULT_END: Vec2 = Vec2::new(3000.0, 2500.0);
}
