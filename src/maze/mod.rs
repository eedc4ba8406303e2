//! Deterministic maze core
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only, driven by the host's loop
//! - Stable layer iteration (creation order; placement order bottom to top)
//! - No rendering or platform dependencies
//!
//! The session object is [`MazeState`]; every operation takes `&mut self`
//! and completes synchronously within the call.

pub mod layer;
pub mod placement;
pub mod raster;
pub mod state;
pub mod tick;

pub use layer::{Layer, LayerId, LayerKind, LayerStore};
pub use raster::{RasterSurface, StampMode};
pub use state::{MazeState, Mode};
pub use tick::MoveInput;
