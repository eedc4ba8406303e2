//! Error types for the maze core
//!
//! Almost everything that can "fail" here is an ordinary gameplay outcome
//! (an illegal lift, a stamp outside every surface, a bad import) and is
//! surfaced as a boolean or a no-op. Only genuinely unrecoverable conditions
//! get an error type.

use thiserror::Error;

/// Fatal errors propagated to the caller
#[derive(Debug, Error)]
pub enum MazeError {
    /// A raster surface could not be allocated
    #[error("failed to allocate {bytes} byte raster surface")]
    SurfaceAllocation { bytes: usize },
}
