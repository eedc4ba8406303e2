//! Per-layer opacity buffers
//!
//! Each layer owns one `RasterSurface`: a row-major byte buffer addressed in
//! layer-local coordinates (origin at the layer rect's top-left). Painting
//! stamps opaque discs, erasing clears discs; collision reads a single byte
//! and compares it against the wall threshold.

use glam::Vec2;

use crate::consts::WALL_OPACITY_THRESHOLD;
use crate::error::MazeError;

/// Brush mode for a stamp or stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampMode {
    /// Draw an opaque wall disc
    Paint,
    /// Clear opacity to zero within the disc
    Erase,
}

/// A single layer's opacity buffer
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Allocate a fully transparent surface.
    ///
    /// Dimensions round up so every world point inside the owning rect maps
    /// to an in-bounds pixel. Allocation failure is reported, not aborted:
    /// a maze full of large blocks is the one place a user can realistically
    /// exhaust memory.
    pub fn new(width: f32, height: f32) -> Result<Self, MazeError> {
        let width = width.max(0.0).ceil() as usize;
        let height = height.max(0.0).ceil() as usize;
        let bytes = width * height;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| MazeError::SurfaceAllocation { bytes })?;
        pixels.resize(bytes, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Stamp a filled disc centered at `local`. Pixels outside the buffer
    /// are skipped; re-painting opaque pixels and re-erasing transparent
    /// ones are no-ops in effect.
    pub fn stamp(&mut self, local: Vec2, radius: f32, mode: StampMode) {
        let value = match mode {
            StampMode::Paint => u8::MAX,
            StampMode::Erase => 0,
        };

        let r = radius.max(0.0);
        let r2 = r * r;
        let min_y = (local.y - r).floor().max(0.0) as usize;
        let max_y = ((local.y + r).ceil() as isize).min(self.height as isize - 1);
        let min_x = (local.x - r).floor().max(0.0) as usize;
        let max_x = ((local.x + r).ceil() as isize).min(self.width as isize - 1);
        if max_y < min_y as isize || max_x < min_x as isize {
            return;
        }

        for y in min_y..=max_y as usize {
            let dy = y as f32 + 0.5 - local.y;
            let row = y * self.width;
            for x in min_x..=max_x as usize {
                let dx = x as f32 + 0.5 - local.x;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[row + x] = value;
                }
            }
        }
    }

    /// Stored opacity in [0, 1] at a local point; 0.0 out of bounds
    pub fn sample_opacity(&self, local: Vec2) -> f32 {
        self.byte_at(local).map(|b| b as f32 / 255.0).unwrap_or(0.0)
    }

    /// Whether the local point reads as wall (opacity above the threshold,
    /// not merely nonzero). Out of bounds is never wall.
    #[inline]
    pub fn is_wall(&self, local: Vec2) -> bool {
        self.byte_at(local)
            .map(|b| b > WALL_OPACITY_THRESHOLD)
            .unwrap_or(false)
    }

    fn byte_at(&self, local: Vec2) -> Option<u8> {
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let x = local.x.floor() as usize;
        let y = local.y.floor() as usize;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Raw row-major opacity bytes, for the persistence collaborator
    pub fn dump(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Replace the buffer contents from a dumped blob. Rejects blobs whose
    /// length does not match the surface dimensions.
    pub fn load(&mut self, blob: &[u8]) -> bool {
        if blob.len() != self.pixels.len() {
            log::warn!(
                "raster blob length {} does not match {}x{} surface",
                blob.len(),
                self.width,
                self.height
            );
            return false;
        }
        self.pixels.copy_from_slice(blob);
        true
    }
}
