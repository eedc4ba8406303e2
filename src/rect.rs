//! Axis-aligned rectangles in workspace coordinates
//!
//! Every layer owns one immutable `Rect`. Containment is half-open on both
//! axes so adjacent rects tile without double-claiming their shared edge,
//! and overlap is strict: rects that merely touch do not overlap, which is
//! what lets blocks be laid flush against each other and still be lifted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `[x, x+width) x [y, y+height)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment test: the left/top edges are inside, the
    /// right/bottom edges are not.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Strict AABB overlap. Touching edges (equal boundary coordinate) do
    /// not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x + self.width <= other.x
            || self.x >= other.x + other.width
            || self.y + self.height <= other.y
            || self.y >= other.y + other.height)
    }

    /// The rect grown by `margin` on every side
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// World point translated into this rect's local coordinates
    #[inline]
    pub fn to_local(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.x, p.y - self.y)
    }
}
