//! Play-area geometry
//!
//! The radar field is a bounded rectangle whose visible circle is sized by
//! the smaller dimension. Entity positions are stored in normalized
//! coordinates (fractions of width/height) so a resize never moves anything;
//! all absolute values are derived on demand from the current `Field` and
//! must not be cached across frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of the play area's absolute dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Basis for all proportional sizing: the circular radar display is
    /// bounded by the smaller dimension.
    #[inline]
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    /// A field the host has collapsed (hidden window, mid-resize). Geometry
    /// work is skipped while this holds.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Convert a normalized position to absolute units.
    #[inline]
    pub fn to_absolute(&self, relative: Vec2) -> Vec2 {
        Vec2::new(relative.x * self.width, relative.y * self.height)
    }

    /// Convert an absolute position to normalized coordinates.
    #[inline]
    pub fn to_normalized(&self, absolute: Vec2) -> Vec2 {
        Vec2::new(absolute.x / self.width, absolute.y / self.height)
    }

    /// Absolute radius for a fraction of the min dimension.
    #[inline]
    pub fn radius_for(&self, fraction: f32) -> f32 {
        self.min_dimension() * fraction
    }

    /// Absolute center of the field.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}
