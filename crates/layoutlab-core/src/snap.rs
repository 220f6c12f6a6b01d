//! Grid snapping.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid size for snapping.
pub const GRID_SIZE: f64 = 10.0;

/// Round `value` to the nearest multiple of `grid_size`.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Grid snapping settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapper {
    enabled: bool,
    grid_size: f64,
}

impl Default for Snapper {
    fn default() -> Self {
        Self {
            enabled: false,
            grid_size: GRID_SIZE,
        }
    }
}

impl Snapper {
    /// Create a snapper; the grid size is coerced to at least 1.
    pub fn new(enabled: bool, grid_size: f64) -> Self {
        let mut snapper = Self {
            enabled,
            grid_size: GRID_SIZE,
        };
        snapper.set_grid_size(grid_size);
        snapper
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Set the grid size. Non-finite values are ignored; anything below 1
    /// becomes 1.
    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size.is_finite() {
            self.grid_size = grid_size.max(1.0);
        }
    }

    /// Snap a single coordinate. Identity when disabled.
    pub fn snap(&self, value: f64) -> f64 {
        if self.enabled {
            snap_to_grid(value, self.grid_size)
        } else {
            value
        }
    }

    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap(point.x), self.snap(point.y))
    }
}
