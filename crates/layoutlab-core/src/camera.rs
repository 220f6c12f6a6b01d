//! Camera module for zoom and pointer mapping.

use crate::geometry::{clamp, finite_or};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.25;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 4.0;

/// A pointer position mapped into logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPointer {
    /// Pointer position in logical (pre-zoom) canvas units.
    pub point: Point,
    /// Logical canvas size at the time of the event.
    pub canvas_size: Size,
}

/// Map a device pointer position to logical canvas units.
///
/// Subtracts the canvas origin, then divides by `zoom`. The logical canvas
/// size is the device rect size divided by `zoom`.
pub fn pointer_to_canvas(pointer: Point, canvas_rect: Rect, zoom: f64) -> CanvasPointer {
    CanvasPointer {
        point: Point::new(
            (pointer.x - canvas_rect.x0) / zoom,
            (pointer.y - canvas_rect.y0) / zoom,
        ),
        canvas_size: Size::new(canvas_rect.width() / zoom, canvas_rect.height() / zoom),
    }
}

/// Camera holds the device-space canvas rect and the zoom factor.
///
/// The canvas rect is reported by the host (the bounding rect of the canvas
/// surface in device pixels). Zoom is always kept inside
/// [`MIN_ZOOM`, `MAX_ZOOM`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    canvas_rect: Rect,
    zoom: f64,
}

impl Camera {
    /// Create a camera for a canvas of the given logical size at zoom `zoom`.
    pub fn new(logical_size: Size, zoom: f64) -> Self {
        let zoom = clamp(finite_or(zoom, 1.0), MIN_ZOOM, MAX_ZOOM);
        Self {
            canvas_rect: Rect::new(0.0, 0.0, logical_size.width * zoom, logical_size.height * zoom),
            zoom,
        }
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the allowed range.
    /// Non-finite values are ignored.
    ///
    /// The device rect is rescaled around its origin so the logical canvas
    /// size is unchanged until the host reports a new rect.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        let logical = self.logical_size();
        self.zoom = clamp(zoom, MIN_ZOOM, MAX_ZOOM);
        self.canvas_rect = Rect::from_origin_size(self.canvas_rect.origin(), logical * self.zoom);
    }

    /// Multiply the zoom by `factor`.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Device-space rect of the canvas surface.
    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Update the device-space canvas rect. Rects with non-finite or negative
    /// extents are ignored.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        let valid = [rect.x0, rect.y0, rect.x1, rect.y1].iter().all(|v| v.is_finite())
            && rect.width() >= 0.0
            && rect.height() >= 0.0;
        if valid {
            self.canvas_rect = rect;
        }
    }

    /// Logical canvas size (device rect divided by zoom).
    pub fn logical_size(&self) -> Size {
        Size::new(self.canvas_rect.width() / self.zoom, self.canvas_rect.height() / self.zoom)
    }

    /// Map a device pointer position into logical canvas units.
    pub fn pointer_to_canvas(&self, pointer: Point) -> CanvasPointer {
        pointer_to_canvas(pointer, self.canvas_rect, self.zoom)
    }

    /// Convert a device-space distance to logical canvas units.
    pub fn device_dist_to_canvas(&self, dist: f64) -> f64 {
        dist / self.zoom
    }
}
