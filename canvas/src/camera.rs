#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_MAX_SCALE, FIT_MIN_SCALE, MAX_SCALE, MIN_SCALE, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};

/// A point in either screen or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Viewport transform from document space to screen space.
///
/// `screen = document * scale + (x, y)`. `x` / `y` are in screen pixels and
/// `scale` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

/// Sparse viewport update. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl Viewport {
    /// Convert a screen-space point to document coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.x) / self.scale,
            y: (screen.y - self.y) / self.scale,
        }
    }

    /// Convert a document-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.x,
            y: world.y * self.scale + self.y,
        }
    }

    /// Convert a screen-space distance to a document-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Apply a sparse update. Non-positive or non-finite scales are ignored.
    pub fn apply(&mut self, patch: ViewportPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(scale) = patch.scale {
            if scale.is_finite() && scale > 0.0 {
                self.scale = scale;
            }
        }
    }

    /// Zoom one wheel step around `cursor` (screen space).
    ///
    /// A positive `wheel_delta` zooms out. The document point under the cursor
    /// stays under the cursor.
    #[must_use]
    pub fn zoomed_at(&self, cursor: Point, wheel_delta: f64) -> Viewport {
        let before = self.screen_to_world(cursor);
        let factor = if wheel_delta > 0.0 { ZOOM_OUT_FACTOR } else { ZOOM_IN_FACTOR };
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        Viewport {
            x: cursor.x - before.x * scale,
            y: cursor.y - before.y * scale,
            scale,
        }
    }

    /// Viewport that centers `bounds` in a `screen_w` x `screen_h` screen.
    ///
    /// The content is fitted into 80% of the screen minus `padding` on each
    /// side, with the scale clamped to the import range. Returns `None` for a
    /// degenerate box.
    #[must_use]
    pub fn fit_to(bounds: Rect, screen_w: f64, screen_h: f64, padding: f64) -> Option<Viewport> {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }
        let max_w = (screen_w * 0.8 - padding * 2.0).max(1.0);
        let max_h = (screen_h * 0.8 - padding * 2.0).max(1.0);
        let scale = (max_w / bounds.width)
            .min(max_h / bounds.height)
            .clamp(FIT_MIN_SCALE, FIT_MAX_SCALE);
        let center = bounds.center();
        Some(Viewport {
            x: screen_w / 2.0 - center.x * scale,
            y: screen_h / 2.0 - center.y * scale,
            scale,
        })
    }
}

/// Axis-aligned rectangle in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.bottom() <= self.bottom()
    }

    /// Normalized rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Rect {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Rect { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }
}

/// Rotate `p` around `pivot` by `degrees` (clockwise in screen space).
#[must_use]
pub fn rotate_point(p: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point {
        x: pivot.x + dx * cos - dy * sin,
        y: pivot.y + dx * sin + dy * cos,
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}
