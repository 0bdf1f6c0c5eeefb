//! Hit-testing and bounding boxes for canvas elements.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Rect, rotate_point};
use crate::doc::{CanvasElement, ElementId};

/// Resize handle on a selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Corner handles scale both axes; edge handles scale one.
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    pub const ALL: [ResizeHandle; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Where this handle sits on `r`.
    #[must_use]
    pub fn locate(self, r: &Rect) -> Point {
        let cx = r.x + r.width / 2.0;
        let cy = r.y + r.height / 2.0;
        match self {
            Self::N => Point::new(cx, r.y),
            Self::Ne => Point::new(r.right(), r.y),
            Self::E => Point::new(r.right(), cy),
            Self::Se => Point::new(r.right(), r.bottom()),
            Self::S => Point::new(cx, r.bottom()),
            Self::Sw => Point::new(r.x, r.bottom()),
            Self::W => Point::new(r.x, cy),
            Self::Nw => Point::new(r.x, r.y),
        }
    }
}

/// Nearest handle of `selection` within `radius` of `p`. Corners win ties.
#[must_use]
pub fn handle_at(p: Point, selection: &Rect, radius: f64) -> Option<ResizeHandle> {
    let mut handles = ResizeHandle::ALL;
    handles.sort_by_key(|h| !h.is_corner());
    handles
        .into_iter()
        .map(|h| (h, h.locate(selection).distance(p)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(h, _)| h)
}

/// Axis-aligned bounding box of one element, accounting for rotation.
#[must_use]
pub fn rotated_bounds(el: &CanvasElement) -> Rect {
    if el.rotation == 0.0 {
        return el.rect();
    }
    let center = el.center();
    let r = el.rect();
    let corners = [
        Point::new(r.x, r.y),
        Point::new(r.right(), r.y),
        Point::new(r.right(), r.bottom()),
        Point::new(r.x, r.bottom()),
    ];
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in corners {
        let p = rotate_point(corner, center, el.rotation);
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::from_corners(min, max)
}

/// Combined rotation-aware bounding box. Empty input yields a zero rect.
#[must_use]
pub fn bounding_box<'a>(elements: impl IntoIterator<Item = &'a CanvasElement>) -> Rect {
    elements
        .into_iter()
        .map(rotated_bounds)
        .reduce(|acc, r| acc.union(&r))
        .unwrap_or_default()
}

/// Combined bounding box of the unrotated element boxes.
///
/// Rigid rotation and grouping pivot around this box.
#[must_use]
pub fn plain_bounding_box<'a>(elements: impl IntoIterator<Item = &'a CanvasElement>) -> Rect {
    elements
        .into_iter()
        .map(CanvasElement::rect)
        .reduce(|acc, r| acc.union(&r))
        .unwrap_or_default()
}

/// Whether `p` lies inside the element's rotated box.
#[must_use]
pub fn point_in_element(p: Point, el: &CanvasElement) -> bool {
    let local = if el.rotation == 0.0 { p } else { rotate_point(p, el.center(), -el.rotation) };
    let r = el.rect();
    local.x >= r.x && local.x <= r.right() && local.y >= r.y && local.y <= r.bottom()
}

/// Topmost element under `p`, by z-index.
#[must_use]
pub fn hit_test(p: Point, elements: &[CanvasElement]) -> Option<ElementId> {
    elements
        .iter()
        .filter(|el| point_in_element(p, el))
        .max_by_key(|el| el.z_index)
        .map(|el| el.id)
}

/// Ids of elements whose rotated bounding box lies fully inside `marquee`.
#[must_use]
pub fn elements_in_box(marquee: Rect, elements: &[CanvasElement]) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|el| marquee.contains_rect(&rotated_bounds(el)))
        .map(|el| el.id)
        .collect()
}
