//! Binding and snap engine.
//!
//! Shapes expose anchor ("snap") points; arrow endpoints dragged near an
//! anchor attach to it via an [`ArrowBinding`]. Whenever a bound element's
//! geometry changes, [`arrows_to_update`] re-resolves every affected binding
//! against the current element list and produces replacement arrow geometry.
//!
//! Bindings are weak: a binding whose target is gone resolves to `None` and
//! the arrow keeps its stored endpoint.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::camera::Point;
use crate::consts::MIN_ARROW_BOX;
use crate::doc::{AnchorTag, ArrowBinding, CanvasElement, ElementId, ElementKind, ElementPatch};

/// A candidate anchor on an element, in absolute document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub x: f64,
    pub y: f64,
    pub position: AnchorTag,
    pub element_id: ElementId,
}

impl SnapPoint {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The binding an endpoint snapped here should record.
    #[must_use]
    pub fn binding(&self) -> ArrowBinding {
        ArrowBinding { element_id: self.element_id, position: self.position }
    }
}

/// Outcome of a snap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapResult {
    /// The query point was within range of an anchor.
    Snapped(SnapPoint),
    /// No anchor qualified; carries the unchanged query point.
    Free(Point),
}

impl SnapResult {
    /// Resulting coordinates: the anchor when snapped, else the query point.
    #[must_use]
    pub fn point(&self) -> Point {
        match self {
            Self::Snapped(sp) => sp.point(),
            Self::Free(p) => *p,
        }
    }

    #[must_use]
    pub fn binding(&self) -> Option<ArrowBinding> {
        match self {
            Self::Snapped(sp) => Some(sp.binding()),
            Self::Free(_) => None,
        }
    }
}

/// A replacement geometry for one bound arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowUpdate {
    pub arrow_id: ElementId,
    pub patch: ElementPatch,
}

const BOX_ANCHORS: [AnchorTag; 9] = [
    AnchorTag::TopLeft,
    AnchorTag::TopRight,
    AnchorTag::BottomLeft,
    AnchorTag::BottomRight,
    AnchorTag::Top,
    AnchorTag::Bottom,
    AnchorTag::Left,
    AnchorTag::Right,
    AnchorTag::Center,
];

const ROUND_ANCHORS: [AnchorTag; 5] =
    [AnchorTag::Top, AnchorTag::Bottom, AnchorTag::Left, AnchorTag::Right, AnchorTag::Center];

/// Anchors offered by an element, in scan order.
///
/// Arrows offer none; circles offer the four edge midpoints and the center;
/// every other kind offers four corners, four edge midpoints and the center.
#[must_use]
pub fn element_snap_points(el: &CanvasElement) -> Vec<SnapPoint> {
    let anchors: &[AnchorTag] = match el.kind {
        ElementKind::Arrow(_) => &[],
        ElementKind::Circle(_) => &ROUND_ANCHORS,
        ElementKind::Rectangle(_)
        | ElementKind::RoundedRectangle(_)
        | ElementKind::Triangle(_)
        | ElementKind::Image(_)
        | ElementKind::Text(_)
        | ElementKind::Group(_) => &BOX_ANCHORS,
    };
    let r = el.rect();
    anchors
        .iter()
        .map(|&position| {
            let p = position.locate(&r);
            SnapPoint { x: p.x, y: p.y, position, element_id: el.id }
        })
        .collect()
}

/// Snap points of every element except `exclude` (usually the arrow being edited).
#[must_use]
pub fn all_snap_points(elements: &[CanvasElement], exclude: Option<ElementId>) -> Vec<SnapPoint> {
    elements
        .iter()
        .filter(|el| Some(el.id) != exclude)
        .flat_map(element_snap_points)
        .collect()
}

/// Nearest snap point to `p` within `threshold`.
///
/// Only a strictly closer point replaces the current best, so ties keep the
/// first-scanned point.
#[must_use]
pub fn find_nearest_snap_point(p: Point, points: &[SnapPoint], threshold: f64) -> SnapResult {
    let mut best: Option<(f64, SnapPoint)> = None;
    for sp in points {
        let dist = p.distance(sp.point());
        if dist <= threshold && best.is_none_or(|(min, _)| dist < min) {
            best = Some((dist, *sp));
        }
    }
    match best {
        Some((_, sp)) => SnapResult::Snapped(sp),
        None => SnapResult::Free(p),
    }
}

/// Snap an arrow endpoint against every other element.
#[must_use]
pub fn snap_arrow_point(p: Point, elements: &[CanvasElement], arrow_id: ElementId, threshold: f64) -> SnapResult {
    find_nearest_snap_point(p, &all_snap_points(elements, Some(arrow_id)), threshold)
}

/// Anchors currently engaged by an arrow's endpoints, for highlighting.
///
/// When both endpoints engage the same location it is reported once.
#[must_use]
pub fn active_snap_points(arrow: &CanvasElement, elements: &[CanvasElement], threshold: f64) -> Vec<SnapPoint> {
    let Some((start, end)) = arrow.arrow_endpoints() else {
        return Vec::new();
    };
    let points = all_snap_points(elements, Some(arrow.id));
    let mut active: Vec<SnapPoint> = Vec::new();
    for endpoint in [start, end] {
        if let SnapResult::Snapped(sp) = find_nearest_snap_point(endpoint, &points, threshold) {
            if !active.iter().any(|a| a.x == sp.x && a.y == sp.y) {
                active.push(sp);
            }
        }
    }
    active
}

/// Absolute position of a binding against the current element list.
///
/// Returns `None` when the target no longer exists.
#[must_use]
pub fn binding_position(binding: &ArrowBinding, elements: &[CanvasElement]) -> Option<Point> {
    elements
        .iter()
        .find(|el| el.id == binding.element_id)
        .map(|el| binding.position.locate(&el.rect()))
}

/// Recompute geometry for arrows whose bindings depend on `moved`.
///
/// An arrow is affected when either binding targets a moved element, or,
/// with `include_moved_arrows`, when the arrow itself moved and has any
/// binding. Every bound side of an affected arrow is re-resolved; stale or
/// unbound sides keep their stored absolute position. `elements` must
/// already reflect the move.
#[must_use]
pub fn arrows_to_update(moved: &[ElementId], elements: &[CanvasElement], include_moved_arrows: bool) -> Vec<ArrowUpdate> {
    let mut updates = Vec::new();
    for el in elements {
        let Some(arrow) = el.arrow() else {
            continue;
        };
        let Some((stored_start, stored_end)) = el.arrow_endpoints() else {
            continue;
        };

        let targets_moved = |b: Option<ArrowBinding>| b.is_some_and(|b| moved.contains(&b.element_id));
        let has_binding = arrow.start_binding.is_some() || arrow.end_binding.is_some();
        let self_moved = include_moved_arrows && has_binding && moved.contains(&el.id);
        if !targets_moved(arrow.start_binding) && !targets_moved(arrow.end_binding) && !self_moved {
            continue;
        }

        let start = resolve_side(el.id, arrow.start_binding.as_ref(), elements).unwrap_or(stored_start);
        let end = resolve_side(el.id, arrow.end_binding.as_ref(), elements).unwrap_or(stored_end);
        updates.push(ArrowUpdate { arrow_id: el.id, patch: arrow_geometry(start, end, MIN_ARROW_BOX) });
    }
    updates
}

fn resolve_side(arrow_id: ElementId, binding: Option<&ArrowBinding>, elements: &[CanvasElement]) -> Option<Point> {
    let binding = binding?;
    let resolved = binding_position(binding, elements);
    if resolved.is_none() {
        tracing::debug!(%arrow_id, target = %binding.element_id, "stale arrow binding; keeping stored endpoint");
    }
    resolved
}

/// Box and relative endpoints for an arrow spanning two absolute points.
///
/// Each side of the box is at least `min_side`.
#[must_use]
pub fn arrow_geometry(start: Point, end: Point, min_side: f64) -> ElementPatch {
    let min_x = start.x.min(end.x);
    let min_y = start.y.min(end.y);
    ElementPatch {
        x: Some(min_x),
        y: Some(min_y),
        width: Some((end.x - start.x).abs().max(min_side)),
        height: Some((end.y - start.y).abs().max(min_side)),
        arrow_start: Some(Point::new(start.x - min_x, start.y - min_y)),
        arrow_end: Some(Point::new(end.x - min_x, end.y - min_y)),
        ..ElementPatch::default()
    }
}
