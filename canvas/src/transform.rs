//! Geometric editing operations over an element list.
//!
//! Everything here is a pure function of its inputs: callers pass the
//! current elements and receive new ones (or mutate a working copy they
//! own). The store wraps these with selection and history bookkeeping.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use uuid::Uuid;

use crate::camera::{Point, Rect, normalize_degrees, rotate_point};
use crate::consts::{MIN_RESIZE, ROTATION_EPSILON};
use crate::doc::{CanvasElement, ElementId, ElementKind, GroupProps};
use crate::hit::{ResizeHandle, plain_bounding_box};

// =============================================================================
// ROTATION
// =============================================================================

/// Rotate the elements named by `ids` by `delta` degrees.
///
/// A single element spins in place. Several elements rotate rigidly around
/// the center of their combined unrotated bounding box. Returns whether
/// anything changed.
pub fn rotate_by(elements: &mut [CanvasElement], ids: &[ElementId], delta: f64) -> bool {
    let targets: Vec<usize> = indices_of(elements, ids);
    match targets.as_slice() {
        [] => false,
        [only] => {
            let el = &mut elements[*only];
            el.rotation = normalize_degrees(el.rotation + delta);
            true
        }
        _ => {
            let pivot = plain_bounding_box(targets.iter().map(|&i| &elements[i])).center();
            for i in targets {
                let el = &mut elements[i];
                let c = rotate_point(el.center(), pivot, delta);
                el.x = c.x - el.width / 2.0;
                el.y = c.y - el.height / 2.0;
                el.rotation = normalize_degrees(el.rotation + delta);
            }
            true
        }
    }
}

/// Set an absolute rotation for the elements named by `ids`.
///
/// Several elements rotate rigidly by the difference between `target` and
/// the first selected element's current rotation; a negligible difference is
/// a no-op. Returns whether anything changed.
pub fn set_rotation(elements: &mut [CanvasElement], ids: &[ElementId], target: f64) -> bool {
    let targets = indices_of(elements, ids);
    match targets.as_slice() {
        [] => false,
        [only] => {
            elements[*only].rotation = normalize_degrees(target);
            true
        }
        [first, ..] => {
            let diff = target - elements[*first].rotation;
            if diff.abs() < ROTATION_EPSILON {
                return false;
            }
            rotate_by(elements, ids, diff)
        }
    }
}

// =============================================================================
// Z-ORDER
// =============================================================================

/// Direction of a stacking-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Reorder the elements and recompact z-indices to `0..n-1`.
///
/// The result is sorted by z-index. Front/back moves the whole selection
/// past every other element, keeping relative order. Forward/backward moves
/// each selected element one step past its nearest unselected neighbour.
#[must_use]
pub fn reorder(elements: Vec<CanvasElement>, ids: &[ElementId], how: Reorder) -> Vec<CanvasElement> {
    let mut sorted = elements;
    sorted.sort_by_key(|el| el.z_index);
    let selected = |el: &CanvasElement| ids.contains(&el.id);

    let ordered = match how {
        Reorder::ToFront | Reorder::ToBack => {
            let (picked, others): (Vec<_>, Vec<_>) = sorted.into_iter().partition(selected);
            if how == Reorder::ToFront {
                others.into_iter().chain(picked).collect()
            } else {
                picked.into_iter().chain(others).collect()
            }
        }
        Reorder::Forward => {
            for i in (0..sorted.len()).rev() {
                if selected(&sorted[i]) {
                    if let Some(j) = (i + 1..sorted.len()).find(|&j| !selected(&sorted[j])) {
                        sorted.swap(i, j);
                    }
                }
            }
            sorted
        }
        Reorder::Backward => {
            for i in 0..sorted.len() {
                if selected(&sorted[i]) {
                    if let Some(j) = (0..i).rev().find(|&j| !selected(&sorted[j])) {
                        sorted.swap(i, j);
                    }
                }
            }
            sorted
        }
    };
    compact_z(ordered)
}

/// Assign z-indices `0..n-1` in list order.
#[must_use]
pub fn compact_z(mut elements: Vec<CanvasElement>) -> Vec<CanvasElement> {
    for (z, el) in elements.iter_mut().enumerate() {
        el.z_index = i64::try_from(z).unwrap_or(i64::MAX);
    }
    elements
}

// =============================================================================
// GROUPING
// =============================================================================

/// Replace the elements named by `ids` with one group.
///
/// Needs at least two matching elements. Children are stored relative to
/// their combined bounding box; the group takes the highest child z-index.
/// Returns the new list (sorted and recompacted) and the group id.
#[must_use]
pub fn group(elements: Vec<CanvasElement>, ids: &[ElementId]) -> Option<(Vec<CanvasElement>, ElementId)> {
    let (members, mut rest): (Vec<_>, Vec<_>) = elements.into_iter().partition(|el| ids.contains(&el.id));
    if members.len() < 2 {
        return None;
    }
    let bounds = plain_bounding_box(&members);
    let z_index = members.iter().map(|el| el.z_index).max().unwrap_or_default();
    let children = members
        .into_iter()
        .map(|mut el| {
            el.x -= bounds.x;
            el.y -= bounds.y;
            el
        })
        .collect();
    let group = CanvasElement {
        id: Uuid::new_v4(),
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
        rotation: 0.0,
        z_index,
        kind: ElementKind::Group(GroupProps { children }),
    };
    let id = group.id;
    rest.push(group);
    rest.sort_by_key(|el| el.z_index);
    Some((compact_z(rest), id))
}

/// Dissolve every group named by `ids` into absolute-positioned children.
///
/// Inverts [`group`], also applying any scale and rotation the group picked
/// up since: children scale by the group's size over their natural bounding
/// box, orbit the group center by the group rotation, and add the group
/// rotation to their own. Returns the new list and the released child ids.
#[must_use]
pub fn ungroup(elements: Vec<CanvasElement>, ids: &[ElementId]) -> (Vec<CanvasElement>, Vec<ElementId>) {
    let mut out = Vec::with_capacity(elements.len());
    let mut released = Vec::new();
    for el in elements {
        if !ids.contains(&el.id) || !matches!(el.kind, ElementKind::Group(_)) {
            out.push(el);
            continue;
        }
        let group_rect = el.rect();
        let (group_rotation, group_z) = (el.rotation, el.z_index);
        if let ElementKind::Group(GroupProps { children }) = el.kind {
            for child in release_children(children, group_rect, group_rotation, group_z) {
                released.push(child.id);
                out.push(child);
            }
        }
    }
    out.sort_by_key(|el| el.z_index);
    (compact_z(out), released)
}

fn release_children(children: Vec<CanvasElement>, group: Rect, rotation: f64, z_index: i64) -> Vec<CanvasElement> {
    let natural = plain_bounding_box(&children);
    let scale_x = group.width / natural.width.max(1.0);
    let scale_y = group.height / natural.height.max(1.0);
    let group_center = Point::new(group.width / 2.0, group.height / 2.0);

    children
        .into_iter()
        .map(|mut child| {
            let w = child.width * scale_x;
            let h = child.height * scale_y;
            let local_center = Point::new(
                (child.x - natural.x) * scale_x + w / 2.0,
                (child.y - natural.y) * scale_y + h / 2.0,
            );
            let c = rotate_point(local_center, group_center, rotation);
            child.x = group.x + c.x - w / 2.0;
            child.y = group.y + c.y - h / 2.0;
            child.width = w;
            child.height = h;
            child.rotation = normalize_degrees(child.rotation + rotation);
            child.z_index = z_index;
            if let Some(arrow) = child.arrow_mut() {
                arrow.arrow_start = Point::new(arrow.arrow_start.x * scale_x, arrow.arrow_start.y * scale_y);
                arrow.arrow_end = Point::new(arrow.arrow_end.x * scale_x, arrow.arrow_end.y * scale_y);
            }
            child
        })
        .collect()
}

// =============================================================================
// RESIZE
// =============================================================================

/// New box for `start` after dragging `handle` by `(dx, dy)`.
///
/// Each side is at least [`MIN_RESIZE`]; the opposite edge or corner stays
/// fixed. Corner handles keep the aspect ratio when `keep_aspect` is set.
#[must_use]
pub fn resize_box(start: Rect, handle: ResizeHandle, dx: f64, dy: f64, keep_aspect: bool) -> Rect {
    let grow_w = |d: f64| (start.width + d).max(MIN_RESIZE);
    let grow_h = |d: f64| (start.height + d).max(MIN_RESIZE);
    let aspect = if start.height > 0.0 { start.width / start.height } else { 1.0 };
    let aspect_h = |w: f64| (w / aspect).max(MIN_RESIZE);

    let (width, height) = match handle {
        ResizeHandle::N => (start.width, grow_h(-dy)),
        ResizeHandle::S => (start.width, grow_h(dy)),
        ResizeHandle::W => (grow_w(-dx), start.height),
        ResizeHandle::E => (grow_w(dx), start.height),
        ResizeHandle::Se | ResizeHandle::Ne | ResizeHandle::Sw | ResizeHandle::Nw => {
            let w = match handle {
                ResizeHandle::Se | ResizeHandle::Ne => grow_w(dx),
                _ => grow_w(-dx),
            };
            let h = if keep_aspect {
                aspect_h(w)
            } else {
                match handle {
                    ResizeHandle::Se | ResizeHandle::Sw => grow_h(dy),
                    _ => grow_h(-dy),
                }
            };
            (w, h)
        }
    };

    let anchored_left = matches!(handle, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw);
    let anchored_top = matches!(handle, ResizeHandle::N | ResizeHandle::Nw | ResizeHandle::Ne);
    Rect {
        x: if anchored_left { start.right() - width } else { start.x },
        y: if anchored_top { start.bottom() - height } else { start.y },
        width,
        height,
    }
}

fn indices_of(elements: &[CanvasElement], ids: &[ElementId]) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, el)| ids.contains(&el.id))
        .map(|(i, _)| i)
        .collect()
}
