//! Alignment guides shown while dragging a single element.
//!
//! An edge or center of the moving element that lands near the matching edge
//! or center of another element produces a guide line spanning both, and
//! can snap the moving element into exact alignment. Distances are in
//! document units; the threshold shrinks as the viewport zooms in.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use serde::Serialize;

use crate::camera::Point;
use crate::consts::GUIDE_SNAP_PX;
use crate::doc::CanvasElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    Vertical,
    Horizontal,
}

/// A guide line. `position` is the x (vertical) or y (horizontal) it sits
/// on; `start`/`end` span the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideLine {
    pub orientation: GuideOrientation,
    pub position: f64,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Left,
    Right,
    CenterX,
    Top,
    Bottom,
    CenterY,
}

const VERTICAL: [Alignment; 3] = [Alignment::Left, Alignment::Right, Alignment::CenterX];
const HORIZONTAL: [Alignment; 3] = [Alignment::Top, Alignment::Bottom, Alignment::CenterY];

fn coordinate(el: &CanvasElement, a: Alignment) -> f64 {
    match a {
        Alignment::Left => el.x,
        Alignment::Right => el.x + el.width,
        Alignment::CenterX => el.x + el.width / 2.0,
        Alignment::Top => el.y,
        Alignment::Bottom => el.y + el.height,
        Alignment::CenterY => el.y + el.height / 2.0,
    }
}

fn snap_distance(scale: f64) -> f64 {
    if scale > 0.0 { GUIDE_SNAP_PX / scale } else { GUIDE_SNAP_PX }
}

/// Guide lines for `moving` against `others`, deduplicated by orientation and
/// position.
///
/// Exact alignment (distance 0) draws nothing; the element is already there.
#[must_use]
pub fn detect_guide_lines(moving: &CanvasElement, others: &[CanvasElement], scale: f64) -> Vec<GuideLine> {
    let snap = snap_distance(scale);
    let mut lines: Vec<GuideLine> = Vec::new();
    let mut push = |line: GuideLine| {
        if !lines.iter().any(|l| l.orientation == line.orientation && l.position == line.position) {
            lines.push(line);
        }
    };

    for other in others {
        for a in VERTICAL {
            let target = coordinate(other, a);
            let d = (coordinate(moving, a) - target).abs();
            if d > 0.0 && d < snap {
                push(GuideLine {
                    orientation: GuideOrientation::Vertical,
                    position: target,
                    start: moving.y.min(other.y),
                    end: (moving.y + moving.height).max(other.y + other.height),
                });
            }
        }
        for a in HORIZONTAL {
            let target = coordinate(other, a);
            let d = (coordinate(moving, a) - target).abs();
            if d > 0.0 && d < snap {
                push(GuideLine {
                    orientation: GuideOrientation::Horizontal,
                    position: target,
                    start: moving.x.min(other.x),
                    end: (moving.x + moving.width).max(other.x + other.width),
                });
            }
        }
    }
    lines
}

/// Top-left for `moving` after snapping to nearby alignments.
///
/// Each axis snaps independently. When several candidates qualify, the last
/// one in `others` order wins.
#[must_use]
pub fn snapped_position(moving: &CanvasElement, others: &[CanvasElement], scale: f64) -> Point {
    let snap = snap_distance(scale);
    let mut out = Point::new(moving.x, moving.y);
    for other in others {
        for a in VERTICAL {
            if (coordinate(moving, a) - coordinate(other, a)).abs() < snap {
                out.x = coordinate(other, a) - (coordinate(moving, a) - moving.x);
            }
        }
        for a in HORIZONTAL {
            if (coordinate(moving, a) - coordinate(other, a)).abs() < snap {
                out.y = coordinate(other, a) - (coordinate(moving, a) - moving.y);
            }
        }
    }
    out
}
