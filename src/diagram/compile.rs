//! Graph-to-element compiler.
//!
//! Turns a laid-out graph into canvas elements: one shape per node, sized to
//! its wrapped label, and one arrow per edge bound to both endpoint shapes.
//! Outline trees also get two vertical rails and a stub from each trunk node
//! to its nearer rail.

use std::collections::HashMap;

use canvas::camera::{Point, Rect};
use canvas::doc::{AnchorTag, ArrowBinding, ArrowProps, CanvasElement, ElementKind, ShapeProps, TextStyle};
use serde::Deserialize;

use super::graph::{EdgeKind, Graph, Node, NodeShape};
use super::layout::{LayoutNode, LayoutResult, LayoutStrategy, layer_centers};
use super::palette::{StylePreset, readable_text_color};

/// Characters per wrapped label line.
pub const WRAP_WIDTH: usize = 20;

const MAX_TEXT_WIDTH: f64 = 400.0;
const CHAR_WIDTH: f64 = 12.0;
const TEXT_PADDING_X: f64 = 60.0;
const LINE_HEIGHT: f64 = 20.0;
const TEXT_PADDING_Y: f64 = 30.0;
const CORNER_RADIUS: f64 = 10.0;
const FONT_FAMILY: &str = "Arial, sans-serif";

const ARROW_HEAD: f64 = 12.0;
const LABEL_COLOR: &str = "#1e293b";
const LABEL_FONT_SIZE: f64 = 12.0;
/// Curve scale when bending is enabled.
const BASE_CURVE: f64 = 2.0;
/// Offset step between parallel edges.
const PARALLEL_STEP: f64 = 1.5;
/// Offset of a lone edge.
const LONE_EDGE_OFFSET: f64 = 0.2;

const RAIL_GAP: f64 = 80.0;
const RAIL_OVERHANG: f64 = 50.0;
const RAIL_COLOR: &str = "#94A3B8";
const STUB_COLOR: &str = "#CBD5E1";
/// Space between off-trunk nodes at the same level.
const OFF_TRUNK_GAP: f64 = 40.0;

/// Compiler knobs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Curve edges apart; when false every arrow is straight.
    pub enable_bend: bool,
    pub style: StylePreset,
    /// Multiplier on the computed curve.
    pub curve_strength: f64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { enable_bend: true, style: StylePreset::Colorful, curve_strength: 0.7 }
    }
}

/// Compile a laid-out graph into elements placed relative to `origin`.
///
/// Elements come back as nodes, tree stubs, edge arrows, then tree rails,
/// with `z_index` `0..n-1` in that order. Every edge arrow carries a binding
/// at both ends to the shapes of its endpoint nodes.
#[must_use]
pub fn compile(graph: &Graph, layout: &LayoutResult, origin: Point, options: &CompileOptions) -> Vec<CanvasElement> {
    let tree = layout.strategy == LayoutStrategy::Tree;
    let mut shapes: Vec<CanvasElement> = Vec::with_capacity(graph.nodes.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        let fallback;
        let pos = match layout.positions.get(&node.id) {
            Some(p) => p,
            None => {
                tracing::warn!(node = %node.id, "node has no layout position");
                let (width, height) = node.shape.default_size();
                fallback = LayoutNode { id: node.id.clone(), x: 0.0, y: 0.0, width, height };
                &fallback
            }
        };
        index.insert(node.id.as_str(), shapes.len());
        shapes.push(node_element(node, pos, origin, options.style));
    }

    // Re-center layers with the text-derived widths.
    let width_of = |id: &str| index.get(id).map_or(0.0, |&i| shapes[i].width);
    for (id, cx, cy) in layer_centers(&layout.layers, graph.direction, width_of) {
        if let Some(&i) = index.get(id.as_str()) {
            let el = &mut shapes[i];
            el.x = origin.x + cx - el.width / 2.0;
            el.y = origin.y + cy - el.height / 2.0;
        }
    }

    let trunk: Vec<usize> = layout.layers.iter().flatten().filter_map(|id| index.get(id.as_str()).copied()).collect();
    if tree {
        place_off_trunk(graph, &index, &trunk, &mut shapes);
    }

    let arrows = edge_arrows(graph, &index, &shapes, options);
    let (stubs, rails) = if tree && layout.layers.len() > 1 {
        tree_scaffolding(&trunk, &shapes)
    } else {
        (Vec::new(), Vec::new())
    };

    let mut elements = shapes;
    elements.extend(stubs);
    elements.extend(arrows);
    elements.extend(rails);
    for (z, el) in elements.iter_mut().enumerate() {
        el.z_index = i64::try_from(z).unwrap_or(i64::MAX);
    }
    elements
}

#[allow(clippy::cast_precision_loss)]
fn node_element(node: &Node, pos: &LayoutNode, origin: Point, style: StylePreset) -> CanvasElement {
    let label = wrap_label(&node.label, WRAP_WIDTH);
    let (text_width, text_height) = text_size(&label);
    let width = pos.width.max(text_width);
    let height = pos.height.max(text_height);

    let swatch = style.swatch_for(&node.id);
    let background = node.background_color.clone().unwrap_or_else(|| swatch.background.to_owned());
    let border = node.border_color.clone().unwrap_or_else(|| swatch.border.to_owned());
    let level = node.level.unwrap_or(0) as f64;

    let text_style = TextStyle {
        font_family: FONT_FAMILY.to_owned(),
        font_size: (16.0 - level).max(12.0),
        color: readable_text_color(&background).to_owned(),
        bold: node.level.unwrap_or(0) == 0,
        ..TextStyle::default()
    };
    let props = ShapeProps {
        background_color: background,
        border_color: border,
        border_width: (4.0 - level * 0.5).max(2.0),
        corner_radius: None,
        content: Some(label),
        text_style: Some(text_style),
    };
    let kind = match node.shape {
        NodeShape::Rectangle | NodeShape::Rounded => {
            ElementKind::RoundedRectangle(ShapeProps { corner_radius: Some(CORNER_RADIUS), ..props })
        }
        NodeShape::Circle => ElementKind::Circle(props),
        NodeShape::Diamond | NodeShape::Parallelogram => ElementKind::Rectangle(props),
    };
    CanvasElement::new(kind, origin.x + pos.x - width / 2.0, origin.y + pos.y - height / 2.0, width, height)
}

/// Wrap `text` to at most `max` characters per line.
///
/// A full line breaks after its last space or comma-like character when it
/// has one (a breaking space is dropped), otherwise hard. Existing line
/// breaks are kept.
#[must_use]
pub fn wrap_label(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_owned();
    }
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line: Vec<char> = Vec::new();
        for ch in paragraph.chars() {
            if line.len() >= max {
                if ch == ' ' {
                    lines.push(line.drain(..).collect());
                    continue;
                }
                match line.iter().rposition(|c| is_break(*c)) {
                    Some(at) => {
                        let rest = line.split_off(at + 1);
                        if line.last() == Some(&' ') {
                            line.pop();
                        }
                        if !line.is_empty() {
                            lines.push(line.iter().collect());
                        }
                        line = rest;
                    }
                    None => lines.push(line.drain(..).collect()),
                }
            }
            line.push(ch);
        }
        lines.push(line.into_iter().collect());
    }
    lines.join("\n")
}

fn is_break(c: char) -> bool {
    matches!(c, ' ' | ',' | '、' | '，')
}

/// Box needed for a wrapped label.
#[allow(clippy::cast_precision_loss)]
fn text_size(label: &str) -> (f64, f64) {
    let lines: Vec<&str> = label.split('\n').collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest as f64 * CHAR_WIDTH + TEXT_PADDING_X).min(MAX_TEXT_WIDTH);
    let height = lines.len() as f64 * LINE_HEIGHT + TEXT_PADDING_Y;
    (width, height)
}

/// Stack decision nodes right of the trunk, clear of the right rail.
///
/// The offset is measured from the trunk's right edge, not from the origin.
fn place_off_trunk(graph: &Graph, index: &HashMap<&str, usize>, trunk: &[usize], shapes: &mut [CanvasElement]) {
    let trunk_right = trunk.iter().map(|&i| shapes[i].x + shapes[i].width).fold(f64::NEG_INFINITY, f64::max);
    let Some(start) = trunk_right.is_finite().then_some(trunk_right + RAIL_GAP * 2.0) else {
        return;
    };
    let mut cursor: HashMap<usize, f64> = HashMap::new();
    for node in graph.nodes.iter().filter(|n| n.is_off_trunk()) {
        let Some(&i) = index.get(node.id.as_str()) else { continue };
        let x = cursor.entry(node.level.unwrap_or(0)).or_insert(start);
        shapes[i].x = *x;
        *x += shapes[i].width + OFF_TRUNK_GAP;
    }
}

#[allow(clippy::cast_precision_loss)]
fn edge_arrows(
    graph: &Graph,
    index: &HashMap<&str, usize>,
    shapes: &[CanvasElement],
    options: &CompileOptions,
) -> Vec<CanvasElement> {
    let mut pair_totals: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in &graph.edges {
        *pair_totals.entry((edge.from.as_str(), edge.to.as_str())).or_default() += 1;
    }
    let mut pair_seen: HashMap<(&str, &str), usize> = HashMap::new();

    let mut arrows = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) else {
            tracing::warn!(from = %edge.from, to = %edge.to, "edge endpoint has no element");
            continue;
        };
        let (from_el, to_el) = (&shapes[from], &shapes[to]);
        let (from_c, to_c) = (from_el.center(), to_el.center());

        let key = (edge.from.as_str(), edge.to.as_str());
        let total = pair_totals.get(&key).copied().unwrap_or(1);
        let seen = pair_seen.entry(key).or_insert(0);
        let position = *seen;
        *seen += 1;
        let offset = if total > 1 {
            (position as f64 - (total - 1) as f64 / 2.0) * PARALLEL_STEP
        } else {
            LONE_EDGE_OFFSET
        };
        let curve = if options.enable_bend { offset * BASE_CURVE * options.curve_strength } else { 0.0 };

        let start = box_exit(&from_el.rect(), to_c);
        let end = box_exit(&to_el.rect(), from_c);
        let min = Point::new(from_c.x.min(to_c.x), from_c.y.min(to_c.y));
        let width = nonzero((from_c.x - to_c.x).abs());
        let height = nonzero((from_c.y - to_c.y).abs());
        let (start_side, end_side) = anchor_sides(from_c, to_c);

        let color = edge_color(edge.kind);
        let stroke = if edge.kind == EdgeKind::Thick { 3.0 } else { 2.0 };
        let label_style = edge.label.as_ref().map(|_| TextStyle {
            font_family: FONT_FAMILY.to_owned(),
            font_size: LABEL_FONT_SIZE,
            color: LABEL_COLOR.to_owned(),
            ..TextStyle::default()
        });
        let props = ArrowProps {
            background_color: color.to_owned(),
            border_color: color.to_owned(),
            border_width: stroke,
            arrow_start: Point::new(start.x - min.x, start.y - min.y),
            arrow_end: Point::new(end.x - min.x, end.y - min.y),
            arrow_head_size: ARROW_HEAD,
            arrow_tail_width: stroke,
            arrow_curve: curve.clamp(-1.0, 1.0),
            start_binding: Some(ArrowBinding { element_id: from_el.id, position: start_side }),
            end_binding: Some(ArrowBinding { element_id: to_el.id, position: end_side }),
            content: edge.label.clone(),
            text_style: label_style,
        };
        arrows.push(CanvasElement::new(ElementKind::Arrow(props), min.x, min.y, width, height));
    }
    arrows
}

fn nonzero(v: f64) -> f64 {
    if v.abs() < f64::EPSILON { 1.0 } else { v }
}

/// Where the ray from the box center toward `target` leaves the box.
#[must_use]
pub fn box_exit(rect: &Rect, target: Point) -> Point {
    let c = rect.center();
    let (tx, ty) = (target.x - c.x, target.y - c.y);
    if tx.abs() < f64::EPSILON && ty.abs() < f64::EPSILON {
        return c;
    }
    let sx = (rect.width / 2.0 / non_zero_component(tx)).abs();
    let sy = (rect.height / 2.0 / non_zero_component(ty)).abs();
    let t = sx.min(sy);
    Point::new(c.x + tx * t, c.y + ty * t)
}

fn non_zero_component(v: f64) -> f64 {
    if v.abs() < f64::EPSILON { f64::EPSILON } else { v }
}

/// Binding sides for an edge: left/right when the run is mostly horizontal,
/// top/bottom otherwise.
#[must_use]
pub fn anchor_sides(from: Point, to: Point) -> (AnchorTag, AnchorTag) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    if dx.abs() > dy.abs() {
        if dx > 0.0 { (AnchorTag::Right, AnchorTag::Left) } else { (AnchorTag::Left, AnchorTag::Right) }
    } else if dy > 0.0 {
        (AnchorTag::Bottom, AnchorTag::Top)
    } else {
        (AnchorTag::Top, AnchorTag::Bottom)
    }
}

fn edge_color(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Arrow => "#334155",
        EdgeKind::Dotted => "#6B7280",
        EdgeKind::Thick => "#0F172A",
    }
}

/// Headless connector used for tree rails and stubs.
fn guide_segment(start: Point, end: Point, color: &str, stroke: f64) -> CanvasElement {
    let min = Point::new(start.x.min(end.x), start.y.min(end.y));
    let props = ArrowProps {
        background_color: color.to_owned(),
        border_color: color.to_owned(),
        border_width: stroke,
        arrow_start: Point::new(start.x - min.x, start.y - min.y),
        arrow_end: Point::new(end.x - min.x, end.y - min.y),
        arrow_head_size: 0.0,
        arrow_tail_width: stroke,
        ..ArrowProps::default()
    };
    let width = nonzero((end.x - start.x).abs());
    let height = nonzero((end.y - start.y).abs());
    CanvasElement::new(ElementKind::Arrow(props), min.x, min.y, width, height)
}

/// Stubs from each trunk node to its nearer rail, and the two rails.
fn tree_scaffolding(trunk: &[usize], shapes: &[CanvasElement]) -> (Vec<CanvasElement>, Vec<CanvasElement>) {
    let Some(bounds) = trunk.iter().map(|&i| shapes[i].rect()).reduce(|a, b| a.union(&b)) else {
        return (Vec::new(), Vec::new());
    };
    let left = bounds.x - RAIL_GAP;
    let right = bounds.right() + RAIL_GAP;
    let (top, bottom) = (bounds.y - RAIL_OVERHANG, bounds.bottom() + RAIL_OVERHANG);
    let mid = bounds.center().x;

    let stubs = trunk
        .iter()
        .map(|&i| {
            let el = &shapes[i];
            let c = el.center();
            if c.x < mid {
                guide_segment(Point::new(left, c.y), Point::new(el.x, c.y), STUB_COLOR, 1.0)
            } else {
                guide_segment(Point::new(el.x + el.width, c.y), Point::new(right, c.y), STUB_COLOR, 1.0)
            }
        })
        .collect();
    let rails = vec![
        guide_segment(Point::new(left, top), Point::new(left, bottom), RAIL_COLOR, 2.0),
        guide_segment(Point::new(right, top), Point::new(right, bottom), RAIL_COLOR, 2.0),
    ];
    (stubs, rails)
}

#[cfg(test)]
#[path = "compile_test.rs"]
mod compile_test;
