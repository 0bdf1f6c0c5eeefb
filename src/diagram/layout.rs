//! Layered graph layout and the outline tree layout.
//!
//! Positions are box centers in an abstract space centered near the origin;
//! the compiler translates them to the import origin.
//!
//! The layered path is a small Sugiyama pipeline:
//! 1. BFS leveling from in-degree-zero roots (first node if every node has
//!    a parent). Unreached nodes form one trailing layer.
//! 2. Barycenter crossing reduction: fixed sweeps, alternating down and up.
//! 3. Coordinates: vertical layouts pack layers by node width; horizontal
//!    layouts use a fixed cross-axis spacing.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::LayoutError;
use super::graph::{Direction, Graph, Node, NodeShape};

/// Gap between neighbors within a layer.
pub const NODE_SPACING: f64 = 160.0;
/// Distance between consecutive layers.
pub const LAYER_SPACING: f64 = 220.0;
/// Full sweeps (down then up) of barycenter reordering.
pub const CROSSING_SWEEPS: usize = 3;

/// Width the trunk of an outline tree is spread across.
const TREE_WIDTH: f64 = 600.0;
/// Center of the off-trunk column, right of the trunk.
const OFF_TRUNK_X: f64 = 400.0;
/// Horizontal step between off-trunk nodes at the same level.
const OFF_TRUNK_STEP: f64 = 120.0;

/// Which algorithm produced a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    Layered,
    Tree,
}

/// A positioned node. `x` / `y` are the box center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub strategy: LayoutStrategy,
    /// One entry per graph node.
    pub positions: BTreeMap<String, LayoutNode>,
    /// Node ids per layer, in final order. Off-trunk tree nodes are not in any layer.
    pub layers: Vec<Vec<String>>,
}

/// Tree layout when every node carries an outline level, layered otherwise.
///
/// # Errors
///
/// See [`layout`].
pub fn layout_auto(graph: &Graph) -> Result<LayoutResult, LayoutError> {
    if graph.is_outline_tree() { tree_layout(graph) } else { layout(graph) }
}

/// Layered layout: leveling, crossing reduction, coordinate assignment.
///
/// Deterministic: the same graph always yields the same result.
///
/// # Errors
///
/// Returns [`LayoutError::EmptyGraph`] for a graph without nodes and
/// [`LayoutError::DanglingEdge`] when an edge names an unknown node.
pub fn layout(graph: &Graph) -> Result<LayoutResult, LayoutError> {
    validate(graph)?;
    let mut layers = assign_layers(graph);
    reduce_crossings(&mut layers, graph, CROSSING_SWEEPS);

    let nodes: HashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let size_of = |id: &str| nodes.get(id).map_or((160.0, 80.0), |n| n.shape.default_size());

    let positions = layer_centers(&layers, graph.direction, |id| size_of(id).0)
        .into_iter()
        .map(|(id, x, y)| {
            let (width, height) = size_of(id.as_str());
            (id.clone(), LayoutNode { id, x, y, width, height })
        })
        .collect();

    Ok(LayoutResult { strategy: LayoutStrategy::Layered, positions, layers })
}

/// Outline tree layout.
///
/// Trunk nodes are grouped by level, one layer per level in ascending order,
/// and spread evenly across a fixed width (a lone node sits at `x = 0`).
/// Decision nodes hang off the trunk in a column to its right, stepped by
/// index within their level. Edges do not influence placement.
///
/// # Errors
///
/// Same conditions as [`layout`].
#[allow(clippy::cast_precision_loss)]
pub fn tree_layout(graph: &Graph) -> Result<LayoutResult, LayoutError> {
    validate(graph)?;
    let mut trunk: BTreeMap<usize, Vec<&Node>> = BTreeMap::new();
    let mut off_trunk: BTreeMap<usize, Vec<&Node>> = BTreeMap::new();
    for node in &graph.nodes {
        let group = if node.is_off_trunk() { &mut off_trunk } else { &mut trunk };
        group.entry(node.level.unwrap_or(0)).or_default().push(node);
    }

    let mut positions = BTreeMap::new();
    let mut layers = Vec::with_capacity(trunk.len());

    for (layer_index, nodes) in trunk.values().enumerate() {
        let y = layer_index as f64 * LAYER_SPACING;
        let item_width = TREE_WIDTH / nodes.len() as f64;
        for (i, node) in nodes.iter().enumerate() {
            let x = if nodes.len() == 1 { 0.0 } else { (i as f64 + 0.5) * item_width - TREE_WIDTH / 2.0 };
            let (width, height) = node.shape.default_size();
            positions.insert(node.id.clone(), LayoutNode { id: node.id.clone(), x, y, width, height });
        }
        layers.push(nodes.iter().map(|n| n.id.clone()).collect());
    }

    for (level, nodes) in &off_trunk {
        let y = *level as f64 * LAYER_SPACING;
        let count = nodes.len() as f64;
        for (i, node) in nodes.iter().enumerate() {
            let x = OFF_TRUNK_X + (i as f64 - count / 2.0 + 0.5) * OFF_TRUNK_STEP;
            let side = if node.shape == NodeShape::Circle { 100.0 } else { 120.0 };
            positions.insert(node.id.clone(), LayoutNode { id: node.id.clone(), x, y, width: side, height: side });
        }
    }

    Ok(LayoutResult { strategy: LayoutStrategy::Tree, positions, layers })
}

fn validate(graph: &Graph) -> Result<(), LayoutError> {
    if graph.nodes.is_empty() {
        return Err(LayoutError::EmptyGraph);
    }
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    match graph.edges.iter().find(|e| !ids.contains(e.from.as_str()) || !ids.contains(e.to.as_str())) {
        Some(e) => Err(LayoutError::DanglingEdge { from: e.from.clone(), to: e.to.clone() }),
        None => Ok(()),
    }
}

/// BFS leveling. A multi-parent node takes the layer it is first reached in.
fn assign_layers(graph: &Graph) -> Vec<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = graph.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        *in_degree.entry(edge.to.as_str()).or_default() += 1;
        successors.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
    }

    let mut current: Vec<&str> = graph
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| in_degree.get(id).copied() == Some(0))
        .collect();
    if current.is_empty() {
        // Every node has a parent (a cycle); seed from the first node.
        current.extend(graph.nodes.first().map(|n| n.id.as_str()));
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut layers: Vec<Vec<String>> = Vec::new();
    while !current.is_empty() {
        visited.extend(current.iter().copied());
        let mut next: Vec<&str> = Vec::new();
        for id in &current {
            for &target in successors.get(id).into_iter().flatten() {
                if !visited.contains(target) && !next.contains(&target) {
                    next.push(target);
                }
            }
        }
        layers.push(current.iter().map(|id| (*id).to_owned()).collect());
        current = next;
    }

    let unreached: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| !visited.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();
    if !unreached.is_empty() {
        layers.push(unreached);
    }
    layers
}

/// Barycenter reordering. Only intra-layer order changes.
fn reduce_crossings(layers: &mut [Vec<String>], graph: &Graph, sweeps: usize) {
    let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        predecessors.entry(edge.to.as_str()).or_default().push(edge.from.as_str());
        successors.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
    }

    for _ in 0..sweeps {
        for i in 1..layers.len() {
            reorder_layer(layers, i, i - 1, &predecessors);
        }
        for i in (0..layers.len().saturating_sub(1)).rev() {
            reorder_layer(layers, i, i + 1, &successors);
        }
    }
}

/// Sort one layer by the mean index of its neighbors in the adjacent layer.
///
/// Nodes without a neighbor there sort last; ties break by id.
#[allow(clippy::cast_precision_loss)]
fn reorder_layer(layers: &mut [Vec<String>], index: usize, neighbor: usize, adjacency: &HashMap<&str, Vec<&str>>) {
    if layers[index].len() <= 1 {
        return;
    }
    let neighbor_index: HashMap<&str, usize> =
        layers[neighbor].iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    let mut scored: Vec<(f64, String)> = layers[index]
        .iter()
        .map(|id| {
            let indices: Vec<usize> = adjacency
                .get(id.as_str())
                .into_iter()
                .flatten()
                .filter_map(|n| neighbor_index.get(n).copied())
                .collect();
            let barycenter = if indices.is_empty() {
                f64::INFINITY
            } else {
                indices.iter().sum::<usize>() as f64 / indices.len() as f64
            };
            (barycenter, id.clone())
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    layers[index] = scored.into_iter().map(|(_, id)| id).collect();
}

/// Center coordinates for every node in `layers`.
///
/// Vertical directions pack each layer left to right using `width_of` plus
/// [`NODE_SPACING`], centered on `x = 0`. Horizontal directions advance
/// layers along x and space nodes by a fixed [`NODE_SPACING`] along y.
/// `BT` / `RL` emit the last layer first.
#[allow(clippy::cast_precision_loss)]
pub fn layer_centers(
    layers: &[Vec<String>],
    direction: Direction,
    width_of: impl Fn(&str) -> f64,
) -> Vec<(String, f64, f64)> {
    let mut centers = Vec::new();
    for (layer_index, layer) in layers.iter().enumerate() {
        let rank = if direction.is_reversed() { layers.len() - 1 - layer_index } else { layer_index };
        let along = rank as f64 * LAYER_SPACING;

        if direction.is_vertical() {
            let widths: Vec<f64> = layer.iter().map(|id| width_of(id)).collect();
            let total = widths.iter().sum::<f64>() + layer.len().saturating_sub(1) as f64 * NODE_SPACING;
            let mut offset = -total / 2.0;
            for (id, width) in layer.iter().zip(widths) {
                centers.push((id.clone(), offset + width / 2.0, along));
                offset += width + NODE_SPACING;
            }
        } else {
            let middle = layer.len().saturating_sub(1) as f64 / 2.0;
            for (i, id) in layer.iter().enumerate() {
                centers.push((id.clone(), along, (i as f64 - middle) * NODE_SPACING));
            }
        }
    }
    centers
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
