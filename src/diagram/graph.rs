//! Graph model shared by every diagram grammar.
//!
//! Parsers build a `Graph` through `GraphBuilder`, which keeps node ids
//! unique and auto-registers edge endpoints, so a finished graph never has a
//! dangling edge.

use std::collections::HashMap;

use serde::Serialize;

/// Flow direction of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "TD")]
    TopDown,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
    #[serde(rename = "BT")]
    BottomToTop,
}

impl Direction {
    /// Parse a two-letter direction code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "TB" => Some(Self::TopToBottom),
            "TD" => Some(Self::TopDown),
            "LR" => Some(Self::LeftToRight),
            "RL" => Some(Self::RightToLeft),
            "BT" => Some(Self::BottomToTop),
            _ => None,
        }
    }

    /// Layers advance along the y axis.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::TopDown | Self::BottomToTop)
    }

    /// Layers are emitted last-first.
    #[must_use]
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }
}

/// Node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Rectangle,
    Rounded,
    Circle,
    Diamond,
    Parallelogram,
}

impl NodeShape {
    /// Placeholder size used by layout before text metrics are known.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Diamond => (120.0, 120.0),
            Self::Circle => (100.0, 100.0),
            Self::Parallelogram => (160.0, 70.0),
            Self::Rectangle | Self::Rounded => (160.0, 80.0),
        }
    }
}

/// Connector style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Arrow,
    Dotted,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Outline depth; only the outline grammar sets it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_decision: bool,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
            level: None,
            background_color: None,
            border_color: None,
            is_decision: false,
        }
    }

    /// Hangs off the trunk in the outline tree layout.
    #[must_use]
    pub fn is_off_trunk(&self) -> bool {
        self.is_decision || self.shape == NodeShape::Diamond
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self { from: from.into(), to: to.into(), label: None, kind }
    }

    #[must_use]
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label.filter(|l| !l.is_empty());
        self
    }
}

/// A parsed diagram: nodes in declaration order plus edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// True when every node carries an outline level.
    #[must_use]
    pub fn is_outline_tree(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|n| n.level.is_some())
    }
}

/// Incremental graph construction with id-keyed node upserts.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self { graph: Graph { direction, ..Graph::default() }, index: HashMap::new() }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.graph.direction = direction;
    }

    /// Insert a node, or overwrite the label and shape of an existing one.
    ///
    /// A re-declared node keeps its original position in the node list.
    pub fn upsert(&mut self, node: Node) {
        match self.index.get(&node.id) {
            Some(&i) => {
                let existing = &mut self.graph.nodes[i];
                existing.label = node.label;
                existing.shape = node.shape;
            }
            None => {
                self.index.insert(node.id.clone(), self.graph.nodes.len());
                self.graph.nodes.push(node);
            }
        }
    }

    /// Register `id` as a plain rectangle labeled with its own id, unless known.
    pub fn ensure(&mut self, id: &str) {
        if !self.contains(id) {
            self.upsert(Node::new(id, id, NodeShape::Rectangle));
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    /// Id of the most recently inserted node.
    #[must_use]
    pub fn last_id(&self) -> Option<&str> {
        self.graph.nodes.last().map(|n| n.id.as_str())
    }

    /// Add an edge, registering either endpoint that is not yet declared.
    pub fn connect(&mut self, edge: Edge) {
        self.ensure(&edge.from);
        self.ensure(&edge.to);
        self.graph.edges.push(edge);
    }

    /// Add an edge whose endpoints are resolved later by `finish`.
    pub fn push_edge(&mut self, edge: Edge) {
        self.graph.edges.push(edge);
    }

    /// Auto-register dangling endpoints and return the graph.
    #[must_use]
    pub fn finish(mut self) -> Graph {
        let endpoints: Vec<String> = self
            .graph
            .edges
            .iter()
            .flat_map(|e| [e.from.clone(), e.to.clone()])
            .collect();
        for id in endpoints {
            self.ensure(&id);
        }
        self.graph
    }
}
