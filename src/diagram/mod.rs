//! Text diagram import: grammars, graph model, layout, and element compiler.
//!
//! Three independent grammars (a flowchart mini-language, indented outline
//! lists, and a UML-like notation) all produce the same [`Graph`]. Layout
//! turns a graph into positioned boxes and [`compile`] turns those into
//! canvas elements with bound connectors.

pub mod compile;
pub mod flowchart;
pub mod graph;
pub mod layout;
pub mod outline;
pub mod palette;
pub mod uml;

pub use compile::{CompileOptions, compile};
pub use graph::{Direction, Edge, EdgeKind, Graph, Node, NodeShape};
pub use layout::{LayoutNode, LayoutResult, layout, layout_auto, tree_layout};
pub use palette::StylePreset;

use serde::Serialize;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Supported diagram text formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// `graph TD` / `flowchart LR` style node and edge statements.
    Flowchart,
    /// Indented bullet or numbered lists.
    Outline,
    /// Class, sequence, and activity notation.
    Uml,
}

impl Grammar {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Outline => "outline",
            Self::Uml => "uml",
        }
    }

    /// Parse `text` with this grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for blank input or input that declares no nodes.
    pub fn parse(self, text: &str) -> Result<Graph, ParseError> {
        match self {
            Self::Flowchart => flowchart::parse(text),
            Self::Outline => outline::parse(text),
            Self::Uml => uml::parse(text),
        }
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Diagram text could not be turned into a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("diagram text is empty")]
    Empty,
    #[error("no {grammar} nodes found")]
    NoNodes { grammar: Grammar },
}

impl ParseError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_DIAGRAM_EMPTY",
            Self::NoNodes { .. } => "E_DIAGRAM_NO_NODES",
        }
    }
}

/// A graph could not be laid out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("edge {from} -> {to} references an unknown node")]
    DanglingEdge { from: String, to: String },
}

impl LayoutError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyGraph => "E_LAYOUT_EMPTY",
            Self::DanglingEdge { .. } => "E_LAYOUT_DANGLING_EDGE",
        }
    }
}

/// Reject blank input before any grammar runs.
pub(crate) fn ensure_not_blank(text: &str) -> Result<(), ParseError> {
    if text.trim().is_empty() { Err(ParseError::Empty) } else { Ok(()) }
}
