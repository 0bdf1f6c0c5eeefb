//! Outline grammar: indented bullet lists become a tree.
//!
//! Two spaces of indentation are one level (a tab counts as two spaces).
//! Each item is linked from the nearest shallower item above it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::graph::{Direction, Edge, EdgeKind, Graph, GraphBuilder, Node, NodeShape};
use super::palette::level_swatch;
use super::{Grammar, ParseError, ensure_not_blank};

static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.+)$").expect("valid outline item pattern"));

/// Labels containing any of these hang off the trunk as decisions.
const DECISION_KEYWORDS: [&str; 6] = ["否", "是", "？", "决策", "判断", "条件"];

const INDENT_WIDTH: usize = 2;

/// Parse an indented list into a top-to-bottom tree graph.
///
/// Node ids are `node0`, `node1`, ... in document order. Lines that are not
/// list items are skipped.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and [`ParseError::NoNodes`]
/// when no line is a list item.
pub fn parse(input: &str) -> Result<Graph, ParseError> {
    ensure_not_blank(input)?;
    let mut builder = GraphBuilder::new(Direction::TopToBottom);
    let mut ancestors: Vec<(usize, String)> = Vec::new();

    for line in input.lines() {
        let Some(caps) = ITEM.captures(line) else {
            continue;
        };
        let level = indent_width(&caps[1]) / INDENT_WIDTH;
        let label = caps[3].trim();
        let id = format!("node{}", builder.node_count());

        while ancestors.last().is_some_and(|(l, _)| *l >= level) {
            ancestors.pop();
        }
        builder.upsert(outline_node(&id, label, level));
        if let Some((_, parent)) = ancestors.last() {
            builder.push_edge(Edge::new(parent.clone(), id.clone(), EdgeKind::Arrow));
        }
        ancestors.push((level, id));
    }

    let graph = builder.finish();
    if graph.nodes.is_empty() {
        return Err(ParseError::NoNodes { grammar: Grammar::Outline });
    }
    Ok(graph)
}

fn indent_width(indent: &str) -> usize {
    indent.chars().map(|c| if c == '\t' { INDENT_WIDTH } else { 1 }).sum()
}

/// Whether a label reads as a decision point.
#[must_use]
pub fn is_decision(label: &str) -> bool {
    DECISION_KEYWORDS.iter().any(|kw| label.contains(kw))
}

/// Shape by depth: rounded root, rectangle children, circles below.
#[must_use]
pub fn shape_for_level(level: usize) -> NodeShape {
    match level {
        0 => NodeShape::Rounded,
        1 => NodeShape::Rectangle,
        _ => NodeShape::Circle,
    }
}

fn outline_node(id: &str, label: &str, level: usize) -> Node {
    let decision = is_decision(label);
    let swatch = level_swatch(level);
    Node {
        level: Some(level),
        background_color: Some(swatch.background.to_owned()),
        border_color: Some(swatch.border.to_owned()),
        is_decision: decision,
        ..Node::new(id, label, if decision { NodeShape::Diamond } else { shape_for_level(level) })
    }
}

#[cfg(test)]
#[path = "outline_test.rs"]
mod outline_test;
