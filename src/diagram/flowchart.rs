//! Flowchart grammar: `graph TD` header, bracketed node shapes, arrow edges.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::graph::{Direction, Edge, EdgeKind, Graph, GraphBuilder, Node, NodeShape};
use super::{Grammar, ParseError, ensure_not_blank};

/// Identifier: word characters, with single inner hyphens (`step-2`).
const ID: &str = r"[A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)*";

static HEADER: Lazy<Regex> = Lazy::new(|| compile_pattern(r"(?i)^(?:graph|flowchart)\s+([A-Za-z]{2})(.*)$"));

/// Node declarations, most specific delimiters first so `[[x]]` never reads as `[x]`.
static NODE_PATTERNS: Lazy<Vec<(Regex, NodeShape)>> = Lazy::new(|| {
    [
        (r"\[\[(.*?)\]\]", NodeShape::Rectangle),
        (r"\(\((.*?)\)\)", NodeShape::Circle),
        (r"\{\{(.*?)\}\}", NodeShape::Diamond),
        (r"\[\\(.*?)/\]", NodeShape::Parallelogram),
        (r"\[/(.*?)\\\]", NodeShape::Parallelogram),
        (r"\[(.*?)\]", NodeShape::Rectangle),
        (r"\{(.*?)\}", NodeShape::Diamond),
        (r"\((.*?)\)", NodeShape::Rounded),
    ]
    .into_iter()
    .map(|(body, shape)| (compile_pattern(&format!("({ID}){body}")), shape))
    .collect()
});

static EDGE: Lazy<Regex> =
    Lazy::new(|| compile_pattern(&format!(r"({ID})\s*(-->|==>|-\.->|->)\s*(?:\|([^|]+)\|\s*)?({ID})")));

fn compile_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid built-in flowchart pattern")
}

/// Parse flowchart text into a graph.
///
/// The header line is optional (default direction `TB`) and may carry
/// statements after `;`. Lines starting with `%%` are comments. Edges may be
/// chained (`A --> B --> C`). Endpoints never declared with a shape become
/// rectangles labeled with their own id.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and [`ParseError::NoNodes`]
/// when nothing declares a node or edge.
pub fn parse(input: &str) -> Result<Graph, ParseError> {
    ensure_not_blank(input)?;
    let mut builder = GraphBuilder::new(Direction::default());

    for line in input.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        parse_line(line, &mut builder);
    }

    let graph = builder.finish();
    if graph.nodes.is_empty() {
        return Err(ParseError::NoNodes { grammar: Grammar::Flowchart });
    }
    Ok(graph)
}

fn parse_line(line: &str, builder: &mut GraphBuilder) {
    let mut content = line.to_owned();
    if let Some(caps) = HEADER.captures(line) {
        if let Some(direction) = Direction::from_code(&caps[1]) {
            builder.set_direction(direction);
        }
        content = caps[2].trim().trim_start_matches([';', ',']).trim().to_owned();
    }
    if content.is_empty() {
        return;
    }

    // Register shaped nodes and reduce each to its bare id.
    for (pattern, shape) in NODE_PATTERNS.iter() {
        content = pattern
            .replace_all(&content, |caps: &Captures| {
                let id = &caps[1];
                builder.upsert(Node::new(id, node_label(id, &caps[2]), *shape));
                id.to_owned()
            })
            .into_owned();
    }

    parse_edges(&content, builder);
}

/// Scan for edges, restarting at each target so chains yield every hop.
fn parse_edges(content: &str, builder: &mut GraphBuilder) {
    let mut at = 0;
    while let Some(caps) = EDGE.captures_at(content, at) {
        let kind = match &caps[2] {
            "==>" => EdgeKind::Thick,
            "-.->" => EdgeKind::Dotted,
            _ => EdgeKind::Arrow,
        };
        let label = caps.get(3).map(|m| m.as_str().trim().to_owned());
        builder.push_edge(Edge::new(&caps[1], &caps[4], kind).with_label(label));
        let Some(to) = caps.get(4) else { break };
        at = to.start();
    }
}

/// Trimmed label with surrounding quotes removed; empty labels fall back to the id.
fn node_label(id: &str, raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() { id.to_owned() } else { unquoted.to_owned() }
}

#[cfg(test)]
#[path = "flowchart_test.rs"]
mod flowchart_test;
