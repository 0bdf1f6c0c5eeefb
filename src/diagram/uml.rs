//! UML-like grammar: class, sequence, and activity notation in one pass.
//!
//! The parser is line oriented with a single mode flag for multi-line class
//! bodies. Anchored statements (`participant`, `:action;`, `start`, ...) are
//! matched before the free-form relation and message patterns so that an
//! activity label containing a hyphen is not read as a relation.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::graph::{Direction, Edge, EdgeKind, Graph, GraphBuilder, Node, NodeShape};
use super::{Grammar, ParseError, ensure_not_blank};

/// Class body lines shown in the node label before eliding.
const CLASS_PREVIEW_LINES: usize = 3;

const START_ID: &str = "start";
const END_ID: &str = "end";

static CLASS: Lazy<Regex> = Lazy::new(|| pattern(r"^class\s+(\w+)\s*(\{.*)?$"));
static PARTICIPANT: Lazy<Regex> =
    Lazy::new(|| pattern(r#"^(participant|actor)\s+(.+?)(?:\s+as\s+"([^"]+)")?$"#));
static ACTIVITY: Lazy<Regex> = Lazy::new(|| pattern(r"^:([^;:]+);$"));
static CONDITION: Lazy<Regex> = Lazy::new(|| pattern(r"^if\s*\(([^)]+)\)\s*then$"));
static MESSAGE: Lazy<Regex> = Lazy::new(|| pattern(r"(.+?)\s*(-+>|<-+|-+<>|-+<|<-+>)\s*(.+?)(?:\s*:\s*(.+))?$"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Inheritance,
    Composition,
    Aggregation,
    Association,
    Dependency,
}

impl Relation {
    fn edge_kind(self) -> EdgeKind {
        match self {
            Self::Dependency => EdgeKind::Dotted,
            Self::Inheritance => EdgeKind::Thick,
            Self::Composition | Self::Aggregation | Self::Association => EdgeKind::Arrow,
        }
    }
}

/// Relation patterns in priority order; the first match wins.
///
/// `reversed` patterns point at their left operand (`A <|-- B` is `B -> A`).
static RELATIONS: Lazy<Vec<(Regex, Relation, bool)>> = Lazy::new(|| {
    [
        (r"(\w+)\s*<\|-+\s*(\w+)", Relation::Inheritance, true),
        (r"(\w+)\s*-+\|>\s*(\w+)", Relation::Inheritance, false),
        (r"(\w+)\s*\*-+\s*(\w+)", Relation::Composition, true),
        (r"(\w+)\s*-+\*\s*(\w+)", Relation::Composition, false),
        (r"(\w+)\s*o-+\s*(\w+)", Relation::Aggregation, true),
        (r"(\w+)\s*-+o\s*(\w+)", Relation::Aggregation, false),
        (r"(\w+)\s*-+>\s*(\w+)(?:\s*:\s*(.+))?", Relation::Association, false),
        (r"(\w+)\s*<-+\s*(\w+)(?:\s*:\s*(.+))?", Relation::Association, true),
        (r"(\w+)\s*\.+\|?>\s*(\w+)(?:\s*:\s*(.+))?", Relation::Dependency, false),
        (r"(\w+)\s*-+\s*(\w+)(?:\s*:\s*(.+))?", Relation::Association, false),
    ]
    .into_iter()
    .map(|(re, relation, reversed)| (pattern(re), relation, reversed))
    .collect()
});

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid built-in uml pattern")
}

/// Class body being collected across lines.
#[derive(Debug)]
struct OpenClass {
    name: String,
    members: Vec<String>,
}

impl OpenClass {
    fn label(&self) -> String {
        if self.members.is_empty() {
            return self.name.clone();
        }
        let mut label = self.name.clone();
        for member in self.members.iter().take(CLASS_PREVIEW_LINES) {
            label.push('\n');
            label.push_str(member);
        }
        if self.members.len() > CLASS_PREVIEW_LINES {
            label.push_str("\n...");
        }
        label
    }
}

/// Parse UML-like text into a top-to-bottom graph.
///
/// `@startuml` / `@enduml` markers and `'` or `//` comment lines are skipped.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and [`ParseError::NoNodes`]
/// when no statement declares a node.
pub fn parse(input: &str) -> Result<Graph, ParseError> {
    ensure_not_blank(input)?;
    let mut builder = GraphBuilder::new(Direction::TopToBottom);
    let mut open: Option<OpenClass> = None;

    for line in input.lines().map(str::trim) {
        if line.is_empty()
            || line.starts_with('\'')
            || line.starts_with("//")
            || line.starts_with("@startuml")
            || line.starts_with("@enduml")
        {
            continue;
        }

        if let Some(class) = open.as_mut() {
            match line.split_once('}') {
                Some((before, _)) => {
                    push_members(&mut class.members, before);
                    if let Some(class) = open.take() {
                        builder.upsert(Node::new(&class.name, class.label(), NodeShape::Rectangle));
                    }
                }
                None => class.members.push(line.to_owned()),
            }
            continue;
        }

        if let Some(caps) = CLASS.captures(line) {
            open = class_statement(&caps, &mut builder);
            continue;
        }
        if let Some(caps) = PARTICIPANT.captures(line) {
            participant(&caps, &mut builder);
            continue;
        }
        if let Some(caps) = ACTIVITY.captures(line) {
            let id = format!("activity_{}", builder.node_count());
            chain(&mut builder, Node::new(id, caps[1].trim(), NodeShape::Rounded));
            continue;
        }
        if line == "start" || line == "(*)" {
            if !builder.contains(START_ID) {
                builder.upsert(Node::new(START_ID, "Start", NodeShape::Circle));
            }
            continue;
        }
        if line == "stop" || line == "end" {
            stop(&mut builder);
            continue;
        }
        if let Some(caps) = CONDITION.captures(line) {
            let id = format!("decision_{}", builder.node_count());
            chain(&mut builder, Node::new(id, caps[1].trim(), NodeShape::Diamond));
            continue;
        }
        if relation(line, &mut builder) {
            continue;
        }
        if let Some(caps) = MESSAGE.captures(line) {
            message(&caps, &mut builder);
        }
    }

    // An unterminated class body still declares the class.
    if let Some(class) = open {
        builder.upsert(Node::new(&class.name, class.label(), NodeShape::Rectangle));
    }

    let graph = builder.finish();
    if graph.nodes.is_empty() {
        return Err(ParseError::NoNodes { grammar: Grammar::Uml });
    }
    Ok(graph)
}

/// Handle `class Name`, `class Name {`, or a one-line `class Name { a; b }`.
///
/// Returns the class still waiting for its closing brace, if any.
fn class_statement(caps: &Captures, builder: &mut GraphBuilder) -> Option<OpenClass> {
    let mut class = OpenClass { name: caps[1].to_owned(), members: Vec::new() };
    let Some(body) = caps.get(2).map(|m| &m.as_str()[1..]) else {
        builder.upsert(Node::new(&class.name, class.label(), NodeShape::Rectangle));
        return None;
    };
    match body.split_once('}') {
        Some((inline, _)) => {
            push_members(&mut class.members, inline);
            builder.upsert(Node::new(&class.name, class.label(), NodeShape::Rectangle));
            None
        }
        None => {
            push_members(&mut class.members, body);
            Some(class)
        }
    }
}

/// Members separated by `;` on a brace line.
fn push_members(members: &mut Vec<String>, text: &str) {
    members.extend(text.split(';').map(str::trim).filter(|m| !m.is_empty()).map(str::to_owned));
}

fn participant(caps: &Captures, builder: &mut GraphBuilder) {
    let id = caps[2].trim();
    if builder.contains(id) {
        return;
    }
    let label = caps.get(3).map_or(id, |m| m.as_str());
    let shape = if &caps[1] == "actor" { NodeShape::Circle } else { NodeShape::Rectangle };
    builder.upsert(Node::new(id, label, shape));
}

/// Insert `node` and link it from the previously declared node.
fn chain(builder: &mut GraphBuilder, node: Node) {
    let previous = builder.last_id().map(str::to_owned);
    let id = node.id.clone();
    builder.upsert(node);
    if let Some(previous) = previous {
        builder.push_edge(Edge::new(previous, id, EdgeKind::Arrow));
    }
}

fn stop(builder: &mut GraphBuilder) {
    let previous = builder.last_id().filter(|id| *id != END_ID).map(str::to_owned);
    if !builder.contains(END_ID) {
        builder.upsert(Node::new(END_ID, "End", NodeShape::Circle));
    }
    if let Some(previous) = previous {
        builder.push_edge(Edge::new(previous, END_ID, EdgeKind::Arrow));
    }
}

/// Try the class relation patterns. Returns true when one matched.
fn relation(line: &str, builder: &mut GraphBuilder) -> bool {
    for (re, relation, reversed) in RELATIONS.iter() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let (from, to) = if *reversed { (&caps[2], &caps[1]) } else { (&caps[1], &caps[2]) };
        let label = caps.get(3).map(|m| m.as_str().trim().to_owned());
        builder.connect(Edge::new(from, to, relation.edge_kind()).with_label(label));
        return true;
    }
    false
}

fn message(caps: &Captures, builder: &mut GraphBuilder) {
    let arrow = &caps[2];
    let (mut from, mut to) = (caps[1].trim(), caps[3].trim());
    if arrow.starts_with('<') && !arrow.contains('>') {
        std::mem::swap(&mut from, &mut to);
    }
    let label = caps.get(4).map(|m| m.as_str().trim().to_owned());
    builder.connect(Edge::new(from, to, EdgeKind::Arrow).with_label(label));
}

#[cfg(test)]
#[path = "uml_test.rs"]
mod uml_test;
