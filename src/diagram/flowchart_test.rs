use super::*;

fn node<'a>(graph: &'a Graph, id: &str) -> &'a Node {
    graph.node(id).unwrap_or_else(|| panic!("missing node {id}"))
}

// =============================================================================
// HEADER
// =============================================================================

#[test]
fn header_sets_direction() {
    let graph = parse("graph TD\nA[Start]-->B(Next)").unwrap();
    assert_eq!(graph.direction, Direction::TopDown);

    let graph = parse("flowchart lr\nA-->B").unwrap();
    assert_eq!(graph.direction, Direction::LeftToRight);
}

#[test]
fn missing_header_defaults_to_top_bottom() {
    let graph = parse("A-->B").unwrap();
    assert_eq!(graph.direction, Direction::TopToBottom);
}

#[test]
fn unknown_direction_is_ignored() {
    let graph = parse("graph XY\nA-->B").unwrap();
    assert_eq!(graph.direction, Direction::TopToBottom);
}

#[test]
fn statements_after_header_semicolon_are_parsed() {
    let graph = parse("graph LR; A-->B").unwrap();
    assert_eq!(graph.direction, Direction::LeftToRight);
    assert_eq!(graph.edges.len(), 1);
}

// =============================================================================
// NODES
// =============================================================================

#[test]
fn start_next_example() {
    let graph = parse("graph TD\nA[Start]-->B(Next)").unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(node(&graph, "A").label, "Start");
    assert_eq!(node(&graph, "A").shape, NodeShape::Rectangle);
    assert_eq!(node(&graph, "B").label, "Next");
    assert_eq!(node(&graph, "B").shape, NodeShape::Rounded);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].from, "A");
    assert_eq!(graph.edges[0].to, "B");
    assert_eq!(graph.edges[0].kind, EdgeKind::Arrow);
}

#[test]
fn every_shape_syntax() {
    let input = "a[[Sub]]\nb((Round))\nc{{Hex}}\nd[\\Lean/]\ne[/Lean\\]\nf[Box]\ng{Choice}\nh(Soft)";
    let graph = parse(input).unwrap();
    let shapes: Vec<(&str, NodeShape, &str)> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n.shape, n.label.as_str())).collect();
    assert_eq!(
        shapes,
        vec![
            ("a", NodeShape::Rectangle, "Sub"),
            ("b", NodeShape::Circle, "Round"),
            ("c", NodeShape::Diamond, "Hex"),
            ("d", NodeShape::Parallelogram, "Lean"),
            ("e", NodeShape::Parallelogram, "Lean"),
            ("f", NodeShape::Rectangle, "Box"),
            ("g", NodeShape::Diamond, "Choice"),
            ("h", NodeShape::Rounded, "Soft"),
        ]
    );
}

#[test]
fn double_brackets_are_not_read_as_single() {
    let graph = parse("S[[Subroutine]]").unwrap();
    assert_eq!(node(&graph, "S").label, "Subroutine");
}

#[test]
fn redeclaration_overwrites_but_keeps_order() {
    let graph = parse("A[One]\nB[Two]\nA(Uno)").unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.nodes[0].id, "A");
    assert_eq!(graph.nodes[0].label, "Uno");
    assert_eq!(graph.nodes[0].shape, NodeShape::Rounded);
}

#[test]
fn quoted_and_empty_labels() {
    let graph = parse("A[\"Quoted text\"]\nB[]").unwrap();
    assert_eq!(node(&graph, "A").label, "Quoted text");
    assert_eq!(node(&graph, "B").label, "B");
}

#[test]
fn hyphenated_ids() {
    let graph = parse("step-1[First]-->step-2[Second]").unwrap();
    assert!(graph.node("step-1").is_some());
    assert!(graph.node("step-2").is_some());
    assert_eq!(graph.edges[0].from, "step-1");
    assert_eq!(graph.edges[0].to, "step-2");
}

// =============================================================================
// EDGES
// =============================================================================

#[test]
fn edge_kinds_follow_operator() {
    let graph = parse("A-->B\nB==>C\nC-.->D\nD->E").unwrap();
    let kinds: Vec<EdgeKind> = graph.edges.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EdgeKind::Arrow, EdgeKind::Thick, EdgeKind::Dotted, EdgeKind::Arrow]);
}

#[test]
fn pipe_label_is_trimmed() {
    let graph = parse("A -->| yes | B").unwrap();
    assert_eq!(graph.edges[0].label.as_deref(), Some("yes"));
}

#[test]
fn unlabeled_edge_has_no_label() {
    let graph = parse("A-->B").unwrap();
    assert_eq!(graph.edges[0].label, None);
}

#[test]
fn chained_edges_yield_every_hop() {
    let graph = parse("A --> B --> C").unwrap();
    let pairs: Vec<(&str, &str)> = graph.edges.iter().map(|e| (e.from.as_str(), e.to.as_str())).collect();
    assert_eq!(pairs, vec![("A", "B"), ("B", "C")]);
}

#[test]
fn undeclared_endpoints_become_rectangles() {
    let graph = parse("X-->Y").unwrap();
    assert_eq!(node(&graph, "X").shape, NodeShape::Rectangle);
    assert_eq!(node(&graph, "X").label, "X");
    assert_eq!(node(&graph, "Y").label, "Y");
}

#[test]
fn parallel_edges_are_kept() {
    let graph = parse("A-->B\nA-->B").unwrap();
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.nodes.len(), 2);
}

#[test]
fn comments_are_skipped() {
    let graph = parse("%% A-->Z\nA-->B").unwrap();
    assert!(graph.node("Z").is_none());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn empty_and_blank_input_fail() {
    assert_eq!(parse(""), Err(ParseError::Empty));
    assert_eq!(parse("   \n\t "), Err(ParseError::Empty));
}

#[test]
fn header_only_has_no_nodes() {
    assert_eq!(parse("graph TD"), Err(ParseError::NoNodes { grammar: Grammar::Flowchart }));
}

#[test]
fn no_dangling_edges() {
    let graph = parse("graph LR\nA-->B\nC{Check}-.->|maybe|D\nB==>C").unwrap();
    for edge in &graph.edges {
        assert!(graph.node(&edge.from).is_some());
        assert!(graph.node(&edge.to).is_some());
    }
}
