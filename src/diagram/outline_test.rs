use super::*;

fn labels_of(graph: &Graph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.label.as_str()).collect()
}

fn edge_labels(graph: &Graph) -> Vec<(String, String)> {
    graph
        .edges
        .iter()
        .map(|e| {
            let from = graph.node(&e.from).map(|n| n.label.clone()).unwrap_or_default();
            let to = graph.node(&e.to).map(|n| n.label.clone()).unwrap_or_default();
            (from, to)
        })
        .collect()
}

// =============================================================================
// STRUCTURE
// =============================================================================

#[test]
fn nested_list_example() {
    let graph = parse("- a\n  - b\n  - c").unwrap();
    assert_eq!(labels_of(&graph), vec!["a", "b", "c"]);
    let levels: Vec<Option<usize>> = graph.nodes.iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![Some(0), Some(1), Some(1)]);
    assert_eq!(
        edge_labels(&graph),
        vec![("a".to_owned(), "b".to_owned()), ("a".to_owned(), "c".to_owned())]
    );
    assert_eq!(graph.nodes[0].shape, NodeShape::Rounded);
    assert_eq!(graph.nodes[1].shape, NodeShape::Rectangle);
    assert_eq!(graph.nodes[2].shape, NodeShape::Rectangle);
}

#[test]
fn ids_follow_document_order() {
    let graph = parse("- a\n- b").unwrap();
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["node0", "node1"]);
    assert!(graph.edges.is_empty());
}

#[test]
fn dedent_returns_to_the_right_parent() {
    let input = "- root\n  - child\n    - grandchild\n  - sibling\n- second root";
    let graph = parse(input).unwrap();
    assert_eq!(
        edge_labels(&graph),
        vec![
            ("root".to_owned(), "child".to_owned()),
            ("child".to_owned(), "grandchild".to_owned()),
            ("root".to_owned(), "sibling".to_owned()),
        ]
    );
    assert_eq!(graph.node("node2").map(|n| n.shape), Some(NodeShape::Circle));
}

#[test]
fn every_bullet_marker_is_accepted() {
    let graph = parse("- one\n* two\n+ three\n12. four").unwrap();
    assert_eq!(labels_of(&graph), vec!["one", "two", "three", "four"]);
}

#[test]
fn tabs_count_as_one_level() {
    let graph = parse("- a\n\t- b").unwrap();
    assert_eq!(graph.nodes[1].level, Some(1));
    assert_eq!(graph.edges.len(), 1);
}

#[test]
fn non_item_lines_are_skipped() {
    let graph = parse("# Title\n- a\nplain text\n  - b").unwrap();
    assert_eq!(labels_of(&graph), vec!["a", "b"]);
}

#[test]
fn direction_is_top_to_bottom() {
    assert_eq!(parse("- a").unwrap().direction, Direction::TopToBottom);
}

// =============================================================================
// STYLE
// =============================================================================

#[test]
fn colors_follow_depth_and_saturate() {
    let mut input = String::new();
    for depth in 0..8 {
        input.push_str(&"  ".repeat(depth));
        input.push_str("- item\n");
    }
    let graph = parse(&input).unwrap();
    assert_eq!(graph.nodes[0].background_color.as_deref(), Some("#3B82F6"));
    assert_eq!(graph.nodes[1].background_color.as_deref(), Some("#10B981"));
    assert_eq!(graph.nodes[5].border_color.as_deref(), Some("#0891B2"));
    assert_eq!(graph.nodes[7].background_color, graph.nodes[5].background_color);
}

#[test]
fn decision_keywords_make_diamonds() {
    let graph = parse("- 开始\n  - 是否通过？\n  - 判断结果\n  - done").unwrap();
    assert!(graph.nodes[1].is_decision);
    assert_eq!(graph.nodes[1].shape, NodeShape::Diamond);
    assert!(graph.nodes[2].is_decision);
    assert!(!graph.nodes[3].is_decision);
    assert_eq!(graph.nodes[3].shape, NodeShape::Rectangle);
}

#[test]
fn ascii_question_mark_stays_on_the_trunk() {
    let graph = parse("- Release\n  - Ship it?\n  - Why now?").unwrap();
    assert!(graph.nodes.iter().all(|n| !n.is_decision));
    assert_eq!(graph.nodes[1].shape, NodeShape::Rectangle);
    assert!(!is_decision("Ship it?"));
    assert!(is_decision("继续？"));
}

#[test]
fn every_node_has_a_level() {
    let graph = parse("- a\n  - b").unwrap();
    assert!(graph.is_outline_tree());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn blank_input_fails() {
    assert_eq!(parse(""), Err(ParseError::Empty));
    assert_eq!(parse("  \n  "), Err(ParseError::Empty));
}

#[test]
fn text_without_items_fails() {
    assert_eq!(parse("just a paragraph"), Err(ParseError::NoNodes { grammar: Grammar::Outline }));
}
