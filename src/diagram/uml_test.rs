use super::*;

fn pairs(graph: &Graph) -> Vec<(&str, &str, EdgeKind)> {
    graph.edges.iter().map(|e| (e.from.as_str(), e.to.as_str(), e.kind)).collect()
}

// =============================================================================
// CLASS DIAGRAMS
// =============================================================================

#[test]
fn multi_line_class_body_is_truncated() {
    let input = "@startuml\nclass User {\n  +id: int\n  +name: String\n  +email: String\n  +login()\n}\n@enduml";
    let graph = parse(input).unwrap();
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "User");
    assert_eq!(graph.nodes[0].label, "User\n+id: int\n+name: String\n+email: String\n...");
    assert_eq!(graph.nodes[0].shape, NodeShape::Rectangle);
}

#[test]
fn short_class_body_has_no_ellipsis() {
    let graph = parse("class A {\n  x\n}").unwrap();
    assert_eq!(graph.nodes[0].label, "A\nx");
}

#[test]
fn brace_less_and_inline_classes() {
    let graph = parse("class Plain\nclass Inline { a; b }").unwrap();
    assert_eq!(graph.node("Plain").map(|n| n.label.as_str()), Some("Plain"));
    assert_eq!(graph.node("Inline").map(|n| n.label.as_str()), Some("Inline\na\nb"));
}

#[test]
fn unterminated_class_is_still_declared() {
    let graph = parse("class Open {\n  field").unwrap();
    assert_eq!(graph.nodes[0].label, "Open\nfield");
}

#[test]
fn relation_operators_map_to_edge_kinds() {
    let input = "Animal <|-- Dog\nCar --|> Vehicle\nHouse *-- Room\nTeam o-- Player\nA --> B : uses\nC ..> D\nE -- F";
    let graph = parse(input).unwrap();
    assert_eq!(
        pairs(&graph),
        vec![
            ("Dog", "Animal", EdgeKind::Thick),
            ("Car", "Vehicle", EdgeKind::Thick),
            ("Room", "House", EdgeKind::Arrow),
            ("Player", "Team", EdgeKind::Arrow),
            ("A", "B", EdgeKind::Arrow),
            ("C", "D", EdgeKind::Dotted),
            ("E", "F", EdgeKind::Arrow),
        ]
    );
    assert_eq!(graph.edges[4].label.as_deref(), Some("uses"));
}

#[test]
fn reversed_association_swaps_endpoints() {
    let graph = parse("Client <-- Server").unwrap();
    assert_eq!(pairs(&graph), vec![("Server", "Client", EdgeKind::Arrow)]);
}

#[test]
fn relation_endpoints_are_auto_registered() {
    let graph = parse("class Animal {\n}\nAnimal <|-- Cat").unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.node("Cat").map(|n| n.shape), Some(NodeShape::Rectangle));
}

// =============================================================================
// SEQUENCE DIAGRAMS
// =============================================================================

#[test]
fn participants_and_actors() {
    let graph = parse("actor User as \"End user\"\nparticipant Api").unwrap();
    assert_eq!(graph.node("User").map(|n| n.shape), Some(NodeShape::Circle));
    assert_eq!(graph.node("User").map(|n| n.label.as_str()), Some("End user"));
    assert_eq!(graph.node("Api").map(|n| n.shape), Some(NodeShape::Rectangle));
}

#[test]
fn participant_does_not_redeclare() {
    let graph = parse("actor Bob\nparticipant Bob").unwrap();
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].shape, NodeShape::Circle);
}

#[test]
fn messages_with_labels() {
    let graph = parse("participant 用户\n用户 -> 服务: 请求").unwrap();
    assert_eq!(pairs(&graph), vec![("用户", "服务", EdgeKind::Arrow)]);
    assert_eq!(graph.edges[0].label.as_deref(), Some("请求"));
}

#[test]
fn message_fallback_keeps_multi_word_names() {
    let graph = parse("Web App -< Back End: reply").unwrap();
    assert_eq!(pairs(&graph), vec![("Web App", "Back End", EdgeKind::Arrow)]);
    assert_eq!(graph.edges[0].label.as_deref(), Some("reply"));
}

#[test]
fn reversed_arrow_takes_adjacent_words() {
    let graph = parse("Web App <- Back End").unwrap();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].from, "Back");
    assert_eq!(graph.edges[0].to, "App");
}

// =============================================================================
// ACTIVITY DIAGRAMS
// =============================================================================

#[test]
fn activity_flow_is_chained() {
    let input = "@startuml\nstart\n:Read input;\nif (valid?) then\n:Save record;\nstop\n@enduml";
    let graph = parse(input).unwrap();
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["start", "activity_1", "decision_2", "activity_3", "end"]);
    assert_eq!(
        pairs(&graph),
        vec![
            ("start", "activity_1", EdgeKind::Arrow),
            ("activity_1", "decision_2", EdgeKind::Arrow),
            ("decision_2", "activity_3", EdgeKind::Arrow),
            ("activity_3", "end", EdgeKind::Arrow),
        ]
    );
    assert_eq!(graph.node("decision_2").map(|n| n.shape), Some(NodeShape::Diamond));
    assert_eq!(graph.node("start").map(|n| n.shape), Some(NodeShape::Circle));
    assert_eq!(graph.node("activity_1").map(|n| n.shape), Some(NodeShape::Rounded));
}

#[test]
fn activity_label_with_hyphen_is_not_a_relation() {
    let graph = parse(":re-try upload;").unwrap();
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].label, "re-try upload");
    assert!(graph.edges.is_empty());
}

// =============================================================================
// ERRORS AND COMMENTS
// =============================================================================

#[test]
fn comments_and_markers_only_has_no_nodes() {
    assert_eq!(
        parse("@startuml\n' a comment\n// another\n@enduml"),
        Err(ParseError::NoNodes { grammar: Grammar::Uml })
    );
}

#[test]
fn blank_input_fails() {
    assert_eq!(parse("\n\n"), Err(ParseError::Empty));
}

#[test]
fn no_dangling_edges() {
    let graph = parse("A <|-- B\nB *-- C\nC -> D: go\nD ..> A").unwrap();
    for edge in &graph.edges {
        assert!(graph.node(&edge.from).is_some());
        assert!(graph.node(&edge.to).is_some());
    }
}
