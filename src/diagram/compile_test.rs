#![allow(clippy::float_cmp)]

use super::*;
use crate::diagram::layout::layout_auto;
use crate::diagram::{flowchart, outline, uml};

const ORIGIN: Point = Point { x: 100.0, y: 100.0 };

fn build(graph: &Graph, options: &CompileOptions) -> Vec<CanvasElement> {
    let layout = layout_auto(graph).unwrap();
    compile(graph, &layout, ORIGIN, options)
}

fn flow(text: &str) -> Vec<CanvasElement> {
    build(&flowchart::parse(text).unwrap(), &CompileOptions::default())
}

fn arrows(elements: &[CanvasElement]) -> Vec<&CanvasElement> {
    elements.iter().filter(|e| e.arrow().is_some_and(|a| a.arrow_head_size > 0.0)).collect()
}

fn guides(elements: &[CanvasElement]) -> Vec<&CanvasElement> {
    elements.iter().filter(|e| e.arrow().is_some_and(|a| a.arrow_head_size == 0.0)).collect()
}

fn shape_props(el: &CanvasElement) -> &ShapeProps {
    match &el.kind {
        ElementKind::Rectangle(p) | ElementKind::RoundedRectangle(p) | ElementKind::Circle(p) => p,
        other => panic!("not a node shape: {other:?}"),
    }
}

fn near(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

fn content(el: &CanvasElement) -> Option<&str> {
    shape_props(el).content.as_deref()
}

// =============================================================================
// NODES
// =============================================================================

#[test]
fn one_shape_per_node_and_one_arrow_per_edge() {
    let elements = flow("A[Start]-->B(Next)");
    assert_eq!(elements.len(), 3);
    assert_eq!(arrows(&elements).len(), 1);
    let z: Vec<i64> = elements.iter().map(|e| e.z_index).collect();
    assert_eq!(z, vec![0, 1, 2]);
}

#[test]
fn shapes_map_to_element_kinds() {
    let elements = flow("a[box]\nb(soft)\nc((round))\nd{choice}\ne[/lean\\]");
    assert!(matches!(&elements[0].kind, ElementKind::RoundedRectangle(p) if p.corner_radius == Some(10.0)));
    assert!(matches!(elements[1].kind, ElementKind::RoundedRectangle(_)));
    assert!(matches!(elements[2].kind, ElementKind::Circle(_)));
    assert!(matches!(elements[3].kind, ElementKind::Rectangle(_)));
    assert!(matches!(elements[4].kind, ElementKind::Rectangle(_)));
}

#[test]
fn node_box_is_centered_on_layout_position() {
    let elements = flow("A[Start]-->B(Next)");
    let a = &elements[0];
    assert_eq!((a.x, a.y, a.width, a.height), (20.0, 60.0, 160.0, 80.0));
    let b = &elements[1];
    assert_eq!((b.x, b.y), (20.0, 280.0));
}

#[test]
fn long_labels_wrap_and_widen_the_box() {
    let elements = flow("A[abcdefghijklmnopqrstuvwxyz]");
    assert_eq!(content(&elements[0]), Some("abcdefghijklmnopqrst\nuvwxyz"));
    assert_eq!(elements[0].width, 300.0);
    assert_eq!(elements[0].height, 80.0);
}

#[test]
fn tall_labels_grow_the_box() {
    let graph = uml::parse("class Account {\n  id\n  owner\n  balance\n  open()\n}").unwrap();
    let elements = build(&graph, &CompileOptions::default());
    // Name, three members, and an ellipsis line.
    assert_eq!(elements[0].height, 5.0 * 20.0 + 30.0);
}

#[test]
fn wide_nodes_are_re_centered_without_overlap() {
    let elements = flow("A-->B[abcdefghijklmnopqrstuvwxyz]\nA-->C[c]");
    let b = &elements[1];
    let c = &elements[2];
    assert_eq!(b.x, -210.0);
    assert_eq!(c.x, 250.0);
    assert_eq!(c.x - (b.x + b.width), 160.0);
}

#[test]
fn colors_come_from_the_id_hash_unless_explicit() {
    let elements = flow("A[x]");
    let swatch = StylePreset::Colorful.swatch_for("A");
    assert_eq!(shape_props(&elements[0]).background_color, swatch.background);
    assert_eq!(shape_props(&elements[0]).border_color, swatch.border);

    let serious = build(
        &flowchart::parse("A[x]").unwrap(),
        &CompileOptions { style: StylePreset::Serious, ..CompileOptions::default() },
    );
    assert_eq!(shape_props(&serious[0]).background_color, StylePreset::Serious.swatch_for("A").background);

    let tree = build(&outline::parse("- root").unwrap(), &CompileOptions::default());
    assert_eq!(shape_props(&tree[0]).background_color, "#3B82F6");
}

#[test]
fn text_style_follows_depth() {
    let elements = build(&outline::parse("- root\n  - child\n    - leaf").unwrap(), &CompileOptions::default());
    let style = |i: usize| shape_props(&elements[i]).text_style.clone().unwrap();
    assert!(style(0).bold);
    assert_eq!(style(0).font_size, 16.0);
    assert!(!style(1).bold);
    assert_eq!(style(1).font_size, 15.0);
    assert_eq!(shape_props(&elements[0]).border_width, 4.0);
    assert_eq!(shape_props(&elements[2]).border_width, 3.0);
    assert_eq!(style(0).font_family, "Arial, sans-serif");
}

// =============================================================================
// EDGES
// =============================================================================

#[test]
fn vertical_edge_binds_bottom_to_top() {
    let elements = flow("A-->B");
    let arrow = arrows(&elements)[0];
    let props = arrow.arrow().unwrap();
    assert_eq!(props.start_binding, Some(ArrowBinding { element_id: elements[0].id, position: AnchorTag::Bottom }));
    assert_eq!(props.end_binding, Some(ArrowBinding { element_id: elements[1].id, position: AnchorTag::Top }));
}

#[test]
fn horizontal_edge_binds_right_to_left() {
    let elements = flow("graph LR\nA-->B");
    let props = arrows(&elements)[0].arrow().unwrap();
    assert_eq!(props.start_binding.map(|b| b.position), Some(AnchorTag::Right));
    assert_eq!(props.end_binding.map(|b| b.position), Some(AnchorTag::Left));
}

#[test]
fn endpoints_sit_on_the_box_edges() {
    let elements = flow("A-->B");
    let arrow = arrows(&elements)[0];
    assert_eq!((arrow.x, arrow.y, arrow.width, arrow.height), (100.0, 100.0, 1.0, 220.0));
    let (start, end) = arrow.arrow_endpoints().unwrap();
    assert!(near(start, Point::new(100.0, 140.0)), "{start:?}");
    assert!(near(end, Point::new(100.0, 280.0)), "{end:?}");
}

#[test]
fn lone_edge_gets_a_small_curve() {
    let elements = flow("A-->B");
    let curve = arrows(&elements)[0].arrow().unwrap().arrow_curve;
    assert!((curve - 0.28).abs() < 1e-9);

    let straight = build(
        &flowchart::parse("A-->B").unwrap(),
        &CompileOptions { enable_bend: false, ..CompileOptions::default() },
    );
    assert_eq!(arrows(&straight)[0].arrow().unwrap().arrow_curve, 0.0);
}

#[test]
fn parallel_edges_curve_apart_symmetrically() {
    let graph = flowchart::parse("A-->B\nA-->B").unwrap();
    let gentle = build(&graph, &CompileOptions { curve_strength: 0.5, ..CompileOptions::default() });
    let curves: Vec<f64> = arrows(&gentle).iter().map(|a| a.arrow().unwrap().arrow_curve).collect();
    assert_eq!(curves, vec![-0.75, 0.75]);

    // Default strength would exceed the range and is clamped.
    let strong = build(&graph, &CompileOptions::default());
    let curves: Vec<f64> = arrows(&strong).iter().map(|a| a.arrow().unwrap().arrow_curve).collect();
    assert_eq!(curves, vec![-1.0, 1.0]);
}

#[test]
fn edge_style_follows_kind() {
    let elements = flow("A-->B\nB==>C\nC-.->|maybe|D");
    let edges = arrows(&elements);
    let plain = edges[0].arrow().unwrap();
    assert_eq!(plain.border_color, "#334155");
    assert_eq!(plain.border_width, 2.0);
    assert_eq!(plain.arrow_head_size, 12.0);
    assert_eq!(plain.content, None);

    let thick = edges[1].arrow().unwrap();
    assert_eq!(thick.border_color, "#0F172A");
    assert_eq!(thick.arrow_tail_width, 3.0);

    let dotted = edges[2].arrow().unwrap();
    assert_eq!(dotted.border_color, "#6B7280");
    assert_eq!(dotted.content.as_deref(), Some("maybe"));
    assert_eq!(dotted.text_style.as_ref().map(|s| s.font_size), Some(12.0));
}

// =============================================================================
// OUTLINE TREES
// =============================================================================

#[test]
fn tree_gets_rails_and_stubs() {
    let graph = outline::parse("- root\n  - a\n  - b\n  - 是否？").unwrap();
    let elements = build(&graph, &CompileOptions::default());
    // 4 nodes, 3 stubs, 3 edges, 2 rails.
    assert_eq!(elements.len(), 12);
    assert_eq!(arrows(&elements).len(), 3);

    let scaffolding = guides(&elements);
    assert_eq!(scaffolding.len(), 5);
    let rails: Vec<&&CanvasElement> = scaffolding.iter().filter(|e| e.height > 1.0).collect();
    assert_eq!(rails.len(), 2);
    assert_eq!(rails[0].x, -220.0);
    assert_eq!(rails[1].x, 420.0);
    assert_eq!(rails[0].height, 400.0);
    assert!(scaffolding.iter().all(|e| e.arrow().is_some_and(|a| a.start_binding.is_none())));
}

#[test]
fn decisions_sit_right_of_the_right_rail() {
    let graph = outline::parse("- root\n  - a\n  - b\n  - 是否？").unwrap();
    let elements = build(&graph, &CompileOptions::default());
    let decision = elements.iter().find(|e| content(e) == Some("是否？")).unwrap();
    // Trunk right edge 340 plus 160, past the right rail at 420.
    assert_eq!(decision.x, 500.0);
    assert!(decision.x > 420.0);
    assert!(matches!(decision.kind, ElementKind::Rectangle(_)));
}

#[test]
fn single_layer_tree_has_no_rails() {
    let elements = build(&outline::parse("- a\n- b").unwrap(), &CompileOptions::default());
    assert_eq!(elements.len(), 2);
}

// =============================================================================
// HELPERS
// =============================================================================

#[test]
fn wrap_prefers_spaces_and_commas() {
    assert_eq!(
        wrap_label("The quick brown fox jumps over the lazy dog", 20),
        "The quick brown fox\njumps over the lazy\ndog"
    );
    assert_eq!(
        wrap_label("一二三四五六七八九十，一二三四五六七八九十一二", 20),
        "一二三四五六七八九十，\n一二三四五六七八九十一二"
    );
    assert_eq!(wrap_label("short", 20), "short");
}

#[test]
fn box_exit_picks_the_first_edge_hit() {
    let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert!(near(box_exit(&rect, Point::new(500.0, 25.0)), Point::new(100.0, 25.0)));
    assert!(near(box_exit(&rect, Point::new(50.0, -100.0)), Point::new(50.0, 0.0)));
    assert_eq!(box_exit(&rect, Point::new(50.0, 25.0)), Point::new(50.0, 25.0));
}

#[test]
fn anchor_sides_follow_the_dominant_axis() {
    let o = Point::new(0.0, 0.0);
    assert_eq!(anchor_sides(o, Point::new(10.0, 1.0)), (AnchorTag::Right, AnchorTag::Left));
    assert_eq!(anchor_sides(o, Point::new(-10.0, 1.0)), (AnchorTag::Left, AnchorTag::Right));
    assert_eq!(anchor_sides(o, Point::new(1.0, -10.0)), (AnchorTag::Top, AnchorTag::Bottom));
    assert_eq!(anchor_sides(o, Point::new(5.0, 5.0)), (AnchorTag::Bottom, AnchorTag::Top));
}
