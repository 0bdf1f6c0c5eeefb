#![allow(clippy::float_cmp)]

use super::*;
use crate::camera::Viewport;
use crate::doc::{CanvasElement, ElementKind, ShapeProps};

fn sample() -> SavedState {
    let el = CanvasElement::new(ElementKind::Circle(ShapeProps::default()), 10.0, 20.0, 30.0, 30.0);
    Snapshot {
        selected_ids: vec![el.id],
        elements: vec![el],
        viewport: Viewport { x: 5.0, y: 6.0, scale: 1.5 },
    }
}

#[test]
fn save_then_load_restores_state() {
    let state = sample();
    let text = save_state(&state).unwrap();
    assert!(text.contains("\"selectedIds\""));
    assert_eq!(load_state(&text), Some(state));
}

#[test]
fn blank_record_is_no_state() {
    assert!(load_state("").is_none());
    assert!(load_state("   \n").is_none());
    assert!(matches!(decode_state(""), Err(PersistError::Corrupt { .. })));
}

#[test]
fn missing_elements_is_corrupt() {
    let err = decode_state(r#"{"selectedIds": []}"#).unwrap_err();
    assert!(matches!(err, PersistError::Corrupt { .. }));
    assert_eq!(err.error_code(), "E_STATE_CORRUPT");
    assert!(load_state(r#"{"selectedIds": []}"#).is_none());
}

#[test]
fn non_array_elements_is_corrupt() {
    assert!(matches!(decode_state(r#"{"elements": {}}"#), Err(PersistError::Corrupt { .. })));
    assert!(load_state(r#"{"elements": "nope"}"#).is_none());
}

#[test]
fn malformed_json_is_no_state() {
    assert!(matches!(decode_state("{not json"), Err(PersistError::Json(_))));
    assert!(load_state("{not json").is_none());
}

#[test]
fn missing_selection_and_viewport_default() {
    let state = load_state(r#"{"elements": []}"#).unwrap();
    assert!(state.elements.is_empty());
    assert!(state.selected_ids.is_empty());
    assert_eq!(state.viewport.scale, 1.0);
}

#[test]
fn bad_element_is_json_error() {
    let text = r#"{"elements": [{"type": "hexagon"}]}"#;
    assert!(matches!(decode_state(text), Err(PersistError::Json(_))));
}
