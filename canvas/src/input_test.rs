use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_debug_format() {
    assert_eq!(format!("{:?}", Tool::Select), "Select");
    assert_eq!(format!("{:?}", Tool::Arrow), "Arrow");
}

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
    assert!(!m.command());
}

#[test]
fn command_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Modifiers::default() }.command());
    assert!(Modifiers { meta: true, ..Modifiers::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Modifiers::default() }.command());
}

// =============================================================
// Key / Button
// =============================================================

#[test]
fn key_equality() {
    assert_eq!(Key("Delete".into()), Key("Delete".into()));
    assert_ne!(Key("Delete".into()), Key("Escape".into()));
}

#[test]
fn button_variants_distinct() {
    assert_ne!(Button::Primary, Button::Middle);
    assert_ne!(Button::Middle, Button::Secondary);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn only_editing_gestures_are_batched() {
    let p = Point::new(0.0, 0.0);
    assert!(!InputState::Idle.is_batched());
    assert!(!InputState::Panning { last_screen: p }.is_batched());
    assert!(!InputState::PendingDrag { start_screen: p, start_world: p, origins: Vec::new() }.is_batched());
    assert!(InputState::Dragging { start_world: p, origins: Vec::new() }.is_batched());
    assert!(
        InputState::Resizing { handle: ResizeHandle::Se, start_world: p, bounds: Rect::default(), origins: Vec::new() }
            .is_batched()
    );
    assert!(!InputState::Marquee { start_world: p, current_world: p }.is_batched());
    assert!(!InputState::DrawingArrow { start: p, start_binding: None, current: p }.is_batched());
    assert!(InputState::DraggingArrowEnd { id: uuid::Uuid::nil(), at_start: true }.is_batched());
}
