//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying the origin geometry each move is computed from so
//! that intermediate frames never accumulate drift.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Point, Rect};
use crate::doc::{ArrowBinding, ElementId};
use crate::hit::ResizeHandle;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move, and resize (default).
    #[default]
    Select,
    /// Draw a new arrow, snapping its ends to element anchors.
    Arrow,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Toggles selection on click; frees the aspect ratio on corner resize.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta in pixels. Positive `dy` scrolls down.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Starting geometry of one element taking part in a drag or resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub id: ElementId,
    pub rect: Rect,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Panning the viewport by dragging empty space or with the middle button.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Pressed on a selected element but not yet past the drag threshold.
    PendingDrag {
        start_screen: Point,
        start_world: Point,
        origins: Vec<Origin>,
    },
    /// Moving the selection. A history batch is open.
    Dragging {
        start_world: Point,
        origins: Vec<Origin>,
    },
    /// Resizing the selection by one of its handles. A history batch is open.
    Resizing {
        handle: ResizeHandle,
        start_world: Point,
        /// Selection bounds when the gesture began.
        bounds: Rect,
        origins: Vec<Origin>,
    },
    /// Rubber-band selection.
    Marquee {
        start_world: Point,
        current_world: Point,
    },
    /// Drawing a new arrow with the arrow tool.
    DrawingArrow {
        start: Point,
        start_binding: Option<ArrowBinding>,
        current: Point,
    },
    /// Dragging one end of an existing arrow. A history batch is open.
    DraggingArrowEnd {
        id: ElementId,
        at_start: bool,
    },
}

impl InputState {
    /// Whether this gesture holds an open history batch.
    #[must_use]
    pub fn is_batched(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Resizing { .. } | Self::DraggingArrowEnd { .. })
    }
}
