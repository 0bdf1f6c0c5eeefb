//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale for interactive zoom.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed viewport scale for interactive zoom.
pub const MAX_SCALE: f64 = 5.0;

/// Scale multiplier for one wheel step away from the user.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Scale multiplier for one wheel step toward the user.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Scale range used when fitting freshly imported content to the screen.
pub const FIT_MIN_SCALE: f64 = 0.25;
pub const FIT_MAX_SCALE: f64 = 2.0;

/// Screen padding around fitted content, in pixels.
pub const FIT_PADDING_PX: f64 = 80.0;

// ── Snapping ────────────────────────────────────────────────────

/// Distance within which an arrow endpoint snaps to an anchor.
pub const SNAP_THRESHOLD: f64 = 35.0;

/// Minimum bounding-box side for an arrow recomputed from its endpoints.
pub const MIN_ARROW_BOX: f64 = 10.0;

/// Minimum bounding-box side for an arrow created from two points.
pub const MIN_NEW_ARROW_BOX: f64 = 50.0;

/// Screen distance under which alignment guides engage.
pub const GUIDE_SNAP_PX: f64 = 10.0;

// ── Editing ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

/// Smallest width/height a resize gesture may produce.
pub const MIN_RESIZE: f64 = 20.0;

/// Screen radius within which a press grabs a resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Screen distance the pointer must travel before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Offset applied to pasted elements.
pub const PASTE_OFFSET: f64 = 20.0;

/// Differences in rotation below this many degrees are ignored.
pub const ROTATION_EPSILON: f64 = 0.001;
