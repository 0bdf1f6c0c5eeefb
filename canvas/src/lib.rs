//! Canvas document core for the sketchboard diagram editor.
//!
//! This crate owns everything about the canvas that is not drawing: the
//! element model, the undo-aware element store, geometry (hit-testing,
//! rotation, grouping, resize), arrow binding and snapping, alignment guides,
//! and the interaction engine that turns pointer and key events into store
//! edits. Pixels are the job of an external [`render::Renderer`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Element store: elements, selection, viewport, history |
//! | [`doc`] | Element types, arrow bindings, and sparse patches |
//! | [`history`] | Bounded undo/redo of document snapshots |
//! | [`engine`] | Testable [`engine::EngineCore`] driving gestures |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`coalesce`] | Single-slot mailbox for per-frame updates |
//! | [`snap`] | Snap points, endpoint snapping, binding resolution |
//! | [`guides`] | Alignment guide detection and snapping |
//! | [`transform`] | Rotation, z-order, grouping, and resize math |
//! | [`hit`] | Hit-testing, bounding boxes, resize handles |
//! | [`camera`] | Viewport and coordinate conversions |
//! | [`persist`] | Saved-state encode/decode |
//! | [`render`] | Async renderer contract, scene sync, export |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod coalesce;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod guides;
pub mod history;
pub mod hit;
pub mod input;
pub mod persist;
pub mod render;
pub mod snap;
pub mod store;
pub mod transform;
