//! Interaction engine: turns pointer, wheel, and key events into store edits.
//!
//! `EngineCore` owns the [`Store`] plus the active gesture. Drag and resize
//! gestures compute a complete update for every frame from the geometry
//! captured at pointer-down, merge in binding-driven arrow overrides, and
//! offer the result to a single-slot [`FrameMailbox`]. The host calls
//! [`EngineCore::tick`] once per animation frame to apply at most one pending
//! update; pointer-up applies the last one synchronously before closing the
//! history batch.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Point, Rect, ViewportPatch};
use crate::coalesce::FrameMailbox;
use crate::consts::{DRAG_THRESHOLD_PX, HANDLE_RADIUS_PX, SNAP_THRESHOLD};
use crate::doc::{CanvasElement, ElementId, ElementPatch};
use crate::guides::{GuideLine, detect_guide_lines, snapped_position};
use crate::hit::{ResizeHandle, bounding_box, handle_at, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, Origin, Tool, WheelDelta};
use crate::snap::{SnapResult, all_snap_points, arrows_to_update, find_nearest_snap_point, snap_arrow_point};
use crate::store::Store;
use crate::transform::resize_box;

/// One frame's worth of element updates, applied atomically.
pub type FrameUpdate = Vec<(ElementId, ElementPatch)>;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    /// Alignment guides to draw; empty clears them.
    GuidesChanged(Vec<GuideLine>),
    /// Where a new or edited arrow end currently lands.
    SnapIndicator(SnapResult),
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tool: Tool,
}

/// Core engine state. Free of any host or renderer dependency.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub store: Store,
    pub ui: UiState,
    pub input: InputState,
    mailbox: FrameMailbox<FrameUpdate>,
    guides: Vec<GuideLine>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_store(store: Store) -> Self {
        Self { store, ..Self::default() }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    // --- Queries ---

    #[must_use]
    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    /// Whether a computed update is waiting for the next frame.
    #[must_use]
    pub fn has_pending_update(&self) -> bool {
        !self.mailbox.is_empty()
    }

    // --- Frame ---

    /// Frame boundary: apply at most one pending update.
    ///
    /// Returns whether an update was applied.
    pub fn tick(&mut self) -> bool {
        let applied = match self.mailbox.take() {
            Some(update) => {
                self.store.update_many(&update);
                true
            }
            None => false,
        };
        self.store.tick();
        applied
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let world = self.store.viewport().screen_to_world(screen_pt);
        if button == Button::Middle {
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::SetCursor("grabbing".into())];
        }
        if button != Button::Primary {
            return Vec::new();
        }

        if self.ui.tool == Tool::Arrow {
            let points = all_snap_points(self.store.elements(), None);
            let snapped = find_nearest_snap_point(world, &points, self.snap_threshold());
            self.input = InputState::DrawingArrow {
                start: snapped.point(),
                start_binding: snapped.binding(),
                current: snapped.point(),
            };
            return vec![Action::SnapIndicator(snapped), Action::RenderNeeded];
        }

        if let Some((id, at_start)) = self.arrow_end_at(world) {
            self.store.begin_batch_update();
            self.input = InputState::DraggingArrowEnd { id, at_start };
            return vec![Action::SetCursor("crosshair".into())];
        }

        if let Some(actions) = self.try_begin_resize(world) {
            return actions;
        }

        match hit_test(world, self.store.elements()) {
            Some(id) => {
                if modifiers.shift {
                    self.store.toggle_select(id);
                } else if !self.store.selected_ids().contains(&id) {
                    self.store.select(&[id]);
                }
                if self.store.selected_ids().contains(&id) {
                    self.input = InputState::PendingDrag {
                        start_screen: screen_pt,
                        start_world: world,
                        origins: self.selection_origins(),
                    };
                }
                vec![Action::RenderNeeded]
            }
            None if modifiers.shift => {
                self.input = InputState::Marquee { start_world: world, current_world: world };
                vec![Action::RenderNeeded]
            }
            None => {
                self.store.clear_selection();
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::SetCursor("grabbing".into()), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.store.viewport().screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let vp = self.store.viewport();
                self.store.update_viewport(ViewportPatch {
                    x: Some(vp.x + screen_pt.x - last_screen.x),
                    y: Some(vp.y + screen_pt.y - last_screen.y),
                    scale: None,
                });
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::PendingDrag { start_screen, start_world, origins } => {
                if start_screen.distance(screen_pt) <= DRAG_THRESHOLD_PX {
                    self.input = InputState::PendingDrag { start_screen, start_world, origins };
                    return Vec::new();
                }
                self.store.begin_batch_update();
                self.drag_to(start_world, origins, world)
            }
            InputState::Dragging { start_world, origins } => self.drag_to(start_world, origins, world),
            InputState::Resizing { handle, start_world, bounds, origins } => {
                let keep_aspect = handle.is_corner() && !modifiers.shift;
                let next = resize_box(bounds, handle, world.x - start_world.x, world.y - start_world.y, keep_aspect);
                let update = scale_into(&origins, bounds, next);
                self.offer_with_bindings(update, true);
                self.input = InputState::Resizing { handle, start_world, bounds, origins };
                vec![Action::RenderNeeded]
            }
            InputState::Marquee { start_world, .. } => {
                self.input = InputState::Marquee { start_world, current_world: world };
                vec![Action::RenderNeeded]
            }
            InputState::DrawingArrow { start, start_binding, .. } => {
                let points = all_snap_points(self.store.elements(), None);
                let snapped = find_nearest_snap_point(world, &points, self.snap_threshold());
                self.input = InputState::DrawingArrow { start, start_binding, current: snapped.point() };
                vec![Action::SnapIndicator(snapped), Action::RenderNeeded]
            }
            InputState::DraggingArrowEnd { id, at_start } => {
                let snapped = snap_arrow_point(world, self.store.elements(), id, self.snap_threshold());
                self.store.update_arrow_point(id, at_start, snapped.point(), snapped.binding());
                self.input = InputState::DraggingArrowEnd { id, at_start };
                vec![Action::SnapIndicator(snapped), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.store.viewport().screen_to_world(screen_pt);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Dragging { .. } | InputState::Resizing { .. } => {
                self.end_gesture();
                actions.push(Action::GuidesChanged(Vec::new()));
            }
            InputState::DraggingArrowEnd { .. } => self.store.end_batch_update(),
            InputState::Marquee { start_world, .. } => {
                self.store.select_in_box(Rect::from_corners(start_world, world));
            }
            InputState::DrawingArrow { start, start_binding, current } => {
                if start.distance(current) > self.store.viewport().screen_dist_to_world(DRAG_THRESHOLD_PX) {
                    let points = all_snap_points(self.store.elements(), None);
                    let end_binding = find_nearest_snap_point(current, &points, 0.0).binding();
                    self.store.create_arrow_with_points(start, current, start_binding, end_binding);
                }
            }
            InputState::Idle | InputState::Panning { .. } | InputState::PendingDrag { .. } => {}
        }
        actions.push(Action::SetCursor("default".into()));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        self.store.zoom_at(screen_pt, delta.dy);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_batched() {
            return Vec::new();
        }
        let selected = self.store.selected_ids().to_vec();
        let handled = match (key.0.as_str(), modifiers.command()) {
            ("Delete" | "Backspace", false) if !selected.is_empty() => {
                self.store.delete(&selected);
                true
            }
            ("Escape", _) => {
                self.input = InputState::Idle;
                self.store.clear_selection();
                true
            }
            ("z" | "Z", true) if modifiers.shift => self.store.redo(),
            ("z" | "Z", true) => self.store.undo(),
            ("y" | "Y", true) => self.store.redo(),
            ("c", true) => self.store.copy_selected() > 0,
            ("v", true) => !self.store.paste().is_empty(),
            ("a", true) => {
                let all: Vec<ElementId> = self.store.elements().iter().map(|el| el.id).collect();
                self.store.select(&all);
                true
            }
            ("g" | "G", true) if modifiers.shift => !self.store.ungroup(&selected).is_empty(),
            ("g" | "G", true) => self.store.group(&selected).is_some(),
            _ => false,
        };
        if handled { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Gestures ---

    /// Start resizing the current selection from `handle` at `world`.
    ///
    /// Opens a history batch. Does nothing when the selection is empty.
    pub fn begin_resize(&mut self, handle: ResizeHandle, world: Point) -> bool {
        let origins = self.selection_origins();
        if origins.is_empty() {
            return false;
        }
        let bounds = bounding_box(self.store.selected_elements());
        self.store.begin_batch_update();
        self.input = InputState::Resizing { handle, start_world: world, bounds, origins };
        true
    }

    /// Apply any pending update synchronously and close the history batch.
    pub fn end_gesture(&mut self) {
        if let Some(update) = self.mailbox.take() {
            self.store.update_many(&update);
        }
        self.guides.clear();
        self.store.end_batch_update();
    }

    fn drag_to(&mut self, start_world: Point, origins: Vec<Origin>, world: Point) -> Vec<Action> {
        let dx = world.x - start_world.x;
        let dy = world.y - start_world.y;
        let mut update: FrameUpdate =
            origins.iter().map(|o| (o.id, ElementPatch::position(o.rect.x + dx, o.rect.y + dy))).collect();

        self.guides.clear();
        if let [only] = origins.as_slice() {
            if let Some(mut moving) = self.store.get(only.id).cloned() {
                moving.x = only.rect.x + dx;
                moving.y = only.rect.y + dy;
                let others: Vec<CanvasElement> = self
                    .store
                    .elements()
                    .iter()
                    .filter(|el| el.id != only.id && !el.is_arrow())
                    .cloned()
                    .collect();
                let scale = self.store.viewport().scale;
                self.guides = detect_guide_lines(&moving, &others, scale);
                let snapped = snapped_position(&moving, &others, scale);
                update = vec![(only.id, ElementPatch::position(snapped.x, snapped.y))];
            }
        }

        self.offer_with_bindings(update, false);
        self.input = InputState::Dragging { start_world, origins };
        vec![Action::GuidesChanged(self.guides.clone()), Action::RenderNeeded]
    }

    /// Merge binding overrides into `update` and offer it for the next frame.
    ///
    /// Overrides are resolved against the element list as it will look after
    /// `update` applies, and replace any patch already computed for the same
    /// arrow.
    fn offer_with_bindings(&mut self, mut update: FrameUpdate, include_moved_arrows: bool) {
        let mut preview: Vec<CanvasElement> = self.store.elements().to_vec();
        for (id, patch) in &update {
            if let Some(el) = preview.iter_mut().find(|el| el.id == *id) {
                el.apply(patch);
            }
        }
        let moved: Vec<ElementId> = update.iter().map(|(id, _)| *id).collect();
        for over in arrows_to_update(&moved, &preview, include_moved_arrows) {
            match update.iter_mut().find(|(id, _)| *id == over.arrow_id) {
                Some((_, patch)) => *patch = over.patch,
                None => update.push((over.arrow_id, over.patch)),
            }
        }
        self.mailbox.offer(update);
    }

    fn try_begin_resize(&mut self, world: Point) -> Option<Vec<Action>> {
        let selected = self.store.selected_elements();
        if selected.is_empty() || selected.iter().all(|el| el.is_arrow()) {
            return None;
        }
        let bounds = bounding_box(selected);
        let radius = self.store.viewport().screen_dist_to_world(HANDLE_RADIUS_PX);
        let handle = handle_at(world, &bounds, radius)?;
        self.begin_resize(handle, world);
        Some(vec![Action::SetCursor("nwse-resize".into())])
    }

    /// End of the single selected arrow within grabbing distance of `world`.
    fn arrow_end_at(&self, world: Point) -> Option<(ElementId, bool)> {
        let selected = self.store.selected_elements();
        let [only] = selected.as_slice() else {
            return None;
        };
        let (start, end) = only.arrow_endpoints()?;
        let radius = self.store.viewport().screen_dist_to_world(HANDLE_RADIUS_PX);
        if start.distance(world) <= radius {
            Some((only.id, true))
        } else if end.distance(world) <= radius {
            Some((only.id, false))
        } else {
            None
        }
    }

    fn selection_origins(&self) -> Vec<Origin> {
        self.store.selected_elements().into_iter().map(|el| Origin { id: el.id, rect: el.rect() }).collect()
    }

    fn snap_threshold(&self) -> f64 {
        self.store.viewport().screen_dist_to_world(SNAP_THRESHOLD)
    }
}

/// Map each origin rect from `from` into `to`, scaling position and size.
fn scale_into(origins: &[Origin], from: Rect, to: Rect) -> FrameUpdate {
    let sx = if from.width > 0.0 { to.width / from.width } else { 1.0 };
    let sy = if from.height > 0.0 { to.height / from.height } else { 1.0 };
    origins
        .iter()
        .map(|o| {
            let r = Rect {
                x: to.x + (o.rect.x - from.x) * sx,
                y: to.y + (o.rect.y - from.y) * sy,
                width: o.rect.width * sx,
                height: o.rect.height * sy,
            };
            (o.id, ElementPatch::bounds(r))
        })
        .collect()
}
