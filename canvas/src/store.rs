//! Element store: the single owner of document state.
//!
//! DESIGN
//! ======
//! `Store` owns the element list (kept sorted by z-index), the selection,
//! the viewport, and a bounded [`History`]. Every mutating command applies
//! its change and then commits a snapshot unless a batch is open. Parsers,
//! layout, and the snap engine never touch the store directly; they return
//! values the store applies.
//!
//! Batches collapse a gesture into two history entries: `begin_batch_update`
//! commits the pre-gesture state and `end_batch_update` commits the result.
//! Undo and redo set a restoring flag so the snapshot they apply is not
//! committed again; the host clears it by calling [`Store::tick`] once per
//! frame.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::camera::{Point, Rect, Viewport, ViewportPatch};
use crate::consts::{MIN_ARROW_BOX, MIN_NEW_ARROW_BOX, PASTE_OFFSET};
use crate::doc::{ArrowBinding, ArrowProps, CanvasElement, ElementId, ElementKind, ElementPatch, GroupProps};
use crate::history::{History, Snapshot};
use crate::hit::elements_in_box;
use crate::snap::{arrow_geometry, arrows_to_update};
use crate::transform::{self, Reorder};

#[derive(Debug, Clone)]
pub struct Store {
    elements: Vec<CanvasElement>,
    selected_ids: Vec<ElementId>,
    viewport: Viewport,
    history: History,
    batching: bool,
    restoring: bool,
    clipboard: Vec<CanvasElement>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Empty document with an identity viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot { elements: Vec::new(), selected_ids: Vec::new(), viewport: Viewport::default() })
    }

    /// Document restored from a saved snapshot. History starts fresh.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut elements = snapshot.elements;
        elements.sort_by_key(|el| el.z_index);
        let elements = transform::compact_z(elements);
        let selected_ids: Vec<ElementId> = snapshot
            .selected_ids
            .into_iter()
            .filter(|id| elements.iter().any(|el| el.id == *id))
            .collect();
        let initial = Snapshot { elements: elements.clone(), selected_ids: selected_ids.clone(), viewport: snapshot.viewport };
        Self {
            elements,
            selected_ids,
            viewport: snapshot.viewport,
            history: History::new(initial),
            batching: false,
            restoring: false,
            clipboard: Vec::new(),
        }
    }

    // --- Accessors ---

    /// Elements in ascending z-order.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected_ids
    }

    #[must_use]
    pub fn selected_elements(&self) -> Vec<&CanvasElement> {
        self.elements.iter().filter(|el| self.selected_ids.contains(&el.id)).collect()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Deep copy of the current document state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            selected_ids: self.selected_ids.clone(),
            viewport: self.viewport,
        }
    }

    #[must_use]
    pub fn is_batching(&self) -> bool {
        self.batching
    }

    // --- History ---

    fn commit(&mut self) {
        if self.batching || self.restoring {
            return;
        }
        let pushed = self.history.commit(self.snapshot());
        tracing::debug!(pushed, depth = self.history.depth(), "history commit");
    }

    /// Commit the current state and suspend auto-commits until
    /// [`Store::end_batch_update`].
    pub fn begin_batch_update(&mut self) {
        self.commit();
        self.batching = true;
    }

    /// Resume auto-commits and commit the post-batch state.
    pub fn end_batch_update(&mut self) {
        self.batching = false;
        self.commit();
    }

    /// Frame boundary: re-enables commits suppressed by undo/redo.
    pub fn tick(&mut self) {
        self.restoring = false;
    }

    /// Step back one history entry. Returns `false` at the boundary.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!(depth = self.history.depth(), "undo");
        true
    }

    /// Step forward one history entry. Returns `false` at the boundary.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        tracing::debug!(depth = self.history.depth(), "redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.elements = snapshot.elements;
        self.selected_ids = snapshot.selected_ids;
        self.viewport = snapshot.viewport;
        self.restoring = true;
    }

    /// Replace the whole document and start history over.
    pub fn load_state(&mut self, snapshot: Snapshot) {
        *self = Self::from_snapshot(snapshot);
    }

    // --- Element commands ---

    /// Append one element on top of the stack.
    pub fn add(&mut self, element: CanvasElement) -> ElementId {
        let id = element.id;
        self.push_top(element);
        self.commit();
        id
    }

    /// Append several elements on top of the stack as one history entry.
    ///
    /// Incoming relative z-order is preserved.
    pub fn add_many(&mut self, mut elements: Vec<CanvasElement>) -> Vec<ElementId> {
        elements.sort_by_key(|el| el.z_index);
        let ids = elements.iter().map(|el| el.id).collect();
        for el in elements {
            self.push_top(el);
        }
        self.commit();
        ids
    }

    fn push_top(&mut self, mut element: CanvasElement) {
        element.z_index = i64::try_from(self.elements.len()).unwrap_or(i64::MAX);
        self.elements.push(element);
    }

    /// Apply a sparse update to one element. Unknown ids are ignored.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) {
        if let Some(el) = self.elements.iter_mut().find(|el| el.id == id) {
            el.apply(patch);
        }
        self.commit();
    }

    /// Apply several sparse updates atomically (one history entry).
    ///
    /// Later patches for the same id are applied after earlier ones.
    pub fn update_many(&mut self, updates: &[(ElementId, ElementPatch)]) {
        self.apply_patches(updates);
        self.commit();
    }

    fn apply_patches(&mut self, updates: &[(ElementId, ElementPatch)]) {
        for (id, patch) in updates {
            if let Some(el) = self.elements.iter_mut().find(|el| el.id == *id) {
                el.apply(patch);
            }
        }
    }

    /// Remove elements and drop them from the selection.
    pub fn delete(&mut self, ids: &[ElementId]) {
        self.elements.retain(|el| !ids.contains(&el.id));
        self.elements = transform::compact_z(std::mem::take(&mut self.elements));
        self.selected_ids.retain(|id| !ids.contains(id));
        self.commit();
    }

    /// Rotate by a delta; see [`transform::rotate_by`].
    pub fn rotate_by(&mut self, ids: &[ElementId], delta: f64) {
        if transform::rotate_by(&mut self.elements, ids, delta) {
            self.refresh_bindings(ids);
            self.commit();
        }
    }

    /// Rotate to an absolute angle; see [`transform::set_rotation`].
    pub fn set_rotation(&mut self, ids: &[ElementId], target: f64) {
        if transform::set_rotation(&mut self.elements, ids, target) {
            self.refresh_bindings(ids);
            self.commit();
        }
    }

    /// Change stacking order; see [`transform::reorder`].
    pub fn reorder(&mut self, ids: &[ElementId], how: Reorder) {
        if ids.is_empty() {
            return;
        }
        self.elements = transform::reorder(std::mem::take(&mut self.elements), ids, how);
        self.commit();
    }

    /// Group the named elements and select the group.
    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let current = std::mem::take(&mut self.elements);
        let (elements, group_id) = match transform::group(current.clone(), ids) {
            Some(grouped) => grouped,
            None => {
                self.elements = current;
                return None;
            }
        };
        self.elements = elements;
        self.selected_ids = vec![group_id];
        let mut moved = ids.to_vec();
        moved.push(group_id);
        self.refresh_bindings(&moved);
        self.commit();
        Some(group_id)
    }

    /// Dissolve the named groups and select their children.
    pub fn ungroup(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let (elements, released) = transform::ungroup(std::mem::take(&mut self.elements), ids);
        self.elements = elements;
        if released.is_empty() {
            return released;
        }
        self.selected_ids.clone_from(&released);
        let mut moved = ids.to_vec();
        moved.extend_from_slice(&released);
        self.refresh_bindings(&moved);
        self.commit();
        released
    }

    /// Re-resolve arrows bound to `moved` against the current elements.
    fn refresh_bindings(&mut self, moved: &[ElementId]) {
        let updates: Vec<(ElementId, ElementPatch)> = arrows_to_update(moved, &self.elements, true)
            .into_iter()
            .map(|u| (u.arrow_id, u.patch))
            .collect();
        self.apply_patches(&updates);
    }

    // --- Arrows ---

    /// Create an arrow between two absolute points and select it.
    pub fn create_arrow_with_points(
        &mut self,
        start: Point,
        end: Point,
        start_binding: Option<ArrowBinding>,
        end_binding: Option<ArrowBinding>,
    ) -> ElementId {
        let mut arrow = CanvasElement::new(
            ElementKind::Arrow(ArrowProps {
                background_color: "transparent".into(),
                border_color: "#2563eb".into(),
                border_width: 4.0,
                arrow_head_size: 18.0,
                arrow_tail_width: 4.0,
                start_binding,
                end_binding,
                ..ArrowProps::default()
            }),
            0.0,
            0.0,
            0.0,
            0.0,
        );
        arrow.apply(&arrow_geometry(start, end, MIN_NEW_ARROW_BOX));
        let id = arrow.id;
        self.push_top(arrow);
        self.selected_ids = vec![id];
        self.commit();
        id
    }

    /// Move one arrow endpoint to an absolute point, keeping the other.
    ///
    /// The moved side's binding is replaced by `binding` (cleared on `None`).
    pub fn update_arrow_point(&mut self, id: ElementId, at_start: bool, point: Point, binding: Option<ArrowBinding>) {
        let Some(el) = self.elements.iter_mut().find(|el| el.id == id) else {
            return;
        };
        let Some((start, end)) = el.arrow_endpoints() else {
            return;
        };
        let (start, end) = if at_start { (point, end) } else { (start, point) };
        let mut patch = arrow_geometry(start, end, MIN_ARROW_BOX);
        if at_start {
            patch.start_binding = Some(binding);
        } else {
            patch.end_binding = Some(binding);
        }
        el.apply(&patch);
        self.commit();
    }

    // --- Selection ---

    /// Replace the selection. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[ElementId]) {
        self.selected_ids = ids.iter().copied().filter(|id| self.get(*id).is_some()).collect();
    }

    pub fn toggle_select(&mut self, id: ElementId) {
        if let Some(pos) = self.selected_ids.iter().position(|s| *s == id) {
            self.selected_ids.remove(pos);
        } else if self.get(id).is_some() {
            self.selected_ids.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// Select every element whose rotated bounds lie inside `marquee`.
    pub fn select_in_box(&mut self, marquee: Rect) {
        self.selected_ids = elements_in_box(marquee, &self.elements);
    }

    // --- Viewport ---

    pub fn update_viewport(&mut self, patch: ViewportPatch) {
        self.viewport.apply(patch);
    }

    /// One wheel step of cursor-anchored zoom.
    pub fn zoom_at(&mut self, cursor: Point, wheel_delta: f64) {
        self.viewport = self.viewport.zoomed_at(cursor, wheel_delta);
    }

    // --- Clipboard ---

    /// Copy the selection into the store's clipboard.
    pub fn copy_selected(&mut self) -> usize {
        self.clipboard = self.selected_elements().into_iter().cloned().collect();
        self.clipboard.len()
    }

    /// Insert a fresh-id copy of the clipboard, offset and selected.
    ///
    /// Arrow bindings between pasted elements follow the copies; bindings to
    /// anything else are dropped. The clipboard advances to the pasted set so
    /// repeated pastes cascade.
    pub fn paste(&mut self) -> Vec<ElementId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let mut remap = HashMap::new();
        let mut copies: Vec<CanvasElement> = self.clipboard.iter().map(|el| fresh_ids(el.clone(), &mut remap)).collect();
        for el in &mut copies {
            el.x += PASTE_OFFSET;
            el.y += PASTE_OFFSET;
            remap_bindings(el, &remap);
        }
        self.clipboard.clone_from(&copies);
        let ids = self.add_many(copies);
        self.selected_ids.clone_from(&ids);
        ids
    }
}

fn fresh_ids(mut el: CanvasElement, remap: &mut HashMap<ElementId, ElementId>) -> CanvasElement {
    let id = Uuid::new_v4();
    remap.insert(el.id, id);
    el.id = id;
    if let ElementKind::Group(GroupProps { children }) = el.kind {
        let children = children.into_iter().map(|c| fresh_ids(c, remap)).collect();
        el.kind = ElementKind::Group(GroupProps { children });
    }
    el
}

fn remap_bindings(el: &mut CanvasElement, remap: &HashMap<ElementId, ElementId>) {
    let follow = |b: Option<ArrowBinding>| {
        b.and_then(|b| remap.get(&b.element_id).map(|&element_id| ArrowBinding { element_id, ..b }))
    };
    match &mut el.kind {
        ElementKind::Arrow(a) => {
            a.start_binding = follow(a.start_binding);
            a.end_binding = follow(a.end_binding);
        }
        ElementKind::Group(g) => {
            for child in &mut g.children {
                remap_bindings(child, remap);
            }
        }
        ElementKind::Rectangle(_)
        | ElementKind::RoundedRectangle(_)
        | ElementKind::Circle(_)
        | ElementKind::Triangle(_)
        | ElementKind::Image(_)
        | ElementKind::Text(_) => {}
    }
}
