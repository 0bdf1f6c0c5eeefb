//! Bounded undo/redo history of document snapshots.
//!
//! The top of the `past` stack is always the state the store currently
//! shows. Undo moves that top onto `future` and exposes the new top; redo is
//! the mirror. A commit identical to the current top only clears `future`.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::camera::Viewport;
use crate::consts::HISTORY_LIMIT;
use crate::doc::{CanvasElement, ElementId};

/// Deep-value copy of everything undo restores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub elements: Vec<CanvasElement>,
    #[serde(default)]
    pub selected_ids: Vec<ElementId>,
    #[serde(default)]
    pub viewport: Viewport,
}

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self::with_limit(initial, HISTORY_LIMIT)
    }

    #[must_use]
    pub fn with_limit(initial: Snapshot, limit: usize) -> Self {
        let mut past = VecDeque::with_capacity(limit.min(HISTORY_LIMIT) + 1);
        past.push_back(initial);
        Self { past, future: Vec::new(), limit: limit.max(1) }
    }

    /// Record `snapshot` as the new current state.
    ///
    /// Returns `false` when it equals the current top and nothing was pushed.
    /// Either way the redo stack is cleared.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        self.future.clear();
        if self.past.back() == Some(&snapshot) {
            return false;
        }
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        true
    }

    /// Step back. Returns the snapshot to apply, or `None` at the boundary.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.past.len() <= 1 {
            return None;
        }
        let current = self.past.pop_back()?;
        self.future.push(current);
        self.past.back()
    }

    /// Step forward. Returns the snapshot to apply, or `None` at the boundary.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(next);
        self.past.back()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries, including the current state.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.past.back()
    }

    /// Drop all history and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.past.clear();
        self.future.clear();
        self.past.push_back(initial);
    }
}
