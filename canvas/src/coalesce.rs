//! Single-slot mailbox for per-frame update coalescing.
//!
//! Pointer moves can arrive many times per frame. Each move offers its
//! computed update here, replacing whatever was pending; the frame tick takes
//! at most one. A gesture's final update is applied by taking the slot
//! synchronously instead of waiting for the next tick.

#[cfg(test)]
#[path = "coalesce_test.rs"]
mod coalesce_test;

/// Holds at most one pending value. Newer offers replace older ones.
#[derive(Debug, Clone)]
pub struct FrameMailbox<T> {
    pending: Option<T>,
    superseded: u64,
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self { pending: None, superseded: 0 }
    }
}

impl<T> FrameMailbox<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as the pending update, dropping any older one.
    pub fn offer(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.superseded += 1;
        }
    }

    /// Remove and return the pending update.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Number of offers dropped because a newer one replaced them.
    #[must_use]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
