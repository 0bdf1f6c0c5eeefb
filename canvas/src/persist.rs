//! Saved-state encoding.
//!
//! The persisted record is `{ elements, selectedIds, viewport }` as JSON.
//! Loading is forgiving: an empty or structurally invalid record means "no
//! saved state", never an error the caller has to handle.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde_json::Value;

use crate::history::Snapshot;

/// The persisted record has the same shape as a history snapshot.
pub type SavedState = Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("saved state is corrupt: {reason}")]
    Corrupt { reason: String },
    #[error("saved state io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("saved state json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Corrupt { .. } => "E_STATE_CORRUPT",
            Self::Io(_) => "E_STATE_IO",
            Self::Json(_) => "E_STATE_JSON",
        }
    }
}

/// Strictly decode a saved-state record.
///
/// # Errors
///
/// Returns [`PersistError::Corrupt`] when the text is blank, not an object,
/// or lacks an `elements` array, and [`PersistError::Json`] when the record
/// does not decode.
pub fn decode_state(text: &str) -> Result<SavedState, PersistError> {
    if text.trim().is_empty() {
        return Err(PersistError::Corrupt { reason: "empty record".into() });
    }
    let value: Value = serde_json::from_str(text)?;
    match value.get("elements") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err(PersistError::Corrupt { reason: "`elements` is not an array".into() }),
        None => return Err(PersistError::Corrupt { reason: "missing `elements`".into() }),
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode a saved-state record, discarding anything unusable.
#[must_use]
pub fn load_state(text: &str) -> Option<SavedState> {
    match decode_state(text) {
        Ok(state) => {
            tracing::info!(elements = state.elements.len(), "loaded saved state");
            Some(state)
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "discarding saved state");
            None
        }
    }
}

/// Encode a saved-state record as pretty JSON.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn save_state(state: &SavedState) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(state)?)
}
