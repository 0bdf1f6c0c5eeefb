//! Renderer contract and the scene operations built on it.
//!
//! Drawing, image decoding, and frame capture belong to an external
//! renderer. The canvas core only drives it through [`Renderer`] and
//! tolerates it being slow or failing: a failed element render is logged and
//! skipped, and a failed export is surfaced as [`RenderError`]. Nothing here
//! mutates the store.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Rect, Viewport};
use crate::doc::{CanvasElement, ElementId};
use crate::hit::bounding_box;
use crate::store::Store;

/// A captured RGBA bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer failed: {0}")]
    Backend(String),
    #[error("nothing selected to export")]
    EmptySelection,
}

impl RenderError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "E_RENDERER",
            Self::EmptySelection => "E_EMPTY_SELECTION",
        }
    }
}

/// Host-provided drawing backend.
#[async_trait::async_trait]
pub trait Renderer: Send {
    /// Draw one element. Re-rendering an id replaces its previous visual.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Backend`] when the backend rejects the element.
    async fn render_element(&mut self, element: &CanvasElement) -> Result<(), RenderError>;

    /// Move, rotate, and restack existing visuals without redrawing content.
    fn update_elements_transform(&mut self, elements: &[CanvasElement]);

    fn update_viewport(&mut self, viewport: Viewport);

    /// Capture the named elements inside `bounds`, padded by `padding`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Backend`] when capture fails.
    async fn export_selected_elements(
        &mut self,
        ids: &[ElementId],
        bounds: Rect,
        padding: f64,
    ) -> Result<RasterSurface, RenderError>;
}

/// Outcome of a full scene sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneSync {
    pub rendered: usize,
    pub failed: usize,
}

/// Render every element in z-order, then push transforms and the viewport.
///
/// Element failures are logged and counted; the sync carries on.
pub async fn sync_scene<R: Renderer + ?Sized>(store: &Store, renderer: &mut R) -> SceneSync {
    let mut sync = SceneSync::default();
    for el in store.elements() {
        match renderer.render_element(el).await {
            Ok(()) => sync.rendered += 1,
            Err(e) => {
                tracing::warn!(id = %el.id, error = %e, "element render failed");
                sync.failed += 1;
            }
        }
    }
    renderer.update_elements_transform(store.elements());
    renderer.update_viewport(store.viewport());
    sync
}

/// Export the current selection as a bitmap.
///
/// # Errors
///
/// Returns [`RenderError::EmptySelection`] when nothing is selected, or the
/// renderer's error when capture fails.
pub async fn export_selection<R: Renderer + ?Sized>(
    store: &Store,
    renderer: &mut R,
    padding: f64,
) -> Result<RasterSurface, RenderError> {
    let selected = store.selected_elements();
    if selected.is_empty() {
        return Err(RenderError::EmptySelection);
    }
    let bounds = bounding_box(selected);
    let ids = store.selected_ids().to_vec();
    renderer.export_selected_elements(&ids, bounds, padding).await.inspect_err(|e| {
        tracing::warn!(error = %e, count = ids.len(), "selection export failed");
    })
}
