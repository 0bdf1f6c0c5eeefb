//! Text → store import pipeline.
//!
//! Parses diagram text, lays it out, compiles it to elements, and appends the
//! result to a [`Store`] as a single undoable step. The new elements end up
//! selected and the viewport is fitted around them.

use canvas::camera::{Point, Viewport, ViewportPatch};
use canvas::consts::FIT_PADDING_PX;
use canvas::doc::ElementId;
use canvas::hit::bounding_box;
use canvas::store::Store;
use tracing::info;

use crate::diagram::{CompileOptions, Grammar, LayoutError, ParseError, compile, layout_auto};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl ImportError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Layout(e) => e.error_code(),
        }
    }
}

/// Where and how imported diagrams land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    /// Document point the layout's origin is placed at.
    pub origin: Point,
    pub compile: CompileOptions,
    /// Screen size the viewport is fitted against.
    pub screen_width: f64,
    pub screen_height: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            origin: Point::new(100.0, 100.0),
            compile: CompileOptions::default(),
            screen_width: 1280.0,
            screen_height: 800.0,
        }
    }
}

/// Import `text` into `store` and return the new element ids.
///
/// All elements are added in one history entry on top of the existing
/// stack, then selected. The viewport is fitted to their bounding box.
///
/// # Errors
///
/// Returns [`ImportError`] when the text does not parse or the graph cannot
/// be laid out. The store is not touched in that case.
pub fn import_diagram(
    store: &mut Store,
    grammar: Grammar,
    text: &str,
    options: &ImportOptions,
) -> Result<Vec<ElementId>, ImportError> {
    let graph = grammar.parse(text)?;
    let positioned = layout_auto(&graph)?;
    let elements = compile(&graph, &positioned, options.origin, &options.compile);
    let bounds = bounding_box(&elements);

    // `add_many` stacks the batch above the existing elements, keeping the
    // compiled order.
    let ids = store.add_many(elements);
    store.select(&ids);

    if let Some(fit) = Viewport::fit_to(bounds, options.screen_width, options.screen_height, FIT_PADDING_PX) {
        store.update_viewport(ViewportPatch { x: Some(fit.x), y: Some(fit.y), scale: Some(fit.scale) });
    }

    info!(
        grammar = %grammar,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        elements = ids.len(),
        strategy = ?positioned.strategy,
        "imported diagram"
    );
    Ok(ids)
}

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;
