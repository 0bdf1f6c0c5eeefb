//! Diagram import for the sketchboard canvas.
//!
//! Text in one of three notations becomes a graph, the graph is laid out,
//! and the layout is compiled into connected canvas elements that land in a
//! [`canvas::store::Store`] as one undoable step.
//!
//! | Module | Role |
//! |--------|------|
//! | [`diagram`] | Grammars, graph model, layout, element compiler |
//! | [`import`] | Parse → layout → compile → store pipeline |
//! | [`config`] | `SKETCHBOARD_*` environment configuration |

pub mod config;
pub mod diagram;
pub mod import;
