//! Export module for handing diagrams to renderers.
//!
//! Supports:
//! - **JSON**: positioned nodes and typed edges for web renderers
//! - **DOT**: Graphviz record boxes with UML arrow styles

pub mod dot;
pub mod json;

pub use dot::{export_dot, export_dot_styled, DotOptions};
pub use json::{diagram_from_json, export_json};
