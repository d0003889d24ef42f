//! JSON format export for web renderers.
//!
//! Generates JSON with "nodes" and "edges" arrays. Nodes carry top-left
//! positions and sizes, edges carry the relationship type.

use crate::diagram::{Diagram, DiagramNode};
use crate::Result;
use serde_json::{json, Value};

/// Export a diagram as pretty-printed JSON
pub fn export_json(diagram: &Diagram) -> Result<String> {
    let nodes: Vec<Value> = diagram.nodes.iter().map(node_to_json).collect();
    let edges = serde_json::to_value(&diagram.edges)?;

    let result = json!({
        "nodes": nodes,
        "edges": edges,
    });

    Ok(serde_json::to_string_pretty(&result)?)
}

/// Read back a diagram written by [`export_json`]
pub fn diagram_from_json(input: &str) -> Result<Diagram> {
    Ok(serde_json::from_str(input)?)
}

fn node_to_json(node: &DiagramNode) -> Value {
    json!({
        "id": node.id,
        "kind": node.kind,
        "display": node.display,
        "position": node.position,
        "width": node.width,
        "height": node.height,
    })
}
