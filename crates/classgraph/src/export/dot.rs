//! DOT format export for Graphviz visualization.
//!
//! Class boxes become `record` nodes with header, property and method
//! compartments. Edges use UML arrowheads per relationship type.

use crate::analysis::RelationshipType;
use crate::diagram::{Diagram, DiagramNode, NodeKind};
use crate::layout::LayoutDirection;
use crate::Result;
use std::collections::HashMap;

/// Options for styling DOT export
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Fill colors by node kind (hex color codes)
    pub node_colors: HashMap<NodeKind, String>,
    /// Edge colors by relationship type (hex color codes)
    pub edge_colors: HashMap<RelationshipType, String>,
    /// Graph layout direction: TB, BT, LR, RL
    pub rankdir: String,
    /// Render property and method compartments
    pub show_members: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        let mut node_colors = HashMap::new();
        node_colors.insert(NodeKind::Class, "#FFE082".to_string());
        node_colors.insert(NodeKind::Interface, "#90CAF9".to_string());

        DotOptions {
            node_colors,
            edge_colors: HashMap::new(),
            rankdir: "TB".to_string(),
            show_members: true,
        }
    }
}

impl DotOptions {
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.rankdir = format!("{direction:?}");
        self
    }
}

/// Export diagram to Graphviz DOT format
pub fn export_dot(diagram: &Diagram) -> Result<String> {
    export_dot_styled(diagram, DotOptions::default())
}

/// Export diagram to Graphviz DOT format with custom styling
pub fn export_dot_styled(diagram: &Diagram, options: DotOptions) -> Result<String> {
    let mut output = String::new();

    // Header
    output.push_str("digraph class_diagram {\n");
    output.push_str(&format!("    rankdir={};\n", options.rankdir));
    output.push_str("    node [shape=record, style=filled, fontname=\"Helvetica\"];\n");
    output.push_str("    edge [fontname=\"Helvetica\"];\n\n");

    let mut ids: HashMap<&str, usize> = HashMap::new();
    for (i, node) in diagram.nodes.iter().enumerate() {
        ids.entry(node.id.as_str()).or_insert(i);

        let color = options
            .node_colors
            .get(&node.kind)
            .map(|s| s.as_str())
            .unwrap_or("#FFFFFF");

        output.push_str(&format!(
            "    n{i} [label=\"{}\", fillcolor=\"{color}\"];\n",
            record_label(node, options.show_members)
        ));
    }

    output.push('\n');

    for edge in &diagram.edges {
        let (Some(source), Some(target)) = (
            ids.get(edge.source.as_str()),
            ids.get(edge.target.as_str()),
        ) else {
            continue;
        };

        let mut attrs = vec![arrow_style(edge.kind).to_string()];
        if let Some(label) = &edge.label {
            attrs.push(format!("label=\"{}\"", escape_dot_label(label)));
        }
        if let Some(color) = options.edge_colors.get(&edge.kind) {
            attrs.push(format!("color=\"{color}\""));
        }

        output.push_str(&format!(
            "    n{source} -> n{target} [{}];\n",
            attrs.join(", ")
        ));
    }

    output.push_str("}\n");

    Ok(output)
}

fn arrow_style(kind: RelationshipType) -> &'static str {
    match kind {
        RelationshipType::Inheritance => "arrowhead=empty",
        RelationshipType::Realization => "arrowhead=empty, style=dashed",
        RelationshipType::Association => "arrowhead=vee",
        RelationshipType::Aggregation => "dir=both, arrowtail=odiamond, arrowhead=vee",
        RelationshipType::Dependency => "arrowhead=vee, style=dashed",
    }
}

/// `{header|props|methods}` with left-justified member lines
fn record_label(node: &DiagramNode, show_members: bool) -> String {
    let display = &node.display;
    let mut header = String::new();
    if let Some(stereotype) = &display.stereotype {
        header.push_str(&escape_record(stereotype));
        header.push_str("\\n");
    }
    header.push_str(&escape_record(&display.header_text()));

    if !show_members {
        return format!("{{{header}}}");
    }

    let compartment = |lines: &[String]| -> String {
        lines
            .iter()
            .map(|line| format!("{}\\l", escape_record(line)))
            .collect()
    };

    format!(
        "{{{header}|{}|{}}}",
        compartment(&display.properties),
        compartment(&display.methods)
    )
}

/// Escape record-label metacharacters on top of DOT string escaping
fn escape_record(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in escape_dot_label(s).chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape special characters for DOT labels
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_entities;
    use classgraph_parser_api::{Method, Property, TypeEntity};

    #[test]
    fn test_escape_dot_label() {
        assert_eq!(escape_dot_label("hello"), "hello");
        assert_eq!(escape_dot_label("line\\nbreak"), "line\\\\nbreak");
        assert_eq!(escape_dot_label("quote\"here"), "quote\\\"here");
    }

    #[test]
    fn test_escape_record() {
        assert_eq!(escape_record("Map<K, V>"), "Map\\<K, V\\>");
        assert_eq!(escape_record("{a|b}"), "\\{a\\|b\\}");
    }

    #[test]
    fn test_export_dot_records_and_arrows() {
        let shape = TypeEntity::interface("Shape", "s")
            .with_methods(vec![Method::new("area").with_return_type("number")]);
        let circle = TypeEntity::class("Circle", "c")
            .with_implements(vec!["Shape".into()])
            .with_properties(vec![Property::new("radius").with_type("number")]);
        let rels = analyze_entities([&shape, &circle]);
        let diagram = Diagram::from_entities([&shape, &circle], &rels);

        let dot = export_dot(&diagram).unwrap();
        assert!(dot.starts_with("digraph class_diagram {"));
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("n0 [label=\"{«interface»\\nShape||+ area(): number\\l}\""));
        assert!(dot.contains("n1 [label=\"{Circle|+ radius: number\\l|}\""));
        assert!(dot.contains("n1 -> n0 [arrowhead=empty, style=dashed];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_export_dot_styled() {
        let diagram = Diagram::from_entities([&TypeEntity::class("Box", "b")
            .with_type_parameters(vec!["T".into()])], &[]);
        let mut options = DotOptions {
            show_members: false,
            ..DotOptions::default()
        }
        .with_direction(LayoutDirection::LR);
        options.node_colors.insert(NodeKind::Class, "#000000".to_string());

        let dot = export_dot_styled(&diagram, options).unwrap();
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("n0 [label=\"{Box\\<T\\>}\", fillcolor=\"#000000\"];"));
    }
}
