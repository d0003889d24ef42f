//! Visual projection of entities and relationships.
//!
//! Nodes and edges are disposable: they are rebuilt on every pipeline run and
//! only positions may be carried over, by the differ.

use crate::analysis::{Relationship, RelationshipType};
use crate::layout::calculate_node_dimensions;
use classgraph_parser_api::{Accessor, Method, Property, TypeEntity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-left position of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Class,
    Interface,
}

/// Text content of a class box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDisplay {
    pub name: String,
    /// `«interface»` or `«abstract»`
    pub stereotype: Option<String>,
    pub type_parameters: Vec<String>,
    pub properties: Vec<String>,
    pub methods: Vec<String>,
    pub file_id: String,
}

impl NodeDisplay {
    pub fn from_entity(entity: &TypeEntity) -> Self {
        let stereotype = if entity.is_interface() {
            Some("«interface»".to_string())
        } else if entity.is_abstract {
            Some("«abstract»".to_string())
        } else {
            None
        };

        Self {
            name: entity.name.clone(),
            stereotype,
            type_parameters: entity.type_parameters.clone(),
            properties: entity.properties.iter().map(property_line).collect(),
            methods: entity.methods.iter().map(method_line).collect(),
            file_id: entity.file_id.clone(),
        }
    }

    /// Name with type parameters, as shown in the header
    pub fn header_text(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}<{}>", self.name, self.type_parameters.join(", "))
        }
    }
}

/// `+ name?: Type`, with `{static}`/`{readonly}`/`{abstract}` suffixes
pub fn property_line(prop: &Property) -> String {
    let mut line = format!("{} {}", prop.visibility.symbol(), prop.name);
    if prop.is_optional {
        line.push('?');
    }
    if let Some(ty) = &prop.type_annotation {
        line.push_str(": ");
        line.push_str(ty);
    }
    push_modifiers(&mut line, prop.is_static, prop.is_readonly, prop.is_abstract);
    line
}

/// `+ name(a: A, ...rest: B[]): R`, with accessor and modifier markers
pub fn method_line(method: &Method) -> String {
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| {
            let mut param = String::new();
            if p.is_rest {
                param.push_str("...");
            }
            param.push_str(&p.name);
            if p.is_optional {
                param.push('?');
            }
            if let Some(ty) = &p.type_annotation {
                param.push_str(": ");
                param.push_str(ty);
            }
            param
        })
        .collect();

    let accessor = match method.accessor {
        Some(Accessor::Get) => "get ",
        Some(Accessor::Set) => "set ",
        None => "",
    };
    let mut line = format!(
        "{} {accessor}{}({})",
        method.visibility.symbol(),
        method.name,
        params.join(", ")
    );
    if let Some(ret) = &method.return_type {
        line.push_str(": ");
        line.push_str(ret);
    }
    push_modifiers(&mut line, method.is_static, false, method.is_abstract);
    line
}

fn push_modifiers(line: &mut String, is_static: bool, is_readonly: bool, is_abstract: bool) {
    if is_static {
        line.push_str(" {static}");
    }
    if is_readonly {
        line.push_str(" {readonly}");
    }
    if is_abstract {
        line.push_str(" {abstract}");
    }
}

/// A class box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    /// Entity id
    pub id: String,
    pub kind: NodeKind,
    pub display: NodeDisplay,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl DiagramNode {
    /// Node at the origin with content-driven dimensions
    pub fn from_entity(entity: &TypeEntity) -> Self {
        let display = NodeDisplay::from_entity(entity);
        let (width, height) = calculate_node_dimensions(&display);
        Self {
            id: entity.id.clone(),
            kind: if entity.is_interface() {
                NodeKind::Interface
            } else {
                NodeKind::Class
            },
            display,
            position: Point::default(),
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }
}

/// A relationship arrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

impl DiagramEdge {
    pub fn from_relationship(rel: &Relationship) -> Self {
        Self {
            id: rel.id.clone(),
            source: rel.source_id.clone(),
            target: rel.target_id.clone(),
            kind: rel.kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Nodes and edges handed to a renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Project entities and relationships; edges whose ends are not both
    /// among the entities are dropped.
    pub fn from_entities<'a>(
        entities: impl IntoIterator<Item = &'a TypeEntity>,
        relationships: &[Relationship],
    ) -> Self {
        let nodes: Vec<DiagramNode> = entities.into_iter().map(DiagramNode::from_entity).collect();
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges = relationships
            .iter()
            .filter(|r| ids.contains(r.source_id.as_str()) && ids.contains(r.target_id.as_str()))
            .map(DiagramEdge::from_relationship)
            .collect();
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Bounding box `(min, max)` of all nodes, `None` when empty
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.nodes.first()?;
        let mut min = first.position;
        let mut max = Point::new(first.position.x + first.width, first.position.y + first.height);
        for node in &self.nodes[1..] {
            min.x = min.x.min(node.position.x);
            min.y = min.y.min(node.position.y);
            max.x = max.x.max(node.position.x + node.width);
            max.y = max.y.max(node.position.y + node.height);
        }
        Some((min, max))
    }
}
