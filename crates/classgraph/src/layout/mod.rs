//! Layered (Sugiyama) layout of class diagrams.
//!
//! ```text
//! edges ──► rust_sugiyama ──► edge orientation ──► longest-path ranks
//!                                                         │
//!   top-left positions ◄── center coordinates ◄───────────┘
//! ```
//!
//! The engine is deterministic: the same nodes and edges always produce the
//! same ordering and the same coordinates.

mod dimensions;
pub mod layering;

pub use dimensions::{
    calculate_node_dimensions, BOTTOM_PADDING, HEADER_CHAR_WIDTH, HEADER_HEIGHT,
    HORIZONTAL_PADDING, LINE_CHAR_WIDTH, LINE_HEIGHT, MIN_HEIGHT, MIN_WIDTH, SECTION_SPACING,
};
pub use layering::Layering;

use crate::diagram::{DiagramEdge, DiagramNode, Point};
use crate::scope::Scope;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction in which ranks advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Top to bottom
    #[default]
    TB,
    /// Bottom to top
    BT,
    /// Left to right
    LR,
    /// Right to left
    RL,
}

impl LayoutDirection {
    fn is_horizontal(self) -> bool {
        matches!(self, LayoutDirection::LR | LayoutDirection::RL)
    }

    fn is_reversed(self) -> bool {
        matches!(self, LayoutDirection::BT | LayoutDirection::RL)
    }
}

/// Spacing and ordering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    /// Gap between adjacent ranks
    pub rank_separation: f64,
    /// Gap between neighbors within a rank
    pub node_separation: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::file_scope()
    }
}

impl LayoutOptions {
    /// Dense preset for a single file and its imports
    pub fn file_scope() -> Self {
        Self {
            direction: LayoutDirection::TB,
            rank_separation: 80.0,
            node_separation: 50.0,
        }
    }

    /// Loose preset for whole-project diagrams
    pub fn project_scope() -> Self {
        Self {
            rank_separation: 120.0,
            node_separation: 80.0,
            ..Self::file_scope()
        }
    }

    pub fn for_scope(scope: &Scope) -> Self {
        match scope {
            Scope::Project => Self::project_scope(),
            Scope::File { .. } => Self::file_scope(),
        }
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_separation(mut self, rank: f64, node: f64) -> Self {
        self.rank_separation = rank;
        self.node_separation = node;
        self
    }
}

/// Position `nodes` so that edges flow along the configured direction.
///
/// Returns the nodes in input order with `position` set to the top-left
/// corner; sizes are kept. The smallest x and y are 0. Edges whose ends are
/// not among `nodes` are ignored, and cycles are drawn with their back edges
/// pointing against the flow.
pub fn layout(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    options: &LayoutOptions,
) -> Vec<DiagramNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    let pairs = edges.iter().filter_map(|edge| {
        let source = index.get(edge.source.as_str())?;
        let target = index.get(edge.target.as_str())?;
        Some((*source, *target))
    });
    let layering = layering::layer(nodes.len(), pairs);
    debug!("Layout: {} nodes in {} ranks", nodes.len(), layering.layers.len());

    let centers = assign_centers(nodes, &layering, options);

    let mut positioned: Vec<DiagramNode> = nodes
        .iter()
        .zip(centers)
        .map(|(node, center)| DiagramNode {
            position: Point::new(center.x - node.width / 2.0, center.y - node.height / 2.0),
            ..node.clone()
        })
        .collect();

    normalize(&mut positioned);
    positioned
}

/// Extent of a node along the rank axis and across it
fn extents(node: &DiagramNode, direction: LayoutDirection) -> (f64, f64) {
    if direction.is_horizontal() {
        (node.width, node.height)
    } else {
        (node.height, node.width)
    }
}

/// Center of every node
fn assign_centers(nodes: &[DiagramNode], layering: &Layering, options: &LayoutOptions) -> Vec<Point> {
    let direction = options.direction;
    let extent = |node: usize| extents(&nodes[node], direction);

    let mut centers = vec![Point::default(); nodes.len()];
    let mut rank_offset = 0.0;

    for layer in &layering.layers {
        let thickness = layer.iter().map(|&v| extent(v).0).fold(0.0, f64::max);
        let rank_center = rank_offset + thickness / 2.0;

        let breadth: f64 = layer.iter().map(|&v| extent(v).1).sum::<f64>()
            + options.node_separation * layer.len().saturating_sub(1) as f64;
        let mut cursor = -breadth / 2.0;

        for &node in layer {
            let across = extent(node).1;
            let cross_center = cursor + across / 2.0;
            cursor += across + options.node_separation;

            let along = if direction.is_reversed() {
                -rank_center
            } else {
                rank_center
            };
            centers[node] = if direction.is_horizontal() {
                Point::new(along, cross_center)
            } else {
                Point::new(cross_center, along)
            };
        }

        rank_offset += thickness + options.rank_separation;
    }

    centers
}

/// Shift nodes so the top-left of the bounding box is the origin
fn normalize(nodes: &mut [DiagramNode]) {
    let min_x = nodes.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min);
    let min_y = nodes.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min);
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    for node in nodes {
        node.position.x -= min_x;
        node.position.y -= min_y;
    }
}
