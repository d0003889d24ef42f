//! Change detection between two diagram snapshots.
//!
//! Nodes and edges are matched by id. A matched node is unchanged when its
//! kind, display payload and position are equal; a matched edge when its
//! endpoints, type and label are equal.

use crate::diagram::{Diagram, DiagramEdge, DiagramNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Every node and edge of two snapshots, in exactly one bucket each.
///
/// Added, modified and unchanged entries hold the new version in new order;
/// removed entries hold the old version in old order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramDiff {
    pub nodes_added: Vec<DiagramNode>,
    pub nodes_removed: Vec<DiagramNode>,
    pub nodes_modified: Vec<DiagramNode>,
    pub nodes_unchanged: Vec<DiagramNode>,
    pub edges_added: Vec<DiagramEdge>,
    pub edges_removed: Vec<DiagramEdge>,
    pub edges_modified: Vec<DiagramEdge>,
    pub edges_unchanged: Vec<DiagramEdge>,
}

impl DiagramDiff {
    pub fn between(old: &Diagram, new: &Diagram) -> Self {
        compute_diagram_diff(&old.nodes, &new.nodes, &old.edges, &new.edges)
    }

    /// True if anything was added, removed or modified
    pub fn has_significant_changes(&self) -> bool {
        !(self.nodes_added.is_empty()
            && self.nodes_removed.is_empty()
            && self.nodes_modified.is_empty()
            && self.edges_added.is_empty()
            && self.edges_removed.is_empty()
            && self.edges_modified.is_empty())
    }
}

/// Shorthand for [`DiagramDiff::has_significant_changes`]
pub fn has_significant_changes(diff: &DiagramDiff) -> bool {
    diff.has_significant_changes()
}

fn same_node(old: &DiagramNode, new: &DiagramNode) -> bool {
    same_content(old, new) && old.position == new.position
}

fn same_content(old: &DiagramNode, new: &DiagramNode) -> bool {
    old.kind == new.kind && old.display == new.display
}

fn same_edge(old: &DiagramEdge, new: &DiagramEdge) -> bool {
    old.source == new.source
        && old.target == new.target
        && old.kind == new.kind
        && old.label == new.label
}

/// Split `old` and `new` into added, removed, modified and unchanged items
fn classify<T: Clone>(
    old: &[T],
    new: &[T],
    id: impl Fn(&T) -> &str,
    same: impl Fn(&T, &T) -> bool,
) -> [Vec<T>; 4] {
    let mut old_by_id: HashMap<&str, &T> = HashMap::with_capacity(old.len());
    for item in old {
        old_by_id.entry(id(item)).or_insert(item);
    }

    let mut added = Vec::new();
    let mut modified = Vec::new();
    let mut unchanged = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(new.len());

    for item in new {
        if !seen.insert(id(item)) {
            continue;
        }
        match old_by_id.get(id(item)) {
            None => added.push(item.clone()),
            Some(previous) if same(previous, item) => unchanged.push(item.clone()),
            Some(_) => modified.push(item.clone()),
        }
    }

    let mut removed_ids: HashSet<&str> = HashSet::new();
    let removed = old
        .iter()
        .filter(|&item| !seen.contains(id(item)) && removed_ids.insert(id(item)))
        .cloned()
        .collect();

    [added, removed, modified, unchanged]
}

pub fn compute_diagram_diff(
    old_nodes: &[DiagramNode],
    new_nodes: &[DiagramNode],
    old_edges: &[DiagramEdge],
    new_edges: &[DiagramEdge],
) -> DiagramDiff {
    let [nodes_added, nodes_removed, nodes_modified, nodes_unchanged] =
        classify(old_nodes, new_nodes, |n| n.id.as_str(), same_node);
    let [edges_added, edges_removed, edges_modified, edges_unchanged] =
        classify(old_edges, new_edges, |e| e.id.as_str(), same_edge);

    DiagramDiff {
        nodes_added,
        nodes_removed,
        nodes_modified,
        nodes_unchanged,
        edges_added,
        edges_removed,
        edges_modified,
        edges_unchanged,
    }
}

/// `new_nodes`, except that a node whose kind and display payload match the
/// old node of the same id keeps the old position.
///
/// After merging, those nodes diff as unchanged against `old_nodes`.
pub fn merge_preserving_positions(
    old_nodes: &[DiagramNode],
    new_nodes: &[DiagramNode],
) -> Vec<DiagramNode> {
    let mut old_by_id: HashMap<&str, &DiagramNode> = HashMap::with_capacity(old_nodes.len());
    for node in old_nodes {
        old_by_id.entry(node.id.as_str()).or_insert(node);
    }

    new_nodes
        .iter()
        .map(|node| match old_by_id.get(node.id.as_str()) {
            Some(old) if same_content(old, node) => DiagramNode {
                position: old.position,
                ..node.clone()
            },
            _ => node.clone(),
        })
        .collect()
}
