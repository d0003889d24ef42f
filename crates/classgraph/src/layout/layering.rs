//! Rank assignment and within-rank ordering.
//!
//! Cycle breaking and crossing reduction are delegated to `rust_sugiyama`,
//! which lays out every connected component on its own. Its result is then
//! re-ranked by longest path:
//!
//! 1. the crate's levels orient every edge, so cyclic input becomes a DAG;
//! 2. each node's rank is the length of the longest path reaching it;
//! 3. nodes within a rank are ordered by component, then by the crate's x.
//!
//! Nodes are identified by their position in the caller's node list.

use log::{debug, warn};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rust_sugiyama::configure::Config;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Two crate y coordinates closer than this belong to the same level
const LEVEL_TOLERANCE: f64 = 1e-6;

/// Ranked and ordered nodes ready for coordinate assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Layering {
    /// Rank of every node
    pub ranks: Vec<usize>,
    /// Node ids of each rank, in cross-axis order
    pub layers: Vec<Vec<usize>>,
}

/// Graph of nodes with unit edge weights
pub type NodeGraph = DiGraph<usize, ()>;

/// Build a petgraph graph over `node_count` nodes.
///
/// Self-loops, duplicate edges and out-of-range endpoints are dropped.
pub fn build_graph(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> NodeGraph {
    let mut graph = NodeGraph::with_capacity(node_count, 0);
    for i in 0..node_count {
        graph.add_node(i);
    }
    for (source, target) in edges {
        if source == target || source >= node_count || target >= node_count {
            continue;
        }
        let (a, b) = (NodeIndex::new(source), NodeIndex::new(target));
        if !graph.contains_edge(a, b) {
            graph.add_edge(a, b, ());
        }
    }
    graph
}

/// Longest-path ranking: sources get rank 0 and every edge points to a
/// strictly higher rank.
pub fn assign_ranks(dag: &NodeGraph) -> Vec<usize> {
    let mut ranks = vec![0; dag.node_count()];
    let order = match toposort(dag, None) {
        Ok(order) => order,
        Err(cycle) => {
            warn!(
                "Layout graph still cyclic at node {}, ranking by input order",
                cycle.node_id().index()
            );
            dag.node_indices().collect()
        }
    };

    for node in order {
        let rank = ranks[node.index()];
        for next in dag.neighbors_directed(node, Direction::Outgoing) {
            let slot = &mut ranks[next.index()];
            *slot = (*slot).max(rank + 1);
        }
    }
    ranks
}

/// Where the crate put one node
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    /// Smallest node id of the node's connected component
    component: usize,
    /// Level within the component, 0 at the sources
    level: usize,
    x: f64,
}

fn unique_edges(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Vec<(usize, usize)> {
    edges
        .into_iter()
        .filter(|&(source, target)| source != target && source < node_count && target < node_count)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn sequential_id(ids: &mut HashMap<usize, u32>, nodes: &mut Vec<usize>, node: usize) -> u32 {
    *ids.entry(node).or_insert_with(|| {
        nodes.push(node);
        (nodes.len() - 1) as u32
    })
}

/// Run the crate over the nodes that have edges.
///
/// Nodes without edges, and every node when the crate fails, get `None`.
fn sugiyama_placements(node_count: usize, edges: &[(usize, usize)]) -> Vec<Option<Placement>> {
    let mut placements = vec![None; node_count];
    if edges.is_empty() {
        return placements;
    }

    let mut ids: HashMap<usize, u32> = HashMap::new();
    let mut nodes: Vec<usize> = Vec::new();
    let mut sugiyama_edges: Vec<(u32, u32)> = Vec::with_capacity(edges.len());
    for &(source, target) in edges {
        let source = sequential_id(&mut ids, &mut nodes, source);
        let target = sequential_id(&mut ids, &mut nodes, target);
        sugiyama_edges.push((source, target));
    }

    let layouts = std::panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&sugiyama_edges, &config)
    });
    let layouts = match layouts {
        Ok(layouts) => layouts,
        Err(err) => {
            let reason = err
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| err.downcast_ref::<&str>().copied())
                .unwrap_or("unknown error");
            warn!(
                "Sugiyama engine failed on {} nodes ({reason}), ordering by input",
                nodes.len()
            );
            return placements;
        }
    };

    for (coords, _, _) in &layouts {
        let members: Vec<(usize, f64, f64)> = coords
            .iter()
            .filter_map(|&(id, (x, y))| nodes.get(id).map(|&node| (node, x, y)))
            .collect();
        let Some(component) = members.iter().map(|&(node, _, _)| node).min() else {
            continue;
        };

        let mut levels: Vec<f64> = members.iter().map(|&(_, _, y)| y).collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup_by(|a, b| (*a - *b).abs() < LEVEL_TOLERANCE);

        for &(node, x, y) in &members {
            let level = levels.partition_point(|&level_y| level_y < y - LEVEL_TOLERANCE);
            placements[node] = Some(Placement { component, level, x });
        }
    }

    normalize_orientation(&mut placements, edges);
    placements
}

/// Flip every component whose edges mostly point to lower levels, so that
/// level 0 always holds the sources whatever sign the crate gives y.
fn normalize_orientation(placements: &mut [Option<Placement>], edges: &[(usize, usize)]) {
    let mut balance: BTreeMap<usize, i64> = BTreeMap::new();
    for &(source, target) in edges {
        if let (Some(a), Some(b)) = (placements[source], placements[target]) {
            let entry = balance.entry(a.component).or_default();
            match a.level.cmp(&b.level) {
                Ordering::Less => *entry += 1,
                Ordering::Greater => *entry -= 1,
                Ordering::Equal => {}
            }
        }
    }

    let mut deepest: BTreeMap<usize, usize> = BTreeMap::new();
    for placement in placements.iter().flatten() {
        let level = deepest.entry(placement.component).or_default();
        *level = (*level).max(placement.level);
    }

    for placement in placements.iter_mut().flatten() {
        let upside_down = balance.get(&placement.component).is_some_and(|&b| b < 0);
        if let (true, Some(&max)) = (upside_down, deepest.get(&placement.component)) {
            placement.level = max - placement.level;
        }
    }
}

/// Rank every node by longest path and order each rank to reduce crossings
pub fn layer(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Layering {
    let edges = unique_edges(node_count, edges);
    let placements = sugiyama_placements(node_count, &edges);

    // (level, id) is a strict total order, so orienting by it leaves no cycle
    let rank_key = |node: usize| placements[node].map_or((0, node), |p| (p.level, node));
    let oriented = edges.iter().map(|&(source, target)| {
        if rank_key(source) < rank_key(target) {
            (source, target)
        } else {
            (target, source)
        }
    });
    let dag = build_graph(node_count, oriented);
    let ranks = assign_ranks(&dag);

    let rank_count = ranks.iter().max().map_or(0, |r| r + 1);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for (node, &rank) in ranks.iter().enumerate() {
        layers[rank].push(node);
    }

    let order_key = |node: usize| placements[node].map_or((node, 0.0), |p| (p.component, p.x));
    for layer in &mut layers {
        layer.sort_by(|&a, &b| {
            let (ca, xa) = order_key(a);
            let (cb, xb) = order_key(b);
            ca.cmp(&cb).then(xa.total_cmp(&xb)).then(a.cmp(&b))
        });
    }

    debug!(
        "Layered {} nodes and {} edges into {} ranks",
        node_count,
        edges.len(),
        layers.len()
    );

    Layering { ranks, layers }
}
