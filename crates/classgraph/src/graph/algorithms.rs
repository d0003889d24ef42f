//! Graph traversal algorithms over the import graph.
//!
//! Provides depth-bounded BFS and Tarjan's SCC. Both are iterative and keep an
//! explicit visited set, so cyclic imports terminate and deep graphs do not
//! grow the call stack.

use super::dependency::DependencyGraph;
use classgraph_parser_api::TypeEntity;
use std::collections::{HashSet, VecDeque};

/// Default traversal depth for related-entity collection and scope filtering
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// A file reached by [`reachable_files`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachedFile<'g> {
    pub file_id: &'g str,
    /// Import hops from the start file (1 for direct imports)
    pub depth: usize,
    /// The file whose import reached this one
    pub importer: &'g str,
}

/// Breadth-first traversal of imports starting at `start`.
///
/// Returns every file reachable within `max_depth` import hops, excluding the
/// start file, each exactly once, in BFS order. Imports of one file are
/// visited in path order.
pub fn reachable_files<'g>(
    graph: &'g DependencyGraph,
    start: &str,
    max_depth: usize,
) -> Vec<ReachedFile<'g>> {
    let mut result = Vec::new();
    let Some(start_node) = graph.get(start) else {
        return result;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start_node.file_id.as_str());
    queue.push_back((start_node, 0)); // (node, depth)

    while let Some((current, depth)) = queue.pop_front() {
        // Check depth limit
        if depth >= max_depth {
            continue;
        }

        for neighbor in graph.imports_of(current) {
            if visited.insert(neighbor.file_id.as_str()) {
                result.push(ReachedFile {
                    file_id: &neighbor.file_id,
                    depth: depth + 1,
                    importer: &current.file_id,
                });
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    result
}

/// Entities of `start_file_id` and of every file it reaches within `max_depth`.
///
/// Each file contributes its entities once, even over import cycles.
pub fn collect_related_entities<'g>(
    start_file_id: &str,
    graph: &'g DependencyGraph,
    max_depth: usize,
) -> Vec<&'g TypeEntity> {
    let Some(start) = graph.get(start_file_id) else {
        return Vec::new();
    };

    let mut entities: Vec<&TypeEntity> = start.entities.iter().collect();
    for reached in reachable_files(graph, start_file_id, max_depth) {
        if let Some(node) = graph.get(reached.file_id) {
            entities.extend(node.entities.iter());
        }
    }
    entities
}

const UNVISITED: usize = usize::MAX;

/// Find all strongly connected components using Tarjan's algorithm.
///
/// `adjacency[v]` lists the successors of node `v`. Components are returned in
/// reverse topological order; singletons are included.
pub fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut components = Vec::new();
    let mut next_index = 0;

    // Explicit call stack of (node, next successor position)
    let mut call: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        call.push((root, 0));

        while let Some(frame) = call.last_mut() {
            let v = frame.0;
            if let Some(&w) = adjacency[v].get(frame.1) {
                frame.1 += 1;
                if index[w] == UNVISITED {
                    index[w] = next_index;
                    lowlink[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                continue;
            }

            call.pop();
            if let Some(&(parent, _)) = call.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if lowlink[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyNode;
    use classgraph_parser_api::ImportInfo;

    fn node(id: &str, imports: &[&str], entities: &[&str]) -> DependencyNode {
        let imports = imports
            .iter()
            .map(|target| {
                let mut import = ImportInfo::new(format!("./{target}"), 1);
                import.resolved_file_id = Some(target.to_string());
                import
            })
            .collect();
        DependencyNode::new(id, format!("{id}.ts"))
            .with_imports(imports)
            .with_entities(entities.iter().map(|e| TypeEntity::class(*e, id)).collect())
    }

    // a -> b -> c -> d -> e -> f -> g
    fn linear_chain() -> DependencyGraph {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let next: Vec<&str> = ids.get(i + 1).into_iter().copied().collect();
                node(id, &next, &[])
            })
            .collect()
    }

    #[test]
    fn test_bfs_respects_max_depth() {
        let graph = linear_chain();

        let reached = reachable_files(&graph, "a", 5);
        let ids: Vec<_> = reached.iter().map(|r| r.file_id).collect();
        assert_eq!(ids, vec!["b", "c", "d", "e", "f"]);
        assert_eq!(reached[4].depth, 5);
        assert_eq!(reached[4].importer, "e");

        assert!(reachable_files(&graph, "a", 0).is_empty());
        assert!(reachable_files(&graph, "missing", 5).is_empty());
    }

    #[test]
    fn test_bfs_terminates_on_cycle() {
        let graph: DependencyGraph = vec![node("a", &["b"], &["A"]), node("b", &["a"], &["B"])]
            .into_iter()
            .collect();

        let reached = reachable_files(&graph, "a", 5);
        assert_eq!(reached.len(), 1);
        assert_eq!(reached[0].file_id, "b");

        let names: Vec<_> = collect_related_entities("a", &graph, DEFAULT_MAX_DEPTH)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_bfs_visits_diamond_once() {
        let graph: DependencyGraph = vec![
            node("a", &["b", "c"], &[]),
            node("b", &["d"], &[]),
            node("c", &["d"], &[]),
            node("d", &[], &["D"]),
        ]
        .into_iter()
        .collect();

        let reached = reachable_files(&graph, "a", 5);
        let ids: Vec<_> = reached.iter().map(|r| r.file_id).collect();
        assert_eq!(ids, vec!["b", "c", "d"]);
        assert_eq!(reached[2].importer, "b");
        assert_eq!(collect_related_entities("a", &graph, 5).len(), 1);
    }

    #[test]
    fn test_tarjan_components() {
        // 0 <-> 1, 2 -> 3 -> 4 -> 2, 5 alone
        let adjacency = vec![vec![1], vec![0, 2], vec![3], vec![4], vec![2], vec![]];
        let mut components: Vec<Vec<usize>> = strongly_connected_components(&adjacency)
            .into_iter()
            .map(|mut c| {
                c.sort();
                c
            })
            .collect();
        components.sort();

        assert_eq!(components, vec![vec![0, 1], vec![2, 3, 4], vec![5]]);
    }

    #[test]
    fn test_tarjan_deep_chain_does_not_overflow() {
        let n = 100_000;
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| if i + 1 < n { vec![i + 1] } else { vec![0] })
            .collect();

        let components = strongly_connected_components(&adjacency);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), n);
    }
}
