//! Import resolution and the file-level dependency graph.

pub mod algorithms;
mod dependency;
pub mod resolver;

pub use algorithms::{
    collect_related_entities, reachable_files, strongly_connected_components, ReachedFile,
    DEFAULT_MAX_DEPTH,
};
pub use dependency::{DependencyGraph, DependencyNode};
pub use resolver::{
    normalize_path, path_table, resolve_paths, resolve_paths_with, PathTable, ResolverConfig,
};
