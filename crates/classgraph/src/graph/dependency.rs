//! File-level import graph.
//!
//! Nodes live in a map keyed by file id and refer to each other by id only, so
//! import cycles need no special representation.

use super::algorithms::strongly_connected_components;
use super::resolver::{path_table, resolve_paths_with, PathTable, ResolverConfig};
use classgraph_parser_api::{
    EntitiesByFile, ExtractorRegistry, FileId, ImportInfo, SourceFile, TypeEntity,
};
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One file of the import graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub file_id: FileId,
    pub file_path: String,
    /// Imports with resolution filled in
    pub imports: Vec<ImportInfo>,
    /// Project files this file imports; never contains `file_id` itself
    pub imported_file_ids: BTreeSet<FileId>,
    pub entities: Vec<TypeEntity>,
}

impl DependencyNode {
    pub fn new(file_id: impl Into<FileId>, file_path: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_path: file_path.into(),
            imports: Vec::new(),
            imported_file_ids: BTreeSet::new(),
            entities: Vec::new(),
        }
    }

    /// Set resolved imports and derive `imported_file_ids` from them
    pub fn with_imports(mut self, imports: Vec<ImportInfo>) -> Self {
        self.imported_file_ids = imports
            .iter()
            .filter_map(|i| i.resolved_file_id.clone())
            .filter(|id| *id != self.file_id)
            .collect();
        self.imports = imports;
        self
    }

    pub fn with_entities(mut self, entities: Vec<TypeEntity>) -> Self {
        self.entities = entities;
        self
    }
}

/// Import graph over a project's files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<FileId, DependencyNode>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph with the default resolver configuration.
    ///
    /// Imports are parsed by the extractor registered for each file's
    /// extension; files without one get a node with no imports.
    pub fn build(
        files: &[SourceFile],
        entities_by_file: &EntitiesByFile,
        registry: &ExtractorRegistry,
    ) -> Self {
        Self::build_with(files, entities_by_file, registry, &ResolverConfig::default())
    }

    pub fn build_with(
        files: &[SourceFile],
        entities_by_file: &EntitiesByFile,
        registry: &ExtractorRegistry,
        config: &ResolverConfig,
    ) -> Self {
        let table = path_table(files);
        let graph: Self = files
            .iter()
            .map(|file| build_node(file, entities_by_file, registry, &table, config))
            .collect();
        debug!("Built dependency graph: {} files", graph.len());
        graph
    }

    /// [`build_with`](Self::build_with) with files processed on the rayon pool
    pub fn build_parallel(
        files: &[SourceFile],
        entities_by_file: &EntitiesByFile,
        registry: &ExtractorRegistry,
        config: &ResolverConfig,
    ) -> Self {
        let table = path_table(files);
        let nodes: Vec<DependencyNode> = files
            .par_iter()
            .map(|file| build_node(file, entities_by_file, registry, &table, config))
            .collect();
        let graph: Self = nodes.into_iter().collect();
        debug!("Built dependency graph in parallel: {} files", graph.len());
        graph
    }

    /// Add or replace a node
    pub fn insert(&mut self, node: DependencyNode) {
        self.nodes.insert(node.file_id.clone(), node);
    }

    pub fn get(&self, file_id: &str) -> Option<&DependencyNode> {
        self.nodes.get(file_id)
    }

    /// Nodes in file id order
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Files imported by `node`, ordered by path then id
    pub fn imports_of<'g>(&'g self, node: &DependencyNode) -> Vec<&'g DependencyNode> {
        let mut imported: Vec<&DependencyNode> = node
            .imported_file_ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect();
        imported.sort_by(|a, b| {
            (a.file_path.as_str(), a.file_id.as_str()).cmp(&(b.file_path.as_str(), b.file_id.as_str()))
        });
        imported
    }

    /// Files that import `file_id`, in file id order
    pub fn importers_of(&self, file_id: &str) -> Vec<&DependencyNode> {
        self.nodes
            .values()
            .filter(|n| n.imported_file_ids.contains(file_id))
            .collect()
    }

    /// Import cycles: strongly connected components of more than one file.
    ///
    /// Each cycle is sorted, and cycles are ordered by their first file id.
    pub fn cycles(&self) -> Vec<Vec<FileId>> {
        let ids: Vec<&FileId> = self.nodes.keys().collect();
        let index_of: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let adjacency: Vec<Vec<usize>> = self
            .nodes
            .values()
            .map(|n| {
                n.imported_file_ids
                    .iter()
                    .filter_map(|id| index_of.get(id.as_str()).copied())
                    .collect()
            })
            .collect();

        let mut cycles: Vec<Vec<FileId>> = strongly_connected_components(&adjacency)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut files: Vec<FileId> =
                    component.into_iter().map(|i| ids[i].clone()).collect();
                files.sort();
                files
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl FromIterator<DependencyNode> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = DependencyNode>>(iter: I) -> Self {
        let mut graph = Self::new();
        for node in iter {
            graph.insert(node);
        }
        graph
    }
}

fn build_node(
    file: &SourceFile,
    entities_by_file: &EntitiesByFile,
    registry: &ExtractorRegistry,
    table: &PathTable,
    config: &ResolverConfig,
) -> DependencyNode {
    let imports = match registry.for_file(file) {
        Some(extractor) => {
            let parsed = extractor.parse_imports(&file.content, &file.path);
            resolve_paths_with(&parsed, &file.path, table, config)
        }
        None => {
            trace!("{}: no extractor, no imports", file.path);
            Vec::new()
        }
    };

    DependencyNode::new(file.id.clone(), file.path.clone())
        .with_imports(imports)
        .with_entities(entities_by_file.get(&file.id).cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, imports: &[&str]) -> DependencyNode {
        let imports = imports
            .iter()
            .map(|target| {
                let mut import = ImportInfo::new(format!("./{target}"), 1);
                import.resolved_file_id = Some(target.to_string());
                import
            })
            .collect();
        DependencyNode::new(id, format!("src/{id}.ts")).with_imports(imports)
    }

    #[test]
    fn test_self_import_excluded() {
        let n = node("a", &["a", "b"]);
        assert_eq!(n.imported_file_ids.len(), 1);
        assert!(n.imported_file_ids.contains("b"));
        assert_eq!(n.imports.len(), 2);
    }

    #[test]
    fn test_importers_of() {
        let graph: DependencyGraph = vec![node("a", &["c"]), node("b", &["c"]), node("c", &[])]
            .into_iter()
            .collect();

        let importers: Vec<_> = graph.importers_of("c").iter().map(|n| n.file_id.as_str()).collect();
        assert_eq!(importers, vec!["a", "b"]);
        assert!(graph.importers_of("a").is_empty());
    }

    #[test]
    fn test_cycles() {
        let graph: DependencyGraph = vec![
            node("a", &["b"]),
            node("b", &["a", "c"]),
            node("c", &["d"]),
            node("d", &["e"]),
            node("e", &["c"]),
            node("f", &[]),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            graph.cycles(),
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string(), "e".to_string()],
            ]
        );
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let graph: DependencyGraph = vec![node("a", &["b"]), node("b", &[])].into_iter().collect();
        assert!(graph.cycles().is_empty());
        assert!(DependencyGraph::new().cycles().is_empty());
    }

    #[test]
    fn test_imports_of_sorted_by_path() {
        let graph: DependencyGraph = vec![
            node("root", &["zeta", "alpha"]),
            DependencyNode::new("zeta", "a/first.ts"),
            DependencyNode::new("alpha", "z/last.ts"),
        ]
        .into_iter()
        .collect();

        let root = graph.get("root").unwrap();
        let order: Vec<_> = graph.imports_of(root).iter().map(|n| n.file_id.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha"]);
    }
}
