//! End-to-end orchestration of one diagram update.
//!
//! ```text
//! SourceFile[] ─► extract ─► dependency graph ─► scope filter
//!                                                    │
//!        Diagram ◄── layout ◄── projection ◄── relationship analysis
//! ```

use crate::analysis::{analyze_entities, Relationship};
use crate::diagram::Diagram;
use crate::diff::{compute_diagram_diff, merge_preserving_positions, DiagramDiff};
use crate::error::{PipelineError, Result};
use crate::graph::{DependencyGraph, ResolverConfig};
use crate::layout::{layout, LayoutOptions};
use crate::scope::{filter_by_scope_with, FilteredEntitySet, Scope, ScopeFilterConfig};
use classgraph_parser_api::{
    EntitiesByFile, ExtractorRegistry, FileId, ParseError, SourceFile,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Directories never entered by [`DiagramPipeline::load_directory`]
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist"];

/// Settings for every stage after extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub resolver: ResolverConfig,
    pub scope_filter: ScopeFilterConfig,
    /// Replaces the scope's spacing preset when set
    pub layout: Option<LayoutOptions>,
    /// Build the dependency graph on the rayon pool
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_scope_filter(mut self, scope_filter: ScopeFilterConfig) -> Self {
        self.scope_filter = scope_filter;
        self
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    fn layout_for(&self, scope: &Scope) -> LayoutOptions {
        self.layout
            .clone()
            .unwrap_or_else(|| LayoutOptions::for_scope(scope))
    }
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct DiagramOutput {
    /// Positioned diagram of the filtered entities
    pub diagram: Diagram,
    pub relationships: Vec<Relationship>,
    pub filtered: FilteredEntitySet,
    /// Diagnostics per file; files without any are absent
    pub errors: BTreeMap<FileId, Vec<ParseError>>,
    pub graph: DependencyGraph,
}

/// Result of [`DiagramPipeline::update`]
#[derive(Debug, Clone)]
pub struct DiagramUpdate {
    /// Output whose diagram keeps the previous position of unchanged nodes
    pub output: DiagramOutput,
    /// Previous diagram against the merged one
    pub diff: DiagramDiff,
}

/// Runs extraction, graph building, filtering, analysis and layout.
///
/// Holds no state between runs; every call takes its full input.
#[derive(Debug, Clone)]
pub struct DiagramPipeline {
    registry: ExtractorRegistry,
    config: PipelineConfig,
}

impl DiagramPipeline {
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self::with_config(registry, PipelineConfig::default())
    }

    pub fn with_config(registry: ExtractorRegistry, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract every file with its registered extractor.
    ///
    /// Files without an extractor contribute nothing. A file that fails to
    /// parse contributes its diagnostics and no entities.
    pub fn extract(
        &self,
        files: &[SourceFile],
    ) -> (EntitiesByFile, BTreeMap<FileId, Vec<ParseError>>) {
        let mut entities_by_file = EntitiesByFile::new();
        let mut errors = BTreeMap::new();

        for file in files {
            let Some(extractor) = self.registry.for_file(file) else {
                debug!("Skipping {}: no extractor registered", file.path);
                continue;
            };
            let result = extractor.extract_file(file);
            if !result.errors.is_empty() {
                debug!("{}: {} diagnostics", file.path, result.errors.len());
                errors.insert(file.id.clone(), result.errors);
            }
            entities_by_file.insert(file.id.clone(), result.entities);
        }

        (entities_by_file, errors)
    }

    fn build_graph(&self, files: &[SourceFile], entities_by_file: &EntitiesByFile) -> DependencyGraph {
        if self.config.parallel {
            DependencyGraph::build_parallel(files, entities_by_file, &self.registry, &self.config.resolver)
        } else {
            DependencyGraph::build_with(files, entities_by_file, &self.registry, &self.config.resolver)
        }
    }

    /// Produce the positioned diagram of `files` as seen in `scope`
    pub fn run(&self, files: &[SourceFile], scope: &Scope) -> DiagramOutput {
        let start = Instant::now();

        let (entities_by_file, errors) = self.extract(files);
        let graph = self.build_graph(files, &entities_by_file);
        let filtered =
            filter_by_scope_with(&entities_by_file, scope, Some(&graph), &self.config.scope_filter);
        let relationships = analyze_entities(&filtered.entities);

        let mut diagram = Diagram::from_entities(&filtered.entities, &relationships);
        diagram.nodes = layout(&diagram.nodes, &diagram.edges, &self.config.layout_for(scope));

        info!(
            "Diagram built: {} files, {} of {} entities, {} edges in {:.2?}",
            files.len(),
            filtered.len(),
            filtered.total_before_filter,
            diagram.edges.len(),
            start.elapsed()
        );

        DiagramOutput {
            diagram,
            relationships,
            filtered,
            errors,
            graph,
        }
    }

    /// [`run`](Self::run), then stabilize against `previous`.
    ///
    /// Nodes whose content did not change keep their previous position.
    pub fn update(&self, files: &[SourceFile], scope: &Scope, previous: &Diagram) -> DiagramUpdate {
        let mut output = self.run(files, scope);
        output.diagram.nodes = merge_preserving_positions(&previous.nodes, &output.diagram.nodes);

        let diff = compute_diagram_diff(
            &previous.nodes,
            &output.diagram.nodes,
            &previous.edges,
            &output.diagram.edges,
        );
        debug!(
            "Diagram diff: +{} -{} ~{} nodes, +{} -{} ~{} edges",
            diff.nodes_added.len(),
            diff.nodes_removed.len(),
            diff.nodes_modified.len(),
            diff.edges_added.len(),
            diff.edges_removed.len(),
            diff.edges_modified.len()
        );

        DiagramUpdate { output, diff }
    }

    /// Read every file under `root` that has a registered extractor.
    ///
    /// Ids and paths are relative to `root` with `/` separators, sorted.
    /// Hidden directories and common build/dependency directories are skipped.
    pub fn load_directory(&self, root: impl AsRef<Path>) -> Result<Vec<SourceFile>> {
        let root = root.as_ref();
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                PipelineError::io(path, std::io::Error::from(e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = relative_path(root, path);
            if self.registry.for_path(&relative).is_none() {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
            files.push(SourceFile::new(relative.clone(), relative, content));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Loaded {} source files from {}", files.len(), root.display());
        Ok(files)
    }
}

/// Hidden directories and [`SKIPPED_DIRS`]
fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    let skipped = name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref());
    if skipped {
        debug!("Skipping directory {}", entry.path().display());
    }
    skipped
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
