//! # classgraph
//!
//! Turns extracted class and interface declarations into a positioned UML
//! class diagram.
//!
//! ## Core Principles
//!
//! - **Parser Agnostic**: language front-ends implement `Extractor`, the core never parses
//! - **Total Stages**: analysis, filtering, layout and diffing never fail on well-formed input
//! - **Deterministic**: the same files always give the same diagram
//! - **Explicit Registry**: the caller owns the extension → extractor table
//!
//! ## Architecture
//!
//! ```text
//! SourceFile[] + Scope
//!     ↓
//! Extractors (per-language crates)
//!     ↓
//! Dependency Graph (import resolution, cycles)
//!     ↓
//! Scope Filter (project / file view)
//!     ↓
//! Relationship Analyzer (inheritance, realization, association, ...)
//!     ↓
//! Layout Engine (layered, Sugiyama)
//!     ↓
//! Diagram Differ (position-preserving updates)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use classgraph::{DiagramPipeline, RelationshipType, Scope};
//! use classgraph_parser_api::{ExtractorRegistry, SourceFile};
//! use classgraph_typescript::TypeScriptExtractor;
//! use std::sync::Arc;
//!
//! let registry = ExtractorRegistry::new().with(Arc::new(TypeScriptExtractor::new()));
//! let pipeline = DiagramPipeline::new(registry);
//!
//! let files = vec![
//!     SourceFile::new("person", "src/Person.ts", "export class Person { name: string; }"),
//!     SourceFile::new(
//!         "employee",
//!         "src/Employee.ts",
//!         "import { Person } from './Person';\nexport class Employee extends Person { id: string; }",
//!     ),
//! ];
//!
//! let output = pipeline.run(&files, &Scope::file("employee"));
//! assert_eq!(output.diagram.nodes.len(), 2);
//! assert_eq!(output.diagram.edges[0].kind, RelationshipType::Inheritance);
//! ```

#![deny(unsafe_code)]

pub mod analysis;
pub mod diagram;
pub mod diff;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod scope;
pub mod type_ref;

// Re-export main types
pub use analysis::{analyze, analyze_entities, Relationship, RelationshipType};
pub use diagram::{Diagram, DiagramEdge, DiagramNode, NodeDisplay, NodeKind, Point};
pub use diff::{compute_diagram_diff, has_significant_changes, merge_preserving_positions, DiagramDiff};
pub use error::{PipelineError, Result};
pub use graph::{
    collect_related_entities, resolve_paths, DependencyGraph, DependencyNode, ResolverConfig,
};
pub use layout::{calculate_node_dimensions, layout, LayoutDirection, LayoutOptions};
pub use pipeline::{DiagramOutput, DiagramPipeline, DiagramUpdate, PipelineConfig};
pub use scope::{
    filter_by_scope, filter_by_scope_with, FilteredEntitySet, InclusionReason, Scope,
    ScopeFilterConfig,
};
