//! classgraph Parser API
//!
//! Shared data model and capability trait for classgraph language front-ends.
//!
//! This crate defines:
//!
//! - **Extractor trait**: The interface every language front-end implements
//! - **Entity types**: [`TypeEntity`] (class or interface) with its properties and methods
//! - **Imports**: [`ImportInfo`] records produced by import parsing
//! - **Diagnostics**: [`ParseError`] with line, column and [`Severity`]
//! - **Registry**: a caller-owned extension → extractor table
//! - **Configuration** and **Metrics**
//!
//! # Example
//!
//! ```rust,ignore
//! use classgraph_parser_api::{ExtractionResult, Extractor, ExtractorConfig, ImportInfo};
//!
//! struct MyExtractor {
//!     config: ExtractorConfig,
//! }
//!
//! impl Extractor for MyExtractor {
//!     fn language(&self) -> &str {
//!         "mylang"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".my"]
//!     }
//!
//!     fn extract(&self, source: &str, file_id: &str) -> ExtractionResult {
//!         // Implementation here
//!         ExtractionResult::empty()
//!     }
//!
//!     fn parse_imports(&self, source: &str, file_path: &str) -> Vec<ImportInfo> {
//!         Vec::new()
//!     }
//!
//!     // config(), metrics(), reset_metrics() ...
//! }
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod imports;
pub mod metrics;
pub mod registry;
pub mod traits;


// Re-export commonly used types
pub use config::ExtractorConfig;
pub use entities::{
    entity_id, Accessor, EntityKind, Method, Parameter, Property, TypeEntity, Visibility,
};
pub use errors::{ExtractorError, ParseError, Severity};
pub use imports::{ImportInfo, DEFAULT_IMPORT_NAME};
pub use metrics::ExtractorMetrics;
pub use registry::ExtractorRegistry;
pub use traits::{EntitiesByFile, ExtractionResult, Extractor, FileId, SourceFile};
