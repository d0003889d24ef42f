//! # classgraph-typescript
//!
//! TypeScript/JavaScript front-end for classgraph - extracts classes, interfaces and imports.
//!
//! ## Features
//!
//! - Parse TypeScript, TSX, JavaScript and JSX sources with tree-sitter
//! - Extract classes (including abstract classes and named class expressions) and interfaces
//! - Members with visibility, `static`/`readonly`/`abstract`/optional flags, accessors and
//!   constructor parameter properties
//! - Positioned syntax diagnostics; per-declaration failures become warnings
//! - Import and re-export parsing for the dependency graph
//!
//! ## Quick Start
//!
//! ```rust
//! use classgraph_typescript::{Extractor, TypeScriptExtractor};
//!
//! let extractor = TypeScriptExtractor::new();
//! let result = extractor.extract("class Person { name: string; }", "Person");
//! assert_eq!(result.entities[0].properties[0].name, "name");
//! ```

mod extractor;
mod imports;
mod parser_impl;
mod syntax;
mod visitor;

// Re-export parser-api types for convenience
pub use classgraph_parser_api::{
    ExtractionResult, Extractor, ExtractorConfig, ExtractorMetrics, ImportInfo, ParseError,
};

pub use extractor::Dialect;
pub use imports::parse_imports;
pub use parser_impl::TypeScriptExtractor;
pub use visitor::DeclarationError;
