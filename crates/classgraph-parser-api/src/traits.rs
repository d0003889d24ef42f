use crate::{
    config::ExtractorConfig, entities::TypeEntity, errors::ParseError, imports::ImportInfo,
    metrics::ExtractorMetrics,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Identifier of a source file, assigned by the file store
pub type FileId = String;

/// Extracted entities grouped by the file that declares them
pub type EntitiesByFile = BTreeMap<FileId, Vec<TypeEntity>>;

/// A source file as supplied by the surrounding file store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: FileId,

    /// Project-relative path with `/` separators
    pub path: String,

    pub content: String,
}

impl SourceFile {
    pub fn new(id: impl Into<FileId>, path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    /// Extension including the leading dot (`.ts`)
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
    }
}

/// Outcome of extracting one file.
///
/// A whole-file syntax failure yields error diagnostics and no entities.
/// Failures confined to one declaration show up as warnings next to the
/// entities that could still be extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub entities: Vec<TypeEntity>,
    pub errors: Vec<ParseError>,
}

impl ExtractionResult {
    pub fn new(entities: Vec<TypeEntity>, errors: Vec<ParseError>) -> Self {
        Self { entities, errors }
    }

    /// Empty, successful result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Failed result: no entities, only diagnostics
    pub fn failed(errors: Vec<ParseError>) -> Self {
        Self {
            entities: Vec::new(),
            errors,
        }
    }

    /// True when no diagnostic has error severity
    pub fn is_ok(&self) -> bool {
        !self.errors.iter().any(ParseError::is_error)
    }
}

/// Capability implemented by every language front-end.
///
/// Implementations must never panic or return early on malformed input:
/// every problem is reported through [`ExtractionResult::errors`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a registry can be shared across
/// parallel graph construction.
pub trait Extractor: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "typescript")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g., [".ts", ".tsx"])
    fn file_extensions(&self) -> &[&str];

    /// Extract type entities from source text
    ///
    /// # Arguments
    /// * `source` - Source code string
    /// * `file_id` - Identifier used to derive entity ids
    fn extract(&self, source: &str, file_id: &str) -> ExtractionResult;

    /// Extract a whole [`SourceFile`].
    ///
    /// Override when the file path selects a grammar variant.
    fn extract_file(&self, file: &SourceFile) -> ExtractionResult {
        self.extract(&file.content, &file.id)
    }

    /// Parse the import-like statements of a file. Results are unresolved.
    fn parse_imports(&self, source: &str, file_path: &str) -> Vec<ImportInfo>;

    /// Check if this extractor can handle the given file
    ///
    /// Default implementation checks file extension.
    fn can_extract(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get extractor configuration
    fn config(&self) -> &ExtractorConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ExtractorMetrics;

    /// Reset metrics
    fn reset_metrics(&mut self);
}
