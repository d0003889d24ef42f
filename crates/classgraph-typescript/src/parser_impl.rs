//! Implementation of the Extractor trait for TypeScript/JavaScript

use classgraph_parser_api::{
    ExtractionResult, Extractor, ExtractorConfig, ExtractorMetrics, FileId, ImportInfo, SourceFile,
};
use rayon::prelude::*;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::extractor::{self, Dialect};
use crate::imports;

/// TypeScript/JavaScript extractor implementing the Extractor trait
pub struct TypeScriptExtractor {
    config: ExtractorConfig,
    metrics: Mutex<ExtractorMetrics>,
}

impl TypeScriptExtractor {
    /// Create a new TypeScript extractor with default configuration
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create a new TypeScript extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ExtractorMetrics::default()),
        }
    }

    /// Extract many files in parallel, keeping input order
    pub fn extract_all(&self, files: &[SourceFile]) -> Vec<(FileId, ExtractionResult)> {
        files
            .par_iter()
            .map(|file| (file.id.clone(), self.extract_file(file)))
            .collect()
    }

    fn run(&self, source: &str, file_id: &str, dialect: Dialect) -> ExtractionResult {
        let start = Instant::now();
        let result = extractor::extract(source, file_id, dialect, &self.config);
        self.update_metrics(
            result.is_ok(),
            start.elapsed(),
            result.entities.len(),
            result.errors.len(),
        );
        result
    }

    /// Update metrics after extracting a file
    fn update_metrics(&self, success: bool, duration: Duration, entities: usize, diagnostics: usize) {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(success, duration, entities, diagnostics);
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TypeScriptExtractor {
    fn language(&self) -> &str {
        "typescript"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".ts", ".tsx", ".js", ".jsx"]
    }

    fn extract(&self, source: &str, file_id: &str) -> ExtractionResult {
        self.run(source, file_id, Dialect::from_path(Path::new(file_id)))
    }

    fn extract_file(&self, file: &SourceFile) -> ExtractionResult {
        self.run(&file.content, &file.id, Dialect::from_path(Path::new(&file.path)))
    }

    fn parse_imports(&self, source: &str, file_path: &str) -> Vec<ImportInfo> {
        imports::parse_imports(source, file_path)
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn metrics(&self) -> ExtractorMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reset_metrics(&mut self) {
        *self
            .metrics
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = ExtractorMetrics::default();
    }
}
