//! Caller-owned mapping from file extension to [`Extractor`].

use crate::traits::{Extractor, SourceFile};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Extension → extractor table, built by the caller and passed into the pipeline.
///
/// Extensions are stored lowercase with their leading dot. Registering a second
/// extractor for an extension replaces the first.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    by_extension: BTreeMap<String, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor under every extension it declares
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) -> &mut Self {
        for ext in extractor.file_extensions() {
            self.by_extension
                .insert(normalize_extension(ext), Arc::clone(&extractor));
        }
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.register(extractor);
        self
    }

    /// Extractor registered for an extension (`.ts` or `ts`)
    pub fn for_extension(&self, ext: &str) -> Option<&dyn Extractor> {
        self.by_extension
            .get(&normalize_extension(ext))
            .map(|e| e.as_ref())
    }

    /// Extractor responsible for a path, by its extension
    pub fn for_path(&self, path: &str) -> Option<&dyn Extractor> {
        let ext = Path::new(path).extension()?;
        self.for_extension(&ext.to_string_lossy())
    }

    pub fn for_file(&self, file: &SourceFile) -> Option<&dyn Extractor> {
        self.for_path(&file.path)
    }

    /// Registered extensions in sorted order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_extension.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.by_extension
                    .iter()
                    .map(|(ext, extractor)| (ext, extractor.language())),
            )
            .finish()
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
