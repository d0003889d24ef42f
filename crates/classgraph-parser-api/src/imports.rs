use crate::traits::FileId;
use serde::{Deserialize, Serialize};

/// Name recorded for a default import (`import Foo from './foo'`)
pub const DEFAULT_IMPORT_NAME: &str = "default";

/// One import-like statement of a source file.
///
/// `resolved_path`/`resolved_file_id` stay `None` until the statement is
/// resolved against the project's path table, and remain `None` for external
/// or missing modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Module specifier as written (`./models/person`, `react`)
    pub import_path: String,

    /// Project path the specifier resolved to
    pub resolved_path: Option<String>,

    /// File the specifier resolved to
    pub resolved_file_id: Option<FileId>,

    /// Original exported names; [`DEFAULT_IMPORT_NAME`] for default imports
    pub imported_names: Vec<String>,

    /// `import type { .. }`
    pub is_type_only: bool,

    /// `import * as ns`
    pub is_namespace_import: bool,

    /// `export { .. } from` / `export * from`
    pub is_reexport: bool,

    /// Line of the statement (1-indexed)
    pub line_number: usize,
}

impl ImportInfo {
    pub fn new(import_path: impl Into<String>, line_number: usize) -> Self {
        Self {
            import_path: import_path.into(),
            resolved_path: None,
            resolved_file_id: None,
            imported_names: Vec::new(),
            is_type_only: false,
            is_namespace_import: false,
            is_reexport: false,
            line_number,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.imported_names = names;
        self
    }

    pub fn type_only(mut self) -> Self {
        self.is_type_only = true;
        self
    }

    pub fn namespace(mut self) -> Self {
        self.is_namespace_import = true;
        self
    }

    pub fn reexport(mut self) -> Self {
        self.is_reexport = true;
        self
    }

    /// Relative specifiers start with `.`; everything else is external.
    pub fn is_relative(&self) -> bool {
        self.import_path.starts_with('.')
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_file_id.is_some()
    }

    pub fn imports_default(&self) -> bool {
        self.imported_names.iter().any(|n| n == DEFAULT_IMPORT_NAME)
    }
}
