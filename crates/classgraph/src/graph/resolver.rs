//! Resolution of relative import specifiers to project files.

use classgraph_parser_api::{FileId, ImportInfo, SourceFile};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Path → file id table used for resolution
pub type PathTable = HashMap<String, FileId>;

/// Candidate suffixes tried when a specifier does not name a file literally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Appended to the specifier, in order
    pub extensions: Vec<String>,
    /// Tried inside the specifier as a directory, after every extension
    pub index_files: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".ts".to_string(), ".tsx".to_string()],
            index_files: vec!["index.ts".to_string(), "index.tsx".to_string()],
        }
    }
}

impl ResolverConfig {
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_index_files(mut self, index_files: Vec<String>) -> Self {
        self.index_files = index_files;
        self
    }

    /// Paths tried for a normalized base path, in resolution order
    pub fn candidates(&self, base: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(1 + self.extensions.len() + self.index_files.len());
        candidates.push(base.to_string());
        candidates.extend(self.extensions.iter().map(|ext| format!("{base}{ext}")));
        candidates.extend(self.index_files.iter().map(|index| {
            if base.is_empty() {
                index.clone()
            } else {
                format!("{base}/{index}")
            }
        }));
        candidates
    }
}

/// Build the path table of a file set, with normalized paths
pub fn path_table(files: &[SourceFile]) -> PathTable {
    files
        .iter()
        .map(|f| (normalize_path(&f.path), f.id.clone()))
        .collect()
}

/// Collapse `.` and `..` segments with a segment stack.
///
/// Backslashes are treated as separators and empty segments are dropped. A
/// leading `/` is kept; `..` segments that climb above a relative path are kept.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|last| *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            s => stack.push(s),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Directory part of a normalized path, `""` for a top-level file
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve imports of the file at `current_file_path` with the default config.
pub fn resolve_paths(
    imports: &[ImportInfo],
    current_file_path: &str,
    path_to_file_id: &PathTable,
) -> Vec<ImportInfo> {
    resolve_paths_with(imports, current_file_path, path_to_file_id, &ResolverConfig::default())
}

/// Resolve imports of the file at `current_file_path`.
///
/// Relative specifiers are joined to the importing file's directory and looked
/// up literally, then with each configured extension, then as a directory
/// index. Non-relative specifiers are external and stay unresolved; so do
/// relative ones with no match. Resolution is idempotent.
pub fn resolve_paths_with(
    imports: &[ImportInfo],
    current_file_path: &str,
    path_to_file_id: &PathTable,
    config: &ResolverConfig,
) -> Vec<ImportInfo> {
    let current = normalize_path(current_file_path);
    let dir = parent_dir(&current);

    imports
        .iter()
        .map(|import| resolve_one(import, dir, path_to_file_id, config))
        .collect()
}

fn resolve_one(
    import: &ImportInfo,
    dir: &str,
    path_to_file_id: &PathTable,
    config: &ResolverConfig,
) -> ImportInfo {
    let mut resolved = import.clone();
    resolved.resolved_path = None;
    resolved.resolved_file_id = None;

    if !import.is_relative() {
        return resolved;
    }

    let joined = if dir.is_empty() {
        import.import_path.clone()
    } else {
        format!("{dir}/{}", import.import_path)
    };
    let base = normalize_path(&joined);

    for candidate in config.candidates(&base) {
        if let Some(file_id) = path_to_file_id.get(&candidate) {
            trace!("Resolved '{}' to {candidate}", import.import_path);
            resolved.resolved_file_id = Some(file_id.clone());
            resolved.resolved_path = Some(candidate);
            return resolved;
        }
    }

    debug!("Unresolved relative import '{}' from {dir}/", import.import_path);
    resolved
}
