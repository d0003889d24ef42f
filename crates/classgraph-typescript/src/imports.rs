//! Import and re-export statements of a TypeScript module

use classgraph_parser_api::{ImportInfo, DEFAULT_IMPORT_NAME};
use log::{debug, trace};
use std::path::Path;
use tree_sitter::Node;

use crate::extractor::{parse_tree, Dialect};

/// Parse the module-level imports of a source.
///
/// Covers `import` statements (default, named, namespace, type-only and
/// side-effect forms, plus `import x = require(...)`) and `export ... from`
/// re-exports. Specifiers are left unresolved. Statements inside syntax errors
/// are skipped; a source that cannot be parsed at all yields no imports.
pub fn parse_imports(source: &str, file_path: &str) -> Vec<ImportInfo> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let tree = match parse_tree(source, Dialect::from_path(Path::new(file_path)), file_path) {
        Ok(tree) => tree,
        Err(err) => {
            debug!("{file_path}: no imports parsed: {err}");
            return Vec::new();
        }
    };

    let bytes = source.as_bytes();
    let root = tree.root_node();
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        let import = match stmt.kind() {
            "import_statement" => import_statement(stmt, bytes),
            "export_statement" => reexport_statement(stmt, bytes),
            _ => None,
        };
        if let Some(import) = import {
            trace!("{file_path}:{}: import {}", import.line_number, import.import_path);
            imports.push(import);
        }
    }

    imports
}

fn import_statement(node: Node, source: &[u8]) -> Option<ImportInfo> {
    let mut names = Vec::new();
    let mut is_type_only = false;
    let mut is_namespace = false;
    let mut specifier = node.child_by_field_name("source");

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type" => is_type_only = true,
            "import_clause" => is_namespace = import_clause(child, source, &mut names),
            "import_require_clause" => {
                names.push(DEFAULT_IMPORT_NAME.to_string());
                specifier = specifier.or_else(|| child.child_by_field_name("source"));
            }
            _ => {}
        }
    }

    let mut import = ImportInfo::new(string_value(specifier?, source), node.start_position().row + 1)
        .with_names(names);
    import.is_type_only = is_type_only;
    import.is_namespace_import = is_namespace;
    Some(import)
}

/// Collect bound names; returns whether a namespace import is present
fn import_clause(clause: Node, source: &[u8], names: &mut Vec<String>) -> bool {
    let mut is_namespace = false;
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => names.push(DEFAULT_IMPORT_NAME.to_string()),
            "namespace_import" => is_namespace = true,
            "named_imports" => specifier_names(child, "import_specifier", source, names),
            _ => {}
        }
    }
    is_namespace
}

fn reexport_statement(node: Node, source: &[u8]) -> Option<ImportInfo> {
    // Only `export ... from '...'` has a source
    let specifier = node.child_by_field_name("source")?;

    let mut names = Vec::new();
    let mut is_type_only = false;
    let mut is_namespace = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type" => is_type_only = true,
            "*" | "namespace_export" => is_namespace = true,
            "export_clause" => specifier_names(child, "export_specifier", source, &mut names),
            _ => {}
        }
    }

    let mut import = ImportInfo::new(string_value(specifier, source), node.start_position().row + 1)
        .with_names(names)
        .reexport();
    import.is_type_only = is_type_only;
    import.is_namespace_import = is_namespace;
    Some(import)
}

/// Original (pre-alias) names of `{ a, b as c }` specifiers
fn specifier_names(list: Node, kind: &str, source: &[u8], names: &mut Vec<String>) {
    let mut cursor = list.walk();
    for spec in list.named_children(&mut cursor) {
        if spec.kind() != kind {
            continue;
        }
        if let Some(name) = spec.child_by_field_name("name") {
            names.push(string_value(name, source));
        }
    }
}

fn string_value(node: Node, source: &[u8]) -> String {
    node.utf8_text(source)
        .unwrap_or("")
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}
