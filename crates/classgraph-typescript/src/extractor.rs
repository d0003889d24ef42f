//! AST extraction for TypeScript/JavaScript source code

use classgraph_parser_api::{ExtractionResult, ExtractorConfig, ExtractorError, ParseError};
use log::{debug, warn};
use std::path::Path;
use tree_sitter::{Parser, Tree};

use crate::syntax::collect_syntax_errors;
use crate::visitor::TypeScriptVisitor;

/// Grammar variant used for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    /// TSX/JSX sources
    Tsx,
}

impl Dialect {
    /// Detect if file is JSX/TSX based on extension
    pub fn from_path(path: &Path) -> Self {
        let is_jsx = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsx") || e.eq_ignore_ascii_case("jsx"))
            .unwrap_or(false);

        if is_jsx {
            Dialect::Tsx
        } else {
            Dialect::TypeScript
        }
    }

    fn language(self) -> tree_sitter::Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::language_typescript(),
            Dialect::Tsx => tree_sitter_typescript::language_tsx(),
        }
    }
}

/// Parse source text into a tree-sitter tree
pub(crate) fn parse_tree(source: &str, dialect: Dialect, origin: &str) -> Result<Tree, ExtractorError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ExtractorError::Language {
            language: "typescript".to_string(),
            message: e.to_string(),
        })?;

    parser
        .parse(source, None)
        .ok_or_else(|| ExtractorError::NoTree(origin.to_string()))
}

/// Extract class and interface entities from TypeScript/JavaScript source code.
///
/// Never fails: a whole-file syntax error produces error diagnostics and no
/// entities, a declaration that cannot be interpreted produces a warning and is
/// skipped.
pub fn extract(
    source: &str,
    file_id: &str,
    dialect: Dialect,
    config: &ExtractorConfig,
) -> ExtractionResult {
    if source.trim().is_empty() {
        return ExtractionResult::empty();
    }

    if source.len() > config.max_file_size {
        let err = ExtractorError::SourceTooLarge(file_id.to_string(), source.len());
        warn!("{err}");
        return ExtractionResult::failed(vec![err.to_diagnostic()]);
    }

    let tree = match parse_tree(source, dialect, file_id) {
        Ok(tree) => tree,
        Err(err) => {
            warn!("{err}");
            return ExtractionResult::failed(vec![err.to_diagnostic()]);
        }
    };

    // Check for syntax errors
    let root_node = tree.root_node();
    if root_node.has_error() {
        let mut errors = collect_syntax_errors(root_node, source.as_bytes(), config.max_errors);
        if errors.is_empty() {
            errors.push(ParseError::error(1, 1, "Syntax error in source code"));
        }
        debug!("{file_id}: {} syntax error(s), no entities extracted", errors.len());
        return ExtractionResult::failed(errors);
    }

    // Create visitor and walk the AST
    let mut visitor = TypeScriptVisitor::new(source.as_bytes(), file_id, config);
    visitor.visit_node(root_node);

    debug!(
        "{file_id}: extracted {} entities ({} warnings)",
        visitor.entities.len(),
        visitor.warnings.len()
    );

    ExtractionResult::new(visitor.entities, visitor.warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classgraph_parser_api::{Severity, Visibility};

    fn extract_ts(source: &str) -> ExtractionResult {
        extract(source, "test", Dialect::TypeScript, &ExtractorConfig::default())
    }

    #[test]
    fn test_extract_class() {
        let source = r#"
class Person {
    name: string;
    age: number;
}
"#;
        let result = extract_ts(source);

        assert!(result.is_ok());
        assert_eq!(result.entities.len(), 1);
        let person = &result.entities[0];
        assert_eq!(person.name, "Person");
        assert_eq!(person.id, "test::Person");
        assert_eq!(person.properties.len(), 2);
        assert_eq!(person.properties[0].type_annotation.as_deref(), Some("string"));
        assert_eq!(person.properties[1].visibility, Visibility::Public);
    }

    #[test]
    fn test_extract_interface() {
        let source = r#"
interface User {
    id: number;
    readonly username: string;
    email?: string;
    greet(other: User): string;
}
"#;
        let result = extract_ts(source);

        assert!(result.is_ok());
        assert_eq!(result.entities.len(), 1);
        let user = &result.entities[0];
        assert!(user.is_interface());
        assert_eq!(user.properties.len(), 3);
        assert!(user.properties[1].is_readonly);
        assert!(user.properties[2].is_optional);
        assert_eq!(user.methods.len(), 1);
        assert_eq!(user.methods[0].return_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_empty_and_whitespace_sources() {
        assert_eq!(extract_ts(""), ExtractionResult::empty());
        assert_eq!(extract_ts("   \n\t  \n"), ExtractionResult::empty());
    }

    #[test]
    fn test_extract_with_syntax_error() {
        let source = r#"
class Broken {
    method( {
"#;
        let result = extract_ts(source);

        assert!(!result.is_ok());
        assert!(result.entities.is_empty());
        assert!(!result.errors.is_empty());
        let first = &result.errors[0];
        assert_eq!(first.severity, Severity::Error);
        assert!(first.line >= 1);
        assert!(first.column >= 1);
    }

    #[test]
    fn test_source_too_large() {
        let config = ExtractorConfig::default().with_max_file_size(8);
        let result = extract("class A {}", "big", Dialect::TypeScript, &config);

        assert!(result.entities.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("exceeds maximum size"));
    }

    #[test]
    fn test_declaration_failure_is_isolated() {
        let source = r#"
export default class {
    x: number;
}

export class Kept {
    y: string;
}
"#;
        let result = extract_ts(source);

        assert!(result.is_ok());
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].name, "Kept");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Warning);
        assert_eq!(result.errors[0].line, 2);
    }

    #[test]
    fn test_tsx_dialect_detection() {
        assert_eq!(Dialect::from_path(Path::new("a.tsx")), Dialect::Tsx);
        assert_eq!(Dialect::from_path(Path::new("a.JSX")), Dialect::Tsx);
        assert_eq!(Dialect::from_path(Path::new("a.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::from_path(Path::new("noext")), Dialect::TypeScript);
    }

    #[test]
    fn test_extract_tsx_class_component() {
        let source = r#"
import React, { Component } from 'react';

interface Props {
    label: string;
}

class Counter extends Component<Props> {
    render() {
        return <button>{this.props.label}</button>;
    }
}
"#;
        let result = extract(source, "Counter", Dialect::Tsx, &ExtractorConfig::default());

        assert!(result.is_ok());
        assert_eq!(result.entities.len(), 2);
        let counter = result.entities.iter().find(|e| e.name == "Counter").unwrap();
        assert_eq!(counter.parent_class_name(), Some("Component"));
        assert_eq!(counter.methods[0].name, "render");
    }
}
