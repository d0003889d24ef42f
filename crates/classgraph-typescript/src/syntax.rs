//! Syntax diagnostics from tree-sitter ERROR and MISSING nodes

use classgraph_parser_api::ParseError;
use tree_sitter::Node;

const SNIPPET_LEN: usize = 32;

/// Collect positioned diagnostics for every ERROR/MISSING node, in document order.
///
/// Error subtrees are reported once and not descended into. At most `limit`
/// diagnostics are returned.
pub fn collect_syntax_errors(root: Node, source: &[u8], limit: usize) -> Vec<ParseError> {
    let mut errors = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if errors.len() >= limit {
            break;
        }

        if node.is_missing() {
            errors.push(missing_diagnostic(node));
            continue;
        }
        if node.is_error() {
            errors.push(error_diagnostic(node, source));
            continue;
        }
        if !node.has_error() {
            continue;
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    errors
}

fn missing_diagnostic(node: Node) -> ParseError {
    let pos = node.start_position();
    ParseError::error(pos.row + 1, pos.column + 1, format!("Missing `{}`", node.kind()))
}

fn error_diagnostic(node: Node, source: &[u8]) -> ParseError {
    let pos = node.start_position();
    let snippet = node
        .utf8_text(source)
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    let message = if snippet.is_empty() {
        "Syntax error".to_string()
    } else {
        let truncated: String = snippet.chars().take(SNIPPET_LEN).collect();
        if truncated.len() < snippet.len() {
            format!("Unexpected `{truncated}…`")
        } else {
            format!("Unexpected `{truncated}`")
        }
    };

    ParseError::error(pos.row + 1, pos.column + 1, message)
}
