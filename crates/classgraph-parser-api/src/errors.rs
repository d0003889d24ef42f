use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while setting up or running an extractor.
///
/// These never cross the [`Extractor`](crate::Extractor) boundary as `Err`;
/// extractors fold them into the diagnostics of an
/// [`ExtractionResult`](crate::ExtractionResult).
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The grammar could not be loaded into the parser
    #[error("Failed to load {language} grammar: {message}")]
    Language { language: String, message: String },

    /// The parser returned no tree at all
    #[error("Parser produced no syntax tree for {0}")]
    NoTree(String),

    /// Source exceeds the configured size limit
    #[error("Source {0} exceeds maximum size ({1} bytes)")]
    SourceTooLarge(String, usize),
}

impl ExtractorError {
    /// Convert into a file-level diagnostic
    pub fn to_diagnostic(&self) -> ParseError {
        ParseError::error(1, 1, self.to_string())
    }
}

/// Severity of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A positioned diagnostic surfaced to the editor.
///
/// Lines and columns are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            severity,
        }
    }

    pub fn error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(line, column, message, Severity::Error)
    }

    pub fn warning(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(line, column, message, Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}
