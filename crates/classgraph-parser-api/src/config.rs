use serde::{Deserialize, Serialize};

/// Configuration for extractor behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum source size to parse (in bytes).
    /// Larger sources yield a single file-level error and no entities.
    pub max_file_size: usize,

    /// Maximum number of syntax diagnostics reported per file
    pub max_errors: usize,

    /// Keep `private` members (and `#private` names)
    pub include_private: bool,

    /// Keep `static` members
    pub include_static: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_errors: 25,
            include_private: true,
            include_static: true,
        }
    }
}

impl ExtractorConfig {
    /// Config for public-API diagrams (drops private and static members)
    pub fn members_public_only() -> Self {
        Self {
            include_private: false,
            include_static: false,
            ..Default::default()
        }
    }

    /// Set maximum source size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set maximum diagnostics per file
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}
