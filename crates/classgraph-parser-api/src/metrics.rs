use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics collected during extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorMetrics {
    /// Total sources handed to the extractor
    pub files_attempted: usize,

    /// Sources extracted without error diagnostics
    pub files_succeeded: usize,

    /// Sources that produced at least one error diagnostic
    pub files_failed: usize,

    /// Total time spent extracting
    #[serde(with = "duration_serde")]
    pub total_parse_time: Duration,

    /// Total entities extracted
    pub total_entities: usize,

    /// Total diagnostics reported (all severities)
    pub total_diagnostics: usize,
}

// Helper module for serializing Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_micros() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_micros(micros))
    }
}

impl Default for ExtractorMetrics {
    fn default() -> Self {
        Self {
            files_attempted: 0,
            files_succeeded: 0,
            files_failed: 0,
            total_parse_time: Duration::ZERO,
            total_entities: 0,
            total_diagnostics: 0,
        }
    }
}

impl ExtractorMetrics {
    /// Record one extraction
    pub fn record(&mut self, success: bool, duration: Duration, entities: usize, diagnostics: usize) {
        self.files_attempted += 1;
        if success {
            self.files_succeeded += 1;
        } else {
            self.files_failed += 1;
        }
        self.total_parse_time += duration;
        self.total_entities += entities;
        self.total_diagnostics += diagnostics;
    }

    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.files_attempted == 0 {
            0.0
        } else {
            self.files_succeeded as f64 / self.files_attempted as f64
        }
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files_attempted == 0 {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files_attempted as u32
        }
    }

    /// Merge another metrics object into this one
    pub fn merge(&mut self, other: &ExtractorMetrics) {
        self.files_attempted += other.files_attempted;
        self.files_succeeded += other.files_succeeded;
        self.files_failed += other.files_failed;
        self.total_parse_time += other.total_parse_time;
        self.total_entities += other.total_entities;
        self.total_diagnostics += other.total_diagnostics;
    }
}
