//! Unified error handling for the report engine
//!
//! All failure scenarios in the pipeline convert to `ReportError`. The
//! classifier distinguishes record-level parse failures (which the
//! quarantine policy can absorb) from infrastructure failures (which
//! always abort the run).

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum ReportError {
    // ==================== Configuration ====================
    #[error("Configuration error: {0}")]
    Config(String),

    // ==================== Query files ====================
    #[error("Query file error: {0}")]
    QueryFile(String),

    // ==================== Search backend ====================
    #[error("Search backend error: {0}")]
    Source(String),

    #[error("Search backend returned HTTP status {0}")]
    Http(u16),

    #[error("Unexpected search response: {0}")]
    Response(String),

    // ==================== Record-level ====================
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid timestamp {value:?}: {reason}")]
    TimestampParse { value: String, reason: String },

    // ==================== Internal ====================
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// True for failures scoped to a single record rather than the run.
    ///
    /// The quarantine parse policy diverts records that hit these errors
    /// instead of aborting; everything else always propagates.
    pub fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            ReportError::MissingField(_) | ReportError::TimestampParse { .. }
        )
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for ReportError {
    fn from(err: config::ConfigError) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::Source(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_scoped_errors() {
        assert!(ReportError::MissingField("destination_number".to_string()).is_record_scoped());
        assert!(ReportError::TimestampParse {
            value: "garbage".to_string(),
            reason: "too short".to_string(),
        }
        .is_record_scoped());

        assert!(!ReportError::Http(503).is_record_scoped());
        assert!(!ReportError::Config("missing host".to_string()).is_record_scoped());
    }

    #[test]
    fn test_error_display() {
        let err = ReportError::TimestampParse {
            value: "2025".to_string(),
            reason: "expected 14 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp \"2025\": expected 14 digits"
        );
    }
}
