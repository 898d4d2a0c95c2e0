//! CDR Report Engine
//!
//! Retrieves call-detail records for the previous calendar month from an
//! Elasticsearch index and partitions them into nine report buckets:
//! three time-of-day/week buckets (weekend, business hours, non-business
//! weekday hours) crossed with three operator categories derived from UK
//! dialing-plan prefixes (geographic, non-geographic network, mobile).
//!
//! - Domain models (Record, TimeBucket, OperatorCategory, ClassificationResult)
//! - Classification services (time bucketing, ordered prefix rules)
//! - Record source abstraction and the Elasticsearch backend
//! - Layered configuration and unified error handling

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod source;

pub use crate::config::AppConfig;
pub use crate::error::ReportError;

/// Result type alias using ReportError
pub type ReportResult<T> = Result<T, ReportError>;
