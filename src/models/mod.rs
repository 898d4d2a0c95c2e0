//! Domain models for the report engine

pub mod buckets;
pub mod record;

pub use buckets::{
    ClassificationResult, ClassificationSummary, OperatorCategory, TimeBucket,
};
pub use record::Record;
