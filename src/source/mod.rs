//! Record retrieval
//!
//! The pipeline depends only on the `RecordSource` capability trait;
//! the Elasticsearch backend is one implementation of it.

pub mod elastic;
pub mod month;
pub mod query;

pub use elastic::ElasticSource;
pub use month::previous_month_bounds;
pub use query::{QueryDoc, QueryStore};

use async_trait::async_trait;

use crate::models::Record;
use crate::ReportResult;

/// Capability interface for record retrieval backends.
///
/// Query execution, pagination and retry belong to the implementation;
/// the caller sees a finite batch of records per query.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, query: &QueryDoc) -> ReportResult<Vec<Record>>;
}
