//! Query store
//!
//! Maps logical query names from the configuration to JSON payload
//! files on disk (`<base_path>/<name>.json`) and stamps the reporting
//! month into each payload's range filter before execution.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::ReportError;
use crate::ReportResult;

/// A named, ready-to-run search payload.
#[derive(Debug, Clone)]
pub struct QueryDoc {
    pub name: String,
    pub payload: Value,
}

/// Loads query payloads from a base directory.
pub struct QueryStore {
    base_path: PathBuf,
    timestamp_field: String,
}

impl QueryStore {
    pub fn new(base_path: impl Into<PathBuf>, timestamp_field: &str) -> Self {
        Self {
            base_path: base_path.into(),
            timestamp_field: timestamp_field.to_string(),
        }
    }

    /// File-system path for a logical query name.
    pub fn query_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", name))
    }

    /// Load one query payload from disk.
    pub fn load(&self, name: &str) -> ReportResult<QueryDoc> {
        let path = self.query_path(name);
        let raw = fs::read_to_string(&path).map_err(|e| {
            ReportError::QueryFile(format!("{}: {}", path.display(), e))
        })?;
        let payload: Value = serde_json::from_str(&raw).map_err(|e| {
            ReportError::QueryFile(format!("{}: {}", path.display(), e))
        })?;

        Ok(QueryDoc {
            name: name.to_string(),
            payload,
        })
    }

    /// Load every configured query.
    pub fn load_all(&self, names: &[String]) -> ReportResult<Vec<QueryDoc>> {
        names.iter().map(|name| self.load(name)).collect()
    }

    /// Write `[start, end)` bounds into the payload's range clause on
    /// the configured timestamp field.
    ///
    /// Supports both filter shapes (`filter: {...}` and `filter: [...]`).
    /// Payloads without a matching range clause are left untouched;
    /// returns whether a clause was stamped.
    pub fn stamp_time_range(&self, payload: &mut Value, start: &str, end: &str) -> bool {
        let filter = match payload.pointer_mut("/query/bool/filter") {
            Some(filter) => filter,
            None => {
                debug!("Query has no bool filter; leaving payload as-is");
                return false;
            }
        };

        // A filter array can carry several range clauses (durations,
        // sizes); only the one over the timestamp field gets stamped.
        let range = match filter {
            Value::Array(items) => items
                .iter_mut()
                .filter_map(|item| item.get_mut("range"))
                .find(|range| range.get(&self.timestamp_field).is_some()),
            Value::Object(_) => filter.get_mut("range"),
            _ => None,
        };

        let bounds = range
            .and_then(|range| range.get_mut(&self.timestamp_field))
            .and_then(Value::as_object_mut);

        match bounds {
            Some(bounds) => {
                bounds.insert("gte".to_string(), Value::String(start.to_string()));
                bounds.insert("lt".to_string(), Value::String(end.to_string()));
                true
            }
            None => {
                debug!(
                    "Query has no range clause on {}; leaving payload as-is",
                    self.timestamp_field
                );
                false
            }
        }
    }
}
