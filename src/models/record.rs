//! Raw call-detail record model
//!
//! A record is an opaque mapping of field name to value list, exactly as
//! the search backend returns stored fields. The engine never mutates
//! field data; it only reads two load-bearing fields and re-buckets the
//! record as a whole.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ReportError;
use crate::ReportResult;

/// One raw call-detail record.
///
/// Field values arrive as one-element arrays (the stored-fields response
/// shape), so accessors read the first element of a field's value list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Vec<Value>>,
}

impl Record {
    pub fn new(fields: BTreeMap<String, Vec<Value>>) -> Self {
        Self { fields }
    }

    /// Build a record from a raw JSON object (a single search hit's
    /// `fields` document).
    pub fn from_value(value: Value) -> ReportResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// First element of a field's value list, if present.
    pub fn first_value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).and_then(|values| values.first())
    }

    /// First element of a field's value list as a string.
    ///
    /// Absent field, empty value list, and non-string values all surface
    /// as `MissingField` so the parse policy can treat them uniformly.
    pub fn first_str(&self, field: &str) -> ReportResult<&str> {
        let value = self
            .first_value(field)
            .ok_or_else(|| ReportError::MissingField(field.to_string()))?;

        value
            .as_str()
            .ok_or_else(|| ReportError::MissingField(format!("{} is not a string", field)))
    }
}
