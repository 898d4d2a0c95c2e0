//! Elasticsearch record source
//!
//! Thin HTTP client over the `_search` endpoint. One request per query;
//! the payload carries its own size limit and filters. The password is
//! never part of the configuration files, only the `ELASTIC_PASSWORD`
//! environment variable.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::config::ElasticConfig;
use crate::error::ReportError;
use crate::models::Record;
use crate::source::{QueryDoc, RecordSource};
use crate::ReportResult;

/// Environment variable holding the search-user password.
pub const PASSWORD_ENV_VAR: &str = "ELASTIC_PASSWORD";

/// `_search` response envelope (only the parts the engine reads).
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    fields: Option<BTreeMap<String, Vec<Value>>>,
}

/// Elasticsearch-backed record source.
pub struct ElasticSource {
    http_client: Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticSource {
    pub fn new(config: &ElasticConfig) -> ReportResult<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs));

        if !config.verify_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http_client = builder
            .build()
            .map_err(|e| ReportError::Source(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: env::var(PASSWORD_ENV_VAR).ok(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index)
    }

    fn records_from(response: SearchResponse) -> ReportResult<Vec<Record>> {
        let hits = response.hits.hits;
        let mut records = Vec::with_capacity(hits.len());

        for hit in hits {
            let fields = hit.fields.ok_or_else(|| {
                ReportError::Response(format!(
                    "hit {} has no stored fields; queries must request fields",
                    hit.id.as_deref().unwrap_or("<unknown>")
                ))
            })?;
            records.push(Record::new(fields));
        }

        Ok(records)
    }
}

#[async_trait]
impl RecordSource for ElasticSource {
    async fn fetch(&self, query: &QueryDoc) -> ReportResult<Vec<Record>> {
        let url = self.search_url();
        debug!("Running query {} against {}", query.name, url);

        let mut request = self.http_client.post(&url).json(&query.payload);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Http(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Response(e.to_string()))?;

        Self::records_from(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_unwrap() {
        let body: SearchResponse = serde_json::from_value(json!({
            "took": 12,
            "timed_out": false,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    {
                        "_index": "cdr-2025.07",
                        "_id": "a1",
                        "fields": {
                            "inviting_time": ["20250712090000"],
                            "destination_number": ["4417001234"]
                        }
                    },
                    {
                        "_id": "a2",
                        "fields": { "inviting_time": ["20250713090000"] }
                    }
                ]
            }
        }))
        .unwrap();

        let records = ElasticSource::records_from(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].first_str("destination_number").unwrap(),
            "4417001234"
        );
    }

    #[test]
    fn test_hit_without_fields_is_an_error() {
        let body: SearchResponse = serde_json::from_value(json!({
            "hits": { "hits": [ { "_id": "b7", "_source": {} } ] }
        }))
        .unwrap();

        let err = ElasticSource::records_from(body).unwrap_err();
        assert!(matches!(err, ReportError::Response(_)));
        assert!(err.to_string().contains("b7"));
    }

    #[test]
    fn test_empty_result_set() {
        let body: SearchResponse = serde_json::from_value(json!({ "hits": {} })).unwrap();
        assert!(ElasticSource::records_from(body).unwrap().is_empty());
    }
}
