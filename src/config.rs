//! Application configuration
//!
//! Layered configuration via the `config` crate: built-in defaults,
//! then `config/default.*` and `config/<RUN_MODE>.*` files, then
//! `CDR_REPORT__`-prefixed environment variables. The search password
//! deliberately lives outside this structure (see `source::elastic`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::services::classifier::ParsePolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub elastic: ElasticConfig,
    pub query: QueryConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Search cluster connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticConfig {
    /// Scheme for the cluster URL
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Cluster hostname or IP
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix on the cluster URL (empty for none)
    #[serde(default)]
    pub prefix: String,

    /// Basic-auth user; the password comes from ELASTIC_PASSWORD
    pub username: Option<String>,

    /// Index (or alias) to search
    pub index: String,

    /// Per-request timeout; monthly scans can be slow
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Disable only for clusters with self-signed certificates
    #[serde(default = "default_verify_certs")]
    pub verify_certs: bool,
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_request_timeout() -> u64 {
    600
}

fn default_verify_certs() -> bool {
    true
}

impl ElasticConfig {
    /// Cluster base URL without the index segment.
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://{}:{}", self.protocol, self.host, self.port);
        if !self.prefix.is_empty() {
            url.push('/');
            url.push_str(self.prefix.trim_matches('/'));
        }
        url
    }
}

/// Query file settings
#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    /// Directory holding the query payload files
    pub base_path: String,

    /// Logical query names; each maps to `<base_path>/<name>.json`
    pub queries: Vec<String>,
}

/// Classification settings
#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Record field carrying the call-setup timestamp
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    /// Record field carrying the destination dial string
    #[serde(default = "default_destination_field")]
    pub destination_field: String,

    /// strict: abort on first malformed record; quarantine: divert and count
    #[serde(default)]
    pub parse_policy: ParsePolicy,
}

fn default_timestamp_field() -> String {
    "inviting_time".to_string()
}

fn default_destination_field() -> String {
    "destination_number".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            timestamp_field: default_timestamp_field(),
            destination_field: default_destination_field(),
            parse_policy: ParsePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config files, and environment
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "production".to_string());

        let config = Config::builder()
            .set_default("elastic.protocol", "https")?
            .set_default("elastic.port", 9200)?
            .set_default("elastic.prefix", "")?
            .set_default("elastic.request_timeout_secs", 600)?
            .set_default("elastic.verify_certs", true)?
            .set_default("query.base_path", "queries")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("CDR_REPORT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("CDR_REPORT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
