// src/main.rs
use anyhow::Context;
use tracing::{info, warn};

use cdr_report_engine::config::AppConfig;
use cdr_report_engine::models::{ClassificationResult, OperatorCategory, TimeBucket};
use cdr_report_engine::services::RecordClassifier;
use cdr_report_engine::source::{
    month::current_previous_month_bounds, ElasticSource, QueryStore, RecordSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("🚀 Starting CDR report engine");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store = QueryStore::new(&config.query.base_path, &config.classifier.timestamp_field);
    let source = ElasticSource::new(&config.elastic).context("Failed to build search client")?;
    let classifier = RecordClassifier::new(
        &config.classifier.timestamp_field,
        &config.classifier.destination_field,
        config.classifier.parse_policy,
    );

    let (month_start, month_end) = current_previous_month_bounds();
    info!("Reporting window: [{}, {})", month_start, month_end);

    let mut queries = store
        .load_all(&config.query.queries)
        .context("Failed to load query files")?;

    for query in &mut queries {
        if !store.stamp_time_range(&mut query.payload, &month_start, &month_end) {
            warn!(
                "⚠️  Query {} has no {} range clause; running without month bounds",
                query.name, config.classifier.timestamp_field
            );
        }

        info!(
            "Running query {}. Using file {}",
            query.name,
            store.query_path(&query.name).display()
        );
        let records = source
            .fetch(query)
            .await
            .with_context(|| format!("Query {} failed", query.name))?;
        info!(
            "✅ Retrieved {} records for {}. Start processing...",
            records.len(),
            query.name
        );

        let result = classifier
            .classify(records)
            .with_context(|| format!("Classification failed for {}", query.name))?;
        log_buckets(&query.name, &result);
    }

    Ok(())
}

fn log_buckets(query: &str, result: &ClassificationResult) {
    let summary = result.summary();

    for time in TimeBucket::ALL {
        info!(
            "[{}] {}: {} records",
            query,
            time,
            summary.time_bucket(time)
        );
        for operator in OperatorCategory::CLASSIFIED {
            info!(
                "[{}]   {}/{}: {}",
                query,
                time,
                operator,
                result.bucket(time, operator).len()
            );
        }
    }

    info!(
        "[{}] kept={} unclassified_dropped={} quarantined={}",
        query, summary.kept, summary.unclassified_dropped, summary.quarantined
    );
}
