// tests/classification_test.rs
//
// End-to-end pipeline coverage: in-memory record source feeding the
// classifier, plus property checks over the bucket partition.

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::json;

use cdr_report_engine::models::{OperatorCategory, Record, TimeBucket};
use cdr_report_engine::services::{ParsePolicy, RecordClassifier};
use cdr_report_engine::source::{QueryDoc, QueryStore, RecordSource};
use cdr_report_engine::ReportResult;

fn record(timestamp: &str, destination: &str) -> Record {
    Record::from_value(json!({
        "inviting_time": [timestamp],
        "destination_number": [destination],
    }))
    .unwrap()
}

fn classifier(policy: ParsePolicy) -> RecordClassifier {
    RecordClassifier::new("inviting_time", "destination_number", policy)
}

/// Record source returning a canned batch, standing in for the search
/// backend.
struct InMemorySource {
    records: Vec<Record>,
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch(&self, _query: &QueryDoc) -> ReportResult<Vec<Record>> {
        Ok(self.records.clone())
    }
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    // 2025-08-16 is a Saturday; 2025-08-12 is a Tuesday.
    let source = InMemorySource {
        records: vec![
            record("20250816120000", "4436001234"),
            record("20250812100000", "4417001234"),
            record("20250812220000", "4476061234"),
        ],
    };

    let store = QueryStore::new("queries", "inviting_time");
    let mut query = QueryDoc {
        name: "previous_month_cdrs".to_string(),
        payload: json!({
            "query": { "bool": { "filter": {
                "range": { "inviting_time": {} }
            }}}
        }),
    };
    assert!(store.stamp_time_range(&mut query.payload, "20250801000000", "20250901000000"));

    let records = source.fetch(&query).await.unwrap();
    let result = classifier(ParsePolicy::Strict).classify(records).unwrap();

    assert_eq!(
        result
            .bucket(TimeBucket::Weekend, OperatorCategory::UkNetwork)
            .len(),
        1
    );
    assert_eq!(
        result
            .bucket(TimeBucket::Business, OperatorCategory::UkGeographic)
            .len(),
        1
    );

    let occupied = [
        (TimeBucket::Weekend, OperatorCategory::UkNetwork),
        (TimeBucket::Business, OperatorCategory::UkGeographic),
    ];
    for time in TimeBucket::ALL {
        for operator in OperatorCategory::CLASSIFIED {
            if !occupied.contains(&(time, operator)) {
                assert!(result.bucket(time, operator).is_empty());
            }
        }
    }

    let summary = result.summary();
    assert_eq!(summary.input, 3);
    assert_eq!(summary.kept, 2);
    assert_eq!(summary.unclassified_dropped, 1);
}

#[tokio::test]
async fn test_pipeline_keeps_records_intact() {
    let original = record("20250812100000", "4417001234");
    let source = InMemorySource {
        records: vec![original.clone()],
    };
    let query = QueryDoc {
        name: "q".to_string(),
        payload: json!({}),
    };

    let records = source.fetch(&query).await.unwrap();
    let result = classifier(ParsePolicy::Strict).classify(records).unwrap();

    // Field data passes through unmodified
    let bucket = result.bucket(TimeBucket::Business, OperatorCategory::UkGeographic);
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0], original);
}

// Timestamps covering all three time buckets, and prefixes covering all
// operator rules (including unclassifiable ones).
const TIMESTAMPS: [&str; 3] = [
    "20250816120000", // Saturday
    "20250812100000", // Tuesday business
    "20250812220000", // Tuesday evening
];

const DESTINATIONS: [&str; 6] = [
    "4436001234", // network
    "4417009999", // geographic
    "4425550123", // geographic
    "4477001234", // mobile
    "4476061234", // reserved block, unclassified
    "1917555010", // non-UK, unclassified
];

fn arb_record() -> impl Strategy<Value = Record> {
    (0..TIMESTAMPS.len(), 0..DESTINATIONS.len())
        .prop_map(|(t, d)| record(TIMESTAMPS[t], DESTINATIONS[d]))
}

proptest! {
    /// Every well-formed record lands in exactly one time bucket, and
    /// every kept record lands in exactly one operator bucket.
    #[test]
    fn prop_partition_completeness(records in proptest::collection::vec(arb_record(), 0..200)) {
        let input = records.len();
        let result = classifier(ParsePolicy::Strict).classify(records).unwrap();
        let summary = result.summary();

        prop_assert_eq!(summary.input, input);
        prop_assert_eq!(summary.weekend + summary.business + summary.non_business, input);
        prop_assert_eq!(summary.kept + summary.unclassified_dropped, input);
        prop_assert_eq!(summary.quarantined, 0);

        // Mutual exclusion: the nine buckets together hold exactly the
        // kept records, no duplication across operator categories.
        let mut bucketed = 0;
        for time in TimeBucket::ALL {
            for operator in OperatorCategory::CLASSIFIED {
                bucketed += result.bucket(time, operator).len();
            }
        }
        prop_assert_eq!(bucketed, summary.kept);
    }

    /// A 443 destination never shows up as geographic or mobile, no
    /// matter which time bucket it falls into.
    #[test]
    fn prop_network_prefix_priority(t in 0..TIMESTAMPS.len()) {
        let result = classifier(ParsePolicy::Strict)
            .classify(vec![record(TIMESTAMPS[t], "4431112222")])
            .unwrap();

        let mut found = None;
        for time in TimeBucket::ALL {
            for operator in OperatorCategory::CLASSIFIED {
                if !result.bucket(time, operator).is_empty() {
                    found = Some(operator);
                }
            }
        }
        prop_assert_eq!(found, Some(OperatorCategory::UkNetwork));
    }
}
