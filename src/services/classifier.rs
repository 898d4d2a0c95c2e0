//! Record classification
//!
//! Two-pass partitioning of a record batch: first by time bucket from
//! the inviting timestamp, then within each time bucket by operator
//! category from the destination-number prefix.
//!
//! The prefix rules overlap (everything UK starts with "44"), so they
//! are encoded as an ordered table evaluated top to bottom, first match
//! wins. The order is part of the business rules, not an implementation
//! detail.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::models::{ClassificationResult, OperatorCategory, Record, TimeBucket};
use crate::services::time_window;
use crate::ReportResult;

/// Inviting-timestamp wire format: YYYYMMDDHHMMss, 14 digits.
const INVITING_TS_FORMAT: &str = "%Y%m%d%H%M%S";
const INVITING_TS_LEN: usize = 14;

/// Number block excluded from the mobile rule; numbers in it stay
/// unclassified.
pub const MOBILE_RESERVED_BLOCK: &str = "447606";

/// Classification key: first six characters of the destination number.
pub const PREFIX_KEY_LEN: usize = 6;

/// Ordered operator rules. UK_NETWORK must be tested before
/// UK_GEOGRAPHIC and both before MOBILE.
const PREFIX_RULES: &[(fn(&str) -> bool, OperatorCategory)] = &[
    (is_uk_network, OperatorCategory::UkNetwork),
    (is_uk_geographic, OperatorCategory::UkGeographic),
    (is_uk_mobile, OperatorCategory::Mobile),
];

fn is_uk_network(prefix: &str) -> bool {
    prefix.starts_with("443")
}

fn is_uk_geographic(prefix: &str) -> bool {
    prefix.starts_with("441") || prefix.starts_with("442")
}

fn is_uk_mobile(prefix: &str) -> bool {
    prefix.starts_with("447") && prefix != MOBILE_RESERVED_BLOCK
}

/// First six characters of a destination dial string (shorter strings
/// are used whole, matching how a short number simply fails the longer
/// prefix tests).
pub fn prefix6_of(destination: &str) -> &str {
    destination.get(..PREFIX_KEY_LEN).unwrap_or(destination)
}

/// Evaluate the ordered rule table against a prefix key.
pub fn categorize_prefix(prefix6: &str) -> OperatorCategory {
    for (matches, category) in PREFIX_RULES {
        if matches(prefix6) {
            return *category;
        }
    }
    OperatorCategory::Unclassified
}

/// Parse an inviting timestamp, ignoring any fractional-second suffix.
pub fn parse_inviting_time(raw: &str) -> ReportResult<NaiveDateTime> {
    let digits = raw.get(..INVITING_TS_LEN).ok_or_else(|| ReportError::TimestampParse {
        value: raw.to_string(),
        reason: format!("expected at least {} digits", INVITING_TS_LEN),
    })?;

    NaiveDateTime::parse_from_str(digits, INVITING_TS_FORMAT).map_err(|e| {
        ReportError::TimestampParse {
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

/// What to do with a record whose timestamp or destination field cannot
/// be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// First malformed record aborts the whole run.
    Strict,
    /// Malformed records are diverted to the quarantine list and
    /// counted; the run completes.
    #[default]
    Quarantine,
}

/// Two-pass batch classifier.
///
/// Stateless across runs; each call to `classify` owns its input and
/// produces an independent result.
pub struct RecordClassifier {
    timestamp_field: String,
    destination_field: String,
    policy: ParsePolicy,
}

impl RecordClassifier {
    pub fn new(timestamp_field: &str, destination_field: &str, policy: ParsePolicy) -> Self {
        Self {
            timestamp_field: timestamp_field.to_string(),
            destination_field: destination_field.to_string(),
            policy,
        }
    }

    /// Partition a record batch into the nine report buckets.
    pub fn classify(&self, records: Vec<Record>) -> ReportResult<ClassificationResult> {
        let mut result = ClassificationResult::default();
        result.summary_mut().input = records.len();

        // Time pass
        let mut weekend = Vec::new();
        let mut business = Vec::new();
        let mut non_business = Vec::new();

        for record in records {
            let bucket = match self.time_bucket_for(&record) {
                Ok(bucket) => bucket,
                Err(err) => {
                    self.divert(&mut result, record, err)?;
                    continue;
                }
            };

            match bucket {
                TimeBucket::Weekend => weekend.push(record),
                TimeBucket::Business => business.push(record),
                TimeBucket::NonBusiness => non_business.push(record),
            }
        }

        // Operator pass, per time bucket
        let sequences = [
            (TimeBucket::Weekend, weekend),
            (TimeBucket::Business, business),
            (TimeBucket::NonBusiness, non_business),
        ];

        for (bucket, sequence) in sequences {
            let mut in_bucket = sequence.len();

            for record in sequence {
                let category = match record.first_str(&self.destination_field) {
                    Ok(destination) => categorize_prefix(prefix6_of(destination)),
                    Err(err) => {
                        in_bucket -= 1;
                        self.divert(&mut result, record, err)?;
                        continue;
                    }
                };

                match category {
                    OperatorCategory::Unclassified => {
                        debug!("Dropping unclassified record in {} bucket", bucket);
                        result.summary_mut().unclassified_dropped += 1;
                    }
                    category => result.push(bucket, category, record),
                }
            }

            match bucket {
                TimeBucket::Weekend => result.summary_mut().weekend = in_bucket,
                TimeBucket::Business => result.summary_mut().business = in_bucket,
                TimeBucket::NonBusiness => result.summary_mut().non_business = in_bucket,
            }
        }

        let summary = result.summary();
        info!(
            "Classification complete: {} in, {} kept, {} unclassified dropped, {} quarantined",
            summary.input, summary.kept, summary.unclassified_dropped, summary.quarantined
        );

        Ok(result)
    }

    fn time_bucket_for(&self, record: &Record) -> ReportResult<TimeBucket> {
        let raw = record.first_str(&self.timestamp_field)?;
        let ts = parse_inviting_time(raw)?;
        Ok(time_window::classify(&ts))
    }

    /// Apply the parse policy to a record-scoped failure.
    fn divert(
        &self,
        result: &mut ClassificationResult,
        record: Record,
        err: ReportError,
    ) -> ReportResult<()> {
        match self.policy {
            ParsePolicy::Quarantine if err.is_record_scoped() => {
                warn!("Quarantining record: {}", err);
                result.push_quarantined(record);
                Ok(())
            }
            _ => Err(err),
        }
    }
}
