//! Report bucket models
//!
//! The two classification axes and the result container that owns the
//! bucketed records for one run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::Record;

/// Time-of-day/week bucket
///
/// Mutually exclusive, exhaustive partition of all valid timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeBucket {
    /// Saturday or Sunday, any hour
    Weekend,
    /// Weekday within business hours
    Business,
    /// Weekday outside business hours
    NonBusiness,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 3] = [
        TimeBucket::Weekend,
        TimeBucket::Business,
        TimeBucket::NonBusiness,
    ];
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Weekend => write!(f, "WEEKEND"),
            TimeBucket::Business => write!(f, "BUSINESS"),
            TimeBucket::NonBusiness => write!(f, "NON_BUSINESS"),
        }
    }
}

/// Operator category derived from the destination-number prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorCategory {
    /// UK geographic/landline numbers (441, 442)
    UkGeographic,
    /// UK non-geographic "network" numbers (443)
    UkNetwork,
    /// UK mobile numbers (447, excluding the reserved block)
    Mobile,
    /// No rule matched; dropped from all operator buckets
    Unclassified,
}

impl OperatorCategory {
    /// The categories that produce report buckets (everything but
    /// Unclassified).
    pub const CLASSIFIED: [OperatorCategory; 3] = [
        OperatorCategory::UkGeographic,
        OperatorCategory::UkNetwork,
        OperatorCategory::Mobile,
    ];
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorCategory::UkGeographic => write!(f, "UK_GEOGRAPHIC"),
            OperatorCategory::UkNetwork => write!(f, "UK_NETWORK"),
            OperatorCategory::Mobile => write!(f, "MOBILE"),
            OperatorCategory::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

/// Per-run classification counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    /// Records received from the source
    pub input: usize,

    /// Records per time bucket after the time pass
    pub weekend: usize,
    pub business: usize,
    pub non_business: usize,

    /// Records that landed in one of the nine operator buckets
    pub kept: usize,

    /// Records whose prefix matched no operator rule
    pub unclassified_dropped: usize,

    /// Records diverted by the quarantine parse policy
    pub quarantined: usize,
}

impl ClassificationSummary {
    /// Count for a single time bucket.
    pub fn time_bucket(&self, bucket: TimeBucket) -> usize {
        match bucket {
            TimeBucket::Weekend => self.weekend,
            TimeBucket::Business => self.business,
            TimeBucket::NonBusiness => self.non_business,
        }
    }
}

/// Result of one classification run
///
/// Owns the nine (TimeBucket x OperatorCategory) record sequences plus
/// the quarantine list. Sequences preserve source order.
#[derive(Debug, Default)]
pub struct ClassificationResult {
    buckets: BTreeMap<(TimeBucket, OperatorCategory), Vec<Record>>,
    quarantined: Vec<Record>,
    summary: ClassificationSummary,
}

impl ClassificationResult {
    /// Records in one report bucket.
    pub fn bucket(&self, time: TimeBucket, operator: OperatorCategory) -> &[Record] {
        self.buckets
            .get(&(time, operator))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records diverted by the quarantine parse policy.
    pub fn quarantined(&self) -> &[Record] {
        &self.quarantined
    }

    pub fn summary(&self) -> &ClassificationSummary {
        &self.summary
    }

    /// Consume the result, yielding the bucket map.
    pub fn into_buckets(self) -> BTreeMap<(TimeBucket, OperatorCategory), Vec<Record>> {
        self.buckets
    }

    pub(crate) fn push(&mut self, time: TimeBucket, operator: OperatorCategory, record: Record) {
        self.buckets.entry((time, operator)).or_default().push(record);
        self.summary.kept += 1;
    }

    pub(crate) fn push_quarantined(&mut self, record: Record) {
        self.quarantined.push(record);
        self.summary.quarantined += 1;
    }

    pub(crate) fn summary_mut(&mut self) -> &mut ClassificationSummary {
        &mut self.summary
    }
}
