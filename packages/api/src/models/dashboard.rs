//! # Dashboard counters
//!
//! [`DashboardCounts`] is the full snapshot served by
//! `GET /api/dashboard/counts`. The message bus pushes [`CountsPatch`]es:
//! JSON objects carrying any subset of the counters. A patch is merged field
//! by field; a missing field, or one whose value is not a non-negative
//! integer, keeps the prior value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of counters tracked on the dashboard.
pub const COUNTER_COUNT: usize = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardCounts {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
    pub unassigned: u64,
    pub urgent: u64,
}

impl DashboardCounts {
    pub(crate) fn fields_mut(&mut self) -> [&mut u64; COUNTER_COUNT] {
        [
            &mut self.total,
            &mut self.open,
            &mut self.in_progress,
            &mut self.resolved,
            &mut self.closed,
            &mut self.unassigned,
            &mut self.urgent,
        ]
    }
}

/// Accepted JSON keys for each counter, in [`DashboardCounts`] field order.
const PATCH_KEYS: [&[&str]; COUNTER_COUNT] = [
    &["total", "totalTickets"],
    &["open", "openTickets"],
    &["inProgress", "in_progress", "inProgressTickets"],
    &["resolved", "resolvedTickets"],
    &["closed", "closedTickets"],
    &["unassigned", "unassignedTickets"],
    &["urgent", "urgentTickets"],
];

/// A partial set of counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountsPatch {
    values: [Option<u64>; COUNTER_COUNT],
}

fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

impl CountsPatch {
    /// Parse a pushed message body. Only a JSON object is a valid patch.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    /// Extract recognised counters from a JSON value; anything else is ignored.
    pub fn from_value(value: &Value) -> Self {
        let mut patch = Self::default();
        let Some(object) = value.as_object() else {
            return patch;
        };
        for (slot, keys) in patch.values.iter_mut().zip(PATCH_KEYS) {
            *slot = keys.iter().find_map(|k| object.get(*k).and_then(as_count));
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn values(&self) -> [Option<u64>; COUNTER_COUNT] {
        self.values
    }

    /// Merge into `counts`. Returns whether anything changed.
    pub fn apply(&self, counts: &mut DashboardCounts) -> bool {
        let mut changed = false;
        for (field, value) in counts.fields_mut().into_iter().zip(self.values) {
            if let Some(v) = value {
                changed |= *field != v;
                *field = v;
            }
        }
        changed
    }
}

impl From<DashboardCounts> for CountsPatch {
    fn from(mut counts: DashboardCounts) -> Self {
        let mut values = [None; COUNTER_COUNT];
        for (slot, field) in values.iter_mut().zip(counts.fields_mut()) {
            *slot = Some(*field);
        }
        Self { values }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    #[serde(default)]
    pub unread: u64,
    #[serde(default)]
    pub latest: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DashboardCounts {
        DashboardCounts {
            total: 100,
            open: 40,
            in_progress: 20,
            resolved: 25,
            closed: 15,
            unassigned: 5,
            urgent: 3,
        }
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut counts = base();
        let patch = CountsPatch::from_json(r#"{"open": 41, "total": 101}"#).unwrap();
        assert!(patch.apply(&mut counts));
        assert_eq!(counts.open, 41);
        assert_eq!(counts.total, 101);
        assert_eq!(counts.in_progress, 20);
        assert_eq!(counts.urgent, 3);
    }

    #[test]
    fn test_non_numeric_fields_keep_prior_value() {
        let mut counts = base();
        let patch = CountsPatch::from_json(
            r#"{"open": "many", "closed": -1, "resolved": 2.5, "urgent": null, "unassigned": 6.0}"#,
        )
        .unwrap();
        patch.apply(&mut counts);
        assert_eq!(counts.open, 40);
        assert_eq!(counts.closed, 15);
        assert_eq!(counts.resolved, 25);
        assert_eq!(counts.urgent, 3);
        assert_eq!(counts.unassigned, 6);
    }

    #[test]
    fn test_applying_twice_equals_once() {
        let patch = CountsPatch::from_json(r#"{"inProgress": 22, "resolvedTickets": 30}"#).unwrap();

        let mut once = base();
        patch.apply(&mut once);

        let mut twice = base();
        patch.apply(&mut twice);
        assert!(!patch.apply(&mut twice));

        assert_eq!(once, twice);
        assert_eq!(twice.in_progress, 22);
        assert_eq!(twice.resolved, 30);
    }

    #[test]
    fn test_non_object_body_is_empty_patch() {
        assert!(CountsPatch::from_json("[1, 2]").unwrap().is_empty());
        assert!(CountsPatch::from_json("42").unwrap().is_empty());
        assert!(CountsPatch::from_json("not json").is_err());
    }

    #[test]
    fn test_snapshot_as_patch_replaces_everything() {
        let mut counts = DashboardCounts::default();
        CountsPatch::from(base()).apply(&mut counts);
        assert_eq!(counts, base());
    }

    #[test]
    fn test_counts_decode_with_missing_fields() {
        let counts: DashboardCounts = serde_json::from_str(r#"{"total": 3, "open": 3}"#).unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.closed, 0);
    }
}
