//! Single write path for dashboard counts.
//!
//! Counts arrive from two places: the REST poll (a full snapshot) and the
//! message bus (partial patches). Either may be late. Every update carries a
//! [`Stamp`] taken from one monotonic counter: a poll takes its stamp when
//! the request is *issued*, a push when the message is *received*. Each
//! counter remembers the stamp that last wrote it and only accepts a newer
//! one, so a slow poll that was requested before a push cannot roll the
//! pushed value back.

use crate::models::{CountsPatch, DashboardCounts, COUNTER_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stamp(u64);

#[derive(Clone, Debug, Default)]
pub struct CountsReconciler {
    counts: DashboardCounts,
    next: u64,
    written: [u64; COUNTER_COUNT],
}

impl CountsReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next sequence number.
    pub fn stamp(&mut self) -> Stamp {
        self.next += 1;
        Stamp(self.next)
    }

    pub fn counts(&self) -> DashboardCounts {
        self.counts
    }

    /// Merge `patch` if it is newer than what each field holds. Returns
    /// whether any counter changed value.
    pub fn apply(&mut self, patch: &CountsPatch, stamp: Stamp) -> bool {
        let mut changed = false;
        let values = patch.values();
        for (i, field) in self.counts.fields_mut().into_iter().enumerate() {
            let Some(value) = values[i] else { continue };
            if stamp.0 <= self.written[i] {
                continue;
            }
            self.written[i] = stamp.0;
            changed |= *field != value;
            *field = value;
        }
        changed
    }

    /// Full snapshot from the poll.
    pub fn apply_snapshot(&mut self, counts: DashboardCounts, stamp: Stamp) -> bool {
        self.apply(&CountsPatch::from(counts), stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(open: u64) -> DashboardCounts {
        DashboardCounts {
            total: 10,
            open,
            ..Default::default()
        }
    }

    #[test]
    fn test_late_poll_does_not_overwrite_newer_push() {
        let mut r = CountsReconciler::new();
        let poll = r.stamp();
        let push = r.stamp();
        assert!(r.apply(&CountsPatch::from_json(r#"{"open": 5}"#).unwrap(), push));
        // Poll response issued before the push lands afterwards.
        r.apply_snapshot(snapshot(3), poll);
        assert_eq!(r.counts().open, 5);
        // Fields the push did not touch still come from the poll.
        assert_eq!(r.counts().total, 10);
    }

    #[test]
    fn test_newer_poll_wins() {
        let mut r = CountsReconciler::new();
        let push = r.stamp();
        r.apply(&CountsPatch::from_json(r#"{"open": 5}"#).unwrap(), push);
        let poll = r.stamp();
        assert!(r.apply_snapshot(snapshot(4), poll));
        assert_eq!(r.counts().open, 4);
    }

    #[test]
    fn test_same_patch_twice_equals_once() {
        let patch = CountsPatch::from_json(r#"{"open": 2, "closed": 9}"#).unwrap();

        let mut once = CountsReconciler::new();
        let s = once.stamp();
        once.apply(&patch, s);

        let mut twice = CountsReconciler::new();
        let s1 = twice.stamp();
        twice.apply(&patch, s1);
        let s2 = twice.stamp();
        assert!(!twice.apply(&patch, s2));

        assert_eq!(once.counts(), twice.counts());
    }

    #[test]
    fn test_replayed_stamp_is_ignored() {
        let mut r = CountsReconciler::new();
        let s = r.stamp();
        r.apply(&CountsPatch::from_json(r#"{"urgent": 1}"#).unwrap(), s);
        assert!(!r.apply(&CountsPatch::from_json(r#"{"urgent": 8}"#).unwrap(), s));
        assert_eq!(r.counts().urgent, 1);
    }
}
