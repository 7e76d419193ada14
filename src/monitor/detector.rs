//! Snapshot diffing for a polled list.
//!
//! Two events are detected:
//!
//! - **new record**: the list is longer than on the previous poll. This is a count comparison,
//!   not an identity diff. One record added and one removed in the same interval raise nothing,
//!   and reordering is invisible.
//! - **cancelled**: a record is cancelled now and was not cancelled (or not present) in the
//!   previous snapshot. Only the first such record per poll is reported.
//!
//! Both detections are skipped on the first non-empty poll so that loading the view does not
//! alert about records that were already there.

use crate::framework::Resource;

use super::notification::Notification;

/// What one call to [`ChangeDetector::observe`] found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    pub new_record: Option<Notification>,
    pub cancelled: Option<Notification>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.new_record.is_none() && self.cancelled.is_none()
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.new_record.into_iter().chain(self.cancelled).collect()
    }
}

/// Owns the previous snapshot of one watched list.
#[derive(Debug, Clone)]
pub struct ChangeDetector<T: Resource> {
    snapshot: Vec<T>,
    baseline: usize,
    detect_cancellations: bool,
}

impl<T: Resource> ChangeDetector<T> {
    pub fn new(detect_cancellations: bool) -> Self {
        Self {
            snapshot: Vec::new(),
            baseline: 0,
            detect_cancellations,
        }
    }

    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    /// Diffs `fresh` against the previous snapshot, then replaces the snapshot with it.
    pub fn observe(&mut self, fresh: Vec<T>) -> Changes {
        let changes = Changes {
            new_record: self.detect_growth(&fresh),
            cancelled: if self.detect_cancellations {
                self.detect_cancellation(&fresh)
            } else {
                None
            },
        };

        self.baseline = fresh.len();
        self.snapshot = fresh;
        changes
    }

    fn detect_growth(&self, fresh: &[T]) -> Option<Notification> {
        (self.baseline > 0 && fresh.len() > self.baseline).then(|| Notification::NewRecord {
            total: fresh.len(),
        })
    }

    fn detect_cancellation(&self, fresh: &[T]) -> Option<Notification> {
        if self.snapshot.is_empty() {
            return None;
        }
        fresh
            .iter()
            .filter(|record| record.is_cancelled())
            .find(|record| {
                !self
                    .snapshot
                    .iter()
                    .any(|prev| prev.id() == record.id() && prev.is_cancelled())
            })
            .map(|record| Notification::Cancelled {
                id: record.id().to_string(),
                display_name: record.display_name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderStatus, Product};

    fn order(id: &str, status: &str) -> Order {
        Order::new(id, format!("Customer {id}"), 100.0).with_status(status)
    }

    #[test]
    fn test_first_load_is_silent() {
        let mut detector = ChangeDetector::new(true);
        let changes = detector.observe(vec![order("O1", "pending"), order("O2", "cancelled")]);

        assert!(changes.is_empty());
        assert_eq!(detector.baseline(), 2);
    }

    #[test]
    fn test_growth_raises_one_new_record_alert() {
        let mut detector = ChangeDetector::new(false);
        detector.observe(vec![order("O1", "pending")]);

        let changes = detector.observe(vec![order("O1", "pending"), order("O2", "pending")]);
        assert_eq!(
            changes.into_notifications(),
            vec![Notification::NewRecord { total: 2 }]
        );
    }

    #[test]
    fn test_net_zero_change_is_not_reported() {
        let mut detector = ChangeDetector::new(false);
        detector.observe(vec![order("O1", "pending"), order("O2", "pending")]);

        let changes = detector.observe(vec![order("O2", "pending"), order("O3", "pending")]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_growth_after_empty_poll_is_suppressed() {
        let mut detector = ChangeDetector::new(false);
        detector.observe(vec![order("O1", "pending")]);
        detector.observe(Vec::new());

        let changes = detector.observe(vec![order("O1", "pending"), order("O2", "pending")]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_cancellation_fires_once() {
        let mut detector = ChangeDetector::new(true);
        detector.observe(vec![order("O1", "processing")]);

        let changes = detector.observe(vec![order("O1", "cancelled")]);
        assert_eq!(
            changes.cancelled,
            Some(Notification::Cancelled {
                id: "O1".into(),
                display_name: "Customer O1".into()
            })
        );

        let changes = detector.observe(vec![order("O1", "cancelled")]);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_new_cancelled_record_counts_as_transition() {
        let mut detector = ChangeDetector::new(true);
        detector.observe(vec![order("O1", "pending")]);

        let changes = detector.observe(vec![order("O1", "pending"), order("O2", "cancelled")]);
        assert_eq!(changes.new_record, Some(Notification::NewRecord { total: 2 }));
        assert!(matches!(
            changes.cancelled,
            Some(Notification::Cancelled { ref id, .. }) if id == "O2"
        ));
    }

    #[test]
    fn test_only_first_cancellation_is_reported() {
        let mut detector = ChangeDetector::new(true);
        detector.observe(vec![order("O1", "pending"), order("O2", "shipped")]);

        let changes = detector.observe(vec![order("O1", "cancelled"), order("O2", "cancelled")]);
        assert!(matches!(
            changes.cancelled,
            Some(Notification::Cancelled { ref id, .. }) if id == "O1"
        ));
    }

    #[test]
    fn test_cancellation_detection_can_be_disabled() {
        let mut detector = ChangeDetector::new(false);
        detector.observe(vec![order("O1", "pending")]);

        let changes = detector.observe(vec![order("O1", "cancelled")]);
        assert!(changes.is_empty());
        assert_eq!(detector.snapshot()[0].status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_identical_snapshots_raise_nothing() {
        let mut detector = ChangeDetector::new(true);
        let list = vec![order("O1", "pending"), order("O2", "cancelled")];
        detector.observe(list.clone());

        assert!(detector.observe(list.clone()).is_empty());
        assert!(detector.observe(list).is_empty());
    }

    #[test]
    fn test_records_without_lifecycle_never_cancel() {
        let mut detector = ChangeDetector::new(true);
        detector.observe(vec![Product::new("P1", "Wax", 450.0)]);

        let changes = detector.observe(vec![Product::new("P1", "Wax", 450.0)]);
        assert!(changes.is_empty());
    }
}
