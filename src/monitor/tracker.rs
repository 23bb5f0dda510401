//! MintTracker - decides which snapshots are newly hot and suppresses repeats
//!
//! Every address that qualifies is recorded as a [`TrackedMint`] and stays
//! suppressed until its age exceeds the expiry horizon. Only the poll loop owns
//! a tracker, so there is no interior locking.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::monitor::types::TrackedMint;
use crate::types::{Address, MintSnapshot};

/// In-memory set of alerted addresses.
#[derive(Debug)]
pub struct MintTracker {
    tracked: HashMap<Address, TrackedMint>,
    expiry_horizon_seconds: u64,
}

impl MintTracker {
    /// Create an empty tracker.
    pub fn new(expiry_horizon_seconds: u64) -> Self {
        Self {
            tracked: HashMap::new(),
            expiry_horizon_seconds,
        }
    }

    /// Drop every entry older than the expiry horizon. Returns how many were removed.
    pub fn evict_expired(&mut self, now: u64) -> usize {
        let horizon = self.expiry_horizon_seconds;
        let before = self.tracked.len();

        self.tracked.retain(|address, entry| {
            let expired = entry.is_expired(now, horizon);
            if expired {
                debug!(address = %address, age = entry.age(now), "Tracking expired");
            }
            !expired
        });

        before - self.tracked.len()
    }

    /// Return the snapshots that are untracked and meet `threshold`, in input order.
    ///
    /// Each returned address is tracked before the next snapshot is considered,
    /// so a batch repeating an address yields it once.
    pub fn evaluate(
        &mut self,
        snapshots: Vec<MintSnapshot>,
        threshold: u64,
        now: u64,
    ) -> Vec<MintSnapshot> {
        let mut qualifying = Vec::new();

        for snapshot in snapshots {
            if snapshot.total_count < threshold || self.tracked.contains_key(&snapshot.address) {
                continue;
            }

            info!(
                "Found new mint: {} ({})",
                snapshot.display_name(),
                snapshot.total_count
            );
            self.tracked.insert(
                snapshot.address.clone(),
                TrackedMint::new(snapshot.address.clone(), now),
            );
            qualifying.push(snapshot);
        }

        qualifying
    }

    pub fn is_tracked(&self, address: &str) -> bool {
        self.tracked.contains_key(address)
    }

    pub fn get(&self, address: &str) -> Option<&TrackedMint> {
        self.tracked.get(address)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZON: u64 = 250;
    const T0: u64 = 1_700_000_000;

    fn addresses(snapshots: &[MintSnapshot]) -> Vec<&str> {
        snapshots.iter().map(|s| s.address.as_str()).collect()
    }

    #[test]
    fn test_below_threshold_never_qualifies() {
        let mut tracker = MintTracker::new(HORIZON);

        let result = tracker.evaluate(
            vec![MintSnapshot::new("0xA", 9), MintSnapshot::new("0xB", 0)],
            10,
            T0,
        );

        assert!(result.is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = MintTracker::new(HORIZON);

        let result = tracker.evaluate(vec![MintSnapshot::new("0xA", 10)], 10, T0);

        assert_eq!(addresses(&result), vec!["0xA"]);
        assert_eq!(tracker.get("0xA").map(|t| t.first_seen_at), Some(T0));
    }

    #[test]
    fn test_tracked_address_is_suppressed() {
        let mut tracker = MintTracker::new(HORIZON);
        tracker.evaluate(vec![MintSnapshot::new("0xA", 15)], 10, T0);

        let again = tracker.evaluate(vec![MintSnapshot::new("0xA", 500)], 10, T0 + 30);

        assert!(again.is_empty());
        assert_eq!(tracker.get("0xA").map(|t| t.first_seen_at), Some(T0));
    }

    #[test]
    fn test_batch_duplicates_yield_first_occurrence() {
        let mut tracker = MintTracker::new(HORIZON);
        let mut first = MintSnapshot::new("0xA", 12);
        first.name = Some("first".to_string());
        let mut second = MintSnapshot::new("0xA", 40);
        second.name = Some("second".to_string());

        let result = tracker.evaluate(
            vec![first, MintSnapshot::new("0xB", 11), second],
            10,
            T0,
        );

        assert_eq!(addresses(&result), vec!["0xA", "0xB"]);
        assert_eq!(result[0].name.as_deref(), Some("first"));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_eviction_only_after_horizon() {
        let mut tracker = MintTracker::new(HORIZON);
        tracker.evaluate(vec![MintSnapshot::new("0xA", 15)], 10, T0);

        assert_eq!(tracker.evict_expired(T0 + HORIZON), 0);
        assert!(tracker.is_tracked("0xA"));

        assert_eq!(tracker.evict_expired(T0 + HORIZON + 1), 1);
        assert!(!tracker.is_tracked("0xA"));
    }

    #[test]
    fn test_requalifies_after_expiry() {
        let mut tracker = MintTracker::new(HORIZON);
        tracker.evaluate(vec![MintSnapshot::new("0xA", 15)], 10, T0);

        let later = T0 + HORIZON + 5;
        tracker.evict_expired(later);
        let result = tracker.evaluate(vec![MintSnapshot::new("0xA", 15)], 10, later);

        assert_eq!(addresses(&result), vec!["0xA"]);
        assert_eq!(tracker.get("0xA").map(|t| t.first_seen_at), Some(later));
    }

    #[test]
    fn test_eviction_is_per_entry() {
        let mut tracker = MintTracker::new(HORIZON);
        tracker.evaluate(vec![MintSnapshot::new("0xA", 15)], 10, T0);
        tracker.evaluate(vec![MintSnapshot::new("0xB", 15)], 10, T0 + 200);

        let removed = tracker.evict_expired(T0 + 300);

        assert_eq!(removed, 1);
        assert!(!tracker.is_tracked("0xA"));
        assert!(tracker.is_tracked("0xB"));
    }
}
