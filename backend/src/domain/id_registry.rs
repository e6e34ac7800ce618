//! Registry of transaction identifiers that are currently in use.
//!
//! A registry is an explicit object owned by the session (or a test) and
//! handed to the places that create transactions. Clones share the same
//! underlying set, and every operation takes the lock, so allocations from
//! several threads never hand out the same value twice.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::models::transaction::TransactionId;

/// Smallest identifier value ever handed out
const FIRST_ID: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    used: Arc<Mutex<BTreeSet<u32>>>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A plain set of integers cannot be left half-updated, so a poisoned lock is still usable.
    fn used(&self) -> MutexGuard<'_, BTreeSet<u32>> {
        self.used.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand out the smallest value not currently in use and mark it as used.
    ///
    /// Allocation is deterministic: the same sequence of allocate/release
    /// calls always yields the same identifiers.
    pub fn allocate(&self) -> TransactionId {
        let mut used = self.used();
        let mut candidate = FIRST_ID;
        for &value in used.range(FIRST_ID..) {
            if value != candidate {
                break;
            }
            candidate += 1;
        }
        used.insert(candidate);
        debug!("Allocated transaction id {}", candidate);
        TransactionId::new(candidate)
    }

    /// Claim a specific value, e.g. one loaded from a file.
    ///
    /// Returns `false` if the value was already in use.
    pub fn reserve(&self, id: TransactionId) -> bool {
        self.used().insert(id.value())
    }

    /// Free a value so that a later allocation may reuse it. No-op if unused.
    pub fn release(&self, id: TransactionId) {
        if self.used().remove(&id.value()) {
            debug!("Released transaction id {}", id);
        }
    }

    pub fn is_used(&self, id: TransactionId) -> bool {
        self.used().contains(&id.value())
    }

    /// Forget every reservation.
    pub fn clear(&self) {
        self.used().clear();
    }

    pub fn len(&self) -> usize {
        self.used().len()
    }

    pub fn is_empty(&self) -> bool {
        self.used().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_allocates_smallest_unused_value() {
        let registry = IdRegistry::new();
        assert_eq!(registry.allocate(), TransactionId::new(1));
        assert_eq!(registry.allocate(), TransactionId::new(2));
        assert_eq!(registry.allocate(), TransactionId::new(3));

        registry.release(TransactionId::new(2));
        assert_eq!(registry.allocate(), TransactionId::new(2));
        assert_eq!(registry.allocate(), TransactionId::new(4));
    }

    #[test]
    fn test_allocation_skips_reserved_values() {
        let registry = IdRegistry::new();
        assert!(registry.reserve(TransactionId::new(1)));
        assert!(registry.reserve(TransactionId::new(3)));
        assert!(!registry.reserve(TransactionId::new(3)));

        assert_eq!(registry.allocate(), TransactionId::new(2));
        assert_eq!(registry.allocate(), TransactionId::new(4));
    }

    #[test]
    fn test_release_of_unknown_value_is_noop() {
        let registry = IdRegistry::new();
        registry.allocate();
        registry.release(TransactionId::new(99));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = IdRegistry::new();
        let clone = registry.clone();
        let id = clone.allocate();
        assert!(registry.is_used(id));

        registry.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_independent_registries_do_not_interfere() {
        let a = IdRegistry::new();
        let b = IdRegistry::new();
        assert_eq!(a.allocate(), TransactionId::new(1));
        assert_eq!(b.allocate(), TransactionId::new(1));
    }

    #[test]
    fn test_concurrent_allocations_are_unique() {
        let registry = IdRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || (0..50).map(|_| registry.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {} handed out twice", id);
            }
        }
        assert_eq!(seen.len(), 400);
        assert_eq!(registry.len(), 400);
    }
}
