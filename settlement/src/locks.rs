//! Per-couple close serialization
//!
//! Two concurrent closes for the same couple over overlapping ranges would
//! both read the same unsettled expenses before either links them. Each
//! close therefore holds the couple's mutex for its whole read-compute-commit
//! span; the store's claim check covers anything outside this process.

use expense_ledger::CoupleId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-couple mutexes, created lazily
#[derive(Debug, Default)]
pub struct CoupleLocks {
    locks: Mutex<HashMap<CoupleId, Arc<Mutex<()>>>>,
}

impl CoupleLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a couple, waiting if a close is in flight
    pub async fn acquire(&self, couple_id: CoupleId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(couple_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
