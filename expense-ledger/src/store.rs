//! Store traits consumed by the settlement engine
//!
//! The engine never touches a backend directly; it is handed trait objects
//! at construction time so real RocksDB storage and in-memory test doubles
//! are interchangeable.

use crate::types::{Couple, CoupleId, Expense, ExpenseId, PartnerId, Settlement, SettlementId};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-couple split configuration store
#[async_trait]
pub trait CoupleStore: Send + Sync {
    /// Fetch a couple's configuration. A missing couple is an error, not an
    /// empty result.
    async fn get_couple(&self, id: &CoupleId) -> Result<Couple>;

    /// Insert or replace a couple. Validates the split policy.
    async fn put_couple(&self, couple: &Couple) -> Result<()>;
}

/// Partner identity lookup: stable id to display name
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    /// Resolve display names for the given ids. Unknown ids are simply
    /// absent from the returned map; callers choose the fallback.
    async fn resolve(&self, ids: &[PartnerId]) -> Result<HashMap<PartnerId, String>>;

    /// Register or rename a partner
    async fn put_partner(&self, id: &PartnerId, name: &str) -> Result<()>;
}

/// Expense and settlement store
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert a new expense record. Rejects negative amounts with
    /// [`crate::Error::InvalidAmount`].
    async fn insert_expense(&self, expense: &Expense) -> Result<()>;

    /// Fetch a single expense
    async fn get_expense(&self, id: &ExpenseId) -> Result<Expense>;

    /// All expenses for the couple with a null settlement link whose
    /// expense date lies in `[start, end]` inclusive
    async fn unsettled_in_range(
        &self,
        couple_id: &CoupleId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>>;

    /// Atomically insert the settlement row and link every listed expense
    /// to it. Fails whole with [`crate::Error::AlreadySettled`] if any
    /// expense already carries a settlement link; nothing is written in
    /// that case. This is the claim step that makes concurrent closes safe.
    async fn commit_settlement(
        &self,
        settlement: &Settlement,
        expense_ids: &[ExpenseId],
    ) -> Result<()>;

    /// Fetch a settlement record
    async fn get_settlement(&self, id: &SettlementId) -> Result<Settlement>;
}
