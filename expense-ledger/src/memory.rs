//! In-memory store
//!
//! Backs engine tests and embeddings that do not need durability. A single
//! `RwLock` over the whole state gives `commit_settlement` the same
//! claim-then-link atomicity as the RocksDB write batch.

use crate::{
    error::{Error, Result},
    store::{CoupleStore, ExpenseStore, PartnerDirectory},
    types::{Couple, CoupleId, Expense, ExpenseId, PartnerId, Settlement, SettlementId},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    couples: HashMap<CoupleId, Couple>,
    partners: HashMap<PartnerId, String>,
    expenses: HashMap<ExpenseId, Expense>,
    settlements: HashMap<SettlementId, Settlement>,
}

/// In-memory implementation of all three store traits
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of settlement rows (test helper)
    pub fn settlement_count(&self) -> usize {
        self.inner.read().settlements.len()
    }
}

#[async_trait]
impl CoupleStore for MemoryStore {
    async fn get_couple(&self, id: &CoupleId) -> Result<Couple> {
        self.inner
            .read()
            .couples
            .get(id)
            .cloned()
            .ok_or_else(|| Error::CoupleNotFound(id.to_string()))
    }

    async fn put_couple(&self, couple: &Couple) -> Result<()> {
        couple.split.validate()?;
        self.inner
            .write()
            .couples
            .insert(couple.id, couple.clone());
        Ok(())
    }
}

#[async_trait]
impl PartnerDirectory for MemoryStore {
    async fn resolve(&self, ids: &[PartnerId]) -> Result<HashMap<PartnerId, String>> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.partners.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }

    async fn put_partner(&self, id: &PartnerId, name: &str) -> Result<()> {
        self.inner
            .write()
            .partners
            .insert(id.clone(), name.to_string());
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        expense.validate()?;
        self.inner
            .write()
            .expenses
            .insert(expense.id, expense.clone());
        Ok(())
    }

    async fn get_expense(&self, id: &ExpenseId) -> Result<Expense> {
        self.inner
            .read()
            .expenses
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ExpenseNotFound(id.to_string()))
    }

    async fn unsettled_in_range(
        &self,
        couple_id: &CoupleId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let inner = self.inner.read();
        let mut expenses: Vec<Expense> = inner
            .expenses
            .values()
            .filter(|e| {
                e.couple_id == *couple_id
                    && e.is_unsettled()
                    && e.expense_date >= start
                    && e.expense_date <= end
            })
            .cloned()
            .collect();
        expenses.sort_by_key(|e| e.expense_date);
        Ok(expenses)
    }

    async fn commit_settlement(
        &self,
        settlement: &Settlement,
        expense_ids: &[ExpenseId],
    ) -> Result<()> {
        // Single write guard: claim check and link are one critical section
        let mut inner = self.inner.write();

        for id in expense_ids {
            let expense = inner
                .expenses
                .get(id)
                .ok_or_else(|| Error::ExpenseNotFound(id.to_string()))?;
            if !expense.is_unsettled() {
                return Err(Error::AlreadySettled(id.to_string()));
            }
        }

        for id in expense_ids {
            if let Some(expense) = inner.expenses.get_mut(id) {
                expense.settlement_id = Some(settlement.id);
            }
        }
        inner.settlements.insert(settlement.id, settlement.clone());

        Ok(())
    }

    async fn get_settlement(&self, id: &SettlementId) -> Result<Settlement> {
        self.inner
            .read()
            .settlements
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SettlementNotFound(id.to_string()))
    }
}
