//! Main settlement engine
//!
//! Orchestrates the close: load configuration, collect unsettled expenses,
//! apply the split policy, commit atomically.

use crate::{
    config::Config,
    locks::CoupleLocks,
    period::DateRange,
    split::{self, Side},
    types::{CloseOutcome, SettlementResult},
    Error, Result,
};
use expense_ledger::{
    Couple, CoupleId, CoupleStore, Expense, ExpenseStore, PartnerDirectory, Settlement,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

/// Currency display precision
const CURRENCY_DP: u32 = 2;

fn to_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    // Fix the scale so JSON and chat output always read e.g. "150.00"
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Settlement engine
///
/// Stores are injected so callers can wire the RocksDB store, the in-memory
/// store, or any other backend behind the same traits.
pub struct SettlementEngine {
    /// Expense and settlement store
    expenses: Arc<dyn ExpenseStore>,

    /// Couple configuration store
    couples: Arc<dyn CoupleStore>,

    /// Partner identity lookup
    partners: Arc<dyn PartnerDirectory>,

    /// Per-couple close serialization
    locks: CoupleLocks,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create a new settlement engine over the given stores
    pub fn new(
        expenses: Arc<dyn ExpenseStore>,
        couples: Arc<dyn CoupleStore>,
        partners: Arc<dyn PartnerDirectory>,
        config: Config,
    ) -> Self {
        Self {
            expenses,
            couples,
            partners,
            locks: CoupleLocks::new(),
            config,
        }
    }

    /// Close the settlement period for a couple.
    ///
    /// Aggregates unsettled expenses inside the inclusive range, computes the
    /// balancing transfer under the couple's split policy and, when the
    /// transfer is non-zero, atomically persists the settlement row and links
    /// every included expense to it. Holds the couple's lock for the whole
    /// invocation, so concurrent closes for one couple are serialized.
    pub async fn close_period(
        &self,
        couple_id: CoupleId,
        range: DateRange,
    ) -> Result<CloseOutcome> {
        let _guard = self.locks.acquire(couple_id).await;

        tracing::info!(
            couple_id = %couple_id,
            start = %range.start,
            end = %range.end,
            "Closing settlement period"
        );

        self.settle(couple_id, range, true).await
    }

    /// Compute the balance for a period without persisting anything.
    ///
    /// Backs the dashboard balance view: same aggregation and split math as
    /// [`Self::close_period`], no lock, no writes, `settlement_id` always
    /// absent from the result.
    pub async fn preview_period(
        &self,
        couple_id: CoupleId,
        range: DateRange,
    ) -> Result<CloseOutcome> {
        self.settle(couple_id, range, false).await
    }

    async fn settle(
        &self,
        couple_id: CoupleId,
        range: DateRange,
        persist: bool,
    ) -> Result<CloseOutcome> {
        let couple = self.load_couple(&couple_id).await?;
        let (p1_name, p2_name) = self.resolve_names(&couple).await?;

        let expenses = self
            .expenses
            .unsettled_in_range(&couple.id, range.start, range.end)
            .await?;

        if expenses.is_empty() {
            tracing::info!(couple_id = %couple_id, "No unsettled expenses in period");
            return Ok(CloseOutcome::NothingToClose);
        }

        let (total_1, total_2) = partition_totals(&couple, &expenses);
        let transfer = split::compute_transfer(total_1, total_2, &couple.split);
        let amount = to_currency(transfer.amount);
        let period_reference = range.reference();

        // The persist decision uses the rounded amount: a sub-cent imbalance
        // closes as balanced rather than writing a row that displays as 0.00.
        let (payer, receiver) = match transfer.payer {
            Some(Side::Partner1) if !amount.is_zero() => {
                (Some(couple.partner_1.clone()), Some(couple.partner_2.clone()))
            }
            Some(Side::Partner2) if !amount.is_zero() => {
                (Some(couple.partner_2.clone()), Some(couple.partner_1.clone()))
            }
            _ => (None, None),
        };

        let settlement_id = match (&payer, &receiver) {
            (Some(payer), Some(receiver)) if persist => {
                let settlement = Settlement::new(
                    couple.id,
                    amount,
                    payer.clone(),
                    receiver.clone(),
                    period_reference.clone(),
                );
                let expense_ids: Vec<_> = expenses.iter().map(|e| e.id).collect();

                self.expenses
                    .commit_settlement(&settlement, &expense_ids)
                    .await
                    .map_err(|e| match e {
                        expense_ledger::Error::AlreadySettled(id) => Error::Inconsistency(
                            format!("expense {} was settled concurrently", id),
                        ),
                        other => Error::Ledger(other),
                    })?;

                tracing::info!(
                    settlement_id = %settlement.id,
                    amount = %amount,
                    payer = %payer,
                    receiver = %receiver,
                    "Settlement period closed"
                );

                Some(settlement.id)
            }
            _ => None,
        };

        let name_of = |id: &expense_ledger::PartnerId| {
            if *id == couple.partner_1 {
                p1_name.clone()
            } else {
                p2_name.clone()
            }
        };

        Ok(CloseOutcome::Closed(SettlementResult {
            settlement_id,
            total_general: to_currency(total_1 + total_2),
            total_partner_1: to_currency(total_1),
            total_partner_2: to_currency(total_2),
            partner_1_name: p1_name.clone(),
            partner_2_name: p2_name.clone(),
            transfer_amount: amount,
            payer_name: payer.as_ref().map(&name_of),
            receiver_name: receiver.as_ref().map(&name_of),
            period_reference,
            split_type: couple.split.kind().to_string(),
        }))
    }

    async fn load_couple(&self, couple_id: &CoupleId) -> Result<Couple> {
        match self.couples.get_couple(couple_id).await {
            Ok(couple) => Ok(couple),
            Err(expense_ledger::Error::CoupleNotFound(_)) => {
                Err(Error::CoupleNotFound(couple_id.to_string()))
            }
            Err(e) => Err(Error::Ledger(e)),
        }
    }

    async fn resolve_names(&self, couple: &Couple) -> Result<(String, String)> {
        let names = self
            .partners
            .resolve(&[couple.partner_1.clone(), couple.partner_2.clone()])
            .await?;
        let p1_name = names
            .get(&couple.partner_1)
            .cloned()
            .unwrap_or_else(|| self.config.fallback_partner_1.clone());
        let p2_name = names
            .get(&couple.partner_2)
            .cloned()
            .unwrap_or_else(|| self.config.fallback_partner_2.clone());
        Ok((p1_name, p2_name))
    }
}

/// Sum expense amounts per partner. Expenses whose payer matches neither
/// partner are excluded from both totals but still consumed by the close.
fn partition_totals(couple: &Couple, expenses: &[Expense]) -> (Decimal, Decimal) {
    let mut total_1 = Decimal::ZERO;
    let mut total_2 = Decimal::ZERO;

    for expense in expenses {
        if expense.payer == couple.partner_1 {
            total_1 += expense.amount;
        } else if expense.payer == couple.partner_2 {
            total_2 += expense.amount;
        } else {
            tracing::warn!(
                expense_id = %expense.id,
                payer = %expense.payer,
                "Expense payer matches neither partner; excluded from totals"
            );
        }
    }

    (total_1, total_2)
}
