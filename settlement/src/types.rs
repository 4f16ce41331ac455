//! Result types for settlement operations

use expense_ledger::SettlementId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a close-period invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloseOutcome {
    /// No unsettled expenses in the range; nothing was created or mutated.
    /// This is a success, not an error.
    NothingToClose,

    /// The period was closed. When the transfer is zero no settlement row
    /// was written, but totals are still reported.
    Closed(SettlementResult),
}

impl CloseOutcome {
    /// Whether the call found nothing to do
    pub fn is_noop(&self) -> bool {
        matches!(self, CloseOutcome::NothingToClose)
    }

    /// The settlement result, if the period was closed
    pub fn result(&self) -> Option<&SettlementResult> {
        match self {
            CloseOutcome::Closed(result) => Some(result),
            CloseOutcome::NothingToClose => None,
        }
    }
}

/// Computed settlement for one period
///
/// All amounts are rounded to 2 decimal places for currency display; the
/// dashboard caller serializes this struct as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Persisted settlement row, when a non-zero transfer was committed
    pub settlement_id: Option<SettlementId>,

    /// Total spent by both partners in the period
    pub total_general: Decimal,

    /// Partner 1's spend
    pub total_partner_1: Decimal,

    /// Partner 2's spend
    pub total_partner_2: Decimal,

    /// Partner 1 display name
    pub partner_1_name: String,

    /// Partner 2 display name
    pub partner_2_name: String,

    /// Balancing transfer amount (zero when the period is balanced)
    pub transfer_amount: Decimal,

    /// Who pays the transfer; `None` when balanced
    pub payer_name: Option<String>,

    /// Who receives the transfer; `None` when balanced
    pub receiver_name: Option<String>,

    /// Human-readable period label
    pub period_reference: String,

    /// Split policy applied ("EQUAL" or "PROPORTIONAL")
    pub split_type: String,
}
