//! Split-policy math
//!
//! Pure functions over exact decimals; currency rounding is applied by the
//! engine at the result boundary, never here.
//!
//! # Example
//!
//! ```text
//! EQUAL, partner 1 spent 300, partner 2 spent 100:
//!   transfer = |300 - 100| / 2 = 100
//!   partner 2 (lower spender) pays partner 1
//!
//! PROPORTIONAL 70/30, total 1000, partner 1 spent 800:
//!   target_1  = 1000 * 0.70 = 700
//!   balance_1 = 800 - 700   = 100  (overspent)
//!   partner 2 pays partner 1 100
//! ```

use expense_ledger::SplitPolicy;
use rust_decimal::Decimal;

/// Which side of the couple pays the balancing transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Partner 1 pays partner 2
    Partner1,
    /// Partner 2 pays partner 1
    Partner2,
}

/// Computed balancing transfer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    /// Amount owed, full precision, non-negative
    pub amount: Decimal,

    /// Paying side; `None` when the period is perfectly balanced
    pub payer: Option<Side>,
}

impl Transfer {
    /// A zero transfer with no direction
    pub fn balanced() -> Self {
        Self {
            amount: Decimal::ZERO,
            payer: None,
        }
    }
}

/// Compute the balancing transfer for the given per-partner totals
pub fn compute_transfer(total_1: Decimal, total_2: Decimal, policy: &SplitPolicy) -> Transfer {
    match policy {
        SplitPolicy::Equal => equal_split(total_1, total_2),
        SplitPolicy::Proportional { partner_1_share } => {
            proportional_split(total_1, total_2, *partner_1_share)
        }
    }
}

/// The difference is split in half; the lower spender owes the higher one
fn equal_split(total_1: Decimal, total_2: Decimal) -> Transfer {
    let amount = (total_1 - total_2).abs() / Decimal::TWO;

    if amount.is_zero() {
        // Exact tie: no transfer, no arbitrary direction
        return Transfer::balanced();
    }

    let payer = if total_1 < total_2 {
        Side::Partner1
    } else {
        Side::Partner2
    };

    Transfer {
        amount,
        payer: Some(payer),
    }
}

/// Partner 1's target is `share` percent of total spend; whoever is past
/// their target is reimbursed by the other
fn proportional_split(total_1: Decimal, total_2: Decimal, partner_1_share: Decimal) -> Transfer {
    let total_general = total_1 + total_2;
    let target_1 = total_general * partner_1_share / Decimal::ONE_HUNDRED;
    let balance_1 = total_1 - target_1;

    if balance_1.is_zero() {
        return Transfer::balanced();
    }

    if balance_1 > Decimal::ZERO {
        // Partner 1 overspent relative to their share: partner 2 reimburses
        Transfer {
            amount: balance_1,
            payer: Some(Side::Partner2),
        }
    } else {
        Transfer {
            amount: balance_1.abs(),
            payer: Some(Side::Partner1),
        }
    }
}
