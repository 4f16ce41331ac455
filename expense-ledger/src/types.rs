//! Core types for the expense ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode for storage, serde_json at the API)
//! - Exact arithmetic (Decimal for money)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Couple identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoupleId(pub Uuid);

impl CoupleId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CoupleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CoupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expense identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub Uuid);

impl ExpenseId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settlement identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable partner identifier (phone number or linked account id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerId(String);

impl PartnerId {
    /// Create new partner ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a couple splits shared spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// The difference between the two totals is split in half
    Equal,
    /// Partner 1 covers a fixed percentage of total spend; partner 2 covers
    /// the remainder
    Proportional {
        /// Partner 1's share of total spend, in percent (0..=100)
        partner_1_share: Decimal,
    },
}

impl SplitPolicy {
    /// Validate share bounds
    pub fn validate(&self) -> crate::Result<()> {
        if let SplitPolicy::Proportional { partner_1_share } = self {
            if *partner_1_share < Decimal::ZERO || *partner_1_share > Decimal::ONE_HUNDRED {
                return Err(crate::Error::InvalidSplit(format!(
                    "partner_1_share {} outside [0, 100]",
                    partner_1_share
                )));
            }
        }
        Ok(())
    }

    /// Display label, also used in dashboard JSON
    pub fn kind(&self) -> &'static str {
        match self {
            SplitPolicy::Equal => "EQUAL",
            SplitPolicy::Proportional { .. } => "PROPORTIONAL",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// A pair of partners sharing finances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Couple {
    /// Couple ID
    pub id: CoupleId,

    /// Partner 1 (the account owner; the only one allowed to change the split)
    pub partner_1: PartnerId,

    /// Partner 2
    pub partner_2: PartnerId,

    /// Split policy for settlement computation
    pub split: SplitPolicy,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Couple {
    /// Create a couple with a validated split policy
    pub fn new(
        partner_1: PartnerId,
        partner_2: PartnerId,
        split: SplitPolicy,
    ) -> crate::Result<Self> {
        split.validate()?;
        Ok(Self {
            id: CoupleId::new(),
            partner_1,
            partner_2,
            split,
            created_at: Utc::now(),
        })
    }
}

/// A single recorded spending event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// Owning couple
    pub couple_id: CoupleId,

    /// Amount spent (non-negative, exact decimal)
    pub amount: Decimal,

    /// Which partner paid
    pub payer: PartnerId,

    /// Calendar date of the spend (distinct from the record timestamp)
    pub expense_date: NaiveDate,

    /// Free-text description (merchant, place)
    pub description: Option<String>,

    /// Category label
    pub category: Option<String>,

    /// Settlement that consumed this expense; `None` while unsettled.
    /// One-way transition: once set, the expense is out of scope for any
    /// later settlement.
    pub settlement_id: Option<SettlementId>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create an unsettled expense for today's record timestamp
    pub fn new(
        couple_id: CoupleId,
        payer: PartnerId,
        amount: Decimal,
        expense_date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            couple_id,
            amount,
            payer,
            expense_date,
            description: None,
            category: None,
            settlement_id: None,
            created_at: Utc::now(),
        }
    }

    /// Validate amount bounds. Refunds are recorded as separate expenses by
    /// the other partner, never as negative amounts.
    pub fn validate(&self) -> crate::Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(crate::Error::InvalidAmount(format!(
                "amount {} is negative",
                self.amount
            )));
        }
        Ok(())
    }

    /// Whether this expense is still eligible for settlement
    pub fn is_unsettled(&self) -> bool {
        self.settlement_id.is_none()
    }
}

/// A persisted balancing transfer between partners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID
    pub id: SettlementId,

    /// Owning couple
    pub couple_id: CoupleId,

    /// Amount transferred (non-negative; zero-amount periods write no row)
    pub amount_settled: Decimal,

    /// Partner who pays the transfer
    pub paid_by: PartnerId,

    /// Partner who receives the transfer
    pub received_by: PartnerId,

    /// Human-readable label for the covered date range
    pub period_reference: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a settlement record
    pub fn new(
        couple_id: CoupleId,
        amount_settled: Decimal,
        paid_by: PartnerId,
        received_by: PartnerId,
        period_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            couple_id,
            amount_settled,
            paid_by,
            received_by,
            period_reference: period_reference.into(),
            created_at: Utc::now(),
        }
    }
}
