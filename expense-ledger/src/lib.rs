//! Duetto Expense Ledger
//!
//! Durable store for a couple's shared finances: couples and their split
//! configuration, partner display names, expense records and the settlements
//! that consume them.
//!
//! # Architecture
//!
//! - **Exact arithmetic**: every amount is a `rust_decimal::Decimal`
//! - **Trait seams**: the settlement engine sees only [`CoupleStore`],
//!   [`PartnerDirectory`] and [`ExpenseStore`], so backends are swappable
//! - **Atomic closes**: [`ExpenseStore::commit_settlement`] writes the
//!   settlement row and every expense link in one batch, or not at all
//!
//! # Invariants
//!
//! - An expense with a non-null settlement link is never counted again
//! - Proportional split shares always lie in `[0, 100]`
//! - A settlement row never exists without its linked expenses

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod memory;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use storage::RocksStore;
pub use store::{CoupleStore, ExpenseStore, PartnerDirectory};
pub use types::{
    Couple, CoupleId, Expense, ExpenseId, PartnerId, Settlement, SettlementId, SplitPolicy,
};
