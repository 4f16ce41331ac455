//! Duetto Settlement Engine
//!
//! Computes and atomically persists the balancing transfer for a couple over
//! a date range, consuming only previously-unsettled expenses.
//!
//! # Flow
//!
//! 1. **Load**: couple configuration and partner display names
//! 2. **Collect**: unsettled expenses inside the inclusive date range
//! 3. **Split**: apply the couple's policy (equal or proportional)
//! 4. **Commit**: settlement row plus every expense link in one atomic write
//!
//! Re-closing the same or an overlapping range is safe: linked expenses are
//! filtered out at collection time, so the second call is a no-op.
//!
//! # Example
//!
//! ```no_run
//! use expense_ledger::MemoryStore;
//! use settlement::{Config, DateRange, SettlementEngine};
//! use std::sync::Arc;
//!
//! # async fn run(couple_id: expense_ledger::CoupleId) -> settlement::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let engine = SettlementEngine::new(
//!     store.clone(),
//!     store.clone(),
//!     store,
//!     Config::default(),
//! );
//!
//! let range = DateRange::month(2026, 8)?;
//! let outcome = engine.close_period(couple_id, range).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod locks;
pub mod period;
pub mod split;
pub mod types;

// Re-exports
pub use command::{handle_close_command, parse_close_command, MessageGateway};
pub use config::Config;
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use period::DateRange;
pub use types::{CloseOutcome, SettlementResult};
