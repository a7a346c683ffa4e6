//! Bet settlement engine
//!
//! Places wagers against events and settles them once the outcome is
//! known.
//!
//! # Architecture
//!
//! 1. **Placement**: validate, reserve the stake from the user's balance,
//!    journal the pending bet. A journal failure reverses the debit.
//! 2. **Settlement**: list the event's bets and, one claim at a time,
//!    credit the winners and mark every pending bet with the outcome.
//!
//! The ledger serializes balance mutations per user; the claim table
//! serializes settlement per bet. Credits commit before marks, and a
//! durable credited marker keeps retried passes from paying twice.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod claim;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod types;

// Re-exports
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use types::{SettlementOutcome, SettlementReport, SettlementResult};
