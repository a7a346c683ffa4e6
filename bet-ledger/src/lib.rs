//! Betting state layer
//!
//! Balance ledger and bet journal over a minimal key-value store.
//!
//! # Architecture
//!
//! - **Balance Ledger**: per-user balances. The store has no
//!   compare-and-swap, so every read-modify-write runs under that user's
//!   lock.
//! - **Bet Journal**: per-event collections of bets. Records are rewritten
//!   in place when settlement marks them; the per-event index is
//!   append-only.
//! - **KvStore**: the four storage primitives (`get`, `set`,
//!   `append_to_list`, `list_range`), with Redis and in-memory
//!   implementations.
//!
//! # Invariants
//!
//! - A committed balance is never negative
//! - User creation grants the starting balance exactly once per user
//! - A failed journal append never leaves the bet observable as durable

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod store;
pub mod types;

// Re-exports
pub use config::LedgerConfig;
pub use error::{Error, Result};
pub use journal::BetJournal;
pub use ledger::BalanceLedger;
pub use store::{KvStore, MemoryStore, RedisStore};
pub use types::{Bet, BetStatus, EventId, User, UserId};
