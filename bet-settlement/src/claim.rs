//! Per-bet claim locks
//!
//! Two concurrent settlement passes over one event must not both process
//! the same pending bet. The claim table hands out one async mutex per bet
//! id; holding it makes the re-read, credit and mark steps exclusive for
//! that bet. Entries are created lazily and never removed.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Lock table keyed by bet id
#[derive(Debug, Default)]
pub struct BetClaims {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl BetClaims {
    /// Create an empty claim table
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `bet_id`, created on first use
    pub fn claim(&self, bet_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(bet_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
