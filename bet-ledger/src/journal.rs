//! Bet journal
//!
//! Owns the per-event collections of bets. Each bet record lives under its
//! own key so settlement can rewrite it in place; the per-event list is an
//! append-only index of bet ids. The credited marker records that a payout
//! committed and must be consulted before crediting again.

use crate::store::KvStore;
use crate::types::{Bet, EventId};
use crate::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

const BET_KEY_PREFIX: &str = "bet:";
const EVENT_BETS_PREFIX: &str = "bets:event:";
const CREDITED_PREFIX: &str = "bets:credited:";

fn bet_key(bet_id: Uuid) -> String {
    format!("{}{}", BET_KEY_PREFIX, bet_id)
}

fn event_key(event_id: &EventId) -> String {
    format!("{}{}", EVENT_BETS_PREFIX, event_id)
}

fn credited_key(bet_id: Uuid) -> String {
    format!("{}{}", CREDITED_PREFIX, bet_id)
}

/// Append-only per-event store of bets
pub struct BetJournal {
    store: Arc<dyn KvStore>,
}

impl BetJournal {
    /// Create a journal over `store`
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist a new bet under its event's collection, in arrival order.
    ///
    /// The record is written before the event index entry. If the index
    /// append fails the record is unreachable, so a failed append never
    /// leaves the bet observable as durable.
    pub async fn append(&self, bet: &Bet) -> Result<()> {
        let raw = serde_json::to_string(bet)?;
        self.store.set(&bet_key(bet.id), &raw).await?;
        self.store
            .append_to_list(&event_key(&bet.event_id), &bet.id.to_string())
            .await
    }

    /// All bets ever appended for `event_id`, in append order.
    ///
    /// An entry whose record is missing or no longer readable is skipped
    /// with a warning; the listing proceeds with the remaining bets.
    pub async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<Bet>> {
        let ids = self.store.list_range(&event_key(event_id)).await?;

        let mut bets = Vec::with_capacity(ids.len());
        for id in ids {
            let bet_id = match id.parse::<Uuid>() {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(
                        "Skipping malformed bet id {:?} for event {}: {}",
                        id, event_id, e
                    );
                    continue;
                }
            };
            match self.load(bet_id).await {
                Ok(Some(bet)) => bets.push(bet),
                Ok(None) => {
                    warn!(
                        "Skipping bet {}: indexed for event {} but record missing",
                        bet_id, event_id
                    );
                }
                Err(e) => {
                    warn!("Skipping bet {}: failed to load record: {}", bet_id, e);
                }
            }
        }

        Ok(bets)
    }

    /// Fresh read of a single bet record; `None` if unknown
    pub async fn get(&self, bet_id: Uuid) -> Result<Option<Bet>> {
        self.load(bet_id).await
    }

    async fn load(&self, bet_id: Uuid) -> Result<Option<Bet>> {
        match self.store.get(&bet_key(bet_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Rewrite a bet record in place; the event index is untouched
    pub async fn update(&self, bet: &Bet) -> Result<()> {
        let raw = serde_json::to_string(bet)?;
        self.store.set(&bet_key(bet.id), &raw).await
    }

    /// Check whether the payout for `bet_id` has already committed
    pub async fn is_credited(&self, bet_id: Uuid) -> Result<bool> {
        Ok(self.store.get(&credited_key(bet_id)).await?.is_some())
    }

    /// Record that the payout for `bet_id` committed
    pub async fn mark_credited(&self, bet_id: Uuid, amount: Decimal) -> Result<()> {
        self.store
            .set(&credited_key(bet_id), &amount.to_string())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{BetStatus, UserId};
    use rust_decimal_macros::dec;

    fn test_bet(event: &str) -> Bet {
        Bet::new(
            UserId::new("u1"),
            EventId::new(event),
            dec!(2.0),
            dec!(100),
        )
    }

    #[tokio::test]
    async fn test_append_then_list() {
        let journal = BetJournal::new(Arc::new(MemoryStore::new()));
        let event_id = EventId::new("e1");

        let first = test_bet("e1");
        let second = test_bet("e1");
        journal.append(&first).await.unwrap();
        journal.append(&second).await.unwrap();

        let bets = journal.list_by_event(&event_id).await.unwrap();
        assert_eq!(bets, vec![first, second]);
    }

    #[tokio::test]
    async fn test_list_unknown_event_is_empty() {
        let journal = BetJournal::new(Arc::new(MemoryStore::new()));
        let bets = journal.list_by_event(&EventId::new("nope")).await.unwrap();
        assert!(bets.is_empty());
    }

    #[tokio::test]
    async fn test_events_are_isolated() {
        let journal = BetJournal::new(Arc::new(MemoryStore::new()));
        journal.append(&test_bet("e1")).await.unwrap();
        journal.append(&test_bet("e2")).await.unwrap();

        let bets = journal.list_by_event(&EventId::new("e1")).await.unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].event_id, EventId::new("e1"));
    }

    #[tokio::test]
    async fn test_update_rewrites_record() {
        let journal = BetJournal::new(Arc::new(MemoryStore::new()));
        let mut bet = test_bet("e1");
        journal.append(&bet).await.unwrap();

        bet.status = BetStatus::Won;
        journal.update(&bet).await.unwrap();

        let fresh = journal.get(bet.id).await.unwrap().unwrap();
        assert_eq!(fresh.status, BetStatus::Won);

        let listed = journal.list_by_event(&bet.event_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, BetStatus::Won);
    }

    #[tokio::test]
    async fn test_list_skips_undecodable_record() {
        let store = Arc::new(MemoryStore::new());
        let journal = BetJournal::new(store.clone());
        let event_id = EventId::new("e1");

        let good = test_bet("e1");
        journal.append(&good).await.unwrap();

        let rotten = Uuid::new_v4();
        store
            .set(&format!("bet:{}", rotten), "not json")
            .await
            .unwrap();
        store
            .append_to_list(&format!("bets:event:{}", event_id), &rotten.to_string())
            .await
            .unwrap();

        let bets = journal.list_by_event(&event_id).await.unwrap();
        assert_eq!(bets, vec![good]);
    }

    #[tokio::test]
    async fn test_list_skips_malformed_id() {
        let store = Arc::new(MemoryStore::new());
        let journal = BetJournal::new(store.clone());
        let event_id = EventId::new("e1");

        store
            .append_to_list(&format!("bets:event:{}", event_id), "not-a-uuid")
            .await
            .unwrap();
        let good = test_bet("e1");
        journal.append(&good).await.unwrap();

        let bets = journal.list_by_event(&event_id).await.unwrap();
        assert_eq!(bets, vec![good]);
    }

    #[tokio::test]
    async fn test_credited_marker() {
        let journal = BetJournal::new(Arc::new(MemoryStore::new()));
        let bet_id = Uuid::new_v4();

        assert!(!journal.is_credited(bet_id).await.unwrap());
        journal.mark_credited(bet_id, dec!(200)).await.unwrap();
        assert!(journal.is_credited(bet_id).await.unwrap());
    }
}
