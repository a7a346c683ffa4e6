//! Balance ledger
//!
//! Owns per-user balance state. The backing store has no compare-and-swap,
//! so every read-modify-write holds that user's lock for the whole critical
//! section. Locks are keyed by user: operations on different users never
//! contend with each other.

use crate::store::KvStore;
use crate::types::{User, UserId};
use crate::{Error, LedgerConfig, Result};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const USER_KEY_PREFIX: &str = "user:";

fn user_key(user_id: &UserId) -> String {
    format!("{}{}", USER_KEY_PREFIX, user_id)
}

/// Per-user balance state over the key-value store
pub struct BalanceLedger {
    store: Arc<dyn KvStore>,
    starting_balance: Decimal,
    /// Per-user locks, created lazily and never removed
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl BalanceLedger {
    /// Create a ledger over `store`
    pub fn new(store: Arc<dyn KvStore>, config: LedgerConfig) -> Self {
        Self {
            store,
            starting_balance: config.starting_balance,
            locks: DashMap::new(),
        }
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load(&self, user_id: &UserId) -> Result<Option<User>> {
        match self.store.get(&user_key(user_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn persist(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(&user_key(&user.id), &raw).await
    }

    /// Look up a user; `None` if unknown. No side effects.
    pub async fn get(&self, user_id: &UserId) -> Result<Option<User>> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        self.load(user_id).await
    }

    /// Return the existing user, or create one with the starting balance.
    ///
    /// Creation is atomic per user id: of two concurrent calls for an
    /// unknown id, exactly one creates the user and the other observes the
    /// created record. The starting balance is never applied twice.
    pub async fn get_or_create(&self, user_id: &UserId) -> Result<User> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        if let Some(user) = self.load(user_id).await? {
            return Ok(user);
        }

        let user = User::new(user_id.clone(), self.starting_balance);
        self.persist(&user).await?;
        info!(
            "Created user {} with starting balance {}",
            user.id, user.balance
        );

        Ok(user)
    }

    /// Apply `balance += delta` as a single atomic read-modify-write.
    ///
    /// Fails with [`Error::UserNotFound`] for an unknown user, with
    /// [`Error::InsufficientFunds`] if a debit would drive the balance
    /// negative, and with [`Error::Overflow`] if the result exceeds the
    /// representable range. The checks and the write happen under the
    /// user's lock, so no interleaving of concurrent adjustments can
    /// commit a negative balance or lose an update.
    pub async fn adjust(&self, user_id: &UserId, delta: Decimal) -> Result<User> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut user = self
            .load(user_id)
            .await?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;

        let new_balance = user.balance.checked_add(delta).ok_or_else(|| {
            Error::Overflow(format!(
                "balance adjustment of {} for user {} exceeds the representable range",
                delta, user_id
            ))
        })?;
        if delta < Decimal::ZERO && new_balance < Decimal::ZERO {
            return Err(Error::InsufficientFunds {
                required: -delta,
                available: user.balance,
            });
        }

        user.balance = new_balance;
        self.persist(&user).await?;
        debug!(
            "Adjusted balance of {} by {} to {}",
            user.id, delta, user.balance
        );

        Ok(user)
    }
}
