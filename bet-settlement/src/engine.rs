//! Settlement engine
//!
//! Orchestrates placement (reserve the stake, journal the bet) and
//! settlement (resolve every pending bet of an event, pay out winners).
//! All balance mutations go through the ledger and all bet state goes
//! through the journal; the engine adds the cross-record ordering and the
//! per-bet claims that the transactionless store cannot provide.

use crate::claim::BetClaims;
use crate::metrics::Metrics;
use crate::types::{SettlementOutcome, SettlementReport, SettlementResult};
use crate::{Error, Result};
use bet_ledger::{
    BalanceLedger, Bet, BetJournal, BetStatus, EventId, KvStore, LedgerConfig, UserId,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Orchestrator for bet placement and event settlement
pub struct SettlementEngine {
    ledger: BalanceLedger,
    journal: BetJournal,
    claims: BetClaims,
    metrics: Metrics,
}

impl SettlementEngine {
    /// Create an engine over `store`
    pub fn new(store: Arc<dyn KvStore>, config: LedgerConfig) -> Self {
        Self {
            ledger: BalanceLedger::new(store.clone(), config),
            journal: BetJournal::new(store),
            claims: BetClaims::new(),
            metrics: Metrics::default(),
        }
    }

    /// Engine metrics, for the transport layer's exposition endpoint
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Reserve `amount` from the user's balance and journal a pending bet
    /// against `event_id`; returns the new bet's id.
    ///
    /// The user is created with the starting balance on first reference.
    /// The early sufficiency check only produces a friendlier failure:
    /// the debit itself re-validates atomically, so a concurrent placement
    /// that consumes the funds in between still cannot overdraw. If the
    /// journal append fails after the debit committed, the debit is
    /// reversed before the error is returned.
    pub async fn place_bet(
        &self,
        user_id: UserId,
        event_id: EventId,
        odds: Decimal,
        amount: Decimal,
    ) -> Result<Uuid> {
        let started = Instant::now();

        if user_id.is_empty() {
            return Err(Error::InvalidArgument("user_id must not be empty".into()));
        }
        if event_id.is_empty() {
            return Err(Error::InvalidArgument("event_id must not be empty".into()));
        }
        if odds <= Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "odds must be positive, got {}",
                odds
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        if amount.checked_mul(odds).is_none() {
            return Err(Error::InvalidArgument(format!(
                "payout for amount {} at odds {} exceeds the representable range",
                amount, odds
            )));
        }

        let user = self.ledger.get_or_create(&user_id).await?;
        if user.balance < amount {
            warn!(
                "Insufficient balance for user {}: requested {}, available {}",
                user_id, amount, user.balance
            );
            self.metrics.record_place_failure();
            return Err(bet_ledger::Error::InsufficientFunds {
                required: amount,
                available: user.balance,
            }
            .into());
        }

        if let Err(e) = self.ledger.adjust(&user_id, -amount).await {
            self.metrics.record_place_failure();
            return Err(e.into());
        }

        let bet = Bet::new(user_id.clone(), event_id.clone(), odds, amount);
        if let Err(append_err) = self.journal.append(&bet).await {
            error!(
                "Journal append failed for bet {}, reversing debit of {}: {}",
                bet.id, amount, append_err
            );
            if let Err(reversal_err) = self.ledger.adjust(&user_id, amount).await {
                error!(
                    "Reversal of {} for user {} after failed append of bet {} also failed: {}",
                    amount, user_id, bet.id, reversal_err
                );
            }
            self.metrics.record_place_failure();
            return Err(append_err.into());
        }

        info!(
            "Placed bet {} for user {} on event {}: stake {} at odds {}",
            bet.id, user_id, event_id, amount, odds
        );
        self.metrics.record_placement(started.elapsed().as_secs_f64());

        Ok(bet.id)
    }

    /// Settle every still-pending bet of `event_id` with `outcome`.
    ///
    /// Bets are processed one claim at a time: re-read, credited (winners
    /// only, guarded by the credited marker) and then marked terminal. A
    /// bet whose attempt fails stays `Placed`, is counted in the report
    /// and is picked up by a later pass; one bad bet never aborts the
    /// rest. Fails with [`Error::NoSettleableBets`] when no bet produced
    /// a result entry.
    pub async fn settle_event(
        &self,
        event_id: EventId,
        outcome: SettlementOutcome,
    ) -> Result<SettlementReport> {
        let started = Instant::now();

        if event_id.is_empty() {
            return Err(Error::InvalidArgument("event_id must not be empty".into()));
        }

        let bets = self.journal.list_by_event(&event_id).await?;
        debug!("Fetched {} bets for event {}", bets.len(), event_id);

        let mut results = Vec::new();
        let mut failed = 0u32;

        for bet in bets {
            match self.settle_bet(&bet, outcome).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    failed += 1;
                    self.metrics.record_settlement_failure();
                    warn!(
                        "Failed to settle bet {} for user {}: {}",
                        bet.id, bet.user_id, e
                    );
                }
            }
        }

        if results.is_empty() {
            return Err(Error::NoSettleableBets(event_id));
        }

        let report = SettlementReport { results, failed };
        self.metrics
            .record_settlement(report.results.len(), started.elapsed().as_secs_f64());
        info!(
            "Settled event {} as {}: {} bets settled, {} credited, {} failed",
            event_id,
            outcome,
            report.results.len(),
            report.total_won(),
            report.failed
        );

        Ok(report)
    }

    /// Settle one bet under its claim; `None` when the bet is already
    /// terminal or gone and the pass should move on.
    async fn settle_bet(
        &self,
        bet: &Bet,
        outcome: SettlementOutcome,
    ) -> Result<Option<SettlementResult>> {
        let claim = self.claims.claim(bet.id);
        let _guard = claim.lock().await;

        // The listing snapshot may be stale: another pass can have settled
        // this bet before we claimed it.
        let mut fresh = match self.journal.get(bet.id).await? {
            Some(b) => b,
            None => {
                warn!("Bet {} disappeared between listing and claim", bet.id);
                return Ok(None);
            }
        };
        if fresh.status != BetStatus::Placed {
            debug!("Skipping bet {}: already {}", fresh.id, fresh.status);
            return Ok(None);
        }

        let mut marker_written = false;
        let amount_won = match outcome {
            SettlementOutcome::Won => {
                // A record journaled without the placement guard can carry an
                // unpayable product; fail this bet, not the pass.
                let payout = fresh.payout().ok_or_else(|| {
                    bet_ledger::Error::Overflow(format!(
                        "payout for bet {} exceeds the representable range",
                        fresh.id
                    ))
                })?;
                if self.journal.is_credited(fresh.id).await? {
                    debug!(
                        "Payout for bet {} already credited, not crediting again",
                        fresh.id
                    );
                    marker_written = true;
                } else {
                    self.ledger.adjust(&fresh.user_id, payout).await?;
                    info!(
                        "Credited {} to user {} for bet {}",
                        payout, fresh.user_id, fresh.id
                    );
                    // Credit committed. A marker write failure must not fail
                    // the bet: the terminal mark below is the stronger guard
                    // against paying twice.
                    match self.journal.mark_credited(fresh.id, payout).await {
                        Ok(()) => marker_written = true,
                        Err(e) => warn!(
                            "Failed to record credited marker for bet {}: {}",
                            fresh.id, e
                        ),
                    }
                }
                payout
            }
            SettlementOutcome::Lost => Decimal::ZERO,
        };

        fresh.status = outcome.status();
        if let Err(e) = self.journal.update(&fresh).await {
            if amount_won > Decimal::ZERO && !marker_written {
                // Neither the marker nor the mark survived: a retry of this
                // bet will credit again.
                error!(
                    "Bet {} for user {} credited {} but no durable trace persisted: {}",
                    fresh.id, fresh.user_id, amount_won, e
                );
            }
            return Err(e.into());
        }

        Ok(Some(SettlementResult {
            bet_id: fresh.id,
            user_id: fresh.user_id.clone(),
            amount_won,
        }))
    }

    /// The user's balance, creating the user with the starting balance if
    /// absent
    pub async fn user_balance(&self, user_id: UserId) -> Result<Decimal> {
        if user_id.is_empty() {
            return Err(Error::InvalidArgument("user_id must not be empty".into()));
        }

        let user = self.ledger.get_or_create(&user_id).await?;
        Ok(user.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bet_ledger::MemoryStore;
    use rust_decimal_macros::dec;

    fn test_engine() -> SettlementEngine {
        SettlementEngine::new(Arc::new(MemoryStore::new()), LedgerConfig::default())
    }

    #[tokio::test]
    async fn test_place_rejects_zero_odds() {
        let engine = test_engine();
        let err = engine
            .place_bet(UserId::new("u1"), EventId::new("e1"), dec!(0), dec!(100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_place_rejects_negative_amount() {
        let engine = test_engine();
        let err = engine
            .place_bet(UserId::new("u1"), EventId::new("e1"), dec!(2.0), dec!(-5))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_place_rejects_unrepresentable_payout() {
        let engine = test_engine();
        let err = engine
            .place_bet(
                UserId::new("u1"),
                EventId::new("e1"),
                Decimal::MAX,
                dec!(2),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        // Rejected before any state was touched
        assert_eq!(
            engine.user_balance(UserId::new("u1")).await.unwrap(),
            dec!(1000)
        );
    }

    #[tokio::test]
    async fn test_place_rejects_empty_ids() {
        let engine = test_engine();
        let err = engine
            .place_bet(UserId::new(""), EventId::new("e1"), dec!(2.0), dec!(100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = engine
            .place_bet(UserId::new("u1"), EventId::new(""), dec!(2.0), dec!(100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_invalid_placement_debits_nothing() {
        let engine = test_engine();
        engine
            .place_bet(UserId::new("u1"), EventId::new("e1"), dec!(0), dec!(100))
            .await
            .unwrap_err();

        assert_eq!(engine.metrics().bets_placed.get(), 0);
        let balance = engine.user_balance(UserId::new("u1")).await.unwrap();
        assert_eq!(balance, dec!(1000));
    }

    #[tokio::test]
    async fn test_settle_rejects_empty_event() {
        let engine = test_engine();
        let err = engine
            .settle_event(EventId::new(""), SettlementOutcome::Won)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_balance_rejects_empty_user() {
        let engine = test_engine();
        let err = engine.user_balance(UserId::new("")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
