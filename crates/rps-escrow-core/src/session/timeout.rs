//! Timeout arbiter: the alternate terminal path when one party never reveals.

use super::Session;
use crate::clock::Clock;
use crate::error::GameError;
use crate::ledger::Ledger;
use crate::protocol::{AccountId, Amount, Player, Timestamp};
use chrono::Duration;
use tracing::{info, warn};

/// True once at least `grace` has passed since `revealed_at`.
///
/// The boundary is inclusive: exactly `grace` later counts as elapsed.
pub fn grace_period_elapsed(now: Timestamp, revealed_at: Timestamp, grace: Duration) -> bool {
    now.saturating_since(revealed_at) >= grace
}

impl Session {
    /// Called by B when A committed but never revealed
    pub fn player_a_timeout<C, L>(
        &mut self,
        caller: &AccountId,
        clock: &C,
        ledger: &mut L,
    ) -> Result<Amount, GameError>
    where
        C: Clock + ?Sized,
        L: Ledger + ?Sized,
    {
        self.claim_timeout(Player::A, caller, clock, ledger)
    }

    /// Called by A when B committed but never revealed
    pub fn player_b_timeout<C, L>(
        &mut self,
        caller: &AccountId,
        clock: &C,
        ledger: &mut L,
    ) -> Result<Amount, GameError>
    where
        C: Clock + ?Sized,
        L: Ledger + ?Sized,
    {
        self.claim_timeout(Player::B, caller, clock, ledger)
    }

    /// When `accused` could first be timed out, if the accuser has revealed
    pub fn timeout_deadline(&self, accused: Player) -> Option<Timestamp> {
        let revealed_at = self.seat(accused.opponent()).revealed_at?;
        Some(revealed_at.advanced_by(self.config.grace_period()))
    }

    /// Resolve in favour of the accuser and pay it the whole pool in one step.
    ///
    /// The grace period runs from the accuser's own reveal, so revealing late
    /// never shortens the accused party's window.
    pub fn claim_timeout<C, L>(
        &mut self,
        accused: Player,
        caller: &AccountId,
        clock: &C,
        ledger: &mut L,
    ) -> Result<Amount, GameError>
    where
        C: Clock + ?Sized,
        L: Ledger + ?Sized,
    {
        if !self.both_committed() {
            return Err(GameError::BothMustHaveCommitted);
        }
        if self.timed_out || self.result.is_some() {
            return Err(GameError::NotApplicable);
        }

        let accuser = accused.opponent();
        if !self.seat(accuser).is_held_by(caller) {
            return Err(GameError::Unauthorized);
        }
        if self.seat(accused).is_revealed() {
            return Err(GameError::NotApplicable);
        }
        let revealed_at = self
            .seat(accuser)
            .revealed_at
            .ok_or(GameError::NotApplicable)?;

        let now = clock.now();
        if !grace_period_elapsed(now, revealed_at, self.config.grace_period()) {
            return Err(GameError::GracePeriodNotElapsed);
        }

        let amount = self.config.pot();
        self.timed_out = true;
        self.seat_mut(accuser).withdrawn = true;
        if let Err(err) = self.release(caller, amount, ledger) {
            warn!(accused = %accused, %err, "timeout payout failed, rolling back");
            self.timed_out = false;
            self.seat_mut(accuser).withdrawn = false;
            return Err(err.into());
        }

        info!(accused = %accused, accuser = %accuser, amount, at = %now, "timed out");
        Ok(amount)
    }
}
