//! Commitment and reveal engine.

use super::Session;
use crate::clock::Clock;
use crate::crypto::{Commitment, Secret};
use crate::error::GameError;
use crate::games::Move;
use crate::ledger::{Ledger, LedgerError};
use crate::protocol::{AccountId, Amount, Player, Timestamp};
use tracing::{debug, info};

impl Session {
    /// Join the first open seat with a commitment and the exact stake.
    ///
    /// The deposit is pulled from `caller` into escrow through `ledger`; a
    /// failed deposit leaves the seat open.
    pub fn commit<L: Ledger + ?Sized>(
        &mut self,
        caller: &AccountId,
        commitment: Commitment,
        deposit: Amount,
        ledger: &mut L,
    ) -> Result<Player, GameError> {
        if deposit != self.config.stake {
            return Err(GameError::InsufficientStake);
        }

        let open = if self.seat_a.account.is_none() {
            Player::A
        } else if self.seat_b.account.is_none() {
            Player::B
        } else {
            return Err(GameError::GameFull);
        };

        if self.seat_of(caller).is_some() {
            return Err(GameError::AlreadyJoined);
        }

        let escrowed = self
            .escrowed
            .checked_add(deposit)
            .ok_or(LedgerError::Overflow)?;
        ledger.deposit(caller, deposit)?;
        self.escrowed = escrowed;

        let seat = self.seat_mut(open);
        seat.account = Some(*caller);
        seat.commitment = Some(commitment);

        info!(player = %open, account = %caller, ?commitment, "committed");
        Ok(open)
    }

    /// Disclose a committed move.
    ///
    /// `move_code` is the external encoding (1 rock, 2 paper, 3 scissors).
    /// Reveals open only once both seats have committed, so neither party can
    /// pick a move after seeing the other's. Returns the caller's seat and the
    /// recorded reveal time.
    pub fn reveal<C: Clock + ?Sized>(
        &mut self,
        caller: &AccountId,
        move_code: u8,
        secret: &Secret,
        clock: &C,
    ) -> Result<(Player, Timestamp), GameError> {
        if self.timed_out {
            return Err(GameError::TimedOut);
        }

        let player = self.seat_of(caller).ok_or(GameError::Unauthorized)?;
        if !self.both_committed() {
            return Err(GameError::BothMustHaveCommitted);
        }

        let seat = self.seat(player);
        if seat.is_revealed() {
            return Err(GameError::AlreadyRevealed);
        }

        let mv = Move::try_from(move_code)?;
        let stored = seat.commitment.ok_or(GameError::BothMustHaveCommitted)?;
        if !stored.verify(caller, mv, secret) {
            debug!(player = %player, "reveal does not match commitment");
            return Err(GameError::CommitmentMismatch);
        }

        let now = clock.now();
        let seat = self.seat_mut(player);
        seat.choice = Some(mv);
        seat.revealed_at = Some(now);

        info!(player = %player, %mv, at = %now, "revealed");
        Ok((player, now))
    }
}
