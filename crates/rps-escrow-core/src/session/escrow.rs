//! Escrow withdrawals after a declared result.

use super::Session;
use crate::error::GameError;
use crate::ledger::Ledger;
use crate::protocol::{AccountId, Amount, GameResult, Player};
use tracing::{info, warn};

impl Session {
    pub fn withdraw_player_a<L: Ledger + ?Sized>(
        &mut self,
        caller: &AccountId,
        ledger: &mut L,
    ) -> Result<Amount, GameError> {
        self.withdraw(Player::A, caller, ledger)
    }

    pub fn withdraw_player_b<L: Ledger + ?Sized>(
        &mut self,
        caller: &AccountId,
        ledger: &mut L,
    ) -> Result<Amount, GameError> {
        self.withdraw(Player::B, caller, ledger)
    }

    /// Amount `player` may withdraw under the declared result
    pub fn entitlement(&self, player: Player) -> Option<Amount> {
        if self.timed_out {
            return None;
        }
        match self.result? {
            GameResult::Draw => Some(self.config.stake),
            won if won.winner() == Some(player) => Some(self.config.pot()),
            _ => None,
        }
    }

    /// Pay `player` its share of the pool.
    ///
    /// The withdrawn flag is set before the transfer and cleared again if the
    /// transfer fails, so the call either pays exactly once or changes
    /// nothing.
    pub fn withdraw<L: Ledger + ?Sized>(
        &mut self,
        player: Player,
        caller: &AccountId,
        ledger: &mut L,
    ) -> Result<Amount, GameError> {
        if !self.seat(player).is_held_by(caller) {
            return Err(GameError::Unauthorized);
        }
        if self.timed_out {
            return Err(GameError::NotEntitled);
        }
        if self.result.is_none() {
            return Err(GameError::WinnerNotDeclared);
        }
        if self.seat(player).withdrawn {
            return Err(GameError::AlreadyWithdrawn);
        }
        let amount = self.entitlement(player).ok_or(GameError::NotEntitled)?;

        self.seat_mut(player).withdrawn = true;
        if let Err(err) = self.release(caller, amount, ledger) {
            warn!(player = %player, %err, "withdrawal transfer failed, rolling back");
            self.seat_mut(player).withdrawn = false;
            return Err(err.into());
        }

        info!(player = %player, amount, "withdrew");
        Ok(amount)
    }
}
