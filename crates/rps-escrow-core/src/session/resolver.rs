//! Winner resolution.

use super::Session;
use crate::error::GameError;
use crate::games::judge;
use crate::protocol::GameResult;
use tracing::info;

impl Session {
    /// Declare the outcome once both moves are revealed. Balances are not
    /// touched here; each party withdraws separately.
    pub fn calculate_winner(&mut self) -> Result<GameResult, GameError> {
        if self.timed_out {
            return Err(GameError::TimedOut);
        }

        let (a, b) = match (self.seat_a.choice, self.seat_b.choice) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(GameError::BothMustReveal),
        };

        if self.result.is_some() {
            return Err(GameError::AlreadyResolved);
        }

        let result = judge(a, b);
        self.result = Some(result);

        info!(%a, %b, %result, "winner calculated");
        Ok(result)
    }
}
