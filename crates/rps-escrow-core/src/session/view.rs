//! Read-only snapshots of a session.

use super::Session;
use crate::crypto::Commitment;
use crate::games::Move;
use crate::protocol::{AccountId, Amount, GameResult, Player, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle position, derived from the stored fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// At least one seat is open
    WaitingForPlayers,
    /// Both committed, nobody revealed
    Committed,
    /// Exactly one party revealed
    Revealing,
    /// Both revealed, result not declared
    Revealed,
    /// Result declared, payouts outstanding
    Resolved,
    /// Settled through the timeout path
    TimedOut,
    /// Every entitled party has withdrawn
    Closed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::TimedOut | Phase::Closed)
    }
}

/// Snapshot of every read-only accessor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: Phase,
    pub stake: Amount,
    pub grace_period_secs: i64,
    pub player_a: Option<AccountId>,
    pub player_b: Option<AccountId>,
    pub commitment_a: Option<Commitment>,
    pub commitment_b: Option<Commitment>,
    pub choice_a: Option<Move>,
    pub choice_b: Option<Move>,
    pub reveal_time_a: Option<Timestamp>,
    pub reveal_time_b: Option<Timestamp>,
    pub result: Option<GameResult>,
    pub withdrawn_a: bool,
    pub withdrawn_b: bool,
    pub timed_out: bool,
    pub escrowed: Amount,
    pub paid_out: Amount,
}

impl Session {
    pub fn phase(&self) -> Phase {
        if self.timed_out {
            return Phase::TimedOut;
        }
        if let Some(result) = self.result {
            let settled = match result.winner() {
                Some(winner) => self.seat(winner).withdrawn,
                None => self.seat_a.withdrawn && self.seat_b.withdrawn,
            };
            return if settled { Phase::Closed } else { Phase::Resolved };
        }
        if !self.both_committed() {
            return Phase::WaitingForPlayers;
        }
        match (self.seat_a.is_revealed(), self.seat_b.is_revealed()) {
            (false, false) => Phase::Committed,
            (true, true) => Phase::Revealed,
            _ => Phase::Revealing,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase(),
            stake: self.config.stake,
            grace_period_secs: self.config.grace_period_secs,
            player_a: self.player(Player::A),
            player_b: self.player(Player::B),
            commitment_a: self.commitment(Player::A),
            commitment_b: self.commitment(Player::B),
            choice_a: self.choice(Player::A),
            choice_b: self.choice(Player::B),
            reveal_time_a: self.reveal_time(Player::A),
            reveal_time_b: self.reveal_time(Player::B),
            result: self.result,
            withdrawn_a: self.seat_a.withdrawn,
            withdrawn_b: self.seat_b.withdrawn,
            timed_out: self.timed_out,
            escrowed: self.escrowed,
            paid_out: self.paid_out,
        }
    }
}
