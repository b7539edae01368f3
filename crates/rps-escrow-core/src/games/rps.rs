//! Rock-Paper-Scissors rules.

use crate::error::GameError;
use crate::protocol::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rock-Paper-Scissors move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// External integer encoding, also the byte hashed into a commitment
    pub fn code(&self) -> u8 {
        match self {
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper) | (Move::Paper, Move::Rock)
        )
    }
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(GameError::InvalidMove(other)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        };
        write!(f, "{name}")
    }
}

/// Outcome of A playing `a` against B playing `b`.
///
/// With codes 1..=3 the cycle reduces to `(a - b) mod 3`: 0 is a draw, 1 means
/// A's move is the successor of B's and wins, 2 means B wins.
pub fn judge(a: Move, b: Move) -> GameResult {
    match (3 + a.code() - b.code()) % 3 {
        0 => GameResult::Draw,
        1 => GameResult::AWins,
        _ => GameResult::BWins,
    }
}
