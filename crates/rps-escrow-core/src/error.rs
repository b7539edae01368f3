//! Failures reported by session operations.
//!
//! Every error aborts the call that produced it; the session is left exactly
//! as it was before the call.

use crate::ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    // Admission
    #[error("Insufficient amount sent")]
    InsufficientStake,

    #[error("You have already joined")]
    AlreadyJoined,

    #[error("Game is full")]
    GameFull,

    // Reveal
    #[error("Invalid move")]
    InvalidMove(u8),

    #[error("Invalid parameters sent")]
    CommitmentMismatch,

    #[error("Move already revealed")]
    AlreadyRevealed,

    // Resolution
    #[error("Both players must have revealed")]
    BothMustReveal,

    #[error("Winner already declared")]
    AlreadyResolved,

    #[error("Game was settled by timeout")]
    TimedOut,

    // Withdrawal
    #[error("Winner is not declared yet")]
    WinnerNotDeclared,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not entitled to withdraw")]
    NotEntitled,

    #[error("Already withdrawn")]
    AlreadyWithdrawn,

    // Timeout
    #[error("Both players must have committed")]
    BothMustHaveCommitted,

    #[error("Timeout period has not elapsed")]
    GracePeriodNotElapsed,

    #[error("Timeout is not applicable")]
    NotApplicable,

    #[error("Transfer failed: {0}")]
    Ledger(#[from] LedgerError),
}

impl GameError {
    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InsufficientStake => "insufficient_stake",
            GameError::AlreadyJoined => "already_joined",
            GameError::GameFull => "game_full",
            GameError::InvalidMove(_) => "invalid_move",
            GameError::CommitmentMismatch => "commitment_mismatch",
            GameError::AlreadyRevealed => "already_revealed",
            GameError::BothMustReveal => "both_must_reveal",
            GameError::AlreadyResolved => "already_resolved",
            GameError::TimedOut => "timed_out",
            GameError::WinnerNotDeclared => "winner_not_declared",
            GameError::Unauthorized => "unauthorized",
            GameError::NotEntitled => "not_entitled",
            GameError::AlreadyWithdrawn => "already_withdrawn",
            GameError::BothMustHaveCommitted => "both_must_have_committed",
            GameError::GracePeriodNotElapsed => "grace_period_not_elapsed",
            GameError::NotApplicable => "not_applicable",
            GameError::Ledger(_) => "ledger",
        }
    }
}
