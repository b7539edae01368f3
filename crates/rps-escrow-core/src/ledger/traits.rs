//! Ledger trait definition.

use crate::protocol::{AccountId, Amount};
use thiserror::Error;

/// Errors from value transfers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Escrow holds less than the requested payout")]
    InsufficientEscrow,

    #[error("Amount overflow")]
    Overflow,

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Trait for the value transfers a session needs from its host
///
/// Each call is all-or-nothing: on `Err` no balance has moved.
/// Implementations can be:
/// - InMemoryLedger for testing and the bundled service
/// - an adapter over a real settlement layer
pub trait Ledger {
    /// Move `amount` from `from` into escrow as part of the current call
    fn deposit(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Release `amount` from escrow to `to`
    fn payout(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError>;
}
