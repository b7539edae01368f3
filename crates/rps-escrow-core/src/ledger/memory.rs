//! In-memory ledger for tests and the bundled host.

use super::traits::{Ledger, LedgerError};
use crate::protocol::{AccountId, Amount};
use std::collections::{HashMap, HashSet};

/// Account balances plus a single escrow pool
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<AccountId, Amount>,
    escrowed: Amount,
    /// Accounts whose incoming payouts fail (simulates a refusing recipient)
    rejecting: HashSet<AccountId>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air, returning the new balance
    pub fn fund(&mut self, account: &AccountId, amount: Amount) -> Result<Amount, LedgerError> {
        let balance = self.balances.entry(*account).or_default();
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(*balance)
    }

    /// Current spendable balance of an account
    pub fn balance(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Total currently held in escrow
    pub fn escrowed(&self) -> Amount {
        self.escrowed
    }

    /// Make every future payout to `account` fail
    pub fn reject_payouts_to(&mut self, account: &AccountId) {
        self.rejecting.insert(*account);
    }

    /// Undo [`reject_payouts_to`](Self::reject_payouts_to)
    pub fn accept_payouts_to(&mut self, account: &AccountId) {
        self.rejecting.remove(account);
    }
}

impl Ledger for InMemoryLedger {
    fn deposit(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let escrowed = self
            .escrowed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self.balances.entry(*from).or_default();
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        *balance -= amount;
        self.escrowed = escrowed;
        Ok(())
    }

    fn payout(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        if self.rejecting.contains(to) {
            return Err(LedgerError::Rejected(format!("{to} refuses payouts")));
        }
        if self.escrowed < amount {
            return Err(LedgerError::InsufficientEscrow);
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.escrowed -= amount;
        self.balances.insert(*to, credited);
        Ok(())
    }
}
