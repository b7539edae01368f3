//! Two-party stake-backed game session.
//!
//! A session moves through commit, reveal and resolution, then pays out
//! either through the ordinary withdrawals or through a timeout claim. All
//! mutation goes through the operations in the submodules; each one checks
//! its preconditions against the state as of the start of the call and
//! touches nothing when it fails.

mod engine;
mod escrow;
mod resolver;
mod timeout;
mod view;

pub use timeout::grace_period_elapsed;
pub use view::{Phase, SessionView};

use crate::crypto::Commitment;
use crate::games::Move;
use crate::ledger::{Ledger, LedgerError};
use crate::protocol::{AccountId, Amount, GameResult, Player, SessionConfig, Timestamp};
use tracing::warn;

/// Everything recorded about one seat
#[derive(Clone, Debug, Default)]
struct Seat {
    account: Option<AccountId>,
    commitment: Option<Commitment>,
    choice: Option<Move>,
    revealed_at: Option<Timestamp>,
    withdrawn: bool,
}

impl Seat {
    fn is_committed(&self) -> bool {
        self.commitment.is_some()
    }

    fn is_revealed(&self) -> bool {
        self.choice.is_some()
    }

    fn is_held_by(&self, caller: &AccountId) -> bool {
        self.account.as_ref() == Some(caller)
    }
}

/// Authoritative record of a single game
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    seat_a: Seat,
    seat_b: Seat,
    result: Option<GameResult>,
    timed_out: bool,
    /// Deposits still held for this session
    escrowed: Amount,
    paid_out: Amount,
}

impl Session {
    /// Create an empty session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            seat_a: Seat::default(),
            seat_b: Seat::default(),
            result: None,
            timed_out: false,
            escrowed: 0,
            paid_out: 0,
        }
    }

    fn seat(&self, player: Player) -> &Seat {
        match player {
            Player::A => &self.seat_a,
            Player::B => &self.seat_b,
        }
    }

    fn seat_mut(&mut self, player: Player) -> &mut Seat {
        match player {
            Player::A => &mut self.seat_a,
            Player::B => &mut self.seat_b,
        }
    }

    /// Which seat, if any, `caller` occupies
    pub fn seat_of(&self, caller: &AccountId) -> Option<Player> {
        if self.seat_a.is_held_by(caller) {
            Some(Player::A)
        } else if self.seat_b.is_held_by(caller) {
            Some(Player::B)
        } else {
            None
        }
    }

    fn both_committed(&self) -> bool {
        self.seat_a.is_committed() && self.seat_b.is_committed()
    }

    /// Release `amount` of this session's escrow to `to`.
    ///
    /// Callers mark the entitlement consumed before calling this and restore
    /// it if this returns an error.
    fn release<L: Ledger + ?Sized>(
        &mut self,
        to: &AccountId,
        amount: Amount,
        ledger: &mut L,
    ) -> Result<(), LedgerError> {
        if self.escrowed < amount {
            warn!(%to, amount, escrowed = self.escrowed, "payout exceeds session escrow");
            return Err(LedgerError::InsufficientEscrow);
        }
        ledger.payout(to, amount)?;
        self.escrowed -= amount;
        self.paid_out += amount;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn player(&self, player: Player) -> Option<AccountId> {
        self.seat(player).account
    }

    pub fn commitment(&self, player: Player) -> Option<Commitment> {
        self.seat(player).commitment
    }

    /// Revealed move, `None` while unrevealed
    pub fn choice(&self, player: Player) -> Option<Move> {
        self.seat(player).choice
    }

    pub fn reveal_time(&self, player: Player) -> Option<Timestamp> {
        self.seat(player).revealed_at
    }

    pub fn has_withdrawn(&self, player: Player) -> bool {
        self.seat(player).withdrawn
    }

    pub fn player_a(&self) -> Option<AccountId> {
        self.player(Player::A)
    }

    pub fn player_b(&self) -> Option<AccountId> {
        self.player(Player::B)
    }

    pub fn commitment_a(&self) -> Option<Commitment> {
        self.commitment(Player::A)
    }

    pub fn commitment_b(&self) -> Option<Commitment> {
        self.commitment(Player::B)
    }

    pub fn choice_a(&self) -> Option<Move> {
        self.choice(Player::A)
    }

    pub fn choice_b(&self) -> Option<Move> {
        self.choice(Player::B)
    }

    /// Declared outcome, `None` while undeclared
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Deposits currently held for this session
    pub fn escrowed(&self) -> Amount {
        self.escrowed
    }

    /// Total released to players so far; never exceeds twice the stake
    pub fn paid_out(&self) -> Amount {
        self.paid_out
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
