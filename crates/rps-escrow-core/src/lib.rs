//! RPS Escrow Core Library
//!
//! Two-party Rock-Paper-Scissors with stakes held in escrow. Parties commit
//! to hashed moves, reveal them, and the session resolves the winner and
//! releases the pool. If one party stops responding after the other has
//! revealed, the responsive party can claim the whole pool once the grace
//! period runs out.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod games;
pub mod ledger;
pub mod protocol;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{Commitment, Secret};
pub use error::GameError;
pub use games::{judge, Move};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use protocol::{AccountId, Amount, GameResult, Player, SessionConfig, Timestamp};
pub use session::{grace_period_elapsed, Phase, Session, SessionView};
