//! Application state management.
//!
//! Every operation takes the single state lock for its whole duration, so
//! calls against the same session are serialized and each one observes the
//! state left by the previous one.

use rps_escrow_core::{
    AccountId, Amount, Clock, Commitment, GameError, GameResult, InMemoryLedger, ManualClock,
    Player, Secret, Session, SessionConfig, SessionView, SystemClock, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ServiceConfig;

/// Unique game identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures surfaced by the host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Game not found")]
    GameNotFound(GameId),

    #[error("Clock is not simulated (set RPS_MANUAL_CLOCK to enable ticking)")]
    ClockNotSimulated,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Time source chosen at startup
#[derive(Debug)]
enum HostClock {
    System(SystemClock),
    Manual(ManualClock),
}

impl Clock for HostClock {
    fn now(&self) -> Timestamp {
        match self {
            HostClock::System(clock) => clock.now(),
            HostClock::Manual(clock) => clock.now(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
    defaults: SessionConfig,
}

struct AppStateInner {
    ledger: InMemoryLedger,
    games: HashMap<GameId, Session>,
    clock: HostClock,
}

impl AppStateInner {
    fn session(&mut self, id: GameId) -> Result<&mut Session, HostError> {
        self.games.get_mut(&id).ok_or(HostError::GameNotFound(id))
    }
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        let clock = if config.manual_clock {
            HostClock::Manual(ManualClock::starting_now())
        } else {
            HostClock::System(SystemClock)
        };
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                ledger: InMemoryLedger::new(),
                games: HashMap::new(),
                clock,
            })),
            defaults: config.session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppStateInner> {
        // Session and ledger operations report overflow as errors and write
        // only after validating, so a poisoned guard still holds settled state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn default_session_config(&self) -> SessionConfig {
        self.defaults
    }

    /// Get current time (real or simulated)
    pub fn now(&self) -> Timestamp {
        self.lock().clock.now()
    }

    /// Advance simulated time by seconds
    pub fn advance_time(&self, seconds: i64) -> Result<Timestamp, HostError> {
        let inner = self.lock();
        match &inner.clock {
            HostClock::Manual(clock) => {
                let seconds = seconds.clamp(0, i64::MAX / 1_000);
                clock.advance(chrono::Duration::seconds(seconds));
                Ok(clock.now())
            }
            HostClock::System(_) => Err(HostError::ClockNotSimulated),
        }
    }

    // Account operations

    pub fn fund(&self, account: &AccountId, amount: Amount) -> Result<Amount, HostError> {
        let balance = self
            .lock()
            .ledger
            .fund(account, amount)
            .map_err(GameError::from)?;
        Ok(balance)
    }

    pub fn balance(&self, account: &AccountId) -> Amount {
        self.lock().ledger.balance(account)
    }

    // Game operations

    pub fn create_game(&self, config: SessionConfig) -> GameId {
        let id = GameId::new();
        self.lock().games.insert(id, Session::new(config));
        id
    }

    pub fn view(&self, id: GameId) -> Result<SessionView, HostError> {
        let mut inner = self.lock();
        Ok(inner.session(id)?.view())
    }

    pub fn commit(
        &self,
        id: GameId,
        caller: &AccountId,
        commitment: Commitment,
        amount: Amount,
    ) -> Result<Player, HostError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let session = inner.games.get_mut(&id).ok_or(HostError::GameNotFound(id))?;
        Ok(session.commit(caller, commitment, amount, &mut inner.ledger)?)
    }

    pub fn reveal(
        &self,
        id: GameId,
        caller: &AccountId,
        move_code: u8,
        secret: &Secret,
    ) -> Result<(Player, Timestamp), HostError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let session = inner.games.get_mut(&id).ok_or(HostError::GameNotFound(id))?;
        Ok(session.reveal(caller, move_code, secret, &inner.clock)?)
    }

    pub fn calculate_winner(&self, id: GameId) -> Result<GameResult, HostError> {
        let mut inner = self.lock();
        Ok(inner.session(id)?.calculate_winner()?)
    }

    pub fn withdraw(
        &self,
        id: GameId,
        player: Player,
        caller: &AccountId,
    ) -> Result<Amount, HostError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let session = inner.games.get_mut(&id).ok_or(HostError::GameNotFound(id))?;
        Ok(session.withdraw(player, caller, &mut inner.ledger)?)
    }

    /// Claim the pool because `accused` never revealed
    pub fn timeout(
        &self,
        id: GameId,
        accused: Player,
        caller: &AccountId,
    ) -> Result<Amount, HostError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let session = inner.games.get_mut(&id).ok_or(HostError::GameNotFound(id))?;
        Ok(session.claim_timeout(accused, caller, &inner.clock, &mut inner.ledger)?)
    }
}
