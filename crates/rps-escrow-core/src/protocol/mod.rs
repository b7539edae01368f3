//! Protocol types and configuration.

mod config;
mod types;

pub use config::{
    ConfigError, SessionConfig, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_STAKE, MAX_GRACE_PERIOD_SECS,
    MAX_STAKE,
};
pub use types::{
    AccountId, Amount, GameResult, ParseAccountIdError, Player, Timestamp, ACCOUNT_ID_LEN,
};
