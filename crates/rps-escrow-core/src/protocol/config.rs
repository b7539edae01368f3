//! Per-session parameters.

use super::types::{Amount, MAX_DURATION_SECS};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deposit each party must post: 0.01 of a 10^18-unit coin
pub const DEFAULT_STAKE: Amount = 10_000_000_000_000_000;

/// Window the opponent has to reveal, measured from the accuser's reveal
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 10 * 60;

/// Largest stake whose pot still fits in an [`Amount`]
pub const MAX_STAKE: Amount = Amount::MAX / 2;

/// Longest grace period a [`Duration`] can carry
pub const MAX_GRACE_PERIOD_SECS: i64 = MAX_DURATION_SECS;

/// Rejected session parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Stake must be positive")]
    ZeroStake,

    #[error("Stake {0} exceeds the maximum of {max}", max = MAX_STAKE)]
    StakeTooLarge(Amount),

    #[error("Grace period of {0}s is outside 0..={max}", max = MAX_GRACE_PERIOD_SECS)]
    GracePeriodOutOfRange(i64),
}

/// Parameters fixed when a session is instantiated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Exact deposit required from each party
    pub stake: Amount,
    /// Grace period in whole seconds
    pub grace_period_secs: i64,
}

impl SessionConfig {
    /// Build from a stake and a duration, clamping the grace period into range
    pub fn new(stake: Amount, grace_period: Duration) -> Self {
        Self {
            stake,
            grace_period_secs: grace_period.num_seconds().clamp(0, MAX_GRACE_PERIOD_SECS),
        }
    }

    /// Build from untrusted values, rejecting anything a session cannot honor
    pub fn try_new(stake: Amount, grace_period_secs: i64) -> Result<Self, ConfigError> {
        if stake == 0 {
            return Err(ConfigError::ZeroStake);
        }
        if stake > MAX_STAKE {
            return Err(ConfigError::StakeTooLarge(stake));
        }
        if !(0..=MAX_GRACE_PERIOD_SECS).contains(&grace_period_secs) {
            return Err(ConfigError::GracePeriodOutOfRange(grace_period_secs));
        }
        Ok(Self {
            stake,
            grace_period_secs,
        })
    }

    pub fn grace_period(&self) -> Duration {
        Duration::seconds(self.grace_period_secs.clamp(0, MAX_GRACE_PERIOD_SECS))
    }

    /// The full pool once both parties have deposited
    pub fn pot(&self) -> Amount {
        self.stake.saturating_mul(2)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stake: DEFAULT_STAKE,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
        }
    }
}
