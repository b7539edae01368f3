//! Service configuration from the environment.

use rps_escrow_core::protocol::{SessionConfig, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_STAKE};
use rps_escrow_core::Amount;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    /// Parameters for newly created sessions unless a request overrides them
    pub session: SessionConfig,
    /// Time only moves through `POST /api/system/tick`
    pub manual_clock: bool,
}

impl ServiceConfig {
    /// Read `PORT`, `RPS_STAKE`, `RPS_GRACE_SECS` and `RPS_MANUAL_CLOCK`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; missing, unparsable or
    /// out-of-range values fall back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let stake: Amount = lookup("RPS_STAKE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_STAKE);
        let grace_period_secs: i64 = lookup("RPS_GRACE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_GRACE_PERIOD_SECS);
        let session = SessionConfig::try_new(stake, grace_period_secs).unwrap_or_else(|e| {
            warn!("Ignoring session parameters from environment: {}", e);
            SessionConfig::default()
        });
        let manual_clock = lookup("RPS_MANUAL_CLOCK")
            .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            session,
            manual_clock,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            session: SessionConfig::default(),
            manual_clock: false,
        }
    }
}
