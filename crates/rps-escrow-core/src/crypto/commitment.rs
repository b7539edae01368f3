//! Commitment and Secret for the commit-reveal scheme.

use crate::games::Move;
use crate::protocol::AccountId;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Width of a secret nonce and of a commitment digest
pub const DIGEST_LEN: usize = 32;

/// Failure to parse a 32-byte hex value
#[derive(Debug, thiserror::Error)]
pub enum ParseDigestError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

fn parse_digest(s: &str) -> Result<[u8; DIGEST_LEN], ParseDigestError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| ParseDigestError::Length(bytes.len()))
}

/// Secret nonce mixed into a commitment
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; DIGEST_LEN]);

impl Secret {
    /// Create a new random secret
    pub fn random() -> Self {
        let mut bytes = [0u8; DIGEST_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_digest(s).map(Self)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({}..)", hex::encode(&self.0[..4]))
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Commitment = H(account || move || secret)
///
/// The preimage is fixed-width: 20 account bytes, one move byte, 32 secret
/// bytes. Clients and the session must hash the same layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; DIGEST_LEN]);

impl Commitment {
    /// Commit to a move on behalf of `account`
    pub fn new(account: &AccountId, mv: Move, secret: &Secret) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(account.as_bytes());
        hasher.update([mv.code()]);
        hasher.update(secret.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Verify that `account` revealing `mv` with `secret` produces this commitment
    pub fn verify(&self, account: &AccountId, mv: Move, secret: &Secret) -> bool {
        *self == Self::new(account, mv, secret)
    }
}

impl FromStr for Commitment {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_digest(s).map(Self)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
