//! Cryptographic primitives for the commit-reveal scheme.
//!
//! A commitment binds the committing account, its move and a secret nonce,
//! so a reveal can only succeed for the account that produced it.

mod commitment;

pub use commitment::{Commitment, ParseDigestError, Secret, DIGEST_LEN};
