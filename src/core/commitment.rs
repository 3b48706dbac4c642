//! Move Commitment Protocol
//!
//! Players commit to `SHA-256(move || salt)` before either side reveals.
//! No domain separator: the preimage is exactly the move label followed
//! by the salt, hex-encoded lowercase.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::GameError;

/// Length of a hex-encoded SHA-256 digest.
pub const COMMITMENT_LEN: usize = 64;

/// Compute the commitment for a move token and a secret salt.
///
/// Returns the lowercase hex encoding of the digest.
pub fn commit(move_token: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(move_token.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check that `s` has the shape of a commitment: 64 hex digits, any case.
pub fn looks_like_commitment(s: &str) -> bool {
    s.len() == COMMITMENT_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Recompute the commitment for `(move_token, salt)` and compare it
/// byte-for-byte with `commitment`.
pub fn matches(commitment: &str, move_token: &str, salt: &str) -> bool {
    commit(move_token, salt).as_bytes() == commitment.as_bytes()
}

/// A validated commitment, stored in lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commitment(String);

impl Commitment {
    /// Validate and normalize a submitted commitment.
    ///
    /// Upper-case hex is lowercased here so the byte-for-byte `matches`
    /// can open it. Stored verbatim, an upper-case commitment could never
    /// be revealed.
    pub fn parse(s: &str) -> Result<Self, GameError> {
        if !looks_like_commitment(s) {
            return Err(GameError::InvalidCommitment);
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Verify a reveal against this commitment.
    pub fn opens_to(&self, move_token: &str, salt: &str) -> bool {
        matches(&self.0, move_token, salt)
    }

    /// Hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Commitment {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Commitment> for String {
    fn from(value: Commitment) -> Self {
        value.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
