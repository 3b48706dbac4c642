//! Module Parameters

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::DEFAULT_TTL;

/// Process-wide engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Heights a new game stays open before it can be cancelled
    pub ttl: u64,
}

impl Params {
    /// Sanity check.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.ttl == 0 {
            return Err(GameError::InvalidTtl);
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}
