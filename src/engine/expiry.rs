//! Expiration Index
//!
//! Secondary index over `(expiration_height, game_id)`. An entry exists
//! exactly while its game is open, so the per-height sweep costs the number
//! of games actually due rather than a scan of every game.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ExpiryError;
use crate::game::state::GameId;

/// Composite index key. Field order gives the ordering: height, then id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExpiryKey {
    /// Expiration height
    pub height: u64,
    /// Tracked game
    pub game_id: GameId,
}

impl ExpiryKey {
    /// Create a key.
    pub const fn new(height: u64, game_id: GameId) -> Self {
        Self { height, game_id }
    }

    /// Largest key at `height`, for inclusive range bounds.
    const fn last_at(height: u64) -> Self {
        Self { height, game_id: GameId::MAX }
    }
}

/// Ordered set of expiry keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationIndex {
    entries: BTreeSet<ExpiryKey>,
}

impl ExpirationIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a game.
    pub fn insert(&mut self, height: u64, game_id: GameId) -> Result<(), ExpiryError> {
        if !self.entries.insert(ExpiryKey::new(height, game_id)) {
            return Err(ExpiryError::DuplicateEntry { height, game_id });
        }
        Ok(())
    }

    /// Stop tracking a game.
    ///
    /// Removing a key twice is an error, not a silent success.
    pub fn remove(&mut self, height: u64, game_id: GameId) -> Result<(), ExpiryError> {
        if !self.entries.remove(&ExpiryKey::new(height, game_id)) {
            return Err(ExpiryError::MissingEntry { height, game_id });
        }
        Ok(())
    }

    /// Is this key tracked?
    pub fn contains(&self, height: u64, game_id: GameId) -> bool {
        self.entries.contains(&ExpiryKey::new(height, game_id))
    }

    /// Number of tracked games.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No tracked games?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ExpiryKey> {
        self.entries.iter()
    }

    /// Entries due at or before `height`, without removing them.
    pub fn due(&self, height: u64) -> impl Iterator<Item = &ExpiryKey> {
        self.entries.range(..=ExpiryKey::last_at(height))
    }

    /// Drain entries due at or before `height`, in key order.
    ///
    /// Lazy: each entry is removed as it is yielded, so dropping the
    /// iterator early leaves the rest in place for the next sweep.
    pub fn sweep(&mut self, height: u64) -> Sweep<'_> {
        Sweep { index: self, height }
    }
}

/// Draining iterator returned by [`ExpirationIndex::sweep`].
pub struct Sweep<'a> {
    index: &'a mut ExpirationIndex,
    height: u64,
}

impl Iterator for Sweep<'_> {
    type Item = ExpiryKey;

    fn next(&mut self) -> Option<Self::Item> {
        let first = *self.index.entries.first()?;
        if first.height > self.height {
            return None;
        }
        self.index.entries.pop_first()
    }
}
