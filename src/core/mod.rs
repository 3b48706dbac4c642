//! Core deterministic primitives.
//!
//! Stateless helpers shared by the game and engine layers.

pub mod commitment;
pub mod hash;

// Re-export core types
pub use commitment::{commit, looks_like_commitment, matches, Commitment};
pub use hash::{StateHash, StateHasher};
