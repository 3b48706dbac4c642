//! # RPS Engine
//!
//! Commit-reveal rock-paper-scissors for replicated state machines.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RPS ENGINE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                │
//! │  ├── commitment.rs- SHA-256 move commitments                │
//! │  └── hash.rs      - State hashing for replay verification   │
//! │                                                             │
//! │  game/            - Game logic (deterministic)              │
//! │  ├── rules.rs     - Choices, scoring, turn order, outcome   │
//! │  ├── state.rs     - Game state machine                      │
//! │  └── events.rs    - Notifications for the host              │
//! │                                                             │
//! │  engine/          - Host-facing orchestration               │
//! │  ├── keeper.rs    - Engine: create / move / reveal / sweep  │
//! │  ├── expiry.rs    - Expiration index (height, game id)      │
//! │  ├── params.rs    - Module params                           │
//! │  ├── genesis.rs   - Snapshot import/export                  │
//! │  └── protocol.rs  - Request / response messages             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (uses BTreeMap/BTreeSet for sorted iteration)
//! - No system time: the host supplies the height with every call
//! - No randomness: salts come from players
//!
//! Replaying the same request log yields the same `Engine::state_hash()`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod engine;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use crate::core::commitment::{commit, looks_like_commitment, matches, Commitment};
pub use engine::{Engine, GenesisState, Params, Receipt, Request, Response, SweptGame};
pub use error::{ExpiryError, GameError};
pub use game::{Choice, Game, GameEvent, GameId, MoveSlot, Player, PlayerId, Score, Status};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on configured rounds.
pub const MAX_ROUNDS: u64 = 3;

/// Default game time-to-live in heights.
pub const DEFAULT_TTL: u64 = 20;
