//! Game Logic Module
//!
//! Per-game rules and state. 100% deterministic, no logging, no I/O.
//!
//! ## Module Structure
//!
//! - `rules`: Choices, round scoring, turn order, majority outcome
//! - `state`: Game state machine (commit, reveal, cancel, validate)
//! - `events`: Notifications returned to the host

pub mod rules;
pub mod state;
pub mod events;

// Re-export key types
pub use rules::{Choice, Player, RoundOutcome, Status};
pub use state::{Game, GameId, MoveSlot, PlayerId, Score};
pub use events::GameEvent;
