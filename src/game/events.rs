//! Game Events
//!
//! Returned alongside each operation's result for the host to publish.
//! The engine itself never performs I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::rules::{Choice, Status};
use crate::game::state::{GameId, PlayerId};

/// Notification of a state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A game was created.
    GameCreated {
        /// New game number
        game_id: GameId,
        /// Creator
        player_a: PlayerId,
        /// Opponent
        player_b: PlayerId,
    },

    /// A commitment was accepted.
    MoveCommitted {
        /// Game number
        game_id: GameId,
        /// Committing player
        player: PlayerId,
        /// Hex commitment as stored
        commitment: String,
    },

    /// A commitment was opened.
    MoveRevealed {
        /// Game number
        game_id: GameId,
        /// Revealing player
        player: PlayerId,
        /// Opened choice
        revealed: Choice,
    },

    /// A game reached a terminal status.
    GameEnded {
        /// Game number
        game_id: GameId,
        /// Final status
        status: Status,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::GameCreated { game_id, player_a, player_b } => {
                write!(f, "game {} created: {} vs {}", game_id, player_a, player_b)
            }
            GameEvent::MoveCommitted { game_id, player, commitment } => {
                write!(f, "game {}: {} committed {}", game_id, player, commitment.get(..8).unwrap_or(commitment))
            }
            GameEvent::MoveRevealed { game_id, player, revealed } => {
                write!(f, "game {}: {} revealed {}", game_id, player, revealed)
            }
            GameEvent::GameEnded { game_id, status } => {
                write!(f, "game {} ended: {}", game_id, status)
            }
        }
    }
}
