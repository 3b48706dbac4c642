//! Protocol Messages
//!
//! Host-facing request and response types. Serialized as JSON; the tagged
//! enums are not bincode compatible, use `GenesisState` for binary.

use serde::{Deserialize, Serialize};

use crate::engine::keeper::{Engine, Receipt, SweptGame};
use crate::engine::params::Params;
use crate::error::GameError;
use crate::game::rules::Status;
use crate::game::state::{Game, GameId, PlayerId};

// =============================================================================
// REQUESTS
// =============================================================================

/// Requests a host forwards to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Start a game against `opponent`.
    CreateGame {
        /// Player A
        creator: PlayerId,
        /// Player B
        opponent: PlayerId,
        /// Rounds to play
        rounds: u64,
    },

    /// Commit to a hidden move.
    MakeMove {
        /// Target game
        game_id: GameId,
        /// Committing player
        player: PlayerId,
        /// Hex commitment of move and salt
        commitment: String,
    },

    /// Open a previous commitment.
    RevealMove {
        /// Target game
        game_id: GameId,
        /// Revealing player
        player: PlayerId,
        /// Move label
        revealed_move: String,
        /// Salt used in the commitment
        salt: String,
    },

    /// Cancel games expiring at or before the current height.
    SweepExpired,

    /// Read a game.
    GetGame {
        /// Game to read
        game_id: GameId,
    },

    /// Read the params.
    GetParams,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Engine replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Game created.
    GameCreated {
        /// Assigned id
        game_id: GameId,
    },

    /// Commitment stored.
    MoveAccepted,

    /// Reveal accepted.
    MoveRevealed {
        /// Status after the reveal
        status: Status,
    },

    /// Sweep finished.
    Swept {
        /// Games whose entries came due
        games: Vec<SweptGame>,
    },

    /// Game lookup.
    Game {
        /// Stored game
        game: Game,
    },

    /// Params lookup.
    Params {
        /// Current params
        params: Params,
    },

    /// Request rejected.
    Error(ErrorResponse),
}

/// Rejection as surfaced to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub code: u32,
    /// Human-readable message
    pub message: String,
}

impl From<&GameError> for ErrorResponse {
    fn from(err: &GameError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl Request {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Response {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Fold a failed request into an error reply.
    pub fn from_result(result: Result<Receipt<Response>, GameError>) -> Receipt<Response> {
        result.unwrap_or_else(|err| Receipt {
            value: Response::Error(ErrorResponse::from(&err)),
            events: Vec::new(),
        })
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

impl Engine {
    /// Apply one request at `height`.
    pub fn handle(&mut self, height: u64, request: Request) -> Result<Receipt<Response>, GameError> {
        let receipt = match request {
            Request::CreateGame { creator, opponent, rounds } => {
                let r = self.create_game(height, creator, opponent, rounds)?;
                Receipt { value: Response::GameCreated { game_id: r.value }, events: r.events }
            }
            Request::MakeMove { game_id, player, commitment } => {
                let r = self.submit_move(game_id, &player, &commitment)?;
                Receipt { value: Response::MoveAccepted, events: r.events }
            }
            Request::RevealMove { game_id, player, revealed_move, salt } => {
                let r = self.reveal_move(game_id, &player, &revealed_move, &salt)?;
                Receipt { value: Response::MoveRevealed { status: r.value }, events: r.events }
            }
            Request::SweepExpired => {
                let r = self.sweep_expired(height);
                Receipt { value: Response::Swept { games: r.value }, events: r.events }
            }
            Request::GetGame { game_id } => Receipt {
                value: Response::Game { game: self.get_game(game_id)?.clone() },
                events: Vec::new(),
            },
            Request::GetParams => Receipt {
                value: Response::Params { params: self.params() },
                events: Vec::new(),
            },
        };
        Ok(receipt)
    }
}
