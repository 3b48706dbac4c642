//! Engine Errors
//!
//! Every rejection is permanent for the request that caused it and leaves
//! the stored game untouched. Codes are stable so a host can surface them.

use thiserror::Error;

/// Expiration index invariant violations.
///
/// These only occur when the index and the game set have drifted apart,
/// which a correct host never allows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    /// Entry already tracked.
    #[error("expiration entry ({height}, {game_id}) already exists")]
    DuplicateEntry {
        /// Expiration height of the entry.
        height: u64,
        /// Game the entry tracks.
        game_id: u64,
    },

    /// Entry was never inserted or was already removed.
    #[error("expiration entry ({height}, {game_id}) not found")]
    MissingEntry {
        /// Expiration height of the entry.
        height: u64,
        /// Game the entry tracks.
        game_id: u64,
    },
}

/// Game engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Game rounds out of bounds.
    #[error("game rounds out of bounds")]
    RoundsOutOfBounds,

    /// Invalid moves count.
    #[error("invalid moves count")]
    InvalidMovesNumber,

    /// Invalid game number.
    #[error("invalid game number. Should be greater than 0")]
    InvalidGameNumber,

    /// Invalid game status.
    #[error("invalid game status")]
    InvalidGameStatus,

    /// Invalid score.
    #[error("invalid score")]
    InvalidScore,

    /// Player tried to play against themselves.
    #[error("invalid opponent address")]
    InvalidOpponent,

    /// Two genesis games share an id.
    #[error("duplicated index {0}")]
    DuplicatedIndex(u64),

    /// Move label is not one of Rock, Paper, Scissors.
    #[error("invalid move")]
    InvalidMove,

    /// Game already reached a terminal status.
    #[error("game ended")]
    GameEnded,

    /// Caller is not registered in the game.
    #[error("invalid player")]
    InvalidPlayer,

    /// Out-of-turn commitment.
    #[error("player can't make move")]
    PlayerCantMakeMove,

    /// Params carry a zero ttl.
    #[error("invalid ttl")]
    InvalidTtl,

    /// Commitment is not a 64 character hex string.
    #[error("invalid commitment")]
    InvalidCommitment,

    /// A previous commitment has to be revealed first.
    #[error("player can't reveal previous move: {0}")]
    RevealPreviousMove(&'static str),

    /// Reveal attempted before both sides committed.
    #[error("player can't reveal move")]
    PlayerCantRevealMove,

    /// Latest slot already holds a revealed move.
    #[error("move was already revealed")]
    MoveAlreadyRevealed,

    /// Revealed move and salt do not hash to the commitment.
    #[error("wrong move revealed")]
    WrongMoveRevealed,

    /// No game under the requested id.
    #[error("game {0} not found")]
    NotFound(u64),

    /// Expiration index out of sync with the game set.
    #[error(transparent)]
    Expiry(#[from] ExpiryError),
}

impl GameError {
    /// Stable numeric code for this error kind.
    pub fn code(&self) -> u32 {
        match self {
            Self::RoundsOutOfBounds => 2,
            Self::InvalidMovesNumber => 3,
            Self::InvalidGameNumber => 4,
            Self::InvalidGameStatus => 5,
            Self::InvalidScore => 6,
            Self::InvalidOpponent => 7,
            Self::DuplicatedIndex(_) => 8,
            Self::InvalidMove => 9,
            Self::GameEnded => 10,
            Self::InvalidPlayer => 11,
            Self::PlayerCantMakeMove => 12,
            Self::InvalidTtl => 13,
            Self::InvalidCommitment => 14,
            Self::RevealPreviousMove(_) => 15,
            Self::PlayerCantRevealMove => 16,
            Self::MoveAlreadyRevealed => 17,
            Self::WrongMoveRevealed => 18,
            Self::NotFound(_) => 19,
            Self::Expiry(_) => 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            GameError::RoundsOutOfBounds,
            GameError::InvalidMovesNumber,
            GameError::InvalidGameNumber,
            GameError::InvalidGameStatus,
            GameError::InvalidScore,
            GameError::InvalidOpponent,
            GameError::DuplicatedIndex(1),
            GameError::InvalidMove,
            GameError::GameEnded,
            GameError::InvalidPlayer,
            GameError::PlayerCantMakeMove,
            GameError::InvalidTtl,
            GameError::InvalidCommitment,
            GameError::RevealPreviousMove("x"),
            GameError::PlayerCantRevealMove,
            GameError::MoveAlreadyRevealed,
            GameError::WrongMoveRevealed,
            GameError::NotFound(1),
            GameError::Expiry(ExpiryError::MissingEntry { height: 1, game_id: 1 }),
        ];

        let mut codes: Vec<u32> = errors.iter().map(GameError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_expiry_error_is_transparent() {
        let err: GameError = ExpiryError::DuplicateEntry { height: 20, game_id: 3 }.into();
        assert_eq!(err.to_string(), "expiration entry (20, 3) already exists");
    }
}
