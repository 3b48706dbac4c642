//! Round Rules
//!
//! Pure functions over choices, counts and scores. No state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

// =============================================================================
// CHOICE
// =============================================================================

/// A revealed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Choice {
    /// Beats Scissors.
    Rock = 0,
    /// Beats Rock.
    Paper = 1,
    /// Beats Paper.
    Scissors = 2,
}

impl Choice {
    /// All choices in canonical order.
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Canonical label, also the token hashed into commitments.
    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        }
    }

    /// The choice this one defeats.
    #[inline]
    pub fn defeats(self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Scissors => Choice::Paper,
            Choice::Paper => Choice::Rock,
        }
    }
}

impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rock" => Ok(Choice::Rock),
            "Paper" => Ok(Choice::Paper),
            "Scissors" => Ok(Choice::Scissors),
            _ => Err(GameError::InvalidMove),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that a token is one of the three canonical labels.
pub fn valid_move(token: &str) -> bool {
    token.parse::<Choice>().is_ok()
}

// =============================================================================
// ROUND OUTCOME
// =============================================================================

/// Result of a round from the mover's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Mover won.
    Win,
    /// Mover lost.
    Loss,
    /// Same choice.
    Draw,
}

/// Decide a round between `mover` and `opponent`.
pub fn beats(mover: Choice, opponent: Choice) -> RoundOutcome {
    if mover == opponent {
        RoundOutcome::Draw
    } else if mover.defeats() == opponent {
        RoundOutcome::Win
    } else {
        RoundOutcome::Loss
    }
}

// =============================================================================
// PLAYERS & TURN ORDER
// =============================================================================

/// Which side of the game a participant sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    /// Creator. Leads every round.
    A,
    /// Opponent. Answers A's commitment.
    B,
}

impl Player {
    /// The other side.
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }
}

/// Strict alternation: A opens every round, B answers it.
///
/// Counts are the committed-move counts before the new commitment.
pub fn can_move(player: Player, count_a: usize, count_b: usize) -> bool {
    match player {
        Player::A => count_a == count_b,
        Player::B => count_b + 1 == count_a,
    }
}

// =============================================================================
// GAME STATUS
// =============================================================================

/// Lifecycle status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Status {
    /// Created, no moves yet
    #[default]
    Waiting = 0,
    /// At least one commitment recorded
    InProgress = 1,
    /// A reached a majority
    PlayerAWins = 2,
    /// B reached a majority
    PlayerBWins = 3,
    /// All rounds played, scores tied
    Draw = 4,
    /// Expired before reaching a result
    Cancelled = 5,
}

impl Status {
    /// Check for one of the four terminal statuses.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Waiting | Status::InProgress)
    }

    /// Canonical label.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Waiting => "Waiting",
            Status::InProgress => "InProgress",
            Status::PlayerAWins => "PlayerAWins",
            Status::PlayerBWins => "PlayerBWins",
            Status::Draw => "Draw",
            Status::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for Status {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Waiting" => Ok(Status::Waiting),
            "InProgress" => Ok(Status::InProgress),
            "PlayerAWins" => Ok(Status::PlayerAWins),
            "PlayerBWins" => Ok(Status::PlayerBWins),
            "Draw" => Ok(Status::Draw),
            "Cancelled" => Ok(Status::Cancelled),
            _ => Err(GameError::InvalidGameStatus),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Majority outcome from scores alone.
///
/// First to strictly more than `rounds / 2` wins immediately. A tie that
/// accounts for every round is a draw. Anything else is still open.
pub fn game_outcome(score_a: u64, score_b: u64, rounds: u64) -> Status {
    let majority = rounds / 2;
    if score_a > majority {
        Status::PlayerAWins
    } else if score_b > majority {
        Status::PlayerBWins
    } else if score_a == score_b && score_a + score_b == rounds {
        Status::Draw
    } else {
        Status::InProgress
    }
}

/// Majority outcome, settled once every configured round is revealed.
///
/// Drawn rounds score nobody, so scores alone cannot tell whether rounds
/// remain. With none left the leader wins and a tie is a draw.
pub fn settle(score_a: u64, score_b: u64, rounds: u64, rounds_played: u64) -> Status {
    let status = game_outcome(score_a, score_b, rounds);
    if status.is_terminal() || rounds_played < rounds {
        return status;
    }
    match score_a.cmp(&score_b) {
        std::cmp::Ordering::Greater => Status::PlayerAWins,
        std::cmp::Ordering::Less => Status::PlayerBWins,
        std::cmp::Ordering::Equal => Status::Draw,
    }
}
