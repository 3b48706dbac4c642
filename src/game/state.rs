//! Game State Definitions
//!
//! A single game's fields and the legal-transition contract for commit,
//! reveal and termination. Every operation validates fully before it
//! touches `self`, so a rejected request leaves the game as it was.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::commitment::Commitment;
use crate::core::hash::StateHasher;
use crate::error::GameError;
use crate::game::rules::{beats, can_move, settle, Choice, Player, RoundOutcome, Status};
use crate::MAX_ROUNDS;

/// Game identifier, assigned from a sequence starting at 1.
pub type GameId = u64;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Opaque player identity token.
///
/// The engine only ever compares tokens for equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// MOVE SLOT
// =============================================================================

/// One round's entry in a player's move sequence.
///
/// A slot starts as a commitment and is rewritten in place on reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSlot {
    /// Hidden choice.
    Committed(Commitment),
    /// Opened choice.
    Revealed(Choice),
}

impl MoveSlot {
    /// Returns the choice once revealed.
    #[inline]
    pub fn revealed(&self) -> Option<Choice> {
        match self {
            MoveSlot::Revealed(choice) => Some(*choice),
            MoveSlot::Committed(_) => None,
        }
    }

    /// Still hidden?
    #[inline]
    pub fn is_committed(&self) -> bool {
        matches!(self, MoveSlot::Committed(_))
    }

    fn hash_into(&self, hasher: &mut StateHasher) {
        match self {
            MoveSlot::Committed(c) => {
                hasher.update_u8(0);
                hasher.update_str(c.as_str());
            }
            MoveSlot::Revealed(choice) => {
                hasher.update_u8(1);
                hasher.update_u8(*choice as u8);
            }
        }
    }
}

// =============================================================================
// SCORE
// =============================================================================

/// Rounds won by each side. Drawn rounds count for nobody.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Rounds won by player A
    pub a: u64,
    /// Rounds won by player B
    pub b: u64,
}

impl Score {
    /// Create a score pair.
    pub const fn new(a: u64, b: u64) -> Self {
        Self { a, b }
    }

    /// Credit a round decided from A's point of view.
    pub fn record(&mut self, outcome_for_a: RoundOutcome) {
        match outcome_for_a {
            RoundOutcome::Win => self.a += 1,
            RoundOutcome::Loss => self.b += 1,
            RoundOutcome::Draw => {}
        }
    }
}

// =============================================================================
// GAME
// =============================================================================

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game number (> 0, immutable)
    pub id: GameId,

    /// Creator, leads every round
    pub player_a: PlayerId,

    /// Opponent
    pub player_b: PlayerId,

    /// Configured rounds, 1..=MAX_ROUNDS
    pub rounds: u64,

    /// Lifecycle status
    pub status: Status,

    /// Player A's slots, one per round entered
    pub moves_a: Vec<MoveSlot>,

    /// Player B's slots, one per round entered
    pub moves_b: Vec<MoveSlot>,

    /// Round wins
    pub score: Score,

    /// Height at which a still-open game is cancelled
    pub expiration_height: u64,
}

impl Game {
    /// Create a new game in `Waiting`.
    ///
    /// The game expires at `current_height + ttl`.
    pub fn new(
        id: GameId,
        player_a: PlayerId,
        player_b: PlayerId,
        rounds: u64,
        current_height: u64,
        ttl: u64,
    ) -> Result<Self, GameError> {
        let game = Self {
            id,
            player_a,
            player_b,
            rounds,
            status: Status::Waiting,
            moves_a: Vec::new(),
            moves_b: Vec::new(),
            score: Score::default(),
            expiration_height: current_height.saturating_add(ttl),
        };
        game.validate()?;
        Ok(game)
    }

    /// Check if the game reached a terminal status.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.status.is_terminal()
    }

    /// Resolve a token to a side of this game.
    pub fn side_of(&self, player: &PlayerId) -> Result<Player, GameError> {
        if *player == self.player_a {
            Ok(Player::A)
        } else if *player == self.player_b {
            Ok(Player::B)
        } else {
            Err(GameError::InvalidPlayer)
        }
    }

    /// Move sequence of one side.
    pub fn moves(&self, side: Player) -> &[MoveSlot] {
        match side {
            Player::A => &self.moves_a,
            Player::B => &self.moves_b,
        }
    }

    fn moves_mut(&mut self, side: Player) -> &mut Vec<MoveSlot> {
        match side {
            Player::A => &mut self.moves_a,
            Player::B => &mut self.moves_b,
        }
    }

    /// Most recent slot of one side.
    pub fn last_move(&self, side: Player) -> Option<&MoveSlot> {
        self.moves(side).last()
    }

    /// Both sequences have the same length and neither last slot is hidden.
    ///
    /// An empty game counts as revealed.
    pub fn is_round_revealed(&self) -> bool {
        if self.moves_a.len() != self.moves_b.len() {
            return false;
        }
        match (self.moves_a.last(), self.moves_b.last()) {
            (Some(a), Some(b)) => !a.is_committed() && !b.is_committed(),
            _ => true,
        }
    }

    /// Number of rounds where both sides have revealed.
    pub fn rounds_played(&self) -> u64 {
        self.moves_a
            .iter()
            .zip(&self.moves_b)
            .filter(|(a, b)| !a.is_committed() && !b.is_committed())
            .count() as u64
    }

    /// Record a commitment for `player`'s next round.
    pub fn submit_move(&mut self, player: &PlayerId, commitment: &str) -> Result<(), GameError> {
        if self.is_ended() {
            return Err(GameError::GameEnded);
        }

        let side = self.side_of(player)?;
        let commitment = Commitment::parse(commitment)?;

        if self.last_move(side).is_some_and(MoveSlot::is_committed) {
            return Err(GameError::RevealPreviousMove(
                "player has to reveal the move to finish the round",
            ));
        }

        let count_a = self.moves_a.len();
        let count_b = self.moves_b.len();
        let (after_a, after_b) = match side {
            Player::A => (count_a + 1, count_b),
            Player::B => (count_a, count_b + 1),
        };

        // Evening out the round is fine even while the opponent is hidden
        let opponent_hidden = self
            .last_move(side.opponent())
            .is_some_and(MoveSlot::is_committed);
        if opponent_hidden && after_a != after_b {
            return Err(GameError::RevealPreviousMove(
                "opponent player has to reveal the move to finish the round",
            ));
        }

        if !can_move(side, count_a, count_b) {
            return Err(GameError::PlayerCantMakeMove);
        }

        let mut next = self.clone();
        next.moves_mut(side).push(MoveSlot::Committed(commitment));
        next.status = Status::InProgress;
        next.validate()?;

        *self = next;
        Ok(())
    }

    /// Open `player`'s latest commitment.
    ///
    /// Scores the round once both sides are revealed and recomputes the
    /// status. Returns the round result from A's point of view when this
    /// reveal completed a round.
    pub fn reveal_move(
        &mut self,
        player: &PlayerId,
        move_token: &str,
        salt: &str,
    ) -> Result<Option<RoundOutcome>, GameError> {
        if self.is_ended() {
            return Err(GameError::GameEnded);
        }

        let choice: Choice = move_token.parse()?;

        // Both sides must have committed the pending round
        if self.moves_a.len() != self.moves_b.len() || self.moves_a.is_empty() {
            return Err(GameError::PlayerCantRevealMove);
        }

        let side = self.side_of(player)?;
        let Some(MoveSlot::Committed(commitment)) = self.last_move(side) else {
            return Err(GameError::MoveAlreadyRevealed);
        };

        if !commitment.opens_to(choice.as_str(), salt) {
            return Err(GameError::WrongMoveRevealed);
        }

        if let Some(slot) = self.moves_mut(side).last_mut() {
            *slot = MoveSlot::Revealed(choice);
        }

        let mut round = None;
        if self.is_round_revealed() {
            let last_a = self.last_move(Player::A).and_then(MoveSlot::revealed);
            let last_b = self.last_move(Player::B).and_then(MoveSlot::revealed);
            if let (Some(a), Some(b)) = (last_a, last_b) {
                let outcome = beats(a, b);
                self.score.record(outcome);
                round = Some(outcome);
            }
        }

        self.status = settle(self.score.a, self.score.b, self.rounds, self.rounds_played());
        Ok(round)
    }

    /// Force a still-open game into `Cancelled`.
    ///
    /// Returns false and changes nothing if the game already ended.
    pub fn cancel(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.status = Status::Cancelled;
        true
    }

    /// Full consistency check of the stored fields.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.player_a == self.player_b {
            return Err(GameError::InvalidOpponent);
        }
        if self.id == 0 {
            return Err(GameError::InvalidGameNumber);
        }
        if self.status == Status::Waiting && !(self.moves_a.is_empty() && self.moves_b.is_empty()) {
            return Err(GameError::InvalidGameStatus);
        }
        self.validate_rounds()?;
        self.validate_moves_count()?;
        self.validate_score()
    }

    fn validate_rounds(&self) -> Result<(), GameError> {
        if self.rounds > 0 && self.rounds <= MAX_ROUNDS {
            Ok(())
        } else {
            Err(GameError::RoundsOutOfBounds)
        }
    }

    fn validate_moves_count(&self) -> Result<(), GameError> {
        let a = self.moves_a.len() as u64;
        let b = self.moves_b.len() as u64;
        if a > self.rounds || b > self.rounds || b > a || a > b + 1 {
            return Err(GameError::InvalidMovesNumber);
        }
        Ok(())
    }

    fn validate_score(&self) -> Result<(), GameError> {
        if self.score.a + self.score.b > self.rounds {
            return Err(GameError::InvalidScore);
        }
        Ok(())
    }

    /// Hash this game for replay verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u64(self.id);
        hasher.update_str(self.player_a.as_str());
        hasher.update_str(self.player_b.as_str());
        hasher.update_u64(self.rounds);
        hasher.update_u8(self.status as u8);
        for moves in [&self.moves_a, &self.moves_b] {
            hasher.update_u64(moves.len() as u64);
            for slot in moves {
                slot.hash_into(hasher);
            }
        }
        hasher.update_u64(self.score.a);
        hasher.update_u64(self.score.b);
        hasher.update_u64(self.expiration_height);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commitment::commit;

    fn alice() -> PlayerId {
        PlayerId::from("alice")
    }

    fn bob() -> PlayerId {
        PlayerId::from("bob")
    }

    fn new_game(rounds: u64) -> Game {
        Game::new(1, alice(), bob(), rounds, 100, 20).unwrap()
    }

    fn play_round(game: &mut Game, a: Choice, b: Choice) -> Option<RoundOutcome> {
        game.submit_move(&alice(), &commit(a.as_str(), "salt-a")).unwrap();
        game.submit_move(&bob(), &commit(b.as_str(), "salt-b")).unwrap();
        game.reveal_move(&alice(), a.as_str(), "salt-a").unwrap();
        game.reveal_move(&bob(), b.as_str(), "salt-b").unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = new_game(3);
        assert_eq!(game.status, Status::Waiting);
        assert_eq!(game.score, Score::new(0, 0));
        assert!(game.moves_a.is_empty() && game.moves_b.is_empty());
        assert_eq!(game.expiration_height, 120);
    }

    #[test]
    fn test_new_game_rejects_self_play() {
        let err = Game::new(1, alice(), alice(), 2, 0, 20).unwrap_err();
        assert_eq!(err, GameError::InvalidOpponent);
    }

    #[test]
    fn test_new_game_rounds_bounds() {
        assert_eq!(Game::new(1, alice(), bob(), 0, 0, 20), Err(GameError::RoundsOutOfBounds));
        assert_eq!(Game::new(1, alice(), bob(), 4, 0, 20), Err(GameError::RoundsOutOfBounds));
        assert!(Game::new(1, alice(), bob(), 1, 0, 20).is_ok());
        assert!(Game::new(1, alice(), bob(), 3, 0, 20).is_ok());
    }

    #[test]
    fn test_new_game_rejects_zero_id() {
        assert_eq!(Game::new(0, alice(), bob(), 1, 0, 20), Err(GameError::InvalidGameNumber));
    }

    #[test]
    fn test_b_cannot_lead_round() {
        let mut game = new_game(3);
        let err = game.submit_move(&bob(), &commit("Rock", "x")).unwrap_err();
        assert_eq!(err, GameError::PlayerCantMakeMove);
        assert_eq!(game, new_game(3));
    }

    #[test]
    fn test_submit_rejects_stranger() {
        let mut game = new_game(3);
        let err = game.submit_move(&PlayerId::from("carol"), &commit("Rock", "x")).unwrap_err();
        assert_eq!(err, GameError::InvalidPlayer);
    }

    #[test]
    fn test_submit_rejects_plain_move() {
        let mut game = new_game(3);
        let err = game.submit_move(&alice(), "Rock").unwrap_err();
        assert_eq!(err, GameError::InvalidCommitment);
        assert_eq!(game.status, Status::Waiting);
    }

    #[test]
    fn test_submit_moves_to_in_progress() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        assert_eq!(game.status, Status::InProgress);
        assert_eq!(game.moves_a.len(), 1);
        assert!(game.moves_a[0].is_committed());
    }

    #[test]
    fn test_double_commit_needs_reveal() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        let err = game.submit_move(&alice(), &commit("Paper", "y")).unwrap_err();
        assert!(matches!(err, GameError::RevealPreviousMove(_)));
    }

    #[test]
    fn test_next_round_waits_for_opponent_reveal() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        game.submit_move(&bob(), &commit("Paper", "y")).unwrap();
        game.reveal_move(&alice(), "Rock", "x").unwrap();

        let err = game.submit_move(&alice(), &commit("Rock", "z")).unwrap_err();
        assert!(matches!(err, GameError::RevealPreviousMove(_)));
    }

    #[test]
    fn test_b_answers_while_a_hidden() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        assert!(game.submit_move(&bob(), &commit("Paper", "y")).is_ok());
    }

    #[test]
    fn test_reveal_before_opponent_commits() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        let err = game.reveal_move(&alice(), "Rock", "x").unwrap_err();
        assert_eq!(err, GameError::PlayerCantRevealMove);
    }

    #[test]
    fn test_reveal_on_empty_game() {
        let mut game = new_game(3);
        assert_eq!(game.reveal_move(&alice(), "Rock", "x"), Err(GameError::PlayerCantRevealMove));
    }

    #[test]
    fn test_reveal_invalid_move() {
        let mut game = new_game(3);
        assert_eq!(game.reveal_move(&alice(), "Lizard", "x"), Err(GameError::InvalidMove));
    }

    #[test]
    fn test_wrong_reveal_keeps_state() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        game.submit_move(&bob(), &commit("Paper", "y")).unwrap();
        let before = game.clone();

        assert_eq!(game.reveal_move(&alice(), "Paper", "x"), Err(GameError::WrongMoveRevealed));
        assert_eq!(game.reveal_move(&alice(), "Rock", "not-x"), Err(GameError::WrongMoveRevealed));
        assert_eq!(game, before);
        assert_eq!(game.score, Score::new(0, 0));
    }

    #[test]
    fn test_reveal_twice() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        game.submit_move(&bob(), &commit("Paper", "y")).unwrap();
        game.reveal_move(&alice(), "Rock", "x").unwrap();
        assert_eq!(game.reveal_move(&alice(), "Rock", "x"), Err(GameError::MoveAlreadyRevealed));
    }

    #[test]
    fn test_half_revealed_round_is_not_scored() {
        let mut game = new_game(3);
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        game.submit_move(&bob(), &commit("Scissors", "y")).unwrap();
        assert_eq!(game.reveal_move(&alice(), "Rock", "x"), Ok(None));
        assert!(!game.is_round_revealed());
        assert_eq!(game.score, Score::new(0, 0));
        assert_eq!(game.moves_a[0], MoveSlot::Revealed(Choice::Rock));
    }

    #[test]
    fn test_uppercase_commitment_reveals() {
        let mut game = new_game(1);
        game.submit_move(&alice(), &commit("Rock", "x").to_uppercase()).unwrap();
        game.submit_move(&bob(), &commit("Scissors", "y")).unwrap();
        game.reveal_move(&alice(), "Rock", "x").unwrap();
        game.reveal_move(&bob(), "Scissors", "y").unwrap();
        assert_eq!(game.status, Status::PlayerAWins);
    }

    #[test]
    fn test_majority_ends_game() {
        let mut game = new_game(3);
        assert_eq!(play_round(&mut game, Choice::Rock, Choice::Scissors), Some(RoundOutcome::Win));
        assert_eq!(game.score, Score::new(1, 0));
        assert_eq!(game.status, Status::InProgress);

        play_round(&mut game, Choice::Paper, Choice::Rock);
        assert_eq!(game.score, Score::new(2, 0));
        assert_eq!(game.status, Status::PlayerAWins);
        assert!(game.is_ended());
    }

    #[test]
    fn test_b_wins() {
        let mut game = new_game(1);
        assert_eq!(play_round(&mut game, Choice::Rock, Choice::Paper), Some(RoundOutcome::Loss));
        assert_eq!(game.status, Status::PlayerBWins);
    }

    #[test]
    fn test_all_draws() {
        let mut game = new_game(3);
        for c in Choice::ALL {
            play_round(&mut game, c, c);
        }
        assert_eq!(game.score, Score::new(0, 0));
        assert_eq!(game.status, Status::Draw);
    }

    #[test]
    fn test_split_rounds_draw() {
        let mut game = new_game(2);
        play_round(&mut game, Choice::Rock, Choice::Scissors);
        play_round(&mut game, Choice::Rock, Choice::Paper);
        assert_eq!(game.status, Status::Draw);
    }

    #[test]
    fn test_leader_wins_after_last_round() {
        let mut game = new_game(3);
        play_round(&mut game, Choice::Rock, Choice::Rock);
        play_round(&mut game, Choice::Rock, Choice::Scissors);
        assert_eq!(game.status, Status::InProgress);
        play_round(&mut game, Choice::Paper, Choice::Paper);
        assert_eq!(game.status, Status::PlayerAWins);
    }

    #[test]
    fn test_ended_game_rejects_everything() {
        let mut game = new_game(1);
        play_round(&mut game, Choice::Rock, Choice::Scissors);
        let ended = game.clone();

        assert_eq!(game.submit_move(&alice(), &commit("Rock", "z")), Err(GameError::GameEnded));
        assert_eq!(game.reveal_move(&alice(), "Rock", "salt-a"), Err(GameError::GameEnded));
        assert!(!game.cancel());
        assert_eq!(game, ended);
    }

    #[test]
    fn test_cancel_open_game() {
        let mut game = new_game(3);
        assert!(game.cancel());
        assert_eq!(game.status, Status::Cancelled);
    }

    #[test]
    fn test_validate_catches_corruption() {
        let mut game = new_game(1);
        game.score = Score::new(1, 1);
        assert_eq!(game.validate(), Err(GameError::InvalidScore));

        let mut game = new_game(1);
        game.moves_b.push(MoveSlot::Revealed(Choice::Rock));
        game.status = Status::InProgress;
        assert_eq!(game.validate(), Err(GameError::InvalidMovesNumber));

        let mut game = new_game(1);
        game.moves_a.push(MoveSlot::Revealed(Choice::Rock));
        assert_eq!(game.validate(), Err(GameError::InvalidGameStatus));
    }

    #[test]
    fn test_hash_tracks_moves() {
        let mut game = new_game(3);
        let before = {
            let mut h = StateHasher::for_engine_state();
            game.hash_into(&mut h);
            h.finalize()
        };
        game.submit_move(&alice(), &commit("Rock", "x")).unwrap();
        let after = {
            let mut h = StateHasher::for_engine_state();
            game.hash_into(&mut h);
            h.finalize()
        };
        assert_ne!(before, after);
    }
}
