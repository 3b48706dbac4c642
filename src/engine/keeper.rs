//! Game Keeper
//!
//! Host-facing orchestration. Each call is one atomic unit of work: it
//! either fails with the stored state untouched, or applies the game
//! change and the matching expiration index change together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::commitment::Commitment;
use crate::core::hash::{StateHash, StateHasher};
use crate::engine::expiry::ExpirationIndex;
use crate::engine::params::Params;
use crate::error::GameError;
use crate::game::events::GameEvent;
use crate::game::rules::{Choice, Status};
use crate::game::state::{Game, GameId, PlayerId};

/// Operation result plus the events it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T> {
    /// Operation-specific result
    pub value: T,
    /// Notifications for the host to publish
    pub events: Vec<GameEvent>,
}

impl<T> Receipt<T> {
    fn new(value: T, events: Vec<GameEvent>) -> Self {
        Self { value, events }
    }
}

/// One game visited by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweptGame {
    /// Game whose expiration entry came due
    pub game_id: GameId,
    /// Was it open and therefore cancelled?
    pub cancelled: bool,
}

/// The rock-paper-scissors state machine host.
///
/// Owns the primary game set, the expiration index derived from it, the
/// id sequence and the params. Heights are always supplied by the caller.
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) params: Params,
    pub(crate) games: BTreeMap<GameId, Game>,
    pub(crate) expiry: ExpirationIndex,
    pub(crate) next_game_id: GameId,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            params: Params::default(),
            games: BTreeMap::new(),
            expiry: ExpirationIndex::new(),
            next_game_id: 1,
        }
    }
}

impl Engine {
    /// Create an empty engine.
    pub fn new(params: Params) -> Result<Self, GameError> {
        params.validate()?;
        Ok(Self { params, ..Self::default() })
    }

    /// Current params.
    pub fn params(&self) -> Params {
        self.params
    }

    /// Replace the params. Authorization is the host's concern.
    pub fn set_params(&mut self, params: Params) -> Result<(), GameError> {
        params.validate()?;
        info!("Params updated: ttl {} -> {}", self.params.ttl, params.ttl);
        self.params = params;
        Ok(())
    }

    /// Look up a game.
    pub fn get_game(&self, game_id: GameId) -> Result<&Game, GameError> {
        self.games.get(&game_id).ok_or(GameError::NotFound(game_id))
    }

    /// Read-only view of the expiration index.
    pub fn expiry(&self) -> &ExpirationIndex {
        &self.expiry
    }

    /// Id the next created game will get.
    pub fn next_game_id(&self) -> GameId {
        self.next_game_id
    }

    /// Create a game between `player_a` and `player_b` at `height`.
    pub fn create_game(
        &mut self,
        height: u64,
        player_a: PlayerId,
        player_b: PlayerId,
        rounds: u64,
    ) -> Result<Receipt<GameId>, GameError> {
        let game_id = self.next_game_id;
        let game = Game::new(game_id, player_a, player_b, rounds, height, self.params.ttl)
            .inspect_err(|e| debug!("Create game rejected: {}", e))?;

        self.expiry.insert(game.expiration_height, game_id)?;
        self.next_game_id += 1;

        info!(
            "Created game {} ({} vs {}, {} rounds, expires at {})",
            game_id, game.player_a, game.player_b, game.rounds, game.expiration_height
        );

        let event = GameEvent::GameCreated {
            game_id,
            player_a: game.player_a.clone(),
            player_b: game.player_b.clone(),
        };
        self.games.insert(game_id, game);

        Ok(Receipt::new(game_id, vec![event]))
    }

    /// Record a commitment.
    pub fn submit_move(
        &mut self,
        game_id: GameId,
        player: &PlayerId,
        commitment: &str,
    ) -> Result<Receipt<()>, GameError> {
        let mut game = self.get_game(game_id)?.clone();
        game.submit_move(player, commitment)
            .inspect_err(|e| debug!("Move in game {} by {} rejected: {}", game_id, player, e))?;

        let stored = Commitment::parse(commitment)?.to_string();
        self.games.insert(game_id, game);

        Ok(Receipt::new(
            (),
            vec![GameEvent::MoveCommitted {
                game_id,
                player: player.clone(),
                commitment: stored,
            }],
        ))
    }

    /// Open a commitment; ends the game when a result is reached.
    ///
    /// Returns the status after the reveal.
    pub fn reveal_move(
        &mut self,
        game_id: GameId,
        player: &PlayerId,
        move_token: &str,
        salt: &str,
    ) -> Result<Receipt<Status>, GameError> {
        let mut game = self.get_game(game_id)?.clone();
        game.reveal_move(player, move_token, salt)
            .inspect_err(|e| debug!("Reveal in game {} by {} rejected: {}", game_id, player, e))?;

        let revealed: Choice = move_token.parse()?;
        let mut events = vec![GameEvent::MoveRevealed {
            game_id,
            player: player.clone(),
            revealed,
        }];

        if game.is_ended() {
            self.expiry
                .remove(game.expiration_height, game_id)
                .inspect_err(|e| warn!("Index out of sync for game {}: {}", game_id, e))?;
            info!("Game {} ended: {} (score {}-{})", game_id, game.status, game.score.a, game.score.b);
            events.push(GameEvent::GameEnded { game_id, status: game.status });
        }

        let status = game.status;
        self.games.insert(game_id, game);
        Ok(Receipt::new(status, events))
    }

    /// Cancel every open game whose expiration height is at or below `height`.
    ///
    /// Reports each game whose entry came due and whether it was cancelled.
    pub fn sweep_expired(&mut self, height: u64) -> Receipt<Vec<SweptGame>> {
        let mut swept = Vec::new();
        let mut events = Vec::new();

        for key in self.expiry.sweep(height) {
            let Some(game) = self.games.get_mut(&key.game_id) else {
                warn!("Expired entry for unknown game {} at height {}", key.game_id, key.height);
                swept.push(SweptGame { game_id: key.game_id, cancelled: false });
                continue;
            };

            let cancelled = game.cancel();
            if cancelled {
                info!("Game {} cancelled at height {}", key.game_id, height);
                events.push(GameEvent::GameEnded { game_id: key.game_id, status: Status::Cancelled });
            } else {
                warn!("Expired entry for ended game {} ({})", key.game_id, game.status);
            }
            swept.push(SweptGame { game_id: key.game_id, cancelled });
        }

        if !swept.is_empty() {
            debug!("Swept {} expired games at height {}", swept.len(), height);
        }
        Receipt::new(swept, events)
    }

    /// Digest over the complete engine state.
    pub fn state_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_engine_state();
        hasher.update_u64(self.params.ttl);
        hasher.update_u64(self.next_game_id);

        // BTreeMap iteration is id-ordered
        hasher.update_u64(self.games.len() as u64);
        for game in self.games.values() {
            game.hash_into(&mut hasher);
        }

        hasher.update_u64(self.expiry.len() as u64);
        for key in self.expiry.iter() {
            hasher.update_u64(key.height);
            hasher.update_u64(key.game_id);
        }

        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
