//! Genesis Import / Export
//!
//! A snapshot holds only primary state. The expiration index is derived
//! and rebuilt on import from every still-open game.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::expiry::ExpirationIndex;
use crate::engine::keeper::Engine;
use crate::engine::params::Params;
use crate::error::GameError;
use crate::game::state::{Game, GameId};

/// Serializable engine snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Module params
    pub params: Params,
    /// Stored games, any order
    pub games: Vec<Game>,
    /// Next id to assign
    pub next_game_id: GameId,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            games: Vec::new(),
            next_game_id: 1,
        }
    }
}

impl GenesisState {
    /// Check params, every game, id uniqueness and the sequence counter.
    pub fn validate(&self) -> Result<(), GameError> {
        self.params.validate()?;

        let mut seen = BTreeSet::new();
        for game in &self.games {
            game.validate()?;
            if !seen.insert(game.id) {
                return Err(GameError::DuplicatedIndex(game.id));
            }
        }

        let max_id = seen.last().copied().unwrap_or(0);
        if self.next_game_id == 0 || self.next_game_id <= max_id {
            return Err(GameError::InvalidGameNumber);
        }
        Ok(())
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl Engine {
    /// Build an engine from a validated snapshot.
    pub fn from_genesis(genesis: GenesisState) -> Result<Self, GameError> {
        genesis.validate()?;

        let mut expiry = ExpirationIndex::new();
        let mut games = BTreeMap::new();
        for game in genesis.games {
            if !game.is_ended() {
                expiry.insert(game.expiration_height, game.id)?;
            }
            games.insert(game.id, game);
        }

        info!(
            "Imported {} games ({} open), next id {}",
            games.len(),
            expiry.len(),
            genesis.next_game_id
        );

        Ok(Self {
            params: genesis.params,
            games,
            expiry,
            next_game_id: genesis.next_game_id,
        })
    }

    /// Snapshot the primary state.
    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            params: self.params,
            games: self.games.values().cloned().collect(),
            next_game_id: self.next_game_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commitment::commit;
    use crate::game::rules::Status;
    use crate::game::state::PlayerId;

    fn game(id: GameId) -> Game {
        Game::new(id, PlayerId::from("alice"), PlayerId::from("bob"), 3, 10, 20).unwrap()
    }

    #[test]
    fn test_default_genesis_valid() {
        assert!(GenesisState::default().validate().is_ok());
        let engine = Engine::from_genesis(GenesisState::default()).unwrap();
        assert_eq!(engine.next_game_id(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let genesis = GenesisState {
            games: vec![game(1), game(1)],
            next_game_id: 2,
            ..GenesisState::default()
        };
        assert_eq!(genesis.validate(), Err(GameError::DuplicatedIndex(1)));
    }

    #[test]
    fn test_stale_sequence_rejected() {
        let genesis = GenesisState {
            games: vec![game(3)],
            next_game_id: 3,
            ..GenesisState::default()
        };
        assert_eq!(genesis.validate(), Err(GameError::InvalidGameNumber));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let genesis = GenesisState { params: Params { ttl: 0 }, ..GenesisState::default() };
        assert_eq!(Engine::from_genesis(genesis).unwrap_err(), GameError::InvalidTtl);
    }

    #[test]
    fn test_import_rebuilds_index_for_open_games() {
        let mut finished = game(2);
        finished.status = Status::Cancelled;

        let genesis = GenesisState {
            games: vec![game(1), finished],
            next_game_id: 3,
            ..GenesisState::default()
        };
        let engine = Engine::from_genesis(genesis).unwrap();

        assert_eq!(engine.expiry().len(), 1);
        assert!(engine.expiry().contains(30, 1));
    }

    #[test]
    fn test_export_import_preserves_state() {
        let mut engine = Engine::new(Params { ttl: 7 }).unwrap();
        let alice = PlayerId::from("alice");
        let bob = PlayerId::from("bob");
        let id = engine.create_game(3, alice.clone(), bob, 2).unwrap().value;
        engine.submit_move(id, &alice, &commit("Rock", "s")).unwrap();

        let bytes = engine.export_genesis().to_bytes().unwrap();
        let restored = Engine::from_genesis(GenesisState::from_bytes(&bytes).unwrap()).unwrap();
        assert_eq!(restored.state_hash(), engine.state_hash());

        let json = engine.export_genesis().to_json().unwrap();
        let restored = Engine::from_genesis(GenesisState::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.state_hash(), engine.state_hash());
    }
}
