//! Engine Module
//!
//! Host-facing layer over the deterministic game logic.
//!
//! - `keeper`: Engine (create, move, reveal, sweep, state hash)
//! - `expiry`: Expiration index keyed by (height, game id)
//! - `params`: Module params
//! - `genesis`: Snapshot import/export
//! - `protocol`: Request/response messages and dispatch

pub mod expiry;
pub mod genesis;
pub mod keeper;
pub mod params;
pub mod protocol;

pub use expiry::{ExpirationIndex, ExpiryKey};
pub use genesis::GenesisState;
pub use keeper::{Engine, Receipt, SweptGame};
pub use params::Params;
pub use protocol::{ErrorResponse, Request, Response};
