//! Core engine types: ids, players, quantities, the board, actions,
//! configuration and errors.
//!
//! Everything here is independent of how abilities are written; the card
//! model lives in [`crate::cards`].

pub mod entity;
pub mod player;
pub mod quantity;
pub mod config;
pub mod error;
pub mod action;
pub mod board;

pub use entity::{EffectId, PermanentId};
pub use player::PlayerId;
pub use quantity::Quantity;
pub use config::{EngineConfig, Phase};
pub use error::EngineError;
pub use action::{ActionOutcome, PlayerAction};
pub use board::Board;
