//! The rules engine facade.
//!
//! `RulesEngine` ties discovery, resolution, delayed triggers and player
//! actions together behind one value the host application keeps around.
//! It never owns a board.

pub mod engine;

pub use engine::RulesEngine;
