//! Entity model: permanents, abilities, amounts, replacement effects and
//! token templates.
//!
//! ## Key Types
//!
//! - `Permanent`: Runtime state of a battlefield entity
//! - `Ability`: Trigger + effect + target + amount
//! - `Amount`: Literal or dynamic effect magnitude
//! - `ReplacementEffect`: Counter and token doublers
//! - `TokenShape` / `TokenTemplates`: Token characteristics and lookup

pub mod ability;
pub mod amount;
pub mod permanent;
pub mod replacement;
pub mod templates;

pub use ability::{Ability, TriggerKind};
pub use amount::{Amount, Stat};
pub use permanent::{CardType, Permanent, StatBonus, VirtualStack, MINUS_ONE_COUNTER, PLUS_ONE_COUNTER};
pub use replacement::{ReplacementEffect, ReplacementKind};
pub use templates::{TokenShape, TokenTemplates};
