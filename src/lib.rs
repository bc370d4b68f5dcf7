//! # battlefield-rules
//!
//! Trigger discovery and effect resolution for a card game battlefield
//! simulator.
//!
//! ## Design Principles
//!
//! 1. **Snapshots In, Snapshots Out**: Every operation takes a `&Board` and
//!    returns a new one. Callers keep old boards for undo.
//!
//! 2. **Preview, Then Execute**: Discovered abilities become deferred
//!    effects with a preview. Executing recomputes everything against the
//!    board at that moment.
//!
//! 3. **Degrade Quietly**: Bad ability data applies nothing and emits a
//!    `tracing` diagnostic. Only loading template data can fail.
//!
//! ## Architecture
//!
//! - **Persistent Board**: `im` maps make board clones O(1).
//!
//! - **Exact Counts**: `Quantity` switches to big integers when doublers
//!   compound past `u64`.
//!
//! - **Caller-Owned Work List**: Execution returns new deferred effects;
//!   the caller (or `stack::EffectQueue`) decides when they run.
//!
//! ## Modules
//!
//! - `core`: Ids, quantities, the board, player actions, configuration
//! - `cards`: Permanents, abilities, amounts, doublers, token templates
//! - `zones`: Leaving the battlefield and attaching
//! - `effects`: Targeting, modifiers, deferred effects, the executor
//! - `triggers`: Trigger discovery, conditions, delayed triggers
//! - `rules`: The `RulesEngine` facade
//! - `stack`: A FIFO effect queue with resolution policies

pub mod core;
pub mod cards;
pub mod zones;
pub mod effects;
pub mod triggers;
pub mod rules;
pub mod stack;

// Re-export commonly used types
pub use crate::core::{
    ActionOutcome, Board, EffectId, EngineConfig, EngineError, Phase, PermanentId, PlayerAction, PlayerId,
    Quantity,
};

pub use crate::cards::{
    Ability, Amount, CardType, Permanent, ReplacementKind, Stat, StatBonus, TokenShape, TokenTemplates,
    TriggerKind, MINUS_ONE_COUNTER, PLUS_ONE_COUNTER,
};

pub use crate::zones::Zone;

pub use crate::effects::{BuffDuration, BuffType, DeferredEffect, Effect, EffectValue, Resolution, TargetSpec};

pub use crate::triggers::{DelayedTrigger, TriggerCondition, TriggerContext, TriggeredAbility};

pub use crate::rules::RulesEngine;

pub use crate::stack::{AutoResolveAll, DrainStatus, EffectQueue, HoldTargetChoices, ResolutionPolicy};
