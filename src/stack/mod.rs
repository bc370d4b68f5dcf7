//! Caller-owned effect queue.
//!
//! The engine never drains anything on its own: `execute` hands back new
//! deferred effects and the caller decides what to do with them. This
//! module is a ready-made work list for callers that want one.
//!
//! ## Key Types
//!
//! - [`EffectQueue`]: FIFO of deferred effects with a `drain` loop
//! - [`ResolutionPolicy`]: Decides, per effect, auto-execute or hold
//! - [`AutoResolveAll`], [`HoldTargetChoices`]: Built-in policies
//!
//! ## Example Usage
//!
//! ```
//! use battlefield_rules::cards::{Ability, Permanent, PLUS_ONE_COUNTER};
//! use battlefield_rules::core::{Board, EngineConfig, Phase};
//! use battlefield_rules::effects::{Effect, TargetSpec};
//! use battlefield_rules::rules::RulesEngine;
//! use battlefield_rules::stack::{DrainStatus, EffectQueue, HoldTargetChoices};
//!
//! let mut engine = RulesEngine::new(EngineConfig::default()).unwrap();
//! let mut board = Board::new();
//! let ability = Ability::at(Phase::Upkeep, Effect::add_counters(PLUS_ONE_COUNTER))
//!     .targeting(TargetSpec::AllCreaturesYouControl);
//! let hero = board.add(Permanent::creature("Hero", 1, 1).with_ability(ability));
//!
//! let mut queue = EffectQueue::new();
//! let found = engine.find_triggers_for_phase(&board, Phase::Upkeep, true);
//! queue.extend(engine.resolve_all(&board, found));
//!
//! let drained = queue.drain(&mut engine, &board, &HoldTargetChoices);
//! assert_eq!(drained.status, DrainStatus::Complete);
//! assert!(!drained.board.get(hero).unwrap().counters.is_empty());
//! ```

mod queue;

pub use queue::{Drain, EffectQueue};

use serde::{Deserialize, Serialize};

use crate::effects::DeferredEffect;

/// How a drain ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainStatus {
    /// The queue is empty.
    Complete,

    /// Only held effects remain (this many).
    WaitingForChoice(usize),

    /// The auto-resolution limit was reached with work remaining.
    LimitReached,
}

/// Decides whether the queue may execute an effect without the player.
pub trait ResolutionPolicy {
    /// Return true to execute now, false to hold for the player.
    fn should_auto_resolve(&self, effect: &DeferredEffect) -> bool;
}

/// Execute everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoResolveAll;

impl ResolutionPolicy for AutoResolveAll {
    fn should_auto_resolve(&self, _effect: &DeferredEffect) -> bool {
        true
    }
}

/// Hold effects whose target is a player pick; execute the rest.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldTargetChoices;

impl ResolutionPolicy for HoldTargetChoices {
    fn should_auto_resolve(&self, effect: &DeferredEffect) -> bool {
        !effect.requires_target_choice()
    }
}
