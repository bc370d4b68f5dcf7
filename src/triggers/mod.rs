//! Trigger discovery and delayed triggers.
//!
//! ## Key Components
//!
//! - [`TriggeredAbility`]: A discovered (source, ability) pair with context
//! - [`TriggerCondition`]: Turn-based gating of abilities
//! - [`find_triggers_for_phase`], [`find_attack_triggers`],
//!   [`find_entry_triggers`], [`process_enters_battlefield`]: Discovery
//! - [`DelayedTriggerQueue`]: One-shot effects for a future phase
//!
//! Discovery never mutates the board and never resolves anything; it hands
//! pairs to [`crate::effects::resolve_effect`].

mod condition;
mod delayed;
mod discovery;

pub use condition::TriggerCondition;
pub use delayed::{DelayedTrigger, DelayedTriggerQueue};
pub use discovery::{
    find_attack_triggers, find_entry_triggers, find_triggers_for_phase, process_enters_battlefield,
    TriggerContext, TriggeredAbility,
};
