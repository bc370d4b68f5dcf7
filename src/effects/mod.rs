//! Effect system: targeting, doublers, resolution and execution.
//!
//! - `Effect`: The closed vocabulary of effect kinds
//! - `TargetSpec`: Target specifiers and their resolver
//! - `Modifier`: Replacement effects composed onto a base amount
//! - `DeferredEffect`: A discovered ability with a preview, executed later
//! - `Executor`: Applies one effect to a board snapshot
//!
//! ## Pipeline
//!
//! ```text
//! TriggeredAbility --resolve_effect--> DeferredEffect --execute--> Resolution
//!                                      (preview)                    (board, new effects)
//! ```
//!
//! `execute` re-runs amount evaluation, modifiers and targeting against the
//! board it is given, then hands the result to the executor.

mod effect;
mod executor;
mod modifiers;
mod resolver;
mod targeting;
mod tokens;

pub use effect::{BuffDuration, BuffType, Effect};
pub use executor::{EffectValue, Execution, Executor};
pub use modifiers::{apply_modifiers, find_replacement_effects, modified_amount, Modifier};
pub use resolver::{evaluate_value, resolve_effect, DeferredEffect, Resolution};
pub use targeting::{find_targets, select_targets, TargetSpec, Targets};
pub use tokens::{create_copies, create_role, create_tokens, TokenBatch};
