//! Effect definitions.
//!
//! Effects are the closed vocabulary of things an ability can do. Each
//! variant carries only the data it needs; how much it does and what it
//! touches come from the owning [`Ability`](crate::cards::Ability)'s amount
//! and target specifier.

use serde::{Deserialize, Serialize};

use super::targeting::TargetSpec;
use crate::cards::{Amount, TokenShape};
use crate::core::Phase;

/// Which stats a buff changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffType {
    /// +X/+0
    Power,
    /// +0/+X
    Toughness,
    /// +X/+X
    Both,
    /// +X/+Y with an independently evaluated toughness amount.
    Split { toughness: Amount },
}

/// How long a buff lasts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffDuration {
    #[default]
    UntilEndOfTurn,
    Permanent,
}

/// An effect kind.
///
/// ## Counters
///
/// - `AddCounters`: Put `amount` counters on each target
/// - `RemoveCounters`: Remove up to `amount` counters from each target
/// - `DoubleCounters`: Double a counter kind on each target
///
/// ## Token Creation
///
/// Every variant here creates `amount` tokens (after token doublers):
/// - `CreateToken`: A token with an inline shape
/// - `CreateNamedToken`: A token looked up by name
/// - `CreateTokenCopy`: A token copy of each target
/// - `CreateRole`: A Role token attached to each target
/// - `CreateTokensWithSacrifice`: Named tokens that are sacrificed at a
///   future phase
///
/// ## Removal and Attachment
///
/// - `Destroy`, `Exile`, `Sacrifice`: Move targets off the battlefield
/// - `Attach`: Attach the source to the first target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    // === Counters ===
    AddCounters { counter: String },
    RemoveCounters { counter: String },
    DoubleCounters { counter: String },

    // === Stats ===
    Buff {
        buff: BuffType,
        #[serde(default)]
        duration: BuffDuration,
    },

    // === Token Creation ===
    CreateToken { token: TokenShape },
    CreateNamedToken { name: String },
    CreateTokenCopy,
    CreateRole { role: String },
    CreateTokensWithSacrifice { name: String, phase: Phase },

    // === Removal / Attachment ===
    Destroy,
    Exile,
    Sacrifice,
    Attach,
}

impl Effect {
    /// Put counters of a kind.
    #[must_use]
    pub fn add_counters(counter: impl Into<String>) -> Self {
        Effect::AddCounters { counter: counter.into() }
    }

    /// An until-end-of-turn buff.
    #[must_use]
    pub fn buff(buff: BuffType) -> Self {
        Effect::Buff {
            buff,
            duration: BuffDuration::UntilEndOfTurn,
        }
    }

    /// Create named tokens.
    #[must_use]
    pub fn named_token(name: impl Into<String>) -> Self {
        Effect::CreateNamedToken { name: name.into() }
    }

    /// Check if this effect belongs to the token-creation family.
    #[must_use]
    pub fn is_token_creation(&self) -> bool {
        matches!(
            self,
            Effect::CreateToken { .. }
                | Effect::CreateNamedToken { .. }
                | Effect::CreateTokenCopy
                | Effect::CreateRole { .. }
                | Effect::CreateTokensWithSacrifice { .. }
        )
    }

    /// Check if the amount is a count (doublable) rather than a signed bonus
    /// or irrelevant.
    #[must_use]
    pub fn uses_count(&self) -> bool {
        matches!(
            self,
            Effect::AddCounters { .. } | Effect::RemoveCounters { .. }
        ) || self.is_token_creation()
    }

    /// Short snake-case name, for logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Effect::AddCounters { .. } => "add_counters",
            Effect::RemoveCounters { .. } => "remove_counters",
            Effect::DoubleCounters { .. } => "double_counters",
            Effect::Buff { .. } => "buff",
            Effect::CreateToken { .. } => "create_token",
            Effect::CreateNamedToken { .. } => "create_named_token",
            Effect::CreateTokenCopy => "create_token_copy",
            Effect::CreateRole { .. } => "create_role",
            Effect::CreateTokensWithSacrifice { .. } => "create_tokens_with_sacrifice",
            Effect::Destroy => "destroy",
            Effect::Exile => "exile",
            Effect::Sacrifice => "sacrifice",
            Effect::Attach => "attach",
        }
    }

    /// Human-readable description given an already-formatted amount.
    #[must_use]
    pub fn describe(&self, amount: &str, target: &TargetSpec) -> String {
        let on = target.describe();
        match self {
            Effect::AddCounters { counter } => format!("Put {} {} counter(s) on {}", amount, counter, on),
            Effect::RemoveCounters { counter } => format!("Remove {} {} counter(s) from {}", amount, counter, on),
            Effect::DoubleCounters { counter } => format!("Double the {} counters on {}", counter, on),
            Effect::Buff { duration, .. } => {
                let until = match duration {
                    BuffDuration::UntilEndOfTurn => " until end of turn",
                    BuffDuration::Permanent => "",
                };
                format!("{} gets {}{}", capitalize(&on), amount, until)
            }
            Effect::CreateToken { token } => format!("Create {} {} token(s)", amount, token.name),
            Effect::CreateNamedToken { name } => format!("Create {} {} token(s)", amount, name),
            Effect::CreateTokenCopy => format!("Create {} token copy(ies) of {}", amount, on),
            Effect::CreateRole { role } => format!("Create {} attached to {}", role, on),
            Effect::CreateTokensWithSacrifice { name, phase } => format!(
                "Create {} {} token(s); sacrifice them at the beginning of the next {}",
                amount, name, phase
            ),
            Effect::Destroy => format!("Destroy {}", on),
            Effect::Exile => format!("Exile {}", on),
            Effect::Sacrifice => format!("Sacrifice {}", on),
            Effect::Attach => format!("Attach to {}", on),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
