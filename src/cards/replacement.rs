//! Replacement effects (doublers).
//!
//! A replacement effect is a static property of the permanent that carries
//! it. The engine only knows multiplicative doublers: counter doublers
//! ("if one or more counters would be put on a permanent, twice that many
//! are put on it instead") and token doublers.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;

/// Kind of replacement effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementKind {
    CounterDoubler,
    TokenDoubler,
}

impl ReplacementKind {
    /// Check if this replacement modifies the given effect.
    ///
    /// Counter doublers only touch counter placement; token doublers touch
    /// the whole token-creation family.
    #[must_use]
    pub fn applies_to(self, effect: &Effect) -> bool {
        match self {
            ReplacementKind::CounterDoubler => matches!(effect, Effect::AddCounters { .. }),
            ReplacementKind::TokenDoubler => effect.is_token_creation(),
        }
    }

    /// Factor applied per instance.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        2
    }
}

/// A replacement effect owned by one permanent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementEffect {
    pub kind: ReplacementKind,
}

impl ReplacementEffect {
    /// Create a replacement effect.
    #[must_use]
    pub const fn new(kind: ReplacementKind) -> Self {
        Self { kind }
    }
}
