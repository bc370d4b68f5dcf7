//! Trigger conditions.
//!
//! A condition gates whether a discovered ability fires. The only state the
//! engine knows about is whose turn it is, so conditions are turn checks
//! plus the usual combinators.

use serde::{Deserialize, Serialize};

/// A condition that must hold for a trigger to fire.
///
/// ```
/// use battlefield_rules::triggers::TriggerCondition;
///
/// let on_your_turn = TriggerCondition::YourTurn;
/// assert!(on_your_turn.is_met(true));
/// assert!(!on_your_turn.is_met(false));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// "At the beginning of your upkeep"
    YourTurn,
    /// "At the beginning of each opponent's upkeep"
    OpponentsTurn,

    // === Combinators ===

    /// All conditions must be true.
    All(Vec<TriggerCondition>),

    /// At least one condition must be true.
    Any(Vec<TriggerCondition>),

    /// Condition must be false.
    Not(Box<TriggerCondition>),
}

impl TriggerCondition {
    /// Evaluate against whose turn it is.
    #[must_use]
    pub fn is_met(&self, is_controller_turn: bool) -> bool {
        match self {
            TriggerCondition::YourTurn => is_controller_turn,
            TriggerCondition::OpponentsTurn => !is_controller_turn,
            TriggerCondition::All(conditions) => conditions.iter().all(|c| c.is_met(is_controller_turn)),
            TriggerCondition::Any(conditions) => conditions.iter().any(|c| c.is_met(is_controller_turn)),
            TriggerCondition::Not(condition) => !condition.is_met(is_controller_turn),
        }
    }

    /// Combine with another condition (both must hold).
    #[must_use]
    pub fn and(self, other: TriggerCondition) -> Self {
        match self {
            TriggerCondition::All(mut conditions) => {
                conditions.push(other);
                TriggerCondition::All(conditions)
            }
            first => TriggerCondition::All(vec![first, other]),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            TriggerCondition::Not(inner) => *inner,
            other => TriggerCondition::Not(Box::new(other)),
        }
    }
}
