//! Abilities attached to permanents.
//!
//! Abilities are produced by the (external) rules-text parser and attached
//! to permanents in order. An ability pairs a trigger with one effect, a
//! target specifier and an amount.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use crate::core::Phase;
use crate::effects::{BuffType, Effect, TargetSpec};
use crate::triggers::TriggerCondition;

/// What makes an ability fire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// At the beginning of a phase.
    Phase(Phase),
    /// Whenever this creature (or the creature this is attached to) attacks.
    Attacks,
    /// When this permanent enters the battlefield.
    EntersBattlefield,
    /// Whenever a token enters the battlefield under your control.
    TokenEnters,
    /// Whenever a land enters the battlefield under your control.
    LandEnters,
    /// Activated by the player; never discovered automatically.
    Activated,
}

/// A triggered or activated ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub trigger: TriggerKind,

    #[serde(default)]
    pub condition: Option<TriggerCondition>,

    pub effect: Effect,

    #[serde(default)]
    pub target: TargetSpec,

    #[serde(default)]
    pub amount: Amount,

    /// Rules text of the ability, used as its description when present.
    #[serde(default)]
    pub text: Option<String>,
}

impl Ability {
    /// Create an ability targeting its source with an amount of one.
    #[must_use]
    pub fn new(trigger: TriggerKind, effect: Effect) -> Self {
        Self {
            trigger,
            condition: None,
            effect,
            target: TargetSpec::This,
            amount: Amount::default(),
            text: None,
        }
    }

    /// Shorthand for a phase-triggered ability.
    #[must_use]
    pub fn at(phase: Phase, effect: Effect) -> Self {
        Self::new(TriggerKind::Phase(phase), effect)
    }

    /// Set the target specifier (builder pattern).
    #[must_use]
    pub fn targeting(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }

    /// Set the amount (builder pattern).
    #[must_use]
    pub fn with_amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = amount.into();
        self
    }

    /// Set the condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The battle cry ability: "each other attacking creature gets +1/+0
    /// until end of turn".
    #[must_use]
    pub fn battle_cry() -> Self {
        Self::new(TriggerKind::Attacks, Effect::buff(BuffType::Power))
            .targeting(TargetSpec::AllOtherAttackingCreatures)
            .with_amount(1i64)
            .with_text("Battle cry")
    }

    /// Check if this ability already grants what battle cry grants.
    #[must_use]
    pub fn is_battle_cry_equivalent(&self) -> bool {
        self.trigger == TriggerKind::Attacks
            && self.target == TargetSpec::AllOtherAttackingCreatures
            && self.amount == Amount::Literal(1)
            && matches!(self.effect, Effect::Buff { buff: BuffType::Power, .. })
    }
}
