//! Replacement-effect (doubler) composition.
//!
//! Doublers compound multiplicatively: with N token doublers, one token
//! becomes 2^N. A doubler that is itself a virtual stack counts as many
//! doublers as it represents, so a stack of a million doublers raises the
//! exponent by a million rather than multiplying by two million.
//!
//! ## Arithmetic
//!
//! [`apply_modifiers`] has two paths:
//!
//! - a `u64` fast path that falls back to big integers on overflow
//! - an exact path used for token creation once the summed token-doubler
//!   exponent exceeds `EngineConfig::exact_arithmetic_threshold`
//!
//! Both always produce the same [`Quantity`]. The threshold only decides
//! which path does the work.

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use crate::cards::ReplacementKind;
use crate::core::{Board, EngineConfig, PermanentId, Quantity};

/// One active doubler, found on one permanent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub source: PermanentId,
    pub kind: ReplacementKind,
    pub multiplier: u32,
    /// How many times the doubler applies: one, or the represented size of
    /// a virtual stack.
    pub count: Quantity,
}

/// Find every battlefield replacement effect that modifies `effect`, in
/// ascending source id order.
pub fn find_replacement_effects(effect: &Effect, board: &Board) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    for permanent in board.battlefield() {
        for replacement in &permanent.replacement_effects {
            if replacement.kind.applies_to(effect) {
                modifiers.push(Modifier {
                    source: permanent.id,
                    kind: replacement.kind,
                    multiplier: replacement.kind.multiplier(),
                    count: permanent.represented_count(),
                });
            }
        }
    }
    modifiers
}

/// Apply modifiers to a base amount.
///
/// Modifiers that do not apply to `effect` are ignored.
#[must_use]
pub fn apply_modifiers(
    base: &Quantity,
    modifiers: &[Modifier],
    effect: &Effect,
    config: &EngineConfig,
) -> Quantity {
    let relevant: Vec<&Modifier> = modifiers
        .iter()
        .filter(|m| m.kind.applies_to(effect))
        .collect();
    if relevant.is_empty() {
        return base.clone();
    }

    let token_exponent: Quantity = relevant
        .iter()
        .filter(|m| m.kind == ReplacementKind::TokenDoubler)
        .map(|m| &m.count)
        .sum();
    let exact = effect.is_token_creation()
        && token_exponent > Quantity::from(config.exact_arithmetic_threshold);

    let mut result = base.clone();
    for modifier in relevant {
        let exponent = clamp_exponent(&modifier.count, config);
        result = if exact {
            result.mul_pow_exact(modifier.multiplier, exponent)
        } else {
            result.mul_pow(modifier.multiplier, exponent)
        };
    }
    result
}

/// Find and apply in one step.
#[must_use]
pub fn modified_amount(base: &Quantity, effect: &Effect, board: &Board, config: &EngineConfig) -> Quantity {
    let modifiers = find_replacement_effects(effect, board);
    apply_modifiers(base, &modifiers, effect, config)
}

fn clamp_exponent(count: &Quantity, config: &EngineConfig) -> u32 {
    let limit = config.max_doubling_exponent;
    match count.to_u64().and_then(|c| u32::try_from(c).ok()) {
        Some(c) if c <= limit => c,
        _ => {
            tracing::warn!(count = %count, limit, "doubling exponent clamped");
            limit
        }
    }
}
