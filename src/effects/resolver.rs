//! Deferred effects.
//!
//! [`resolve_effect`] turns a discovered (source, ability) pair into a
//! [`DeferredEffect`]: a self-contained item carrying a preview of what it
//! will do. Nothing is applied yet.
//!
//! [`DeferredEffect::execute`] consumes the item and recomputes everything
//! (base amount, replacement effects, targets) from the board passed to it.
//! The preview is only a preview: if other effects resolve first, the
//! executed value may differ. Two creatures that each put "counters equal
//! to this creature's power" on every creature you control snowball for
//! exactly this reason.
//!
//! Execution returns newly produced deferred effects (enter-the-battlefield
//! triggers of created tokens) instead of resolving them. The caller owns
//! the work list.

use serde::{Deserialize, Serialize};

use super::effect::{BuffType, Effect};
use super::executor::{EffectValue, Executor};
use super::modifiers::modified_amount;
use super::targeting::select_targets;
use crate::cards::{Ability, Amount, StatBonus};
use crate::core::{Board, EffectId, EngineConfig, PermanentId};
use crate::rules::RulesEngine;
use crate::triggers::{process_enters_battlefield, TriggerContext, TriggeredAbility};

/// A discovered ability waiting to be executed.
///
/// Executing consumes the value, so each deferred effect runs at most once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeferredEffect {
    pub id: EffectId,
    pub source: PermanentId,
    pub ability: Ability,
    pub context: TriggerContext,
    /// Human-readable preview, e.g. "Hero: Put 2 +1/+1 counter(s) on each
    /// creature you control".
    pub description: String,
    /// The value as of resolution time.
    pub preview: EffectValue,
}

/// The result of executing a deferred effect.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub board: Board,
    /// Deferred effects produced by the execution, in order.
    pub new_effects: Vec<DeferredEffect>,
    pub log: Vec<String>,
    /// The value actually applied.
    pub value: EffectValue,
}

/// Wrap a discovered ability as a deferred effect with a preview.
#[must_use]
pub fn resolve_effect(
    id: EffectId,
    board: &Board,
    triggered: TriggeredAbility,
    config: &EngineConfig,
) -> DeferredEffect {
    let TriggeredAbility { source, ability, context } = triggered;
    let preview = evaluate_value(&ability, board, source, &context, config);

    let source_name = board.get(source).map_or("Unknown source", |p| p.name.as_str());
    let body = match &ability.text {
        Some(text) => text.clone(),
        None => ability.effect.describe(&preview.to_string(), &ability.target),
    };

    DeferredEffect {
        id,
        source,
        description: format!("{}: {}", source_name, body),
        ability,
        context,
        preview,
    }
}

/// Evaluate an ability's magnitude against a board.
///
/// Counts go through the amount interpreter and then replacement effects.
/// Evaluation failures (a vanished source, an unattached equipment) count
/// as zero.
#[must_use]
pub fn evaluate_value(
    ability: &Ability,
    board: &Board,
    source: PermanentId,
    context: &TriggerContext,
    config: &EngineConfig,
) -> EffectValue {
    let effect = &ability.effect;
    match effect {
        Effect::Buff { buff, .. } => {
            let amount = signed_or_zero(&ability.amount, board, source, context);
            let bonus = match buff {
                BuffType::Power => StatBonus::new(amount, 0),
                BuffType::Toughness => StatBonus::new(0, amount),
                BuffType::Both => StatBonus::new(amount, amount),
                BuffType::Split { toughness } => {
                    StatBonus::new(amount, signed_or_zero(toughness, board, source, context))
                }
            };
            EffectValue::Bonus(bonus)
        }
        _ if effect.uses_count() => {
            let base = ability
                .amount
                .evaluate(board, source, context.attacker)
                .unwrap_or_else(|e| {
                    tracing::debug!(error = %e, source = %source, "amount evaluation fell back to zero");
                    Default::default()
                });
            EffectValue::Count(modified_amount(&base, effect, board, config))
        }
        _ => EffectValue::None,
    }
}

fn signed_or_zero(amount: &Amount, board: &Board, source: PermanentId, context: &TriggerContext) -> i64 {
    amount
        .evaluate_signed(board, source, context.attacker)
        .unwrap_or_else(|e| {
            tracing::debug!(error = %e, source = %source, "amount evaluation fell back to zero");
            0
        })
}

impl DeferredEffect {
    /// Check if the target is a single permanent the player should pick.
    #[must_use]
    pub fn requires_target_choice(&self) -> bool {
        self.context.explicit_targets.is_none() && self.ability.target.requires_choice()
    }

    /// Execute against the current board.
    ///
    /// Amount, replacement effects and targets are recomputed from `board`.
    /// `explicit_targets` (a player's pick) overrides target selection.
    /// Failures leave the board unchanged.
    pub fn execute(
        self,
        engine: &mut RulesEngine,
        board: &Board,
        explicit_targets: Option<&[PermanentId]>,
    ) -> Resolution {
        let value = evaluate_value(&self.ability, board, self.source, &self.context, engine.config());
        let explicit = explicit_targets.or(self.context.explicit_targets.as_deref());
        let targets = select_targets(&self.ability.target, board, self.source, &self.context, explicit);

        let executor = Executor::new(engine.config(), engine.templates());
        let execution = match executor.apply(board, self.source, &self.ability.effect, &value, &targets) {
            Ok(execution) => execution,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    effect = %self.id,
                    kind = self.ability.effect.kind_name(),
                    "effect aborted; board unchanged"
                );
                return Resolution {
                    board: board.clone(),
                    new_effects: Vec::new(),
                    log: vec![format!("{} had no effect", self.description)],
                    value,
                };
            }
        };

        let mut new_effects = Vec::new();
        for entered in &execution.entered {
            for triggered in process_enters_battlefield(&execution.board, *entered) {
                new_effects.push(engine.resolve_effect(&execution.board, triggered));
            }
        }

        let mut log = Vec::with_capacity(execution.log.len() + 1);
        log.push(self.description);
        log.extend(execution.log);

        Resolution {
            board: execution.board,
            new_effects,
            log,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Permanent, Stat, TriggerKind, PLUS_ONE_COUNTER};
    use crate::core::{Phase, Quantity};
    use crate::effects::TargetSpec;

    fn engine() -> RulesEngine {
        RulesEngine::new(EngineConfig::default()).unwrap()
    }

    fn power_counters() -> Ability {
        Ability::at(Phase::Upkeep, Effect::add_counters(PLUS_ONE_COUNTER))
            .targeting(TargetSpec::AllCreaturesYouControl)
            .with_amount(Amount::This(Stat::Power))
    }

    #[test]
    fn test_preview_matches_static_execution() {
        let mut engine = engine();
        let mut board = Board::new();
        let hero = board.add(Permanent::creature("Hero", 3, 3).with_ability(power_counters()));

        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(hero, power_counters()));
        assert_eq!(deferred.preview, EffectValue::Count(3u64.into()));
        assert_eq!(deferred.description, "Hero: Put 3 +1/+1 counter(s) on each creature you control");

        let preview = deferred.preview.clone();
        let resolution = deferred.execute(&mut engine, &board, None);
        assert_eq!(resolution.value, preview);
        assert_eq!(resolution.board.get(hero).unwrap().counter(PLUS_ONE_COUNTER), Quantity::from(3u64));
    }

    #[test]
    fn test_execute_reevaluates() {
        let mut engine = engine();
        let mut board = Board::new();
        let hero = board.add(Permanent::creature("Hero", 1, 1));
        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(hero, power_counters()));

        board.get_mut(hero).unwrap().power = Some(4);
        let resolution = deferred.execute(&mut engine, &board, None);
        assert_eq!(resolution.value, EffectValue::Count(4u64.into()));
    }

    #[test]
    fn test_gone_source_falls_back_to_zero() {
        let mut engine = engine();
        let board = Board::new();
        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(PermanentId(9), power_counters()));
        assert_eq!(deferred.preview, EffectValue::Count(Quantity::zero()));
        assert!(deferred.description.starts_with("Unknown source"));
    }

    #[test]
    fn test_split_buff() {
        let mut board = Board::new();
        let id = board.add(Permanent::creature("Giant", 4, 4));
        let ability = Ability::new(
            TriggerKind::Attacks,
            Effect::buff(BuffType::Split { toughness: Amount::Literal(-1) }),
        )
        .with_amount(Amount::This(Stat::Power));

        let value = evaluate_value(&ability, &board, id, &TriggerContext::default(), &EngineConfig::default());
        assert_eq!(value, EffectValue::Bonus(StatBonus::new(4, -1)));
    }

    #[test]
    fn test_requires_target_choice() {
        let mut engine = engine();
        let mut board = Board::new();
        let source = board.add(Permanent::creature("Source", 1, 1));
        let ability = Ability::new(TriggerKind::EntersBattlefield, Effect::add_counters(PLUS_ONE_COUNTER))
            .targeting(TargetSpec::AnotherCreatureYouControl);

        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(source, ability.clone()));
        assert!(deferred.requires_target_choice());

        let fixed = TriggeredAbility::new(source, ability)
            .with_context(TriggerContext::default().with_explicit_targets(vec![source]));
        assert!(!engine.resolve_effect(&board, fixed).requires_target_choice());
    }

    #[test]
    fn test_explicit_targets_override() {
        let mut engine = engine();
        let mut board = Board::new();
        let source = board.add(Permanent::creature("Source", 1, 1));
        let first = board.add(Permanent::creature("First", 1, 1));
        let second = board.add(Permanent::creature("Second", 1, 1));
        let ability = Ability::new(TriggerKind::EntersBattlefield, Effect::add_counters(PLUS_ONE_COUNTER))
            .targeting(TargetSpec::AnotherCreatureYouControl);

        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(source, ability));
        let resolution = deferred.execute(&mut engine, &board, Some(&[second]));
        assert!(resolution.board.get(first).unwrap().counters.is_empty());
        assert_eq!(resolution.board.get(second).unwrap().counter(PLUS_ONE_COUNTER), Quantity::one());
    }

    #[test]
    fn test_failed_execution_leaves_board() {
        let mut engine = RulesEngine::with_templates(EngineConfig::default(), crate::cards::TokenTemplates::new());
        let mut board = Board::new();
        let source = board.add(Permanent::creature("Source", 1, 1));
        let ability = Ability::new(TriggerKind::EntersBattlefield, Effect::named_token("Nobody Knows"));

        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(source, ability));
        let resolution = deferred.execute(&mut engine, &board, None);
        assert_eq!(resolution.board, board);
        assert!(resolution.new_effects.is_empty());
    }

    #[test]
    fn test_created_tokens_return_entry_effects() {
        let mut engine = engine();
        let mut board = Board::new();
        let watcher = board.add(
            Permanent::creature("Watcher", 1, 1)
                .with_ability(Ability::new(TriggerKind::TokenEnters, Effect::add_counters(PLUS_ONE_COUNTER))),
        );
        let maker = Ability::at(Phase::Upkeep, Effect::named_token("Soldier")).with_amount(2);

        let deferred = engine.resolve_effect(&board, TriggeredAbility::new(watcher, maker));
        let resolution = deferred.execute(&mut engine, &board, None);
        assert_eq!(resolution.new_effects.len(), 2);
        assert!(resolution.new_effects.iter().all(|e| e.source == watcher));
        assert_ne!(resolution.new_effects[0].id, resolution.new_effects[1].id);
    }
}
