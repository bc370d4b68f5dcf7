//! The rules engine facade.
//!
//! `RulesEngine` owns the pieces that outlive a single board snapshot: the
//! configuration, the token template library and the effect id counter.
//! Everything else is passed in. Each operation takes a `&Board` and
//! returns a new board (or discovered work) without touching its input.
//!
//! ## Implementation Notes
//!
//! - `resolve_effect` is the only place effect ids are allocated
//! - `process_action` never fails; a bad action returns the board unchanged
//! - Delayed triggers live on the board, so snapshots carry them along

use crate::cards::TokenTemplates;
use crate::core::{ActionOutcome, Board, EffectId, EngineConfig, EngineError, Phase, PermanentId, PlayerAction};
use crate::effects::{self, DeferredEffect, Resolution};
use crate::triggers::{self, DelayedTrigger, TriggeredAbility};

/// Rules engine.
///
/// ## Example
///
/// ```
/// use battlefield_rules::cards::{Ability, Permanent, TriggerKind, PLUS_ONE_COUNTER};
/// use battlefield_rules::core::{Board, EngineConfig, PlayerAction, Quantity};
/// use battlefield_rules::effects::{Effect, TargetSpec};
/// use battlefield_rules::rules::RulesEngine;
///
/// let mut engine = RulesEngine::new(EngineConfig::default()).unwrap();
/// let mut board = Board::new();
/// let ability = Ability::new(TriggerKind::Attacks, Effect::add_counters(PLUS_ONE_COUNTER))
///     .targeting(TargetSpec::This);
/// let knight = board.add(Permanent::creature("Knight", 2, 2).with_ability(ability));
///
/// let outcome = engine.process_action(&PlayerAction::declare_attackers(&[knight]), &board);
/// assert_eq!(outcome.new_effects.len(), 1);
///
/// let effect = outcome.new_effects.into_iter().next().unwrap();
/// let resolution = engine.execute(effect, &outcome.board);
/// assert_eq!(resolution.board.get(knight).unwrap().counter(PLUS_ONE_COUNTER), Quantity::one());
/// ```
#[derive(Clone, Debug)]
pub struct RulesEngine {
    config: EngineConfig,
    templates: TokenTemplates,
    next_effect_id: u64,
}

impl RulesEngine {
    /// Create an engine with the bundled token templates.
    ///
    /// Fails only if the bundled template data does not parse.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self::with_templates(config, TokenTemplates::bundled()?))
    }

    /// Create an engine with a caller-supplied template library.
    #[must_use]
    pub fn with_templates(config: EngineConfig, templates: TokenTemplates) -> Self {
        Self {
            config,
            templates,
            next_effect_id: 0,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the token template library.
    #[must_use]
    pub fn templates(&self) -> &TokenTemplates {
        &self.templates
    }

    /// Get the token template library for registering overrides.
    pub fn templates_mut(&mut self) -> &mut TokenTemplates {
        &mut self.templates
    }

    // === Discovery ===

    /// Phase triggers, token creators first.
    #[must_use]
    pub fn find_triggers_for_phase(&self, board: &Board, phase: Phase, is_controller_turn: bool) -> Vec<TriggeredAbility> {
        triggers::find_triggers_for_phase(board, phase, is_controller_turn)
    }

    #[must_use]
    pub fn find_attack_triggers(&self, board: &Board, attacker_ids: &[PermanentId]) -> Vec<TriggeredAbility> {
        triggers::find_attack_triggers(board, attacker_ids)
    }

    #[must_use]
    pub fn find_entry_triggers(&self, board: &Board, entered_ids: &[PermanentId]) -> Vec<TriggeredAbility> {
        triggers::find_entry_triggers(board, entered_ids)
    }

    #[must_use]
    pub fn process_enters_battlefield(&self, board: &Board, entered_id: PermanentId) -> Vec<TriggeredAbility> {
        triggers::process_enters_battlefield(board, entered_id)
    }

    // === Resolution ===

    /// Wrap a discovered ability as a deferred effect with a fresh id.
    pub fn resolve_effect(&mut self, board: &Board, triggered: TriggeredAbility) -> DeferredEffect {
        let id = EffectId::new(self.next_effect_id);
        self.next_effect_id += 1;
        effects::resolve_effect(id, board, triggered, &self.config)
    }

    /// Resolve a batch of discovered abilities, preserving order.
    pub fn resolve_all(
        &mut self,
        board: &Board,
        triggered: impl IntoIterator<Item = TriggeredAbility>,
    ) -> Vec<DeferredEffect> {
        triggered
            .into_iter()
            .map(|t| self.resolve_effect(board, t))
            .collect()
    }

    /// Execute a deferred effect with its own target selection.
    pub fn execute(&mut self, effect: DeferredEffect, board: &Board) -> Resolution {
        effect.execute(self, board, None)
    }

    // === Delayed triggers ===

    /// Register a delayed trigger on a copy of the board.
    #[must_use]
    pub fn register_delayed_trigger(&self, board: &Board, trigger: DelayedTrigger) -> Board {
        let mut next = board.clone();
        next.delayed.register(trigger);
        next
    }

    /// Take the delayed triggers for `phase` off a copy of the board.
    ///
    /// The returned abilities carry their recorded targets. Triggers for
    /// other phases stay registered.
    #[must_use]
    pub fn process_delayed_triggers(&self, board: &Board, phase: Phase) -> (Board, Vec<TriggeredAbility>) {
        let mut next = board.clone();
        let fired = next.delayed.process(phase);
        if !fired.is_empty() {
            tracing::debug!(phase = %phase, count = fired.len(), "delayed triggers fired");
        }
        (next, fired)
    }

    // === Player actions ===

    /// Apply a player action.
    ///
    /// Declaring attackers also resolves the resulting attack triggers into
    /// `new_effects`. Actions naming a missing permanent leave the board
    /// unchanged.
    pub fn process_action(&mut self, action: &PlayerAction, board: &Board) -> ActionOutcome {
        let (next, log) = match action.apply(board) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::debug!(error = %e, "player action ignored");
                return ActionOutcome::unchanged(board.clone());
            }
        };

        let attackers: Vec<PermanentId> = action
            .attackers()
            .iter()
            .copied()
            .filter(|id| next.get(*id).is_some_and(|p| p.attacking))
            .collect();
        let new_effects = if attackers.is_empty() {
            Vec::new()
        } else {
            let found = triggers::find_attack_triggers(&next, &attackers);
            self.resolve_all(&next, found)
        };

        ActionOutcome {
            board: next,
            new_effects,
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Ability, Permanent, TriggerKind, PLUS_ONE_COUNTER};
    use crate::core::Quantity;
    use crate::effects::{Effect, TargetSpec};

    fn engine() -> RulesEngine {
        RulesEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_bundled_templates_load() {
        let engine = engine();
        assert!(engine.templates().contains("Soldier"));
        assert!(engine.templates().contains("Monster Role"));
    }

    #[test]
    fn test_effect_ids_are_unique() {
        let mut engine = engine();
        let mut board = Board::new();
        let id = board.add(Permanent::creature("A", 1, 1));
        let ability = Ability::at(Phase::Upkeep, Effect::add_counters(PLUS_ONE_COUNTER));

        let effects = engine.resolve_all(
            &board,
            vec![TriggeredAbility::new(id, ability.clone()), TriggeredAbility::new(id, ability)],
        );
        assert_eq!(effects[0].id, EffectId(0));
        assert_eq!(effects[1].id, EffectId(1));
    }

    #[test]
    fn test_process_action_unknown_permanent() {
        let mut engine = engine();
        let board = Board::new();
        let outcome = engine.process_action(&PlayerAction::Tap(PermanentId(5)), &board);
        assert_eq!(outcome.board, board);
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn test_declare_attackers_resolves_triggers() {
        let mut engine = engine();
        let mut board = Board::new();
        let buff = Ability::new(TriggerKind::Attacks, Effect::add_counters(PLUS_ONE_COUNTER));
        let knight = board.add(Permanent::creature("Knight", 2, 2).with_ability(buff));
        let wall = board.add(Permanent::creature("Wall", 0, 4));

        let outcome = engine.process_action(&PlayerAction::declare_attackers(&[knight]), &board);
        assert!(outcome.board.get(knight).unwrap().attacking);
        assert!(!outcome.board.get(wall).unwrap().attacking);
        assert_eq!(outcome.new_effects.len(), 1);
        assert_eq!(outcome.new_effects[0].context.attacker, Some(knight));
    }

    #[test]
    fn test_delayed_triggers_fire_once() {
        let mut engine = engine();
        let mut board = Board::new();
        let source = board.add(Permanent::creature("Source", 1, 1));
        let target = board.add(Permanent::creature("Target", 1, 1));

        let trigger = DelayedTrigger::new(
            Phase::EndStep,
            Effect::add_counters(PLUS_ONE_COUNTER),
            vec![target],
            source,
            "Put a counter on Target",
        );
        let board = engine.register_delayed_trigger(&board, trigger);
        assert_eq!(board.delayed.len(), 1);

        let (unchanged, none) = engine.process_delayed_triggers(&board, Phase::Upkeep);
        assert!(none.is_empty());
        assert_eq!(unchanged.delayed.len(), 1);

        let (after, fired) = engine.process_delayed_triggers(&board, Phase::EndStep);
        assert_eq!(fired.len(), 1);
        assert!(after.delayed.is_empty());
        assert_eq!(board.delayed.len(), 1);

        let effect = engine.resolve_effect(&after, fired.into_iter().next().unwrap());
        let resolution = engine.execute(effect, &after);
        assert_eq!(resolution.board.get(target).unwrap().counter(PLUS_ONE_COUNTER), Quantity::one());
        assert!(resolution.board.get(source).unwrap().counters.is_empty());

        let (_, again) = engine.process_delayed_triggers(&resolution.board, Phase::EndStep);
        assert!(again.is_empty());
    }

    #[test]
    fn test_targets_use_spec() {
        let mut engine = engine();
        let mut board = Board::new();
        let a = board.add(Permanent::creature("A", 1, 1));
        let b = board.add(Permanent::creature("B", 1, 1));
        let ability = Ability::at(Phase::Upkeep, Effect::add_counters(PLUS_ONE_COUNTER))
            .targeting(TargetSpec::AllOtherCreaturesYouControl);

        let effect = engine.resolve_effect(&board, TriggeredAbility::new(a, ability));
        let resolution = engine.execute(effect, &board);
        assert!(resolution.board.get(a).unwrap().counters.is_empty());
        assert_eq!(resolution.board.get(b).unwrap().counter(PLUS_ONE_COUNTER), Quantity::one());
    }
}
