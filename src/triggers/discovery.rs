//! Trigger discovery.
//!
//! Scans a board for abilities that fire on a phase, an attack declaration
//! or a permanent entering, producing [`TriggeredAbility`] pairs for the
//! effect resolver.
//!
//! ## Ordering
//!
//! Phase triggers are sorted so token creation comes first, then by
//! ascending source id. Counter and buff triggers in the same batch must see
//! the tokens created alongside them. Within one source, abilities keep
//! their printed order.

use serde::{Deserialize, Serialize};

use crate::cards::{Ability, Permanent, TriggerKind};
use crate::core::{Board, PermanentId, Phase};

/// Facts about why a trigger fired.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    /// The attacking creature, for attack triggers (including those of its
    /// attachments).
    pub attacker: Option<PermanentId>,

    /// Every creature declared alongside the attacker.
    #[serde(default)]
    pub attackers: Vec<PermanentId>,

    /// The permanent whose entry caused the trigger.
    pub trigger_card: Option<PermanentId>,

    /// Targets fixed in advance (delayed triggers).
    pub explicit_targets: Option<Vec<PermanentId>>,
}

impl TriggerContext {
    /// Tag with the attacking creature (builder pattern).
    #[must_use]
    pub fn with_attacker(mut self, attacker: PermanentId) -> Self {
        self.attacker = Some(attacker);
        self
    }

    /// Record the full declared attacker list (builder pattern).
    #[must_use]
    pub fn with_attackers(mut self, attackers: &[PermanentId]) -> Self {
        self.attackers = attackers.to_vec();
        self
    }

    /// Tag with the entering permanent (builder pattern).
    #[must_use]
    pub fn with_trigger_card(mut self, card: PermanentId) -> Self {
        self.trigger_card = Some(card);
        self
    }

    /// Fix the targets (builder pattern).
    #[must_use]
    pub fn with_explicit_targets(mut self, targets: Vec<PermanentId>) -> Self {
        self.explicit_targets = Some(targets);
        self
    }
}

/// A discovered (source, ability) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub source: PermanentId,
    pub ability: Ability,
    #[serde(default)]
    pub context: TriggerContext,
}

impl TriggeredAbility {
    /// Create a pair with an empty context.
    #[must_use]
    pub fn new(source: PermanentId, ability: Ability) -> Self {
        Self {
            source,
            ability,
            context: TriggerContext::default(),
        }
    }

    /// Set the context (builder pattern).
    #[must_use]
    pub fn with_context(mut self, context: TriggerContext) -> Self {
        self.context = context;
        self
    }
}

/// Every battlefield ability that fires at the beginning of `phase`.
///
/// Token creation comes first, then ascending source id.
pub fn find_triggers_for_phase(board: &Board, phase: Phase, is_controller_turn: bool) -> Vec<TriggeredAbility> {
    let mut found: Vec<TriggeredAbility> = board
        .battlefield()
        .flat_map(|permanent| {
            permanent
                .abilities
                .iter()
                .filter(|a| a.trigger == TriggerKind::Phase(phase))
                .filter(|a| a.condition.as_ref().map_or(true, |c| c.is_met(is_controller_turn)))
                .map(|a| TriggeredAbility::new(permanent.id, a.clone()))
        })
        .collect();

    found.sort_by_key(|t| (!t.ability.effect.is_token_creation(), t.source));
    found
}

/// Attack triggers for declared attackers, in declaration order.
///
/// For each attacker: its own attack abilities, a synthesized battle cry
/// when its rules text has the keyword and no equivalent ability exists,
/// then attack abilities of permanents attached to it. All are tagged with
/// the attacker and with the whole declared attacker list.
pub fn find_attack_triggers(board: &Board, attacker_ids: &[PermanentId]) -> Vec<TriggeredAbility> {
    let mut found = Vec::new();

    for &attacker_id in attacker_ids {
        let Some(attacker) = board.get(attacker_id).filter(|p| p.on_battlefield()) else {
            tracing::debug!(attacker = %attacker_id, "attacker not on battlefield");
            continue;
        };
        let context = TriggerContext::default()
            .with_attacker(attacker_id)
            .with_attackers(attacker_ids);

        for ability in attack_abilities(attacker) {
            found.push(TriggeredAbility::new(attacker_id, ability.clone()).with_context(context.clone()));
        }

        let has_explicit_battle_cry = attacker.abilities.iter().any(Ability::is_battle_cry_equivalent);
        if attacker.has_keyword("battle cry") && !has_explicit_battle_cry {
            found.push(TriggeredAbility::new(attacker_id, Ability::battle_cry()).with_context(context.clone()));
        }

        for attachment in board.attachments_of(attacker_id) {
            for ability in attack_abilities(attachment) {
                found.push(TriggeredAbility::new(attachment.id, ability.clone()).with_context(context.clone()));
            }
        }
    }

    found
}

fn attack_abilities(permanent: &Permanent) -> impl Iterator<Item = &Ability> {
    permanent.abilities.iter().filter(|a| a.trigger == TriggerKind::Attacks)
}

/// "A token enters" and "a land enters" watchers for permanents that just
/// entered.
///
/// Each watcher fires once per matching entrant its controller controls.
/// Virtual stacks with suppressed entry never count as entrants.
pub fn find_entry_triggers(board: &Board, entered_ids: &[PermanentId]) -> Vec<TriggeredAbility> {
    let mut found = Vec::new();

    for &entered_id in entered_ids {
        let Some(entrant) = entering(board, entered_id) else {
            continue;
        };
        let context = TriggerContext::default().with_trigger_card(entered_id);

        for watcher in board.battlefield().filter(|w| w.controller == entrant.controller) {
            for ability in &watcher.abilities {
                let matches = match ability.trigger {
                    TriggerKind::TokenEnters => entrant.is_token,
                    TriggerKind::LandEnters => entrant.is_land(),
                    _ => false,
                };
                if matches {
                    found.push(TriggeredAbility::new(watcher.id, ability.clone()).with_context(context.clone()));
                }
            }
        }
    }

    found
}

/// Triggers caused by one permanent entering: its own enter-the-battlefield
/// abilities, then watchers from [`find_entry_triggers`].
pub fn process_enters_battlefield(board: &Board, entered_id: PermanentId) -> Vec<TriggeredAbility> {
    let Some(entrant) = entering(board, entered_id) else {
        return Vec::new();
    };
    let context = TriggerContext::default().with_trigger_card(entered_id);

    let mut found: Vec<TriggeredAbility> = entrant
        .abilities
        .iter()
        .filter(|a| a.trigger == TriggerKind::EntersBattlefield)
        .map(|a| TriggeredAbility::new(entered_id, a.clone()).with_context(context.clone()))
        .collect();
    found.extend(find_entry_triggers(board, &[entered_id]));
    found
}

fn entering(board: &Board, id: PermanentId) -> Option<&Permanent> {
    let permanent = board.get(id).filter(|p| p.on_battlefield())?;
    let suppressed = permanent
        .virtual_stack
        .as_ref()
        .is_some_and(|stack| stack.suppress_enter_triggers);
    if suppressed {
        tracing::debug!(permanent = %id, "entry discovery suppressed for virtual stack");
        return None;
    }
    Some(permanent)
}
