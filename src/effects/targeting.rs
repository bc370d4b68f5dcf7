//! Effect targeting.
//!
//! - `TargetSpec`: The closed vocabulary of target specifiers
//! - `find_targets`: Every permanent a specifier matches
//! - `select_targets`: The permanents an effect actually touches
//!
//! There is no interactive choice here. Singular specifiers ("another
//! creature you control") report [`TargetSpec::requires_choice`]; callers
//! that let the player pick pass explicit targets instead. Without explicit
//! targets the first candidate (lowest id) is used.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Permanent;
use crate::core::{Board, PermanentId, PlayerId};
use crate::triggers::TriggerContext;

/// A short list of targets.
/// SmallVec optimizes for the usual handful of targets without heap allocation.
pub type Targets = SmallVec<[PermanentId; 4]>;

/// What an effect applies to.
///
/// Serialized as the snake-case specifier string. Strings outside the
/// vocabulary deserialize to `Unknown` and match nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetSpec {
    /// The ability's source.
    #[default]
    This,
    /// The creature the source is attached to.
    EquippedCreature,
    /// One other creature with the source's controller.
    AnotherCreatureYouControl,
    AllCreaturesYouControl,
    AllOtherCreaturesYouControl,
    /// Every attacking creature except the source and the attacker the
    /// trigger is tagged with.
    AllOtherAttackingCreatures,
    /// One other nonland permanent with the source's controller.
    AnotherNonlandPermanentYouControl,
    /// Every creature on the battlefield.
    EachCreature,
    /// The permanent whose entry caused the trigger.
    TriggerCard,
    /// The attacker the trigger is tagged with.
    AttackingCreature,
    Unknown(String),
}

impl TargetSpec {
    /// Parse a specifier string. Never fails; unrecognized text becomes
    /// `Unknown`.
    #[must_use]
    pub fn parse(text: &str) -> TargetSpec {
        match text.trim().to_ascii_lowercase().as_str() {
            "self" | "this" => TargetSpec::This,
            "equipped_creature" | "enchanted_creature" => TargetSpec::EquippedCreature,
            "another_creature_you_control" => TargetSpec::AnotherCreatureYouControl,
            "all_creatures_you_control" => TargetSpec::AllCreaturesYouControl,
            "all_other_creatures_you_control" => TargetSpec::AllOtherCreaturesYouControl,
            "all_other_attacking_creatures" => TargetSpec::AllOtherAttackingCreatures,
            "another_nonland_permanent_you_control" => TargetSpec::AnotherNonlandPermanentYouControl,
            "each_creature" => TargetSpec::EachCreature,
            "trigger_card" => TargetSpec::TriggerCard,
            "attacking_creature" => TargetSpec::AttackingCreature,
            _ => TargetSpec::Unknown(text.to_string()),
        }
    }

    /// Specifier string.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TargetSpec::This => "self",
            TargetSpec::EquippedCreature => "equipped_creature",
            TargetSpec::AnotherCreatureYouControl => "another_creature_you_control",
            TargetSpec::AllCreaturesYouControl => "all_creatures_you_control",
            TargetSpec::AllOtherCreaturesYouControl => "all_other_creatures_you_control",
            TargetSpec::AllOtherAttackingCreatures => "all_other_attacking_creatures",
            TargetSpec::AnotherNonlandPermanentYouControl => "another_nonland_permanent_you_control",
            TargetSpec::EachCreature => "each_creature",
            TargetSpec::TriggerCard => "trigger_card",
            TargetSpec::AttackingCreature => "attacking_creature",
            TargetSpec::Unknown(text) => text,
        }
    }

    /// Check if the specifier names a single permanent the player picks.
    #[must_use]
    pub fn requires_choice(&self) -> bool {
        matches!(
            self,
            TargetSpec::AnotherCreatureYouControl | TargetSpec::AnotherNonlandPermanentYouControl
        )
    }

    /// English phrase for descriptions.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            TargetSpec::This => "this permanent".to_string(),
            TargetSpec::EquippedCreature => "equipped creature".to_string(),
            TargetSpec::AnotherCreatureYouControl => "another target creature you control".to_string(),
            TargetSpec::AllCreaturesYouControl => "each creature you control".to_string(),
            TargetSpec::AllOtherCreaturesYouControl => "each other creature you control".to_string(),
            TargetSpec::AllOtherAttackingCreatures => "each other attacking creature".to_string(),
            TargetSpec::AnotherNonlandPermanentYouControl => {
                "another target nonland permanent you control".to_string()
            }
            TargetSpec::EachCreature => "each creature".to_string(),
            TargetSpec::TriggerCard => "that permanent".to_string(),
            TargetSpec::AttackingCreature => "the attacking creature".to_string(),
            TargetSpec::Unknown(text) => text.replace('_', " "),
        }
    }
}

impl From<String> for TargetSpec {
    fn from(text: String) -> Self {
        TargetSpec::parse(&text)
    }
}

impl From<TargetSpec> for String {
    fn from(spec: TargetSpec) -> Self {
        spec.name().to_string()
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every battlefield permanent a specifier matches, in ascending id order.
pub fn find_targets(
    spec: &TargetSpec,
    board: &Board,
    source: PermanentId,
    context: &TriggerContext,
) -> Targets {
    let source_permanent = board.get(source);
    let controller = source_permanent.map_or(PlayerId::YOU, |p| p.controller);
    let yours = |p: &&Permanent| p.controller == controller;
    let other = |p: &&Permanent| p.id != source;

    match spec {
        TargetSpec::This => on_battlefield(board, Some(source)),
        TargetSpec::EquippedCreature => {
            let host = source_permanent.and_then(|p| p.attached_to).or(context.attacker);
            on_battlefield(board, host)
        }
        TargetSpec::AnotherCreatureYouControl | TargetSpec::AllOtherCreaturesYouControl => board
            .battlefield()
            .filter(|p| p.is_creature())
            .filter(yours)
            .filter(other)
            .map(|p| p.id)
            .collect(),
        TargetSpec::AllCreaturesYouControl => board
            .battlefield()
            .filter(|p| p.is_creature())
            .filter(yours)
            .map(|p| p.id)
            .collect(),
        TargetSpec::AllOtherAttackingCreatures => board
            .battlefield()
            .filter(|p| p.is_creature() && (p.attacking || context.attackers.contains(&p.id)))
            .filter(other)
            .filter(|p| Some(p.id) != context.attacker)
            .map(|p| p.id)
            .collect(),
        TargetSpec::AnotherNonlandPermanentYouControl => board
            .battlefield()
            .filter(|p| !p.is_land())
            .filter(yours)
            .filter(other)
            .map(|p| p.id)
            .collect(),
        TargetSpec::EachCreature => board
            .battlefield()
            .filter(|p| p.is_creature())
            .map(|p| p.id)
            .collect(),
        TargetSpec::TriggerCard => on_battlefield(board, context.trigger_card),
        TargetSpec::AttackingCreature => on_battlefield(board, context.attacker),
        TargetSpec::Unknown(text) => {
            tracing::debug!(specifier = %text, "unknown target specifier matches nothing");
            Targets::new()
        }
    }
}

/// The permanents an effect touches.
///
/// Explicit targets win; those no longer on the battlefield are dropped.
/// Otherwise singular specifiers take the first candidate and plural ones
/// take every candidate.
pub fn select_targets(
    spec: &TargetSpec,
    board: &Board,
    source: PermanentId,
    context: &TriggerContext,
    explicit: Option<&[PermanentId]>,
) -> Targets {
    if let Some(ids) = explicit {
        let mut chosen = Targets::new();
        for id in ids {
            if board.is_on_battlefield(*id) && !chosen.contains(id) {
                chosen.push(*id);
            }
        }
        return chosen;
    }

    let mut candidates = find_targets(spec, board, source, context);
    if spec.requires_choice() {
        candidates.truncate(1);
    }
    candidates
}

fn on_battlefield(board: &Board, id: Option<PermanentId>) -> Targets {
    id.filter(|id| board.is_on_battlefield(*id))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Zone;

    struct Fixture {
        board: Board,
        source: PermanentId,
        ally: PermanentId,
        enemy: PermanentId,
        land: PermanentId,
        sword: PermanentId,
    }

    fn fixture() -> Fixture {
        let mut board = Board::new();
        let source = board.add(Permanent::creature("Source", 1, 1));
        let ally = board.add(Permanent::creature("Ally", 2, 2));
        let enemy = board.add(Permanent::creature("Enemy", 3, 3).with_controller(PlayerId(1)));
        let land = board.add(Permanent::land("Forest"));
        let sword = board.add(Permanent::equipment("Sword").attached_to(ally));
        Fixture { board, source, ally, enemy, land, sword }
    }

    fn find(f: &Fixture, spec: TargetSpec, source: PermanentId, context: &TriggerContext) -> Vec<PermanentId> {
        find_targets(&spec, &f.board, source, context).into_vec()
    }

    #[test]
    fn test_you_control_filters() {
        let f = fixture();
        let ctx = TriggerContext::default();

        assert_eq!(find(&f, TargetSpec::AllCreaturesYouControl, f.source, &ctx), [f.source, f.ally]);
        assert_eq!(find(&f, TargetSpec::AllOtherCreaturesYouControl, f.source, &ctx), [f.ally]);
        assert_eq!(find(&f, TargetSpec::EachCreature, f.source, &ctx), [f.source, f.ally, f.enemy]);
        assert_eq!(
            find(&f, TargetSpec::AnotherNonlandPermanentYouControl, f.source, &ctx),
            [f.ally, f.sword]
        );
        assert!(!find(&f, TargetSpec::AnotherNonlandPermanentYouControl, f.source, &ctx).contains(&f.land));
    }

    #[test]
    fn test_equipped_and_context() {
        let f = fixture();
        let ctx = TriggerContext::default();
        assert_eq!(find(&f, TargetSpec::EquippedCreature, f.sword, &ctx), [f.ally]);
        assert!(find(&f, TargetSpec::EquippedCreature, f.source, &ctx).is_empty());

        let ctx = TriggerContext::default().with_trigger_card(f.enemy);
        assert_eq!(find(&f, TargetSpec::TriggerCard, f.source, &ctx), [f.enemy]);

        let ctx = TriggerContext::default().with_attacker(f.ally);
        assert_eq!(find(&f, TargetSpec::AttackingCreature, f.sword, &ctx), [f.ally]);
    }

    #[test]
    fn test_other_attackers_excludes_source_and_attacker() {
        let mut f = fixture();
        for id in [f.source, f.ally, f.enemy] {
            f.board.get_mut(id).unwrap().attacking = true;
        }
        let ctx = TriggerContext::default();
        assert_eq!(find(&f, TargetSpec::AllOtherAttackingCreatures, f.source, &ctx), [f.ally, f.enemy]);

        let ctx = TriggerContext::default().with_attacker(f.ally);
        assert_eq!(find(&f, TargetSpec::AllOtherAttackingCreatures, f.sword, &ctx), [f.source, f.enemy]);
    }

    #[test]
    fn test_other_attackers_from_declared_list() {
        let f = fixture();
        let ctx = TriggerContext::default()
            .with_attacker(f.source)
            .with_attackers(&[f.source, f.ally, f.land]);

        assert_eq!(find(&f, TargetSpec::AllOtherAttackingCreatures, f.source, &ctx), [f.ally]);
    }

    #[test]
    fn test_off_battlefield_excluded() {
        let mut f = fixture();
        f.board.get_mut(f.ally).unwrap().zone = Zone::Graveyard;
        let ctx = TriggerContext::default();
        assert_eq!(find(&f, TargetSpec::AllCreaturesYouControl, f.source, &ctx), [f.source]);
    }

    #[test]
    fn test_unknown_specifier_is_empty() {
        let f = fixture();
        let spec: TargetSpec = serde_json::from_str(r#""target_opponent""#).unwrap();
        assert_eq!(spec, TargetSpec::Unknown("target_opponent".into()));
        assert!(find(&f, spec, f.source, &TriggerContext::default()).is_empty());
    }

    #[test]
    fn test_select_singular_and_explicit() {
        let mut f = fixture();
        let third = f.board.add(Permanent::creature("Third", 1, 1));
        let ctx = TriggerContext::default();
        let spec = TargetSpec::AnotherCreatureYouControl;
        assert!(spec.requires_choice());

        let picked = select_targets(&spec, &f.board, f.source, &ctx, None);
        assert_eq!(picked.as_slice(), [f.ally]);

        let picked = select_targets(&spec, &f.board, f.source, &ctx, Some(&[third, third, PermanentId(77)]));
        assert_eq!(picked.as_slice(), [third]);
    }

    #[test]
    fn test_spec_strings() {
        assert_eq!(TargetSpec::parse("enchanted_creature"), TargetSpec::EquippedCreature);
        assert_eq!(TargetSpec::parse("self"), TargetSpec::This);
        assert_eq!(String::from(TargetSpec::AllCreaturesYouControl), "all_creatures_you_control");
        assert_eq!(TargetSpec::default(), TargetSpec::This);
    }
}
