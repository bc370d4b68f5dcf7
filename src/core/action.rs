//! Player actions: direct edits outside the triggered pipeline.
//!
//! The UI lets the player poke at the board directly: tap a land, nudge a
//! counter, fix a creature's base stats, declare attackers. These edits never
//! go through replacement effects. Declaring attackers is the one action with
//! follow-up work; the rules engine resolves the resulting attack triggers
//! and returns them in [`ActionOutcome::new_effects`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::Board;
use super::entity::PermanentId;
use super::error::EngineError;
use super::quantity::Quantity;
use crate::effects::DeferredEffect;

/// A direct edit requested by the player.
///
/// ## Example
///
/// ```
/// use battlefield_rules::cards::Permanent;
/// use battlefield_rules::core::{Board, PlayerAction};
///
/// let mut board = Board::new();
/// let bear = board.add(Permanent::creature("Bear", 2, 2));
///
/// let (next, _log) = PlayerAction::Tap(bear).apply(&board).unwrap();
/// assert!(next.get(bear).unwrap().tapped);
/// assert!(!board.get(bear).unwrap().tapped);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Tap(PermanentId),
    Untap(PermanentId),
    ToggleTap(PermanentId),

    /// Add (positive delta) or remove (negative delta) counters. Removal
    /// floors at zero.
    AdjustCounters {
        id: PermanentId,
        kind: String,
        delta: i64,
    },

    /// Adjust the permanent power/toughness bonus.
    AdjustStats {
        id: PermanentId,
        power: i64,
        toughness: i64,
    },

    /// Overwrite base power/toughness.
    SetBaseStats {
        id: PermanentId,
        power: i64,
        toughness: i64,
    },

    /// Tap and mark the given creatures as attacking.
    /// SmallVec optimizes for a handful of attackers without heap allocation.
    DeclareAttackers(SmallVec<[PermanentId; 4]>),

    /// End-of-turn cleanup: clear temporary bonuses and attacking flags.
    EndTurn,
}

impl PlayerAction {
    /// Shorthand for declaring attackers from a slice.
    #[must_use]
    pub fn declare_attackers(ids: &[PermanentId]) -> Self {
        PlayerAction::DeclareAttackers(SmallVec::from_slice(ids))
    }

    /// Apply the edit to a copy of the board.
    ///
    /// Returns the new board and a log of what changed. Fails only when a
    /// single-permanent action names a permanent that does not exist.
    /// Attackers that are missing or not creatures are skipped.
    pub fn apply(&self, board: &Board) -> Result<(Board, Vec<String>), EngineError> {
        let mut next = board.clone();
        let mut log = Vec::new();

        match self {
            PlayerAction::Tap(id) => {
                let p = require_mut(&mut next, *id)?;
                p.tapped = true;
                log.push(format!("{} taps", p.name));
            }
            PlayerAction::Untap(id) => {
                let p = require_mut(&mut next, *id)?;
                p.tapped = false;
                log.push(format!("{} untaps", p.name));
            }
            PlayerAction::ToggleTap(id) => {
                let p = require_mut(&mut next, *id)?;
                p.tapped = !p.tapped;
                let verb = if p.tapped { "taps" } else { "untaps" };
                log.push(format!("{} {}", p.name, verb));
            }
            PlayerAction::AdjustCounters { id, kind, delta } => {
                let p = require_mut(&mut next, *id)?;
                let magnitude = Quantity::from(delta.unsigned_abs());
                if *delta >= 0 {
                    p.add_counters(kind, &magnitude);
                } else {
                    p.remove_counters(kind, &magnitude);
                }
                log.push(format!("{} now has {} {} counters", p.name, p.counter(kind), kind));
            }
            PlayerAction::AdjustStats { id, power, toughness } => {
                let p = require_mut(&mut next, *id)?;
                p.perm_bonus.add(crate::cards::StatBonus::new(*power, *toughness));
                log.push(format!("{} gets {:+}/{:+}", p.name, power, toughness));
            }
            PlayerAction::SetBaseStats { id, power, toughness } => {
                let p = require_mut(&mut next, *id)?;
                p.power = Some(*power);
                p.toughness = Some(*toughness);
                log.push(format!("{} has base {}/{}", p.name, power, toughness));
            }
            PlayerAction::DeclareAttackers(ids) => {
                for id in ids {
                    match next.get_mut(*id) {
                        Some(p) if p.on_battlefield() && p.is_creature() => {
                            p.tapped = true;
                            p.attacking = true;
                            log.push(format!("{} attacks", p.name));
                        }
                        _ => tracing::debug!(attacker = %id, "skipping invalid attacker"),
                    }
                }
            }
            PlayerAction::EndTurn => {
                next.clear_end_of_turn();
                log.push("End of turn".to_string());
            }
        }

        Ok((next, log))
    }

    /// Attackers named by this action, if it declares attackers.
    #[must_use]
    pub fn attackers(&self) -> &[PermanentId] {
        match self {
            PlayerAction::DeclareAttackers(ids) => ids,
            _ => &[],
        }
    }
}

fn require_mut(board: &mut Board, id: PermanentId) -> Result<&mut crate::cards::Permanent, EngineError> {
    board.get_mut(id).ok_or(EngineError::UnknownPermanent(id))
}

/// Result of processing a player action.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    pub board: Board,

    /// Deferred effects the action caused (attack triggers).
    pub new_effects: Vec<DeferredEffect>,

    pub log: Vec<String>,
}

impl ActionOutcome {
    /// An outcome with no follow-up effects.
    #[must_use]
    pub fn unchanged(board: Board) -> Self {
        Self {
            board,
            new_effects: Vec::new(),
            log: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Permanent, StatBonus, PLUS_ONE_COUNTER};

    fn board_with_bear() -> (Board, PermanentId) {
        let mut board = Board::new();
        let bear = board.add(Permanent::creature("Bear", 2, 2));
        (board, bear)
    }

    #[test]
    fn test_toggle_tap() {
        let (board, bear) = board_with_bear();
        let (board, _) = PlayerAction::ToggleTap(bear).apply(&board).unwrap();
        assert!(board.get(bear).unwrap().tapped);
        let (board, log) = PlayerAction::ToggleTap(bear).apply(&board).unwrap();
        assert!(!board.get(bear).unwrap().tapped);
        assert_eq!(log, ["Bear untaps"]);
    }

    #[test]
    fn test_adjust_counters_floors() {
        let (board, bear) = board_with_bear();
        let add = PlayerAction::AdjustCounters { id: bear, kind: PLUS_ONE_COUNTER.into(), delta: 2 };
        let (board, _) = add.apply(&board).unwrap();
        assert_eq!(board.get(bear).unwrap().counter(PLUS_ONE_COUNTER), Quantity::from(2u64));

        let remove = PlayerAction::AdjustCounters { id: bear, kind: PLUS_ONE_COUNTER.into(), delta: -5 };
        let (board, _) = remove.apply(&board).unwrap();
        assert!(board.get(bear).unwrap().counters.is_empty());
    }

    #[test]
    fn test_stat_edits() {
        let (board, bear) = board_with_bear();
        let (board, log) = PlayerAction::AdjustStats { id: bear, power: 1, toughness: -1 }
            .apply(&board)
            .unwrap();
        assert_eq!(board.get(bear).unwrap().perm_bonus, StatBonus::new(1, -1));
        assert_eq!(log, ["Bear gets +1/-1"]);

        let (board, _) = PlayerAction::SetBaseStats { id: bear, power: 5, toughness: 6 }
            .apply(&board)
            .unwrap();
        assert_eq!(board.power(bear).unwrap(), Quantity::from(6u64));
    }

    #[test]
    fn test_declare_attackers_skips_noncreatures() {
        let (mut board, bear) = board_with_bear();
        let land = board.add(Permanent::land("Forest"));

        let action = PlayerAction::declare_attackers(&[bear, land, PermanentId(99)]);
        let (board, log) = action.apply(&board).unwrap();
        assert!(board.get(bear).unwrap().attacking);
        assert!(board.get(bear).unwrap().tapped);
        assert!(!board.get(land).unwrap().attacking);
        assert_eq!(log.len(), 1);
        assert_eq!(action.attackers().len(), 3);
    }

    #[test]
    fn test_unknown_permanent() {
        let board = Board::new();
        assert!(matches!(
            PlayerAction::Tap(PermanentId(3)).apply(&board),
            Err(EngineError::UnknownPermanent(PermanentId(3)))
        ));
    }

    #[test]
    fn test_serialization() {
        let action = PlayerAction::declare_attackers(&[PermanentId(1), PermanentId(2)]);
        let json = serde_json::to_string(&action).unwrap();
        let back: PlayerAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
