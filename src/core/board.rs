//! Board snapshots.
//!
//! A `Board` is an arena of permanents keyed by stable [`PermanentId`]s,
//! plus the delayed triggers waiting for a future phase.
//!
//! Uses `im` persistent data structures, so cloning a board is O(1). Every
//! executor takes `&Board` and returns a new `Board`; callers can keep old
//! snapshots as undo history without them being touched.
//!
//! Permanents that leave the battlefield stay in the arena with their new
//! zone. Iteration is always in ascending id order, which is also the
//! left-to-right battlefield order.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::entity::PermanentId;
use super::error::EngineError;
use super::quantity::Quantity;
use crate::cards::{Permanent, Stat, MINUS_ONE_COUNTER, PLUS_ONE_COUNTER};
use crate::triggers::DelayedTriggerQueue;

/// A snapshot of every permanent the simulator tracks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    permanents: OrdMap<PermanentId, Permanent>,

    /// Next permanent ID to allocate.
    next_id: u32,

    /// One-shot effects waiting for a future phase.
    pub delayed: DelayedTriggerQueue,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Entity Management ===

    /// Allocate a new permanent ID.
    pub fn alloc_id(&mut self) -> PermanentId {
        let id = PermanentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Add a permanent under a freshly allocated id. Returns that id.
    pub fn add(&mut self, mut permanent: Permanent) -> PermanentId {
        let id = self.alloc_id();
        permanent.id = id;
        self.permanents.insert(id, permanent);
        id
    }

    /// Insert a permanent keeping its id, replacing any permanent with the
    /// same id. Used for boards built by collaborators.
    pub fn insert(&mut self, permanent: Permanent) {
        let id = permanent.id;
        if id.0 >= self.next_id {
            self.next_id = id.0.saturating_add(1);
        }
        self.permanents.insert(id, permanent);
    }

    /// Get a permanent.
    #[must_use]
    pub fn get(&self, id: PermanentId) -> Option<&Permanent> {
        self.permanents.get(&id)
    }

    /// Get a mutable permanent.
    pub fn get_mut(&mut self, id: PermanentId) -> Option<&mut Permanent> {
        self.permanents.get_mut(&id)
    }

    /// Get a permanent or an `UnknownPermanent` error.
    pub fn require(&self, id: PermanentId) -> Result<&Permanent, EngineError> {
        self.get(id).ok_or(EngineError::UnknownPermanent(id))
    }

    /// Check if a permanent exists (in any zone).
    #[must_use]
    pub fn contains(&self, id: PermanentId) -> bool {
        self.permanents.contains_key(&id)
    }

    /// Check if a permanent is on the battlefield.
    #[must_use]
    pub fn is_on_battlefield(&self, id: PermanentId) -> bool {
        self.get(id).is_some_and(Permanent::on_battlefield)
    }

    /// Iterate every permanent in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Permanent> {
        self.permanents.values()
    }

    /// Iterate battlefield permanents in ascending id order.
    pub fn battlefield(&self) -> impl Iterator<Item = &Permanent> {
        self.permanents.values().filter(|p| p.on_battlefield())
    }

    /// Iterate battlefield permanents attached to a host.
    pub fn attachments_of(&self, host: PermanentId) -> impl Iterator<Item = &Permanent> {
        self.battlefield()
            .filter(move |p| p.attached_to == Some(host))
    }

    /// Number of permanents in the arena (any zone).
    #[must_use]
    pub fn len(&self) -> usize {
        self.permanents.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permanents.is_empty()
    }

    /// The id the next added permanent will receive.
    #[must_use]
    pub fn next_id(&self) -> PermanentId {
        PermanentId(self.next_id)
    }

    // === Stats ===

    /// Current value of a stat, floored at zero.
    ///
    /// Power and toughness include base value, temporary and permanent
    /// bonuses, bonuses granted by attached permanents, and +1/+1 and -1/-1
    /// counters. Counter stats read the counter count.
    pub fn stat(&self, id: PermanentId, stat: &Stat) -> Result<Quantity, EngineError> {
        let permanent = self.require(id)?;
        let signed = match stat {
            Stat::Counters(kind) => return Ok(permanent.counter(kind)),
            Stat::Power => {
                let base = permanent
                    .power
                    .ok_or(EngineError::MissingStat { id, stat: "power" })?;
                self.attachment_bonuses(id)
                    .fold(base, |acc, b| acc.saturating_add(b.power))
                    .saturating_add(permanent.temp_bonus.power)
                    .saturating_add(permanent.perm_bonus.power)
            }
            Stat::Toughness => {
                let base = permanent
                    .toughness
                    .ok_or(EngineError::MissingStat { id, stat: "toughness" })?;
                self.attachment_bonuses(id)
                    .fold(base, |acc, b| acc.saturating_add(b.toughness))
                    .saturating_add(permanent.temp_bonus.toughness)
                    .saturating_add(permanent.perm_bonus.toughness)
            }
        };

        let gained = permanent
            .counter(PLUS_ONE_COUNTER)
            .add(&Quantity::from_i64_floor(signed));
        let lost = permanent
            .counter(MINUS_ONE_COUNTER)
            .add(&Quantity::from_i64_floor(signed.saturating_neg()));
        Ok(gained.saturating_sub(&lost))
    }

    /// Current power, floored at zero.
    pub fn power(&self, id: PermanentId) -> Result<Quantity, EngineError> {
        self.stat(id, &Stat::Power)
    }

    /// Current toughness, floored at zero.
    pub fn toughness(&self, id: PermanentId) -> Result<Quantity, EngineError> {
        self.stat(id, &Stat::Toughness)
    }

    /// Power of everything this entity stands for: a virtual stack's power
    /// times its exact token count.
    pub fn total_power(&self, id: PermanentId) -> Result<Quantity, EngineError> {
        let each = self.power(id)?;
        Ok(each.mul(&self.require(id)?.represented_count()))
    }

    fn attachment_bonuses(&self, host: PermanentId) -> impl Iterator<Item = crate::cards::StatBonus> + '_ {
        self.attachments_of(host).map(|p| p.static_bonus)
    }

    // === Turn Structure ===

    /// Clear "until end of turn" state on every battlefield permanent.
    pub fn clear_end_of_turn(&mut self) {
        let ids: Vec<PermanentId> = self.battlefield().map(|p| p.id).collect();
        for id in ids {
            if let Some(permanent) = self.permanents.get_mut(&id) {
                permanent.clear_end_of_turn();
            }
        }
    }
}
