//! Delayed triggers: one-shot effects waiting for a future phase.
//!
//! "Sacrifice them at the beginning of the next end step" registers a
//! record here. [`DelayedTriggerQueue::process`] is called once per phase
//! transition; matching records are removed and returned, the rest wait.
//! A record fires at most once.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::discovery::{TriggerContext, TriggeredAbility};
use crate::cards::Ability;
use crate::core::{PermanentId, Phase};
use crate::effects::Effect;

/// A pending one-shot effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayedTrigger {
    pub phase: Phase,
    pub effect: Effect,
    /// Exactly the permanents the effect applies to.
    pub targets: Vec<PermanentId>,
    pub source: PermanentId,
    pub description: String,
}

impl DelayedTrigger {
    /// Create a delayed trigger.
    #[must_use]
    pub fn new(
        phase: Phase,
        effect: Effect,
        targets: Vec<PermanentId>,
        source: PermanentId,
        description: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            effect,
            targets,
            source,
            description: description.into(),
        }
    }

    /// Convert into a discoverable trigger carrying its explicit targets.
    #[must_use]
    pub fn into_triggered(self) -> TriggeredAbility {
        let ability = Ability::at(self.phase, self.effect).with_text(self.description);
        TriggeredAbility::new(self.source, ability)
            .with_context(TriggerContext::default().with_explicit_targets(self.targets))
    }
}

/// Pending delayed triggers, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DelayedTriggerQueue {
    pending: Vector<DelayedTrigger>,
}

impl DelayedTriggerQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record until its phase.
    pub fn register(&mut self, trigger: DelayedTrigger) {
        tracing::debug!(phase = %trigger.phase, source = %trigger.source, "registered delayed trigger");
        self.pending.push_back(trigger);
    }

    /// Remove and return every record for `phase`, in registration order.
    pub fn process(&mut self, phase: Phase) -> Vec<TriggeredAbility> {
        let (due, waiting): (Vector<_>, Vector<_>) =
            self.pending.iter().cloned().partition(|t| t.phase == phase);
        self.pending = waiting;
        due.into_iter().map(DelayedTrigger::into_triggered).collect()
    }

    /// Iterate pending records.
    pub fn iter(&self) -> impl Iterator<Item = &DelayedTrigger> {
        self.pending.iter()
    }

    /// Number of pending records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
