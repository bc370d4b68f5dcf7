//! FIFO effect queue.
//!
//! Effects run front to back. Effects produced by an execution go to the
//! back, so a token's entry triggers wait behind everything already
//! queued. Held effects keep their relative order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{DrainStatus, ResolutionPolicy};
use crate::core::{Board, EffectId};
use crate::effects::DeferredEffect;
use crate::rules::RulesEngine;

/// The result of draining a queue.
#[derive(Clone, Debug)]
pub struct Drain {
    pub board: Board,
    pub log: Vec<String>,
    /// Number of effects executed.
    pub executed: usize,
    pub status: DrainStatus,
}

/// A work list of deferred effects.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectQueue {
    pending: VecDeque<DeferredEffect>,
}

impl EffectQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect at the back.
    pub fn push(&mut self, effect: DeferredEffect) {
        self.pending.push_back(effect);
    }

    /// Add effects at the back, in order.
    pub fn extend(&mut self, effects: impl IntoIterator<Item = DeferredEffect>) {
        self.pending.extend(effects);
    }

    /// Take a specific effect out (e.g. once the player picked its target).
    pub fn take(&mut self, id: EffectId) -> Option<DeferredEffect> {
        let index = self.pending.iter().position(|e| e.id == id)?;
        self.pending.remove(index)
    }

    /// Take the front effect.
    pub fn pop_front(&mut self) -> Option<DeferredEffect> {
        self.pending.pop_front()
    }

    /// Iterate pending effects front to back.
    pub fn iter(&self) -> impl Iterator<Item = &DeferredEffect> {
        self.pending.iter()
    }

    /// Number of pending effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Execute effects the policy approves until only held effects remain
    /// or the engine's `max_auto_resolutions` is reached.
    pub fn drain(&mut self, engine: &mut RulesEngine, board: &Board, policy: &dyn ResolutionPolicy) -> Drain {
        let limit = engine.config().max_auto_resolutions;
        let mut board = board.clone();
        let mut log = Vec::new();
        let mut held = VecDeque::new();
        let mut executed = 0;
        let mut limit_reached = false;

        while let Some(effect) = self.pending.pop_front() {
            if !policy.should_auto_resolve(&effect) {
                held.push_back(effect);
                continue;
            }
            if executed >= limit {
                tracing::warn!(limit, "auto-resolution limit reached");
                self.pending.push_front(effect);
                limit_reached = true;
                break;
            }

            let resolution = effect.execute(engine, &board, None);
            board = resolution.board;
            log.extend(resolution.log);
            self.pending.extend(resolution.new_effects);
            executed += 1;
        }

        held.append(&mut self.pending);
        self.pending = held;

        let status = if limit_reached {
            DrainStatus::LimitReached
        } else if self.pending.is_empty() {
            DrainStatus::Complete
        } else {
            DrainStatus::WaitingForChoice(self.pending.len())
        };

        Drain {
            board,
            log,
            executed,
            status,
        }
    }
}
