//! Effect execution.
//!
//! The `Executor` is the dispatch table that mutates a board for one effect
//! kind. It works on a copy of the caller's board and returns the copy;
//! the input snapshot is never touched.
//!
//! Amounts arrive already evaluated (and already doubled) as an
//! [`EffectValue`]; targets arrive already selected. The executor only
//! applies them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::effect::{BuffDuration, Effect};
use super::tokens::{create_copies, create_role, create_tokens, TokenBatch};
use crate::cards::{StatBonus, TokenTemplates};
use crate::core::{Board, EngineConfig, EngineError, PermanentId, PlayerId, Quantity};
use crate::triggers::DelayedTrigger;
use crate::zones::{attach, leave_battlefield, Zone};

/// An evaluated effect magnitude.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectValue {
    /// Counters or tokens, after replacement effects.
    Count(Quantity),
    /// A power/toughness bonus.
    Bonus(StatBonus),
    /// The effect has no magnitude.
    None,
}

impl EffectValue {
    /// The count, or zero.
    #[must_use]
    pub fn count(&self) -> Quantity {
        match self {
            EffectValue::Count(n) => n.clone(),
            _ => Quantity::zero(),
        }
    }

    /// The bonus, or no bonus.
    #[must_use]
    pub fn bonus(&self) -> StatBonus {
        match self {
            EffectValue::Bonus(bonus) => *bonus,
            _ => StatBonus::default(),
        }
    }
}

impl fmt::Display for EffectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectValue::Count(n) => write!(f, "{}", n),
            EffectValue::Bonus(bonus) => write!(f, "{:+}/{:+}", bonus.power, bonus.toughness),
            EffectValue::None => Ok(()),
        }
    }
}

/// The outcome of applying one effect.
#[derive(Clone, Debug)]
pub struct Execution {
    pub board: Board,
    /// Concrete permanents that entered the battlefield, in order.
    pub entered: Vec<PermanentId>,
    pub log: Vec<String>,
}

/// Applies effects to board snapshots.
#[derive(Clone, Copy, Debug)]
pub struct Executor<'a> {
    config: &'a EngineConfig,
    templates: &'a TokenTemplates,
}

impl<'a> Executor<'a> {
    /// Create an executor over engine configuration and token data.
    #[must_use]
    pub fn new(config: &'a EngineConfig, templates: &'a TokenTemplates) -> Self {
        Self { config, templates }
    }

    /// Apply `effect` from `source` to `targets`.
    ///
    /// Fails when a template is missing or a target vanished mid-effect;
    /// callers degrade that to "apply nothing".
    pub fn apply(
        &self,
        board: &Board,
        source: PermanentId,
        effect: &Effect,
        value: &EffectValue,
        targets: &[PermanentId],
    ) -> Result<Execution, EngineError> {
        let mut next = board.clone();
        let mut entered = Vec::new();
        let mut log = Vec::new();

        let source_permanent = board.get(source);
        let controller = source_permanent.map_or(PlayerId::YOU, |p| p.controller);
        let count = value.count();

        match effect {
            Effect::AddCounters { counter } => {
                for &target in targets {
                    let permanent = require_mut(&mut next, target)?;
                    permanent.add_counters(counter, &count);
                    log.push(format!("{} gets {} {} counter(s)", permanent.name, count, counter));
                }
            }
            Effect::RemoveCounters { counter } => {
                for &target in targets {
                    let permanent = require_mut(&mut next, target)?;
                    permanent.remove_counters(counter, &count);
                    log.push(format!("{} loses up to {} {} counter(s)", permanent.name, count, counter));
                }
            }
            Effect::DoubleCounters { counter } => {
                for &target in targets {
                    let permanent = require_mut(&mut next, target)?;
                    let doubled = permanent.counter(counter).doubled();
                    permanent.set_counters(counter.clone(), doubled.clone());
                    log.push(format!("{} now has {} {} counter(s)", permanent.name, doubled, counter));
                }
            }
            Effect::Buff { duration, .. } => {
                let bonus = value.bonus();
                for &target in targets {
                    let permanent = require_mut(&mut next, target)?;
                    match duration {
                        BuffDuration::UntilEndOfTurn => permanent.temp_bonus.add(bonus),
                        BuffDuration::Permanent => permanent.perm_bonus.add(bonus),
                    }
                    log.push(format!("{} gets {}", permanent.name, value));
                }
            }
            Effect::CreateToken { token } => {
                let batch = create_tokens(&mut next, token, controller, &count, self.config.physical_token_cap);
                log_batch(&mut log, &token.name, &count, &batch);
                entered.extend(batch.concrete);
            }
            Effect::CreateNamedToken { name } => {
                let shape = self.templates.lookup(name, source_permanent)?;
                let batch = create_tokens(&mut next, &shape, controller, &count, self.config.physical_token_cap);
                log_batch(&mut log, &shape.name, &count, &batch);
                entered.extend(batch.concrete);
            }
            Effect::CreateTokenCopy => {
                let batch = create_copies(&mut next, targets, controller, &count, self.config.physical_token_cap)?;
                log_batch(&mut log, "copy", &count, &batch);
                entered.extend(batch.concrete);
            }
            Effect::CreateRole { role } => {
                let shape = self.templates.lookup(role, source_permanent)?;
                for &host in targets {
                    let (created, lines) = create_role(&mut next, &shape, controller, host, &count)?;
                    log.extend(lines);
                    entered.extend(created);
                }
            }
            Effect::CreateTokensWithSacrifice { name, phase } => {
                let shape = self.templates.lookup(name, source_permanent)?;
                let batch = create_tokens(&mut next, &shape, controller, &count, self.config.physical_token_cap);
                log_batch(&mut log, &shape.name, &count, &batch);
                if !batch.is_empty() {
                    next.delayed.register(DelayedTrigger::new(
                        *phase,
                        Effect::Sacrifice,
                        batch.all(),
                        source,
                        format!("Sacrifice {} {} token(s)", count, shape.name),
                    ));
                    log.push(format!("Sacrifice scheduled for {}", phase));
                }
                entered.extend(batch.concrete);
            }
            Effect::Destroy => {
                for &target in targets {
                    log.extend(leave_battlefield(&mut next, target, Zone::Graveyard)?);
                }
            }
            Effect::Exile => {
                for &target in targets {
                    log.extend(leave_battlefield(&mut next, target, Zone::Exile)?);
                }
            }
            Effect::Sacrifice => {
                for &target in targets {
                    log.extend(leave_battlefield(&mut next, target, Zone::Graveyard)?);
                }
            }
            Effect::Attach => {
                if let Some(&host) = targets.first() {
                    attach(&mut next, source, host)?;
                    log.push(format!("{} attaches to {}", next.require(source)?.name, next.require(host)?.name));
                }
            }
        }

        Ok(Execution {
            board: next,
            entered,
            log,
        })
    }
}

fn require_mut(board: &mut Board, id: PermanentId) -> Result<&mut crate::cards::Permanent, EngineError> {
    board.get_mut(id).ok_or(EngineError::UnknownPermanent(id))
}

fn log_batch(log: &mut Vec<String>, name: &str, count: &Quantity, batch: &TokenBatch) {
    if batch.stacks.is_empty() {
        log.push(format!("Created {} {} token(s)", batch.concrete.len(), name));
    } else {
        log.push(format!(
            "Created {} {} token(s) ({} concrete, {} virtual stack(s))",
            count,
            name,
            batch.concrete.len(),
            batch.stacks.len()
        ));
    }
}
