//! Effect amounts: literals and dynamic expressions.
//!
//! Abilities say how much they do either as a number ("put two +1/+1
//! counters") or by reference to a live property ("counters equal to this
//! creature's power", "equal to equipped creature's power"). `Amount` is that
//! small expression language and [`Amount::evaluate`] is its interpreter.
//!
//! Dynamic amounts are always read from the board passed in, never cached:
//! a deferred effect evaluated at resolution may see a different value than
//! its preview did.

use serde::{Deserialize, Serialize};

use crate::core::{Board, EngineError, PermanentId, Quantity};

/// A property an expression can read.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Power,
    Toughness,
    /// Number of counters of a kind.
    Counters(String),
}

impl Stat {
    fn describe(&self) -> String {
        match self {
            Stat::Power => "power".to_string(),
            Stat::Toughness => "toughness".to_string(),
            Stat::Counters(kind) => format!("number of {} counters", kind),
        }
    }
}

/// How much an effect does.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    /// A fixed number.
    Literal(i64),
    /// A property of the ability's source.
    This(Stat),
    /// A property of the creature the source is attached to (or, for attack
    /// triggers of attachments, the attacking creature).
    Equipped(Stat),
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Literal(1)
    }
}

impl Amount {
    /// Parse the ability library's textual form.
    ///
    /// Accepts integers, `this.power`, `this.toughness`,
    /// `this.counters.<kind>`, and the same with an `equipped.` prefix or the
    /// phrases "equipped creature's power"/"toughness".
    #[must_use]
    pub fn parse(text: &str) -> Option<Amount> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Amount::Literal(n));
        }

        let lower = text.to_ascii_lowercase();
        match lower.as_str() {
            "equipped creature's power" | "enchanted creature's power" => {
                return Some(Amount::Equipped(Stat::Power))
            }
            "equipped creature's toughness" | "enchanted creature's toughness" => {
                return Some(Amount::Equipped(Stat::Toughness))
            }
            _ => {}
        }

        let (subject, property) = lower.split_once('.')?;
        let stat = match property {
            "power" => Stat::Power,
            "toughness" => Stat::Toughness,
            other => Stat::Counters(other.strip_prefix("counters.")?.to_string()),
        };
        match subject {
            "this" | "self" => Some(Amount::This(stat)),
            "equipped" | "enchanted" => Some(Amount::Equipped(stat)),
            _ => None,
        }
    }

    /// Check if the value depends on board state.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Amount::Literal(_))
    }

    /// Evaluate as a non-negative quantity. Negative results floor at zero.
    pub fn evaluate(
        &self,
        board: &Board,
        source: PermanentId,
        attacker: Option<PermanentId>,
    ) -> Result<Quantity, EngineError> {
        match self {
            Amount::Literal(n) => Ok(Quantity::from_i64_floor(*n)),
            Amount::This(stat) => board.stat(source, stat),
            Amount::Equipped(stat) => {
                let subject = Self::equipped_subject(board, source, attacker)?;
                board.stat(subject, stat)
            }
        }
    }

    /// Evaluate as a signed value, for stat buffs. Dynamic values saturate
    /// at `i64::MAX`.
    pub fn evaluate_signed(
        &self,
        board: &Board,
        source: PermanentId,
        attacker: Option<PermanentId>,
    ) -> Result<i64, EngineError> {
        match self {
            Amount::Literal(n) => Ok(*n),
            _ => self
                .evaluate(board, source, attacker)
                .map(|q| q.to_i64_saturating()),
        }
    }

    fn equipped_subject(
        board: &Board,
        source: PermanentId,
        attacker: Option<PermanentId>,
    ) -> Result<PermanentId, EngineError> {
        let permanent = board.get(source).ok_or(EngineError::UnknownPermanent(source))?;
        permanent
            .attached_to
            .or(attacker)
            .ok_or(EngineError::NotAttached(source))
    }

    /// Human-readable form, e.g. "2" or "this creature's power".
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Amount::Literal(n) => n.to_string(),
            Amount::This(stat) => format!("this permanent's {}", stat.describe()),
            Amount::Equipped(stat) => format!("equipped creature's {}", stat.describe()),
        }
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        Amount::Literal(n)
    }
}
