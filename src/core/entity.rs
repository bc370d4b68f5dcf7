//! Identifiers for board entities and deferred effects.
//!
//! Every permanent on a [`Board`](super::Board) has a `PermanentId`, an
//! arena key that never changes for the permanent's lifetime and is never
//! reused. Ids are allocated in ascending order, so sorting by id gives the
//! left-to-right battlefield order that trigger discovery relies on.
//!
//! ## Usage
//!
//! ```
//! use battlefield_rules::core::{Board, PermanentId};
//! use battlefield_rules::cards::Permanent;
//!
//! let mut board = Board::new();
//! let first = board.add(Permanent::creature("Grizzly Bears", 2, 2));
//! let second = board.add(Permanent::creature("Llanowar Elves", 1, 1));
//!
//! assert!(first < second);
//! assert_eq!(first, PermanentId(0));
//! ```

use serde::{Deserialize, Serialize};

/// Stable identifier of a permanent within a board arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermanentId(pub u32);

impl PermanentId {
    /// Create a permanent ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id that follows this one in allocation order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for PermanentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PermanentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Permanent({})", self.0)
    }
}

/// Identifier of a deferred effect (a "stack item").
///
/// Allocated by the [`RulesEngine`](crate::rules::RulesEngine) when an
/// ability is resolved into a deferred effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl EffectId {
    /// Create an effect ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}
