//! Zones and zone movement.
//!
//! A permanent's zone is a field on the permanent itself; the board arena
//! keeps permanents that left the battlefield so callers can show a
//! graveyard or exile pile and so undo can restore them.
//!
//! ## Key Types
//!
//! - `Zone`: Where a permanent currently is
//! - `movement`: Leaving the battlefield with attachment cleanup

pub mod movement;

use serde::{Deserialize, Serialize};

pub use movement::{attach, leave_battlefield};

/// Location of a permanent.
///
/// `Attached` is a battlefield zone: auras and Roles live there while
/// enchanting a host. Equipment stays in `Battlefield` while attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    #[default]
    Battlefield,
    Attached,
    Graveyard,
    Exile,
    Hand,
    Library,
}

impl Zone {
    /// Check if a permanent in this zone is on the battlefield.
    #[must_use]
    pub const fn is_battlefield(self) -> bool {
        matches!(self, Zone::Battlefield | Zone::Attached)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Battlefield => "battlefield",
            Zone::Attached => "attached",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Hand => "hand",
            Zone::Library => "library",
        };
        f.write_str(name)
    }
}
