//! Engine configuration and turn structure.
//!
//! - `Phase`: The steps of a turn that phase triggers key on
//! - `EngineConfig`: Tuning knobs (token cap, arithmetic threshold, limits)
//!
//! None of the knobs change rules semantics except `physical_token_cap`,
//! which decides where virtualization starts.

use serde::{Deserialize, Serialize};

/// A step of the turn.
///
/// Phase triggers ("at the beginning of your upkeep") and delayed triggers
/// ("at the beginning of the next end step") are keyed by phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Untap,
    Upkeep,
    Draw,
    PrecombatMain,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,
    PostcombatMain,
    EndStep,
    Cleanup,
}

impl Phase {
    /// Every phase in turn order.
    pub const ALL: [Phase; 12] = [
        Phase::Untap,
        Phase::Upkeep,
        Phase::Draw,
        Phase::PrecombatMain,
        Phase::BeginCombat,
        Phase::DeclareAttackers,
        Phase::DeclareBlockers,
        Phase::CombatDamage,
        Phase::EndCombat,
        Phase::PostcombatMain,
        Phase::EndStep,
        Phase::Cleanup,
    ];

    /// Snake-case name, as used by the ability library.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Untap => "untap",
            Phase::Upkeep => "upkeep",
            Phase::Draw => "draw",
            Phase::PrecombatMain => "precombat_main",
            Phase::BeginCombat => "begin_combat",
            Phase::DeclareAttackers => "declare_attackers",
            Phase::DeclareBlockers => "declare_blockers",
            Phase::CombatDamage => "combat_damage",
            Phase::EndCombat => "end_combat",
            Phase::PostcombatMain => "postcombat_main",
            Phase::EndStep => "end_step",
            Phase::Cleanup => "cleanup",
        }
    }

    /// Look up a phase by name. Accepts the snake-case name and a few
    /// common spellings ("end", "main1", "combat").
    #[must_use]
    pub fn from_name(name: &str) -> Option<Phase> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "main1" | "main_1" | "main" => return Some(Phase::PrecombatMain),
            "main2" | "main_2" => return Some(Phase::PostcombatMain),
            "combat" | "beginning_of_combat" => return Some(Phase::BeginCombat),
            "end" | "end_of_turn" => return Some(Phase::EndStep),
            _ => {}
        }
        Phase::ALL.into_iter().find(|p| p.name() == normalized)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine tuning knobs.
///
/// ```
/// use battlefield_rules::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_token_cap(20)
///     .with_exact_threshold(8);
/// assert_eq!(config.physical_token_cap, 20);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most concrete tokens a single creation materializes. Requests above
    /// this create this many tokens plus one virtual stack.
    pub physical_token_cap: usize,

    /// Total token-doubler count above which token creation switches to
    /// big-integer arithmetic. A performance knob only; both paths agree.
    pub exact_arithmetic_threshold: u64,

    /// Largest doubling exponent honored. Larger exponents are clamped.
    pub max_doubling_exponent: u32,

    /// Upper bound on executions in one `EffectQueue::drain` call.
    pub max_auto_resolutions: usize,
}

impl EngineConfig {
    /// Set the physical token cap.
    #[must_use]
    pub fn with_token_cap(mut self, cap: usize) -> Self {
        self.physical_token_cap = cap;
        self
    }

    /// Set the exact-arithmetic threshold.
    #[must_use]
    pub fn with_exact_threshold(mut self, threshold: u64) -> Self {
        self.exact_arithmetic_threshold = threshold;
        self
    }

    /// Set the doubling exponent clamp.
    #[must_use]
    pub fn with_max_doubling_exponent(mut self, max: u32) -> Self {
        self.max_doubling_exponent = max;
        self
    }

    /// Set the auto-resolution limit for queue draining.
    #[must_use]
    pub fn with_max_auto_resolutions(mut self, max: usize) -> Self {
        self.max_auto_resolutions = max;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            physical_token_cap: 100,
            exact_arithmetic_threshold: 32,
            max_doubling_exponent: 1 << 20,
            max_auto_resolutions: 10_000,
        }
    }
}
