//! Permanents - runtime entities on the board.
//!
//! A `Permanent` is a creature, artifact, enchantment, land, or a token of
//! one of those. It tracks mutable state like counters, stat bonuses, tapped
//! status, and what it is attached to.
//!
//! ## Virtual Stacks
//!
//! Token creation above the physical cap materializes one extra permanent
//! standing in for the whole request. Its [`VirtualStack`] carries the exact
//! count; anything that needs "how many tokens" must read
//! [`Permanent::represented_count`] rather than counting entities.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::Ability;
use super::replacement::{ReplacementEffect, ReplacementKind};
use super::templates::TokenShape;
use crate::core::{PermanentId, PlayerId, Quantity};
use crate::zones::Zone;

/// The "+1/+1" counter kind.
pub const PLUS_ONE_COUNTER: &str = "+1/+1";

/// The "-1/-1" counter kind.
pub const MINUS_ONE_COUNTER: &str = "-1/-1";

/// Card types relevant to target filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Artifact,
    Battle,
    Creature,
    Enchantment,
    Land,
    Planeswalker,
}

/// A power/toughness adjustment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub power: i64,
    pub toughness: i64,
}

impl StatBonus {
    /// Create a bonus.
    #[must_use]
    pub const fn new(power: i64, toughness: i64) -> Self {
        Self { power, toughness }
    }

    /// Check if this bonus changes nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.power == 0 && self.toughness == 0
    }

    /// Add another bonus, saturating.
    pub fn add(&mut self, other: StatBonus) {
        self.power = self.power.saturating_add(other.power);
        self.toughness = self.toughness.saturating_add(other.toughness);
    }
}

/// Exact-count data of a virtual token stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualStack {
    /// Total tokens the creation requested. Always above the physical cap.
    pub token_count: Quantity,
    /// Tokens represented but never materialized (`token_count - cap`).
    pub hidden_remainder: Quantity,
    /// Enter-the-battlefield discovery never fires for the stack itself.
    pub suppress_enter_triggers: bool,
}

/// A permanent on (or formerly on) the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Permanent {
    /// Arena id. Assigned by [`Board::add`](crate::core::Board::add).
    pub id: PermanentId,

    pub name: String,

    pub controller: PlayerId,

    #[serde(default)]
    pub types: SmallVec<[CardType; 2]>,

    /// Subtypes such as "Equipment", "Aura", "Role", "Goblin".
    #[serde(default)]
    pub subtypes: SmallVec<[String; 2]>,

    /// Rules text, used only for keyword detection.
    #[serde(default)]
    pub oracle_text: String,

    /// Base power. `None` for non-creatures.
    #[serde(default)]
    pub power: Option<i64>,

    /// Base toughness. `None` for non-creatures.
    #[serde(default)]
    pub toughness: Option<i64>,

    /// Counter kind -> count. Never negative; absent means zero.
    #[serde(default)]
    pub counters: FxHashMap<String, Quantity>,

    /// Bonus until end of turn.
    #[serde(default)]
    pub temp_bonus: StatBonus,

    /// Bonus that lasts indefinitely.
    #[serde(default)]
    pub perm_bonus: StatBonus,

    /// Bonus this permanent grants to the permanent it is attached to.
    #[serde(default)]
    pub static_bonus: StatBonus,

    /// Host this permanent is attached to. A back-reference, not ownership.
    #[serde(default)]
    pub attached_to: Option<PermanentId>,

    #[serde(default)]
    pub zone: Zone,

    #[serde(default)]
    pub tapped: bool,

    #[serde(default)]
    pub attacking: bool,

    #[serde(default)]
    pub is_token: bool,

    #[serde(default)]
    pub virtual_stack: Option<VirtualStack>,

    #[serde(default)]
    pub abilities: Vec<Ability>,

    #[serde(default)]
    pub replacement_effects: Vec<ReplacementEffect>,

    /// Token shapes this card is known to create, precomputed by the card
    /// database. Consulted before template data.
    #[serde(default)]
    pub related_tokens: Vec<TokenShape>,
}

impl Permanent {
    /// Create a permanent with the given card types.
    #[must_use]
    pub fn new(name: impl Into<String>, types: impl IntoIterator<Item = CardType>) -> Self {
        Self {
            id: PermanentId(0),
            name: name.into(),
            controller: PlayerId::YOU,
            types: types.into_iter().collect(),
            subtypes: SmallVec::new(),
            oracle_text: String::new(),
            power: None,
            toughness: None,
            counters: FxHashMap::default(),
            temp_bonus: StatBonus::default(),
            perm_bonus: StatBonus::default(),
            static_bonus: StatBonus::default(),
            attached_to: None,
            zone: Zone::Battlefield,
            tapped: false,
            attacking: false,
            is_token: false,
            virtual_stack: None,
            abilities: Vec::new(),
            replacement_effects: Vec::new(),
            related_tokens: Vec::new(),
        }
    }

    /// Create a creature with base power and toughness.
    #[must_use]
    pub fn creature(name: impl Into<String>, power: i64, toughness: i64) -> Self {
        let mut permanent = Self::new(name, [CardType::Creature]);
        permanent.power = Some(power);
        permanent.toughness = Some(toughness);
        permanent
    }

    /// Create an Equipment artifact.
    #[must_use]
    pub fn equipment(name: impl Into<String>) -> Self {
        Self::new(name, [CardType::Artifact]).with_subtype("Equipment")
    }

    /// Create a land.
    #[must_use]
    pub fn land(name: impl Into<String>) -> Self {
        Self::new(name, [CardType::Land])
    }

    /// Create a token from a shape.
    #[must_use]
    pub fn from_shape(shape: &TokenShape, controller: PlayerId) -> Self {
        let mut token = Self::new(shape.name.clone(), shape.types.iter().copied());
        token.controller = controller;
        token.subtypes = shape.subtypes.clone();
        token.oracle_text = shape.oracle_text.clone();
        token.power = shape.power;
        token.toughness = shape.toughness;
        token.static_bonus = shape.static_bonus;
        token.abilities = shape.abilities.clone();
        token.replacement_effects = shape.replacement_effects.clone();
        token.is_token = true;
        token
    }

    /// The shape a token copy of this permanent would have.
    ///
    /// Copies copiable values only: counters, bonuses, attachment and
    /// tapped status are not copied.
    #[must_use]
    pub fn copiable_shape(&self) -> TokenShape {
        TokenShape {
            name: self.name.clone(),
            types: self.types.clone(),
            subtypes: self.subtypes.clone(),
            oracle_text: self.oracle_text.clone(),
            power: self.power,
            toughness: self.toughness,
            static_bonus: self.static_bonus,
            abilities: self.abilities.clone(),
            replacement_effects: self.replacement_effects.clone(),
        }
    }

    // === Builders ===

    /// Set the controller (builder pattern).
    #[must_use]
    pub fn with_controller(mut self, controller: PlayerId) -> Self {
        self.controller = controller;
        self
    }

    /// Add a subtype (builder pattern).
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    /// Set rules text (builder pattern).
    #[must_use]
    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = text.into();
        self
    }

    /// Add an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Add a replacement effect (builder pattern).
    #[must_use]
    pub fn with_replacement(mut self, kind: ReplacementKind) -> Self {
        self.replacement_effects.push(ReplacementEffect::new(kind));
        self
    }

    /// Set counters of a kind (builder pattern).
    #[must_use]
    pub fn with_counters(mut self, kind: impl Into<String>, count: u64) -> Self {
        self.set_counters(kind, Quantity::from(count));
        self
    }

    /// Attach to a host (builder pattern).
    #[must_use]
    pub fn attached_to(mut self, host: PermanentId) -> Self {
        self.attached_to = Some(host);
        self
    }

    /// Mark as a token (builder pattern).
    #[must_use]
    pub fn as_token(mut self) -> Self {
        self.is_token = true;
        self
    }

    /// Add a known token shape (builder pattern).
    #[must_use]
    pub fn with_related_token(mut self, shape: TokenShape) -> Self {
        self.related_tokens.push(shape);
        self
    }

    // === Type Queries ===

    /// Check for a card type.
    #[must_use]
    pub fn has_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    /// Check for a subtype, case-insensitively.
    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s.eq_ignore_ascii_case(subtype))
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.has_type(CardType::Creature)
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.has_type(CardType::Land)
    }

    #[must_use]
    pub fn is_equipment(&self) -> bool {
        self.has_subtype("Equipment")
    }

    #[must_use]
    pub fn is_aura(&self) -> bool {
        self.has_subtype("Aura")
    }

    #[must_use]
    pub fn is_role(&self) -> bool {
        self.has_subtype("Role")
    }

    /// Check if the rules text mentions a keyword, case-insensitively.
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.oracle_text
            .to_ascii_lowercase()
            .contains(&keyword.to_ascii_lowercase())
    }

    #[must_use]
    pub fn on_battlefield(&self) -> bool {
        self.zone.is_battlefield()
    }

    #[must_use]
    pub fn is_virtual_stack(&self) -> bool {
        self.virtual_stack.is_some()
    }

    /// How many permanents this entity stands for: the exact count for a
    /// virtual stack, one otherwise.
    #[must_use]
    pub fn represented_count(&self) -> Quantity {
        match &self.virtual_stack {
            Some(stack) => stack.token_count.clone(),
            None => Quantity::one(),
        }
    }

    // === Counters ===

    /// Get a counter count (zero if absent).
    #[must_use]
    pub fn counter(&self, kind: &str) -> Quantity {
        self.counters.get(kind).cloned().unwrap_or_default()
    }

    /// Set a counter count. Zero removes the entry.
    pub fn set_counters(&mut self, kind: impl Into<String>, count: Quantity) {
        let kind = kind.into();
        if count.is_zero() {
            self.counters.remove(&kind);
        } else {
            self.counters.insert(kind, count);
        }
    }

    /// Add counters of a kind.
    pub fn add_counters(&mut self, kind: &str, amount: &Quantity) {
        let next = self.counter(kind).add(amount);
        self.set_counters(kind, next);
    }

    /// Remove counters of a kind, floored at zero.
    pub fn remove_counters(&mut self, kind: &str, amount: &Quantity) {
        let next = self.counter(kind).saturating_sub(amount);
        self.set_counters(kind, next);
    }

    /// Total counters across kinds.
    #[must_use]
    pub fn total_counters(&self) -> Quantity {
        self.counters.values().sum()
    }

    /// Clear end-of-turn state.
    pub fn clear_end_of_turn(&mut self) {
        self.temp_bonus = StatBonus::default();
        self.attacking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_basics() {
        let bear = Permanent::creature("Grizzly Bears", 2, 2);
        assert!(bear.is_creature());
        assert!(!bear.is_land());
        assert_eq!(bear.power, Some(2));
        assert_eq!(bear.zone, Zone::Battlefield);
        assert_eq!(bear.represented_count(), Quantity::one());
    }

    #[test]
    fn test_counters_floor_at_zero() {
        let mut bear = Permanent::creature("Grizzly Bears", 2, 2).with_counters(PLUS_ONE_COUNTER, 2);
        bear.remove_counters(PLUS_ONE_COUNTER, &Quantity::from(5u64));
        assert_eq!(bear.counter(PLUS_ONE_COUNTER), Quantity::zero());
        assert!(bear.counters.is_empty());

        bear.add_counters("shield", &Quantity::from(1u64));
        assert_eq!(bear.total_counters(), Quantity::from(1u64));
    }

    #[test]
    fn test_subtypes_and_keywords() {
        let sword = Permanent::equipment("Sword of Fire and Ice");
        assert!(sword.is_equipment());
        assert!(!sword.is_aura());

        let legion = Permanent::creature("Goblin Legionnaire", 1, 1)
            .with_oracle_text("Battle cry (Whenever this creature attacks, ...)");
        assert!(legion.has_keyword("battle cry"));
    }

    #[test]
    fn test_copiable_shape_skips_state() {
        let mut original = Permanent::creature("Llanowar Elves", 1, 1)
            .with_counters(PLUS_ONE_COUNTER, 3)
            .attached_to(PermanentId(9));
        original.tapped = true;
        original.temp_bonus = StatBonus::new(2, 0);

        let copy = Permanent::from_shape(&original.copiable_shape(), PlayerId::YOU);
        assert!(copy.is_token);
        assert_eq!(copy.name, "Llanowar Elves");
        assert_eq!(copy.power, Some(1));
        assert!(copy.counters.is_empty());
        assert!(copy.attached_to.is_none());
        assert!(!copy.tapped);
        assert!(copy.temp_bonus.is_zero());
    }

    #[test]
    fn test_clear_end_of_turn() {
        let mut bear = Permanent::creature("Grizzly Bears", 2, 2);
        bear.temp_bonus = StatBonus::new(3, 3);
        bear.perm_bonus = StatBonus::new(1, 1);
        bear.attacking = true;

        bear.clear_end_of_turn();
        assert!(bear.temp_bonus.is_zero());
        assert_eq!(bear.perm_bonus, StatBonus::new(1, 1));
        assert!(!bear.attacking);
    }

    #[test]
    fn test_serialization() {
        let bear = Permanent::creature("Grizzly Bears", 2, 2).with_counters(PLUS_ONE_COUNTER, 1);
        let json = serde_json::to_string(&bear).unwrap();
        let back: Permanent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bear);
    }

    #[test]
    fn test_numeric_counters_load() {
        let bear = Permanent::creature("Grizzly Bears", 2, 2);
        let mut value = serde_json::to_value(&bear).unwrap();
        value["counters"] = serde_json::json!({ "+1/+1": 2, "shield": "1" });

        let loaded: Permanent = serde_json::from_value(value).unwrap();
        assert_eq!(loaded.counter(PLUS_ONE_COUNTER), Quantity::from(2u64));
        assert_eq!(loaded.counter("shield"), Quantity::one());

        let json = serde_json::to_string(&loaded).unwrap();
        assert!(json.contains(r#""+1/+1":"2""#));
    }
}
