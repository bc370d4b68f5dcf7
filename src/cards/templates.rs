//! Token shapes and template lookup.
//!
//! Named-token creation ("create a Treasure token") needs the token's shape.
//! Shapes come from three places, consulted in order:
//!
//! 1. The source permanent's `related_tokens` (precomputed by the card
//!    database for that exact card)
//! 2. Hand-authored overrides registered on the `TokenTemplates`
//! 3. Bundled template data shipped with the crate
//!
//! Names are matched case-insensitively.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::Ability;
use super::permanent::{CardType, Permanent, StatBonus};
use super::replacement::ReplacementEffect;
use crate::core::EngineError;

const BUNDLED_TEMPLATES: &str = include_str!("../../data/token_templates.json");

/// Copiable characteristics of a token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenShape {
    pub name: String,
    #[serde(default)]
    pub types: SmallVec<[CardType; 2]>,
    #[serde(default)]
    pub subtypes: SmallVec<[String; 2]>,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub power: Option<i64>,
    #[serde(default)]
    pub toughness: Option<i64>,
    #[serde(default)]
    pub static_bonus: StatBonus,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub replacement_effects: Vec<ReplacementEffect>,
}

impl TokenShape {
    /// A creature token shape.
    #[must_use]
    pub fn creature(name: impl Into<String>, power: i64, toughness: i64) -> Self {
        Self {
            name: name.into(),
            types: SmallVec::from_slice(&[CardType::Creature]),
            subtypes: SmallVec::new(),
            oracle_text: String::new(),
            power: Some(power),
            toughness: Some(toughness),
            static_bonus: StatBonus::default(),
            abilities: Vec::new(),
            replacement_effects: Vec::new(),
        }
    }

    /// A Role aura shape granting a stat bonus to its host.
    #[must_use]
    pub fn role(name: impl Into<String>, bonus: StatBonus) -> Self {
        Self {
            name: name.into(),
            types: SmallVec::from_slice(&[CardType::Enchantment]),
            subtypes: SmallVec::from_vec(vec!["Aura".to_string(), "Role".to_string()]),
            oracle_text: String::new(),
            power: None,
            toughness: None,
            static_bonus: bonus,
            abilities: Vec::new(),
            replacement_effects: Vec::new(),
        }
    }

    /// Add an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Check if this shape is a Role.
    #[must_use]
    pub fn is_role(&self) -> bool {
        self.subtypes.iter().any(|s| s.eq_ignore_ascii_case("Role"))
    }
}

/// Token template lookup.
///
/// ## Example
///
/// ```
/// use battlefield_rules::cards::{TokenShape, TokenTemplates};
///
/// let mut templates = TokenTemplates::bundled().unwrap();
/// assert!(templates.lookup("treasure", None).is_ok());
///
/// templates.register_override(TokenShape::creature("Treasure", 5, 5));
/// let shape = templates.lookup("Treasure", None).unwrap();
/// assert_eq!(shape.power, Some(5));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TokenTemplates {
    bundled: FxHashMap<String, TokenShape>,
    overrides: FxHashMap<String, TokenShape>,
}

impl TokenTemplates {
    /// Create an empty template set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the template data bundled with the crate.
    pub fn bundled() -> Result<Self, EngineError> {
        Self::from_json(BUNDLED_TEMPLATES)
    }

    /// Load templates from a JSON array of token shapes.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let shapes: Vec<TokenShape> = serde_json::from_str(json)?;
        let bundled = shapes
            .into_iter()
            .map(|shape| (shape.name.to_ascii_lowercase(), shape))
            .collect();
        Ok(Self {
            bundled,
            overrides: FxHashMap::default(),
        })
    }

    /// Register a hand-authored override. Replaces any earlier override
    /// with the same name.
    pub fn register_override(&mut self, shape: TokenShape) {
        self.overrides.insert(shape.name.to_ascii_lowercase(), shape);
    }

    /// Find a token shape by name.
    ///
    /// The source's related tokens win over overrides, which win over
    /// bundled data.
    pub fn lookup(&self, name: &str, source: Option<&Permanent>) -> Result<TokenShape, EngineError> {
        let related = source.and_then(|s| {
            s.related_tokens
                .iter()
                .find(|shape| shape.name.eq_ignore_ascii_case(name))
        });
        if let Some(shape) = related {
            return Ok(shape.clone());
        }

        let key = name.to_ascii_lowercase();
        self.overrides
            .get(&key)
            .or_else(|| self.bundled.get(&key))
            .cloned()
            .ok_or_else(|| EngineError::MissingTemplate(name.to_string()))
    }

    /// Check if a name resolves without a source.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_ascii_lowercase();
        self.overrides.contains_key(&key) || self.bundled.contains_key(&key)
    }

    /// Number of distinct names known.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundled.len()
            + self
                .overrides
                .keys()
                .filter(|k| !self.bundled.contains_key(*k))
                .count()
    }

    /// Check if no templates are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_data_loads() {
        let templates = TokenTemplates::bundled().unwrap();
        assert!(!templates.is_empty());

        let soldier = templates.lookup("Soldier", None).unwrap();
        assert_eq!(soldier.power, Some(1));
        assert!(soldier.types.contains(&CardType::Creature));

        let monster = templates.lookup("monster role", None).unwrap();
        assert!(monster.is_role());
        assert_eq!(monster.static_bonus, StatBonus::new(1, 1));
    }

    #[test]
    fn test_young_hero_role_has_attack_ability() {
        let templates = TokenTemplates::bundled().unwrap();
        let role = templates.lookup("Young Hero Role", None).unwrap();
        assert_eq!(role.abilities.len(), 1);
    }

    #[test]
    fn test_lookup_precedence() {
        let mut templates = TokenTemplates::bundled().unwrap();
        templates.register_override(TokenShape::creature("Goblin", 2, 1));

        assert_eq!(templates.lookup("Goblin", None).unwrap().power, Some(2));

        let source = Permanent::creature("Krenko", 3, 3)
            .with_related_token(TokenShape::creature("Goblin", 9, 9));
        assert_eq!(templates.lookup("goblin", Some(&source)).unwrap().power, Some(9));
    }

    #[test]
    fn test_missing_template() {
        let templates = TokenTemplates::new();
        let err = templates.lookup("Eldrazi Spawn", None).unwrap_err();
        assert!(matches!(err, EngineError::MissingTemplate(name) if name == "Eldrazi Spawn"));
        assert!(!templates.contains("Eldrazi Spawn"));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            TokenTemplates::from_json("{not json"),
            Err(EngineError::TemplateData(_))
        ));
    }

    #[test]
    fn test_len_counts_new_overrides_once() {
        let mut templates = TokenTemplates::from_json(r#"[{"name": "Soldier"}]"#).unwrap();
        assert_eq!(templates.len(), 1);
        templates.register_override(TokenShape::creature("Soldier", 2, 2));
        assert_eq!(templates.len(), 1);
        templates.register_override(TokenShape::creature("Knight", 2, 2));
        assert_eq!(templates.len(), 2);
    }
}
