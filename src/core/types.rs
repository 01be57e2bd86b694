//! CB-001: Cookbook data model.
//!
//! Entries are either base ingredients or composite recipes. The wire format
//! is internally tagged on `type` and uses camelCase field names, so a payload
//! such as `{"type": "ingredient", "name": "Egg", "cookTime": 5}` decodes
//! straight into [`Entry::Ingredient`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Entries
// ============================================================================

/// A named item in the cookbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    Recipe(Recipe),
    Ingredient(Ingredient),
}

impl Entry {
    /// The entry's unique name.
    pub fn name(&self) -> &str {
        match self {
            Self::Recipe(r) => &r.name,
            Self::Ingredient(i) => &i.name,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Recipe(_) => EntryKind::Recipe,
            Self::Ingredient(_) => EntryKind::Ingredient,
        }
    }
}

impl From<Recipe> for Entry {
    fn from(recipe: Recipe) -> Self {
        Self::Recipe(recipe)
    }
}

impl From<Ingredient> for Entry {
    fn from(ingredient: Ingredient) -> Self {
        Self::Ingredient(ingredient)
    }
}

/// A leaf entry with only a cook time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Minutes to prepare one unit
    #[serde(rename = "cookTime")]
    pub cook_time: u64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, cook_time: u64) -> Self {
        Self {
            name: name.into(),
            cook_time,
        }
    }
}

/// A composite entry that requires other entries in given quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    /// Ordered requirements; the same name may appear more than once
    #[serde(rename = "requiredItems")]
    pub required_items: Vec<RequiredItem>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, required_items: Vec<RequiredItem>) -> Self {
        Self {
            name: name.into(),
            required_items,
        }
    }
}

/// One `(name, quantity)` requirement of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredItem {
    pub name: String,
    pub quantity: u64,
}

impl RequiredItem {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Entry variant discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Recipe,
    Ingredient,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipe => write!(f, "recipe"),
            Self::Ingredient => write!(f, "ingredient"),
        }
    }
}

// ============================================================================
// Aggregation output
// ============================================================================

/// Total cook time and flattened base-ingredient quantities for one entry.
///
/// Produced fresh by every summary; ingredient totals keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    #[serde(rename = "totalCookTime")]
    pub total_cook_time: u64,

    #[serde(rename = "ingredientTotals")]
    pub ingredient_totals: IndexMap<String, u64>,
}

impl AggregationResult {
    /// Quantity of a base ingredient, zero when absent.
    pub fn quantity_of(&self, ingredient: &str) -> u64 {
        self.ingredient_totals.get(ingredient).copied().unwrap_or(0)
    }
}

/// Display form of a summary: `{"name", "cookTime", "ingredients": [{"name", "quantity"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub name: String,

    #[serde(rename = "cookTime")]
    pub cook_time: u64,

    pub ingredients: Vec<RequiredItem>,
}

impl SummaryReport {
    pub fn new(name: &str, result: &AggregationResult) -> Self {
        Self {
            name: name.to_string(),
            cook_time: result.total_cook_time,
            ingredients: result
                .ingredient_totals
                .iter()
                .map(|(ingredient, qty)| RequiredItem::new(ingredient.as_str(), *qty))
                .collect(),
        }
    }
}

// ============================================================================
// Cookbook file (cookbook.yaml)
// ============================================================================

/// Root of a cookbook file: seed entries plus runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookbookFile {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Human-readable cookbook name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub settings: Settings,

    /// Entries, registered in file order
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Deepest recipe nesting a summary will expand
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Listen address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            bind: default_bind(),
        }
    }
}

/// Default aggregation depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cb001_ingredient_wire_format() {
        let json = r#"{"type": "ingredient", "name": "Egg", "cookTime": 5}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry, Entry::Ingredient(Ingredient::new("Egg", 5)));
        assert_eq!(entry.name(), "Egg");
        assert_eq!(entry.kind(), EntryKind::Ingredient);
    }

    #[test]
    fn test_cb001_recipe_wire_format() {
        let json = r#"{
            "type": "recipe",
            "name": "Pancake",
            "requiredItems": [{"name": "Egg", "quantity": 2}, {"name": "Egg", "quantity": 1}]
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        match &entry {
            Entry::Recipe(r) => {
                // duplicates are kept verbatim
                assert_eq!(r.required_items.len(), 2);
                assert_eq!(r.required_items[1], RequiredItem::new("Egg", 1));
            }
            other => panic!("expected recipe, got {:?}", other),
        }
        assert_eq!(entry.kind().to_string(), "recipe");
    }

    #[test]
    fn test_cb001_negative_cook_time_rejected() {
        let json = r#"{"type": "ingredient", "name": "Egg", "cookTime": -1}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn test_cb001_serialize_roundtrip_keeps_tag() {
        let entry = Entry::from(Recipe::new("Toast", vec![RequiredItem::new("Bread", 1)]));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "recipe");
        assert_eq!(value["requiredItems"][0]["quantity"], 1);
    }

    #[test]
    fn test_cb001_settings_defaults() {
        let yaml = r#"
version: "1.0"
name: empty
"#;
        let file: CookbookFile = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(file.settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(file.settings.bind, "127.0.0.1:8080");
        assert!(file.entries.is_empty());
    }

    #[test]
    fn test_cb001_quantity_of_missing_is_zero() {
        let mut result = AggregationResult::default();
        result.ingredient_totals.insert("Egg".to_string(), 3);
        assert_eq!(result.quantity_of("Egg"), 3);
        assert_eq!(result.quantity_of("Flour"), 0);
    }

    #[test]
    fn test_cb001_summary_report_shape() {
        let mut result = AggregationResult {
            total_cook_time: 12,
            ..Default::default()
        };
        result.ingredient_totals.insert("Egg".to_string(), 2);
        result.ingredient_totals.insert("Flour".to_string(), 1);

        let report = SummaryReport::new("Pancake", &result);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["name"], "Pancake");
        assert_eq!(value["cookTime"], 12);
        assert_eq!(value["ingredients"][0]["name"], "Egg");
        assert_eq!(value["ingredients"][1]["quantity"], 1);
    }
}
