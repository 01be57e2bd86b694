//! CB-002: Entry payload parsing and cookbook file validation.
//!
//! Payloads arrive as untyped JSON objects. Checks:
//! - `type` must be exactly "recipe" or "ingredient"
//! - names must be non-empty (whitespace counts as a name)
//! - required item names are not checked until a summary reaches them
//! - cook times are non-negative integers, quantities positive integers
//!
//! Cookbook files (`cookbook.yaml`) seed a registry at startup.

use super::registry::{Registry, RegistryError};
use super::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Reject payloads whose `type` tag is missing or not a known variant.
pub fn check_type_tag(payload: &serde_json::Value) -> Result<(), RegistryError> {
    match payload.get("type").and_then(|t| t.as_str()) {
        Some("recipe") | Some("ingredient") => Ok(()),
        Some(other) => Err(RegistryError::InvalidEntry(format!(
            "type must be 'recipe' or 'ingredient', got '{}'",
            other
        ))),
        None => Err(RegistryError::InvalidEntry(
            "type must be 'recipe' or 'ingredient'".to_string(),
        )),
    }
}

/// Decode a payload into a typed entry.
pub fn parse_entry(payload: &serde_json::Value) -> Result<Entry, RegistryError> {
    check_type_tag(payload)?;
    Entry::deserialize(payload).map_err(|e| RegistryError::InvalidEntry(e.to_string()))
}

/// Check field constraints serde cannot express.
pub fn validate_entry(entry: &Entry) -> Result<(), RegistryError> {
    if entry.name().is_empty() {
        return Err(RegistryError::InvalidEntry(
            "name must not be empty".to_string(),
        ));
    }

    if let Entry::Recipe(recipe) = entry {
        for item in &recipe.required_items {
            if item.quantity == 0 {
                return Err(RegistryError::InvalidEntry(format!(
                    "recipe '{}' requires '{}' with quantity 0 (must be > 0)",
                    recipe.name, item.name
                )));
            }
        }
    }

    Ok(())
}

/// Parse a cookbook.yaml file from disk.
pub fn parse_cookbook_file(path: &Path) -> Result<CookbookFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_cookbook(&content)
}

/// Parse a cookbook.yaml from a string.
pub fn parse_cookbook(yaml: &str) -> Result<CookbookFile, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed cookbook. Returns a list of errors (empty = valid).
pub fn validate_cookbook(cookbook: &CookbookFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if cookbook.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", cookbook.version),
        });
    }

    if cookbook.name.is_empty() {
        errors.push(ValidationError {
            message: "name must not be empty".to_string(),
        });
    }

    if cookbook.settings.max_depth == 0 {
        errors.push(ValidationError {
            message: "settings.max_depth must be at least 1".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (i, entry) in cookbook.entries.iter().enumerate() {
        if let Err(e) = validate_entry(entry) {
            errors.push(ValidationError {
                message: format!("entry #{} ({}): {}", i + 1, entry.kind(), e),
            });
        }
        if !seen.insert(entry.name()) {
            errors.push(ValidationError {
                message: format!("entry #{}: duplicate name '{}'", i + 1, entry.name()),
            });
        }
    }

    errors
}

/// Build a registry from a cookbook file, registering entries in file order.
pub fn load_registry(cookbook: &CookbookFile) -> Result<Registry, String> {
    let registry = Registry::with_max_depth(cookbook.settings.max_depth);
    for entry in &cookbook.entries {
        registry
            .register(entry.clone())
            .map_err(|e| format!("cannot register '{}': {}", entry.name(), e))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COOKBOOK_YAML: &str = r#"
version: "1.0"
name: breakfast
settings:
  max_depth: 16
entries:
  - type: ingredient
    name: Egg
    cookTime: 5
  - type: ingredient
    name: Flour
    cookTime: 2
  - type: recipe
    name: Pancake
    requiredItems:
      - { name: Egg, quantity: 2 }
      - { name: Flour, quantity: 1 }
"#;

    #[test]
    fn test_cb002_parse_entry_ingredient() {
        let entry = parse_entry(&json!({"type": "ingredient", "name": "Egg", "cookTime": 0})).unwrap();
        assert_eq!(entry, Entry::from(Ingredient::new("Egg", 0)));
    }

    #[test]
    fn test_cb002_parse_entry_unknown_type() {
        let err = parse_entry(&json!({"type": "Recipe", "name": "Pie", "requiredItems": []})).unwrap_err();
        match err {
            RegistryError::InvalidEntry(msg) => assert!(msg.contains("'Recipe'")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cb002_parse_entry_missing_type() {
        let err = parse_entry(&json!({"name": "Pie"})).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidEntry(_)));
    }

    #[test]
    fn test_cb002_parse_entry_non_integer_quantity() {
        let payload = json!({
            "type": "recipe",
            "name": "Pie",
            "requiredItems": [{"name": "Apple", "quantity": 1.5}]
        });
        assert!(matches!(parse_entry(&payload), Err(RegistryError::InvalidEntry(_))));
    }

    #[test]
    fn test_cb002_parse_entry_missing_cook_time() {
        let payload = json!({"type": "ingredient", "name": "Egg"});
        let err = parse_entry(&payload).unwrap_err();
        assert!(err.to_string().contains("cookTime"));
    }

    #[test]
    fn test_cb002_validate_entry_rejects_zero_quantity() {
        let recipe = Recipe::new("Pie", vec![RequiredItem::new("Apple", 0)]);
        let err = validate_entry(&recipe.into()).unwrap_err();
        assert!(err.to_string().contains("quantity 0"));
    }

    #[test]
    fn test_cb002_validate_entry_name_only_rejects_empty() {
        assert!(validate_entry(&Ingredient::new("", 3).into()).is_err());
        assert!(validate_entry(&Ingredient::new("   ", 3).into()).is_ok());

        let soup = Recipe::new("Soup", vec![RequiredItem::new("", 1)]);
        assert!(validate_entry(&soup.into()).is_ok());
    }

    #[test]
    fn test_cb002_parse_cookbook_valid() {
        let cookbook = parse_cookbook(COOKBOOK_YAML).unwrap();
        assert_eq!(cookbook.name, "breakfast");
        assert_eq!(cookbook.entries.len(), 3);
        assert_eq!(cookbook.settings.max_depth, 16);
        let errors = validate_cookbook(&cookbook);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors.iter().map(|e| &e.message).collect::<Vec<_>>());
    }

    #[test]
    fn test_cb002_bad_version() {
        let cookbook = parse_cookbook("version: \"2.0\"\nname: x\n").unwrap();
        let errors = validate_cookbook(&cookbook);
        assert!(errors.iter().any(|e| e.message.contains("version")));
    }

    #[test]
    fn test_cb002_duplicate_in_file() {
        let yaml = r#"
version: "1.0"
name: dup
entries:
  - { type: ingredient, name: Egg, cookTime: 1 }
  - { type: recipe, name: Egg, requiredItems: [] }
"#;
        let cookbook = parse_cookbook(yaml).unwrap();
        let errors = validate_cookbook(&cookbook);
        assert!(errors.iter().any(|e| e.message.contains("duplicate name 'Egg'")));
        assert!(load_registry(&cookbook).is_err());
    }

    #[test]
    fn test_cb002_zero_quantity_in_file() {
        let yaml = r#"
version: "1.0"
name: zero
entries:
  - { type: recipe, name: Pie, requiredItems: [{ name: Apple, quantity: 0 }] }
"#;
        let cookbook = parse_cookbook(yaml).unwrap();
        let errors = validate_cookbook(&cookbook);
        assert!(errors.iter().any(|e| e.message.contains("entry #1 (recipe)")));
    }

    #[test]
    fn test_cb002_zero_max_depth() {
        let cookbook = parse_cookbook("version: \"1.0\"\nname: x\nsettings:\n  max_depth: 0\n").unwrap();
        let errors = validate_cookbook(&cookbook);
        assert!(errors.iter().any(|e| e.message.contains("max_depth")));
    }

    #[test]
    fn test_cb002_unknown_type_in_file() {
        let yaml = r#"
version: "1.0"
name: bad
entries:
  - { type: sauce, name: Gravy }
"#;
        assert!(parse_cookbook(yaml).is_err());
    }

    #[test]
    fn test_cb002_load_registry() {
        let cookbook = parse_cookbook(COOKBOOK_YAML).unwrap();
        let registry = load_registry(&cookbook).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.max_depth(), 16);
        assert_eq!(registry.summarize("Pancake").unwrap().total_cook_time, 12);
    }

    #[test]
    fn test_cb002_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookbook.yaml");
        std::fs::write(&path, COOKBOOK_YAML).unwrap();
        let cookbook = parse_cookbook_file(&path).unwrap();
        assert_eq!(cookbook.name, "breakfast");
    }

    #[test]
    fn test_cb002_parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_cookbook_file(&dir.path().join("nope.yaml"));
        assert!(result.unwrap_err().contains("failed to read"));
    }

    #[test]
    fn test_cb002_parse_invalid_yaml() {
        let result = parse_cookbook("not: [valid: yaml: {{");
        assert!(result.is_err());
    }
}
