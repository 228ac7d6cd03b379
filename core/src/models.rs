use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Nullable: an update with an unknown category name writes NULL.
    pub category_id: Option<i64>,
    pub created_at: String,
    // Joined field for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: i64,
    /// Stored as `"<quantity> <name>"`, see `book_import::parse_ingredient`.
    pub quantity_ingredient: String,
    pub recipe_id: i64,
}

/// A recipe together with its ingredient rows.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub created_at: String,
    pub ingredients: Vec<Ingredient>,
}

pub fn validate_recipe_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Recipe name must not be empty");
    }
    Ok(())
}

pub fn validate_category_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Category name must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_recipe_name() {
        assert!(validate_recipe_name("Pancakes").is_ok());
        assert!(validate_recipe_name("  Tomato Soup  ").is_ok());
    }

    #[test]
    fn test_validate_recipe_name_empty() {
        assert!(validate_recipe_name("").is_err());
        assert!(validate_recipe_name("   ").is_err());
    }

    #[test]
    fn test_validate_category_name_empty() {
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(" \t ").is_err());
    }
}
