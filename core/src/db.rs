use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params};

use crate::models::{Category, Ingredient, Recipe, RecipeDetail};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category_id INTEGER REFERENCES categories(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quantity_ingredient TEXT NOT NULL,
    recipe_id INTEGER NOT NULL REFERENCES recipes(id)
);

CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category_id);
CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id);";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        // Rely on SQLite's standard default of foreign keys being disabled.
        // The bundled build flips this default on; restore it so the
        // intentionally non-cascading delete_recipe behaves as specified.
        self.conn
            .execute_batch("PRAGMA foreign_keys = OFF;")?;

        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(SCHEMA_SQL)?;
            self.conn.execute_batch("PRAGMA user_version = 1;")?;
        }

        Ok(())
    }

    /// Drop and recreate all three tables. Any existing data is lost.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS ingredients;
             DROP TABLE IF EXISTS recipes;
             DROP TABLE IF EXISTS categories;",
        )?;
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // --- Row mapping helpers ---

    fn category_from_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    // Expects columns:
    // 0: r.id, 1: r.name, 2: r.category_id, 3: r.created_at, 4: c.name
    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            category_id: row.get(2)?,
            created_at: row.get(3)?,
            category_name: row.get(4)?,
        })
    }

    fn ingredient_from_row(row: &rusqlite::Row) -> rusqlite::Result<Ingredient> {
        Ok(Ingredient {
            id: row.get(0)?,
            quantity_ingredient: row.get(1)?,
            recipe_id: row.get(2)?,
        })
    }

    // --- Categories ---

    pub fn create_category(&self, name: &str) -> Result<Category> {
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        let id = self.conn.last_insert_rowid();
        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Pure lookup; never creates.
    pub fn get_category_id(&self, name: &str) -> Result<Option<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM categories WHERE name = ?1")?;
        let mut rows = stmt.query(params![name])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], Self::category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    // --- Recipes ---

    pub fn insert_recipe(&self, name: &str, category_id: i64) -> Result<Recipe> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO recipes (name, category_id, created_at) VALUES (?1, ?2, ?3)",
            params![name, category_id, now],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_recipe(id)
    }

    /// Resolve the category by name first; `Ok(None)` when it does not
    /// exist. Unlike import, this never creates the category.
    pub fn add_recipe(&self, name: &str, category: &str) -> Result<Option<Recipe>> {
        let Some(category_id) = self.get_category_id(category)? else {
            return Ok(None);
        };
        Ok(Some(self.insert_recipe(name, category_id)?))
    }

    pub fn get_recipe(&self, id: i64) -> Result<Recipe> {
        self.conn
            .query_row(
                "SELECT r.id, r.name, r.category_id, r.created_at, c.name
                 FROM recipes r LEFT JOIN categories c ON r.category_id = c.id
                 WHERE r.id = ?1",
                params![id],
                Self::recipe_from_row,
            )
            .context("Recipe not found")
    }

    pub fn list_recipes(&self, category: Option<&str>) -> Result<Vec<Recipe>> {
        if let Some(name) = category {
            let mut stmt = self.conn.prepare(
                "SELECT r.id, r.name, r.category_id, r.created_at, c.name
                 FROM recipes r LEFT JOIN categories c ON r.category_id = c.id
                 WHERE c.name = ?1
                 ORDER BY r.id",
            )?;
            let recipes = stmt
                .query_map(params![name], Self::recipe_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(recipes);
        }
        let mut stmt = self.conn.prepare(
            "SELECT r.id, r.name, r.category_id, r.created_at, c.name
             FROM recipes r LEFT JOIN categories c ON r.category_id = c.id
             ORDER BY r.id",
        )?;
        let recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Delete by id; `false` when no row matched. Ingredient rows
    /// referencing the recipe are left in place.
    pub fn delete_recipe(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Update only the provided fields. With both `None` no statement runs
    /// and the row is untouched. A provided category name is resolved by
    /// lookup with no existence check: a miss writes NULL into
    /// `category_id`.
    pub fn update_recipe(
        &self,
        id: i64,
        new_name: Option<&str>,
        new_category: Option<&str>,
    ) -> Result<Recipe> {
        if let Some(name) = new_name {
            self.conn.execute(
                "UPDATE recipes SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
        }
        if let Some(category) = new_category {
            let category_id = self.get_category_id(category)?;
            self.conn.execute(
                "UPDATE recipes SET category_id = ?1 WHERE id = ?2",
                params![category_id, id],
            )?;
        }
        self.get_recipe(id)
    }

    // --- Ingredients ---

    pub fn insert_ingredient(&self, quantity_ingredient: &str, recipe_id: i64) -> Result<Ingredient> {
        self.conn.execute(
            "INSERT INTO ingredients (quantity_ingredient, recipe_id) VALUES (?1, ?2)",
            params![quantity_ingredient, recipe_id],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Ingredient {
            id,
            quantity_ingredient: quantity_ingredient.to_string(),
            recipe_id,
        })
    }

    pub fn get_recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<Ingredient>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quantity_ingredient, recipe_id FROM ingredients
             WHERE recipe_id = ?1
             ORDER BY id",
        )?;
        let ingredients = stmt
            .query_map(params![recipe_id], Self::ingredient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ingredients)
    }

    pub fn get_recipe_detail(&self, id: i64) -> Result<RecipeDetail> {
        let recipe = self.get_recipe(id)?;
        let ingredients = self.get_recipe_ingredients(id)?;
        Ok(RecipeDetail {
            id: recipe.id,
            name: recipe.name,
            category_id: recipe.category_id,
            category_name: recipe.category_name,
            created_at: recipe.created_at,
            ingredients,
        })
    }
}
