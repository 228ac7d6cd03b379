use std::collections::{HashMap, HashSet};
use std::io::Read;

use anyhow::{Context, Result};

use crate::db::Database;

/// A single recipe parsed from a catalog CSV, not yet persisted.
#[derive(Debug, Clone)]
pub struct StagedRecipe {
    pub name: String,
    pub category: String,
    /// Raw ingredient strings as they appeared in the file.
    pub ingredients: Vec<String>,
}

/// Everything one parse pass staged in memory.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub recipes: Vec<StagedRecipe>,
    /// Category names in first-reference order, deduplicated.
    pub categories: Vec<String>,
    pub rows_skipped: usize,
}

/// Summary of what an import would do / did.
#[derive(Debug, Clone)]
pub struct BookImportSummary {
    pub rows_parsed: usize,
    pub rows_skipped: usize,
    pub categories_created: usize,
    pub categories_reused: usize,
    pub recipes_imported: usize,
    pub ingredients_imported: usize,
}

/// Parse a recipe book CSV from any reader.
///
/// Expected layout: a header row (discarded without inspection), then one
/// row per recipe with at least three fields: recipe name, category name,
/// and the ingredient list as a single comma-joined field. Short or
/// unreadable rows are skipped and counted, never fatal. Fields past the
/// third are ignored.
pub fn parse_book_csv<R: Read>(reader: R) -> Result<ImportBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    rdr.headers().context("Failed to read CSV header row")?;

    let mut batch = ImportBatch::default();
    let mut seen: HashSet<String> = HashSet::new();

    for result in rdr.records() {
        let Ok(record) = result else {
            batch.rows_skipped += 1;
            continue;
        };
        if record.len() < 3 {
            batch.rows_skipped += 1;
            continue;
        }

        let name = record.get(0).unwrap_or("").to_string();
        let category = record.get(1).unwrap_or("").to_string();
        let ingredients: Vec<String> = record
            .get(2)
            .unwrap_or("")
            .split(',')
            .map(str::to_string)
            .collect();

        if seen.insert(category.clone()) {
            batch.categories.push(category.clone());
        }
        batch.recipes.push(StagedRecipe {
            name,
            category,
            ingredients,
        });
    }

    Ok(batch)
}

/// Split a raw ingredient string into quantity and name at the first
/// whitespace run, then re-join them with a single space.
///
/// `"2 cups flour"` → `"2 cups flour"` (quantity `2`, name `cups flour`).
/// A string with no whitespace has an empty quantity, so `"salt"` →
/// `" salt"`. The split is a heuristic: a multi-word quantity like
/// "1/2 cup" cannot be told apart from the name.
#[must_use]
pub fn parse_ingredient(raw: &str) -> String {
    match raw.find(char::is_whitespace) {
        Some(idx) => {
            let quantity = raw[..idx].trim();
            let name = raw[idx..].trim();
            format!("{quantity} {name}")
        }
        None => format!(" {raw}"),
    }
}

/// Persist a staged batch.
///
/// Categories are resolved by name and created only when missing, so
/// re-importing never trips the UNIQUE constraint. Each staged recipe is
/// inserted with its resolved category id, followed by one ingredient row
/// per raw string. When `dry_run` is true nothing is written and the
/// summary reports what a real run would do.
pub fn import_recipes(
    db: &Database,
    batch: &ImportBatch,
    dry_run: bool,
) -> Result<BookImportSummary> {
    let mut categories_created: usize = 0;
    let mut categories_reused: usize = 0;
    let mut recipes_imported: usize = 0;
    let mut ingredients_imported: usize = 0;

    // Category name → id, filled in as categories are resolved or created.
    let mut category_ids: HashMap<String, i64> = HashMap::new();

    for name in &batch.categories {
        if let Some(id) = db.get_category_id(name)? {
            category_ids.insert(name.clone(), id);
            categories_reused += 1;
        } else if dry_run {
            categories_created += 1;
        } else {
            let category = db.create_category(name)?;
            category_ids.insert(name.clone(), category.id);
            categories_created += 1;
        }
    }

    for staged in &batch.recipes {
        if !dry_run {
            let category_id = category_ids
                .get(&staged.category)
                .copied()
                .context("Category missing from staged batch")?;
            let recipe = db.insert_recipe(&staged.name, category_id)?;
            for raw in &staged.ingredients {
                db.insert_ingredient(&parse_ingredient(raw), recipe.id)?;
            }
        }
        recipes_imported += 1;
        ingredients_imported += staged.ingredients.len();
    }

    Ok(BookImportSummary {
        rows_parsed: batch.recipes.len(),
        rows_skipped: batch.rows_skipped,
        categories_created,
        categories_reused,
        recipes_imported,
        ingredients_imported,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
name,category,ingredients
Pancakes,Breakfast,\"2 cups flour,2 eggs,1 cup milk\"
Tomato Soup,Dinner,\"4 tomatoes,salt\"
Omelette,Breakfast,\"3 eggs,butter\"
";

    #[test]
    fn test_parse_book_csv_basic() {
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(batch.recipes.len(), 3);
        assert_eq!(batch.rows_skipped, 0);

        assert_eq!(batch.recipes[0].name, "Pancakes");
        assert_eq!(batch.recipes[0].category, "Breakfast");
        assert_eq!(
            batch.recipes[0].ingredients,
            vec!["2 cups flour", "2 eggs", "1 cup milk"]
        );

        assert_eq!(batch.recipes[1].ingredients, vec!["4 tomatoes", "salt"]);
        // First-reference order, deduplicated
        assert_eq!(batch.categories, vec!["Breakfast", "Dinner"]);
    }

    #[test]
    fn test_parse_book_csv_skips_short_rows() {
        let csv = "\
name,category,ingredients
Pancakes,Breakfast,\"2 cups flour,2 eggs\"
OnlyNameAndCategory,Dinner
Omelette,Breakfast,\"3 eggs\"
";
        let batch = parse_book_csv(csv.as_bytes()).unwrap();
        assert_eq!(batch.recipes.len(), 2);
        assert_eq!(batch.rows_skipped, 1);
    }

    #[test]
    fn test_parse_book_csv_ignores_extra_fields() {
        let csv = "\
name,category,ingredients,notes
Pancakes,Breakfast,\"2 cups flour\",family favourite
";
        let batch = parse_book_csv(csv.as_bytes()).unwrap();
        assert_eq!(batch.recipes.len(), 1);
        assert_eq!(batch.recipes[0].ingredients, vec!["2 cups flour"]);
    }

    #[test]
    fn test_parse_ingredient_quantity_and_name() {
        assert_eq!(parse_ingredient("2 cups flour"), "2 cups flour");
        assert_eq!(parse_ingredient("1 egg"), "1 egg");
    }

    #[test]
    fn test_parse_ingredient_splits_on_first_run_only() {
        // The name keeps every word after the first whitespace run
        assert_eq!(parse_ingredient("2   cups flour"), "2 cups flour");
        assert_eq!(
            parse_ingredient("1 can chopped tomatoes"),
            "1 can chopped tomatoes"
        );
    }

    #[test]
    fn test_parse_ingredient_no_whitespace() {
        // Empty quantity keeps the single leading space from the join
        assert_eq!(parse_ingredient("salt"), " salt");
        assert_eq!(parse_ingredient("pepper"), " pepper");
    }

    #[test]
    fn test_import_dry_run_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();

        let summary = import_recipes(&db, &batch, true).unwrap();
        assert_eq!(summary.rows_parsed, 3);
        assert_eq!(summary.categories_created, 2);
        assert_eq!(summary.categories_reused, 0);
        assert_eq!(summary.recipes_imported, 3);
        assert_eq!(summary.ingredients_imported, 7);

        assert!(db.list_recipes(None).unwrap().is_empty());
        assert!(db.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_import_actual() {
        let db = Database::open_in_memory().unwrap();
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();

        let summary = import_recipes(&db, &batch, false).unwrap();
        assert_eq!(summary.categories_created, 2);
        assert_eq!(summary.recipes_imported, 3);
        assert_eq!(summary.ingredients_imported, 7);

        assert_eq!(db.list_recipes(None).unwrap().len(), 3);
        assert_eq!(db.list_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_import_reuses_existing_categories() {
        let db = Database::open_in_memory().unwrap();
        db.create_category("Breakfast").unwrap();
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();

        let summary = import_recipes(&db, &batch, false).unwrap();
        assert_eq!(summary.categories_created, 1);
        assert_eq!(summary.categories_reused, 1);
        assert_eq!(db.list_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_skipped_row_excluded_from_store() {
        let csv = "\
name,category,ingredients
Pancakes,Breakfast,\"2 cups flour,2 eggs\"
BrokenRow,Dinner
Omelette,Breakfast,\"3 eggs\"
";
        let db = Database::open_in_memory().unwrap();
        let batch = parse_book_csv(csv.as_bytes()).unwrap();
        import_recipes(&db, &batch, false).unwrap();

        // Two valid rows out of three end up as exactly two recipes
        assert_eq!(db.list_recipes(None).unwrap().len(), 2);
    }

    #[test]
    fn test_round_trip_preserves_parsed_ingredients() {
        let db = Database::open_in_memory().unwrap();
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();
        import_recipes(&db, &batch, false).unwrap();

        let recipes = db.list_recipes(None).unwrap();
        let pairs: Vec<(String, String)> = recipes
            .iter()
            .map(|r| (r.name.clone(), r.category_name.clone().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Pancakes".to_string(), "Breakfast".to_string()),
                ("Tomato Soup".to_string(), "Dinner".to_string()),
                ("Omelette".to_string(), "Breakfast".to_string()),
            ]
        );

        let soup = &recipes[1];
        let stored: Vec<String> = db
            .get_recipe_ingredients(soup.id)
            .unwrap()
            .into_iter()
            .map(|i| i.quantity_ingredient)
            .collect();
        assert_eq!(stored, vec!["4 tomatoes".to_string(), " salt".to_string()]);
    }

    #[test]
    fn test_reimport_same_file_duplicates_recipes_not_categories() {
        let db = Database::open_in_memory().unwrap();
        let batch = parse_book_csv(SAMPLE_CSV.as_bytes()).unwrap();
        import_recipes(&db, &batch, false).unwrap();
        let summary = import_recipes(&db, &batch, false).unwrap();

        assert_eq!(summary.categories_created, 0);
        assert_eq!(summary.categories_reused, 2);
        assert_eq!(db.list_recipes(None).unwrap().len(), 6);
        assert_eq!(db.list_categories().unwrap().len(), 2);
    }
}
