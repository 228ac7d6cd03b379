use std::path::Path;

use anyhow::{Context, Result};

use larder_core::book_import::{import_recipes, parse_book_csv};
use larder_core::db::Database;

use super::helpers::confirm;

pub(crate) fn cmd_init(db: &Database, force: bool) -> Result<()> {
    if !force
        && !confirm("Reset the catalog? All recipes, categories, and ingredients will be lost")?
    {
        eprintln!("Reset aborted");
        return Ok(());
    }
    db.reset()?;
    println!("Catalog reset. Tables recreated empty.");
    Ok(())
}

pub(crate) fn cmd_import(
    db: &Database,
    path: &Path,
    dry_run: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let batch = parse_book_csv(file)?;

    if batch.recipes.is_empty() {
        if json {
            println!(
                "{}",
                serde_json::json!({ "error": "No recipes found in CSV file" })
            );
        } else {
            eprintln!("No recipes found in CSV file.");
        }
        return Ok(());
    }

    if !dry_run && !yes {
        let count = batch.recipes.len();
        let categories = batch.categories.len();
        if !confirm(&format!(
            "Import {count} recipes across {categories} categories?"
        ))? {
            eprintln!("Import aborted, nothing written");
            return Ok(());
        }
    }

    let summary = import_recipes(db, &batch, dry_run)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "dry_run": dry_run,
                "rows_parsed": summary.rows_parsed,
                "rows_skipped": summary.rows_skipped,
                "categories_created": summary.categories_created,
                "categories_reused": summary.categories_reused,
                "recipes_imported": summary.recipes_imported,
                "ingredients_imported": summary.ingredients_imported,
            })
        );
    } else if dry_run {
        println!("Dry run — no changes made.\n");
        println!("  Rows parsed:           {}", summary.rows_parsed);
        println!("  Rows skipped:          {}", summary.rows_skipped);
        println!("  Categories to create:  {}", summary.categories_created);
        println!("  Categories reused:     {}", summary.categories_reused);
        println!("  Recipes to import:     {}", summary.recipes_imported);
        println!("  Ingredients to import: {}", summary.ingredients_imported);
    } else {
        println!("Import complete.\n");
        println!("  Rows parsed:          {}", summary.rows_parsed);
        println!("  Rows skipped:         {}", summary.rows_skipped);
        println!("  Categories created:   {}", summary.categories_created);
        println!("  Categories reused:    {}", summary.categories_reused);
        println!("  Recipes imported:     {}", summary.recipes_imported);
        println!("  Ingredients imported: {}", summary.ingredients_imported);
    }

    Ok(())
}
