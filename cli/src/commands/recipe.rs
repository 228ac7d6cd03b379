use anyhow::{Result, bail};
use std::process;

use larder_core::db::Database;
use larder_core::models::validate_recipe_name;

use super::helpers::{date_prefix, json_error, non_blank, print_recipe_table};

pub(crate) fn cmd_add(db: &Database, name: &str, category: &str, json: bool) -> Result<()> {
    validate_recipe_name(name)?;
    match db.add_recipe(name, category)? {
        Some(recipe) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else {
                let id = recipe.id;
                println!("Added recipe: {name} (id: {id}, category: {category})");
            }
            Ok(())
        }
        None => {
            if json {
                println!(
                    "{}",
                    json_error(&format!("Category '{category}' does not exist"))
                );
            } else {
                eprintln!(
                    "Category '{category}' does not exist. Add it first with: larder category add \"{category}\""
                );
            }
            process::exit(2);
        }
    }
}

pub(crate) fn cmd_delete(db: &Database, recipe_id: i64, json: bool) -> Result<()> {
    if db.delete_recipe(recipe_id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": recipe_id }));
        } else {
            println!("Deleted recipe {recipe_id}");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("Recipe {recipe_id} not found")));
        } else {
            eprintln!("Recipe {recipe_id} not found");
        }
        process::exit(2);
    }
}

pub(crate) fn cmd_update(
    db: &Database,
    recipe_id: i64,
    name: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let name = non_blank(name);
    let category = non_blank(category);
    if name.is_none() && category.is_none() {
        bail!("Nothing to update. Provide at least one of --name or --category");
    }

    if let Ok(recipe) = db.update_recipe(recipe_id, name, category) {
        if json {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        } else {
            let rname = &recipe.name;
            let rcategory = recipe.category_name.as_deref().unwrap_or("(none)");
            println!("Updated recipe {recipe_id}: {rname} ({rcategory})");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("Recipe {recipe_id} not found")));
        } else {
            eprintln!("Recipe {recipe_id} not found");
        }
        process::exit(2);
    }
}

pub(crate) fn cmd_list(db: &Database, category: Option<&str>, json: bool) -> Result<()> {
    let recipes = db.list_recipes(category)?;
    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    print_recipe_table(&recipes);
    Ok(())
}

pub(crate) fn cmd_show(db: &Database, recipe_id: i64, json: bool) -> Result<()> {
    let detail = db.get_recipe_detail(recipe_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let name = &detail.name;
    let category = detail.category_name.as_deref().unwrap_or("(none)");
    let added = date_prefix(&detail.created_at);
    println!("=== {name} ===");
    println!("  Category: {category}  |  Added: {added}\n");

    println!("  INGREDIENTS:");
    if detail.ingredients.is_empty() {
        println!("    (none recorded)");
    } else {
        for ing in &detail.ingredients {
            let line = &ing.quantity_ingredient;
            println!("    {line}");
        }
    }

    Ok(())
}
