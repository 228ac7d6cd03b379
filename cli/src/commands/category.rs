use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use larder_core::db::Database;
use larder_core::models::validate_category_name;

use super::helpers::{json_error, truncate};

pub(crate) fn cmd_category_add(db: &Database, name: &str, json: bool) -> Result<()> {
    validate_category_name(name)?;
    if db.get_category_id(name)?.is_some() {
        if json {
            println!("{}", json_error(&format!("Category '{name}' already exists")));
        } else {
            eprintln!("Category '{name}' already exists");
        }
        process::exit(2);
    }

    let category = db.create_category(name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&category)?);
    } else {
        let id = category.id;
        println!("Added category: {name} (id: {id})");
    }
    Ok(())
}

pub(crate) fn cmd_category_list(db: &Database, json: bool) -> Result<()> {
    let categories = db.list_categories()?;
    if categories.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No categories found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id,
            name: truncate(&c.name, 30),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}
