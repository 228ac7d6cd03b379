mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_add, cmd_category_add, cmd_category_list, cmd_delete, cmd_import, cmd_init, cmd_list,
    cmd_show, cmd_update,
};
use crate::config::Config;
use larder_core::db::Database;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "A personal recipe catalog CLI",
    long_about = "\n\n  larder — a personal recipe catalog\n  keep your recipes on the shelf.\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the catalog database (drops all recipes, categories, ingredients)
    Init {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Import recipes from a catalog CSV file
    Import {
        /// Path to the CSV file
        file: std::path::PathBuf,
        /// Preview the import without making changes
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a recipe to an existing category
    Add {
        /// Recipe name
        name: String,
        /// Category name (must already exist, see `larder category add`)
        category: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe by ID
    Delete {
        /// Recipe ID to delete
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a recipe's name and/or category
    Update {
        /// Recipe ID to update
        recipe_id: i64,
        /// New recipe name (blank or omitted: keep unchanged)
        #[arg(long)]
        name: Option<String>,
        /// New category name (blank or omitted: keep unchanged)
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes
    List {
        /// Only show recipes in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients
    Show {
        /// Recipe ID
        recipe_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&config.db_path)?;

    match cli.command {
        Commands::Init { force } => cmd_init(&db, force),
        Commands::Import {
            file,
            dry_run,
            yes,
            json,
        } => cmd_import(&db, &file, dry_run, yes, json),
        Commands::Add {
            name,
            category,
            json,
        } => cmd_add(&db, &name, &category, json),
        Commands::Delete { recipe_id, json } => cmd_delete(&db, recipe_id, json),
        Commands::Update {
            recipe_id,
            name,
            category,
            json,
        } => cmd_update(&db, recipe_id, name.as_deref(), category.as_deref(), json),
        Commands::List { category, json } => cmd_list(&db, category.as_deref(), json),
        Commands::Show { recipe_id, json } => cmd_show(&db, recipe_id, json),
        Commands::Category { command } => match command {
            CategoryCommands::Add { name, json } => cmd_category_add(&db, &name, json),
            CategoryCommands::List { json } => cmd_category_list(&db, json),
        },
    }
}
