//! Bunch management CLI commands.

use clap::Subcommand;
use souschef_core::{Bunch, Database};

use crate::common::{format_duration, load_bunch};

#[derive(Subcommand)]
pub enum BunchAction {
    /// Create an empty bunch
    Create {
        /// Bunch title
        title: String,
    },

    /// List all bunches
    List,

    /// Show a bunch and its recipes in cooking tie-break order
    Show {
        /// Bunch title
        title: String,
    },

    /// Append a stored recipe to a bunch
    AddRecipe {
        /// Bunch title
        bunch: String,
        /// Recipe title
        recipe: String,
    },

    /// Remove the recipe at a position (0-based) from a bunch
    RemoveRecipe {
        /// Bunch title
        bunch: String,
        /// Position in the bunch
        index: usize,
    },

    /// Rename a bunch
    Rename {
        /// Current title
        bunch: String,
        /// New title
        title: String,
    },

    /// Delete a bunch (stored recipes are kept)
    Delete {
        /// Bunch title
        title: String,
    },
}

pub fn run(action: BunchAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BunchAction::Create { title } => create_bunch(title),
        BunchAction::List => list_bunches(),
        BunchAction::Show { title } => show_bunch(title),
        BunchAction::AddRecipe { bunch, recipe } => add_recipe(bunch, recipe),
        BunchAction::RemoveRecipe { bunch, index } => remove_recipe(bunch, index),
        BunchAction::Rename { bunch, title } => rename_bunch(bunch, title),
        BunchAction::Delete { title } => delete_bunch(title),
    }
}

fn create_bunch(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    if db.load_bunch(&title)?.is_some() {
        return Err(format!("Bunch '{title}' already exists").into());
    }
    let bunch = Bunch::new(&title)?;
    db.save_bunch(&bunch)?;
    println!("Bunch '{title}' created.");
    Ok(())
}

fn list_bunches() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let titles = db.list_bunches()?;
    if titles.is_empty() {
        println!("No bunches found.");
        return Ok(());
    }
    println!("Bunches ({}):", titles.len());
    for title in titles {
        println!("  {title}");
    }
    Ok(())
}

fn show_bunch(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bunch = load_bunch(&db, &title)?;

    println!("{}", bunch.title());
    if bunch.is_empty() {
        println!("  (no recipes)");
        return Ok(());
    }
    for (i, recipe) in bunch.recipes().iter().enumerate() {
        let nominal: std::time::Duration =
            recipe.steps().iter().map(|s| s.nominal()).sum();
        println!(
            "  {i}. {} ({} steps, {})",
            recipe.title(),
            recipe.step_count(),
            format_duration(nominal),
        );
    }
    Ok(())
}

fn add_recipe(bunch_title: String, recipe_title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut bunch = load_bunch(&db, &bunch_title)?;
    let recipe = db
        .load_recipe(&recipe_title)?
        .ok_or_else(|| format!("Recipe '{recipe_title}' not found"))?;
    bunch.add_recipe(recipe);
    db.save_bunch(&bunch)?;
    println!("Added '{recipe_title}' to '{bunch_title}'.");
    Ok(())
}

fn remove_recipe(bunch_title: String, index: usize) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut bunch = load_bunch(&db, &bunch_title)?;
    let removed = bunch.remove_recipe(index)?;
    db.save_bunch(&bunch)?;
    println!("Removed '{}' from '{bunch_title}'.", removed.title());
    Ok(())
}

fn rename_bunch(bunch_title: String, new_title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut bunch = load_bunch(&db, &bunch_title)?;
    // save_bunch upserts by title, so a collision would overwrite the
    // other bunch's members.
    if new_title != bunch_title && db.load_bunch(&new_title)?.is_some() {
        return Err(format!("Bunch '{new_title}' already exists").into());
    }
    bunch.set_title(&new_title)?;
    db.delete_bunch(&bunch_title)?;
    db.save_bunch(&bunch)?;
    println!("Renamed '{bunch_title}' to '{new_title}'.");
    Ok(())
}

fn delete_bunch(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    if !db.delete_bunch(&title)? {
        return Err(format!("Bunch '{title}' not found").into());
    }
    println!("Bunch '{title}' deleted.");
    Ok(())
}
