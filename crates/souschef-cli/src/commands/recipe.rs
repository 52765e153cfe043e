//! Recipe management CLI commands.

use std::io::Read;
use std::time::Duration;

use clap::Subcommand;
use serde::Deserialize;
use souschef_core::{Database, Recipe, Step};

use crate::common::format_duration;

#[derive(Subcommand)]
pub enum RecipeAction {
    /// List all recipes
    List,

    /// Show one recipe with its steps
    Show {
        /// Recipe title
        title: String,
    },

    /// Add a recipe from TOML (reads stdin)
    ///
    /// # TOML Format
    ///
    /// ```text
    /// title = "Tea"
    /// author = "mum"
    ///
    /// [[steps]]
    /// description = "Boil water"
    /// ingredients = ["water"]
    /// minutes = 5
    /// simultaneous = true
    ///
    /// [[steps]]
    /// description = "Steep"
    /// minutes = 3
    /// ```
    ///
    /// `simultaneous = true` marks a step that runs unattended (baking,
    /// boiling) and may be front-loaded by the planner.
    Add,

    /// Remove a recipe by title
    Remove {
        /// Recipe title to remove
        title: String,
    },
}

/// Stdin shape for `recipe add`; durations in whole minutes.
#[derive(Deserialize)]
struct RecipeInput {
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    steps: Vec<StepInput>,
}

#[derive(Deserialize)]
struct StepInput {
    description: String,
    #[serde(default)]
    ingredients: Vec<String>,
    minutes: u64,
    #[serde(default)]
    simultaneous: bool,
}

pub fn run(action: RecipeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RecipeAction::List => list_recipes(),
        RecipeAction::Show { title } => show_recipe(title),
        RecipeAction::Add => add_recipe(),
        RecipeAction::Remove { title } => remove_recipe(title),
    }
}

fn list_recipes() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let recipes = db.list_recipes()?;

    if recipes.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    println!("Recipes ({}):", recipes.len());
    println!();
    for recipe in recipes {
        let author = if recipe.author().is_empty() {
            String::new()
        } else {
            format!(" by {}", recipe.author())
        };
        println!("  {}{author}", recipe.title());
        println!("    {} steps", recipe.step_count());
    }
    Ok(())
}

fn show_recipe(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let recipe = db
        .load_recipe(&title)?
        .ok_or_else(|| format!("Recipe '{title}' not found"))?;

    println!("{}", recipe.title());
    if !recipe.author().is_empty() {
        println!("by {}", recipe.author());
    }
    println!();
    for step in recipe.steps() {
        let marker = if step.simultaneous() { "~" } else { " " };
        println!(
            " {marker} {}. {} ({})",
            step.position() + 1,
            step.description(),
            format_duration(step.nominal()),
        );
        if !step.ingredients().is_empty() {
            println!("      {}", step.ingredients().join(", "));
        }
    }
    println!();
    println!("~ runs unattended");
    Ok(())
}

fn add_recipe() -> Result<(), Box<dyn std::error::Error>> {
    let mut toml_content = String::new();
    std::io::stdin().read_to_string(&mut toml_content)?;

    let input: RecipeInput = toml::from_str(&toml_content)?;
    let steps = input
        .steps
        .into_iter()
        .map(|s| {
            Step::new(
                s.description,
                s.ingredients,
                Duration::from_secs(s.minutes * 60),
                s.simultaneous,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let recipe = Recipe::new(input.title, input.author, steps)?;

    let db = Database::open()?;
    if db.load_recipe(recipe.title())?.is_some() {
        return Err(format!("Recipe '{}' already exists", recipe.title()).into());
    }
    db.save_recipe(&recipe)?;

    println!("Recipe '{}' added.", recipe.title());
    Ok(())
}

fn remove_recipe(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    // bunch_members references recipes without a cascade; deleting a
    // member recipe would otherwise die on the constraint.
    for bunch_title in db.list_bunches()? {
        let Some(bunch) = db.load_bunch(&bunch_title)? else {
            continue;
        };
        if bunch.recipes().iter().any(|r| r.title() == title) {
            return Err(format!(
                "Recipe '{title}' is used by bunch '{bunch_title}'; remove it from the bunch first"
            )
            .into());
        }
    }
    if !db.delete_recipe(&title)? {
        return Err(format!("Recipe '{title}' not found").into());
    }
    println!("Recipe '{title}' removed.");
    Ok(())
}
