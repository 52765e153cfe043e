use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "souschef-cli", version, about = "Souschef CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recipe management
    Recipe {
        #[command(subcommand)]
        action: commands::recipe::RecipeAction,
    },
    /// Bunch management (recipes cooked together)
    Bunch {
        #[command(subcommand)]
        action: commands::bunch::BunchAction,
    },
    /// Preview the interleaved cooking plan for a bunch
    Plan(commands::plan::PlanArgs),
    /// Step through a bunch interactively, reporting actual times
    Cook(commands::cook::CookArgs),
    /// Learned duration management
    Learner {
        #[command(subcommand)]
        action: commands::learner::LearnerAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Recipe { action } => commands::recipe::run(action),
        Commands::Bunch { action } => commands::bunch::run(action),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Cook(args) => commands::cook::run(args),
        Commands::Learner { action } => commands::learner::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
