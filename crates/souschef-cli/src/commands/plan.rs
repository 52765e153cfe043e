//! Plan preview: the interleaved cooking order for a bunch.

use clap::Args;
use serde::Serialize;
use souschef_core::{estimator, CookingSchedule, Database};

use crate::common::{format_duration, load_bunch, open_learner};

#[derive(Args)]
pub struct PlanArgs {
    /// Bunch title
    pub bunch: String,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanJson {
    bunch: String,
    entries: Vec<PlanEntryJson>,
    original_secs: u64,
    learned_secs: u64,
}

#[derive(Serialize)]
struct PlanEntryJson {
    position: usize,
    recipe: String,
    description: String,
    simultaneous: bool,
    estimated_secs: u64,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bunch = load_bunch(&db, &args.bunch)?;
    let learner = open_learner()?;
    let schedule = CookingSchedule::build(&bunch);

    let original = estimator::original_time(&bunch);
    let learned = estimator::learned_time(&bunch, &learner)?;

    if args.json {
        let mut entries = Vec::with_capacity(schedule.step_count());
        for (position, entry) in schedule.entries().iter().enumerate() {
            entries.push(PlanEntryJson {
                position,
                recipe: bunch.recipes()[entry.recipe_index()].title().to_string(),
                description: entry.step().description().to_string(),
                simultaneous: entry.step().simultaneous(),
                estimated_secs: learner.get_estimated_time(entry.step())?.as_secs(),
            });
        }
        let plan = PlanJson {
            bunch: bunch.title().to_string(),
            entries,
            original_secs: original.as_secs(),
            learned_secs: learned.as_secs(),
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Plan for '{}'", bunch.title());
    println!();
    if schedule.step_count() == 0 {
        println!("  (nothing to cook)");
        return Ok(());
    }
    for (position, entry) in schedule.entries().iter().enumerate() {
        let step = entry.step();
        let marker = if step.simultaneous() { "~" } else { " " };
        let estimate = learner.get_estimated_time(step)?;
        println!(
            " {marker} {:>2}. [{}] {} ({})",
            position + 1,
            bunch.recipes()[entry.recipe_index()].title(),
            step.description(),
            format_duration(estimate),
        );
    }
    println!();
    println!("~ runs unattended");
    println!("Sequential at nominal estimates: {}", format_duration(original));
    println!("Sequential at learned estimates: {}", format_duration(learned));
    Ok(())
}
