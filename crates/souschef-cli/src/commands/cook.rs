//! Interactive cook session: step through a bunch's merged plan and
//! report actual times to the learner.

use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Args;
use souschef_core::{Config, CookingSchedule, Database, Step};

use crate::common::{format_duration, load_bunch, open_learner};

#[derive(Args)]
pub struct CookArgs {
    /// Bunch title
    pub bunch: String,
}

pub fn run(args: CookArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bunch = load_bunch(&db, &args.bunch)?;
    let learner = open_learner()?;
    let config = Config::load()?;
    let mut schedule = CookingSchedule::build(&bunch);

    if schedule.step_count() == 0 {
        println!("Nothing to cook in '{}'.", bunch.title());
        return Ok(());
    }

    println!(
        "Cooking '{}': {} steps. Enter advances, 'b' goes back, 't <minutes>' reports the actual time, 'q' quits.",
        bunch.title(),
        schedule.step_count()
    );
    println!();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut current: Option<Step> = schedule.next_step().cloned();

    loop {
        let Some(step) = current.clone() else {
            println!("All steps done. Enjoy!");
            return Ok(());
        };
        let recipe = schedule
            .recipe_for_step(&step)
            .map(|r| r.title().to_string())
            .unwrap_or_default();
        let estimate = learner.get_estimated_time(&step)?;
        let marker = if step.simultaneous() { " (unattended)" } else { "" };
        println!(
            "[{recipe}] {}{marker} -- about {}",
            step.description(),
            format_duration(estimate),
        );
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            current = schedule.next_step().cloned();
        } else if trimmed == "b" {
            // The displayed step sits just behind the cursor; rewind past
            // it and replay the one before.
            if schedule.position() >= 2 {
                schedule.previous_step();
                schedule.previous_step();
                current = schedule.next_step().cloned();
            } else {
                println!("Already at the first step.");
            }
        } else if trimmed == "q" {
            return Ok(());
        } else if let Some(minutes) = trimmed.strip_prefix("t ") {
            let minutes: u64 = minutes.trim().parse()?;
            let weight = learner.learn_step(&step, Duration::from_secs(minutes * 60))?;
            println!(
                "Noted. New estimate: {} ({} observations)",
                format_duration(weight.weighted),
                weight.samples,
            );
            if config.cook.auto_advance {
                current = schedule.next_step().cloned();
            }
        } else {
            println!("Commands: Enter, 'b', 't <minutes>', 'q'.");
        }
    }
}
