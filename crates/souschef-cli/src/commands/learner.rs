//! Learned duration inspection and reset.

use clap::Subcommand;
use souschef_core::Database;

use crate::common::{format_duration, open_learner};

#[derive(Subcommand)]
pub enum LearnerAction {
    /// List all learned step durations
    Show,

    /// Delete all learned durations, reverting every step to its
    /// nominal estimate
    Reset,
}

pub fn run(action: LearnerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LearnerAction::Show => show_weights(),
        LearnerAction::Reset => reset_weights(),
    }
}

fn show_weights() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let weights = db.list_weights()?;

    if weights.is_empty() {
        println!("No learned durations yet.");
        return Ok(());
    }

    println!(
        "{:<16} {:>10} {:>10} {:>8}  {}",
        "Step", "Learned", "Rate", "Samples", "Updated"
    );
    for weight in weights {
        // Identities are content hashes; the first bytes are plenty to
        // tell rows apart when eyeballing.
        let short = &weight.identity.as_str()[..12.min(weight.identity.as_str().len())];
        println!(
            "{short:<16} {:>10} {:>10.3} {:>8}  {}",
            format_duration(weight.weighted),
            weight.learn_rate,
            weight.samples,
            weight.updated_at.format("%Y-%m-%d"),
        );
    }
    Ok(())
}

fn reset_weights() -> Result<(), Box<dyn std::error::Error>> {
    let learner = open_learner()?;
    learner.clear_learner()?;
    println!("All learned durations cleared.");
    Ok(())
}
