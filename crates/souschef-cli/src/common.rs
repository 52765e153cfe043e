//! Shared helpers for CLI commands.

use std::time::Duration;

use souschef_core::{Bunch, Config, Database, TimeLearner};

/// Open the learner over its own database handle, configured from
/// `config.toml`.
pub fn open_learner() -> Result<TimeLearner<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok(TimeLearner::with_settings(
        db,
        config.learner.decay,
        config.learner.initial_learn_rate,
    ))
}

/// Load a bunch by title or fail with a readable message.
pub fn load_bunch(db: &Database, title: &str) -> Result<Bunch, Box<dyn std::error::Error>> {
    db.load_bunch(title)?
        .ok_or_else(|| format!("Bunch '{title}' not found").into())
}

/// Render a duration as `1h 05m` / `12m` / `45s`.
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}
