pub mod config;
pub mod database;
pub mod migrations;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns `~/.config/souschef[-dev]/` based on SOUSCHEF_ENV.
///
/// Set SOUSCHEF_ENV=dev to use a development data directory, or
/// SOUSCHEF_DATA_DIR to point at an explicit directory (tests, scripts).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("SOUSCHEF_DATA_DIR") {
        Ok(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("SOUSCHEF_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("souschef-dev")
            } else {
                base_dir.join("souschef")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(CoreError::Io)?;
    Ok(dir)
}
