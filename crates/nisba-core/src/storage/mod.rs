mod config;
pub mod database;

pub use config::{Preferences, Theme, PREFERENCE_KEYS};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/nisba[-dev]/`, creating it when missing.
///
/// `NISBA_DATA_DIR` overrides the location outright. Otherwise
/// `NISBA_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NISBA_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("NISBA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("nisba-dev")
            } else {
                base_dir.join("nisba")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
