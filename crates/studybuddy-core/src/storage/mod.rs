mod config;
mod profile;
mod store;

pub use config::{Config, RewardsConfig};
pub use profile::{load_record, record_key, save_record, ProfileId, RECORD_KEY_PREFIX};
pub use store::{FileStore, MemoryStore, PersistentStore};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/studybuddy[-dev]/` based on STUDYBUDDY_ENV.
///
/// Set STUDYBUDDY_ENV=dev to use the development data directory, or
/// STUDYBUDDY_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYBUDDY_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("STUDYBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studybuddy-dev")
            } else {
                base_dir.join("studybuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
