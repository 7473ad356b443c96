use clap::Subcommand;
use serde_json::json;
use studybuddy_core::{Config, ConfigError};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key (e.g. "profile", "decay.decay_after_hours")
        key: String,
    },
    /// Change one setting and save it
    Set {
        /// Dot-separated key
        key: String,
        /// New value, checked before saving
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Restore the default profile, decay windows and rewards
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, %value, "config updated");
            println!("ok");
            Ok(())
        }
        ConfigAction::List => print_json(&Config::load()),
        ConfigAction::Reset => {
            Config::default().save()?;
            print_json(&json!({ "status": "config reset to defaults" }))
        }
    }
}
