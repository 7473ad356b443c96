pub mod activity;
pub mod challenge;
pub mod config;
pub mod data;
pub mod rank;
pub mod session;
pub mod streak;

use std::sync::Arc;

use serde::Serialize;
use studybuddy_core::progress::DecayReport;
use studybuddy_core::storage::data_dir;
use studybuddy_core::{Config, FileStore, ProfileId, ProgressTracker, SystemClock, TracingSink};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

const PROFILES_DIR: &str = "profiles";

/// Open the profile's tracker and run the once-per-session decay check.
pub fn open_tracker(
    profile: Option<&str>,
) -> Result<(ProgressTracker, DecayReport), Box<dyn std::error::Error>> {
    let config = Config::load();
    let profile: ProfileId = profile.unwrap_or(config.profile.as_str()).parse()?;
    let store = FileStore::open(data_dir()?.join(PROFILES_DIR))?;
    tracing::debug!(%profile, dir = %store.dir().display(), "opening profile store");
    let tracker = ProgressTracker::open(
        profile,
        Arc::new(store),
        Arc::new(SystemClock),
        Arc::new(TracingSink),
        &config,
    );
    let decay = tracker.check_decay();
    Ok((tracker, decay))
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
