use clap::Subcommand;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Recompute and show the daily streak
    Show,
}

pub fn run(profile: Option<&str>, action: StreakAction) -> CliResult {
    let (tracker, _) = open_tracker(profile)?;

    match action {
        StreakAction::Show => {
            tracker.refresh_streak();
            print_json(&tracker.snapshot().streaks.daily)
        }
    }
}
