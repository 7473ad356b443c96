use clap::Subcommand;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Record a completed focus session
    Complete {
        /// Session length in minutes
        #[arg(long)]
        minutes: u32,
        /// Subject studied
        #[arg(long)]
        subject: String,
    },
    /// List recorded sessions
    List,
}

pub fn run(profile: Option<&str>, action: SessionAction) -> CliResult {
    let (tracker, _) = open_tracker(profile)?;

    match action {
        SessionAction::Complete { minutes, subject } => {
            let outcome = tracker.complete_session(minutes, &subject)?;
            print_json(&outcome)
        }
        SessionAction::List => print_json(&tracker.snapshot().sessions),
    }
}
