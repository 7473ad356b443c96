use clap::Subcommand;
use studybuddy_core::ChallengeKind;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// List active challenges
    List,
    /// Advance every open challenge of a kind
    Progress {
        /// flashcard, focus, streak or planner
        kind: String,
        /// Progress increment
        #[arg(long, default_value = "1")]
        by: u32,
    },
}

pub fn run(profile: Option<&str>, action: ChallengeAction) -> CliResult {
    let (tracker, _) = open_tracker(profile)?;

    match action {
        ChallengeAction::List => print_json(&tracker.snapshot().active_challenges),
        ChallengeAction::Progress { kind, by } => {
            let kind: ChallengeKind = kind.parse()?;
            print_json(&tracker.update_challenge(kind, by))
        }
    }
}
