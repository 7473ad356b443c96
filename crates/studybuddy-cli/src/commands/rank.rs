use clap::Subcommand;
use serde_json::json;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum RankAction {
    /// Show current rank and decay status
    Show,
    /// Grant XP (counts as activity)
    Gain {
        /// XP amount
        amount: u32,
    },
    /// Run the inactivity decay check and report the result
    Decay,
}

pub fn run(profile: Option<&str>, action: RankAction) -> CliResult {
    let (tracker, decay) = open_tracker(profile)?;

    match action {
        RankAction::Show => {
            let rank = tracker.rank();
            print_json(&json!({
                "profile": tracker.profile(),
                "rank": rank,
                "display": rank.to_string(),
                "xpToNextLevel": rank.xp_to_next_level(),
                "activity": tracker.activity(),
                "warning": tracker.pending_warning().map(|w| w.to_string()),
            }))
        }
        RankAction::Gain { amount } => {
            let events = tracker.award_xp(amount);
            print_json(&json!({
                "rank": tracker.rank(),
                "events": events,
                "messages": events.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }))
        }
        RankAction::Decay => print_json(&json!({
            "report": decay,
            "messages": decay
                .warning
                .iter()
                .chain(decay.demotion.iter())
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
        })),
    }
}
