use clap::Subcommand;
use serde_json::json;
use studybuddy_core::{Difficulty, FailureType};

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Record a qualifying activity without XP
    Record,
    /// Log a mistake against the failure profile
    Mistake {
        /// concept_confusion, rushing, formula_misuse, misreading or memory_gap
        #[arg(default_value = "concept_confusion")]
        failure: String,
    },
    /// Count reviewed flashcards
    Cards {
        /// Number of cards reviewed
        count: u32,
    },
    /// Rate a topic after reviewing one of its cards
    Mastery {
        /// Topic name
        topic: String,
        /// easy, medium or hard
        difficulty: String,
        /// Subject the topic belongs to, used when the topic is new
        #[arg(long, default_value = "math")]
        subject: String,
    },
    /// Add on-screen study time in seconds (does not reset decay)
    Tick {
        #[arg(default_value = "10")]
        seconds: u32,
    },
}

pub fn run(profile: Option<&str>, action: ActivityAction) -> CliResult {
    let (tracker, _) = open_tracker(profile)?;

    match action {
        ActivityAction::Record => {
            let activity = tracker.record_activity();
            print_json(&activity)
        }
        ActivityAction::Mistake { failure } => {
            let failure: FailureType = failure.parse()?;
            let count = tracker.log_mistake(failure);
            print_json(&json!({ "failure": failure, "count": count }))
        }
        ActivityAction::Cards { count } => {
            let update = tracker.review_cards(count);
            print_json(&json!({
                "cardsReviewed": tracker.snapshot().cards_reviewed,
                "update": update,
            }))
        }
        ActivityAction::Mastery {
            topic,
            difficulty,
            subject,
        } => {
            let difficulty: Difficulty = difficulty.parse()?;
            let mastery = tracker.update_mastery(&topic, &subject, difficulty)?;
            print_json(&mastery)
        }
        ActivityAction::Tick { seconds } => {
            let total = tracker.add_focus_time(chrono::Duration::seconds(i64::from(seconds)));
            print_json(&json!({ "totalFocusMinutes": total }))
        }
    }
}
