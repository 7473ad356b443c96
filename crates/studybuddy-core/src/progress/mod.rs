//! Progression bookkeeping around the rank engine: activities, sessions,
//! challenges, mistakes, topic mastery and streaks.

mod challenge;
mod mastery;
mod record;
mod streak;
mod tracker;

pub use challenge::{default_challenges, Challenge, ChallengeKind};
pub use mastery::{rate_topic, Difficulty, TopicMastery, MAX_MASTERY};
pub use record::{FailureType, ProgressRecord, Streaks, StudySession};
pub use streak::{daily_streak, StreakData};
pub use tracker::{ChallengeUpdate, DecayReport, ProgressTracker, SessionOutcome};
