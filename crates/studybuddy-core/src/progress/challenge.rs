//! Challenges: goal-based side quests that pay out XP on completion.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Which tracked action advances a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Flashcard,
    Focus,
    Streak,
    Planner,
}

impl FromStr for ChallengeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flashcard" => Ok(ChallengeKind::Flashcard),
            "focus" => Ok(ChallengeKind::Focus),
            "streak" => Ok(ChallengeKind::Streak),
            "planner" => Ok(ChallengeKind::Planner),
            _ => Err(ValidationError::UnknownVariant {
                kind: "challenge kind",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u32,
    pub goal: u32,
    pub xp_reward: u32,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub is_completed: bool,
}

impl Challenge {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        goal: u32,
        xp_reward: u32,
        kind: ChallengeKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            progress: 0,
            goal,
            xp_reward,
            kind,
            is_completed: false,
        }
    }

    /// Add progress. Returns true when this call completed the challenge.
    ///
    /// Progress is capped at the goal; completed challenges ignore further input.
    pub fn advance(&mut self, increment: u32) -> bool {
        if self.is_completed {
            return false;
        }
        let progress = self.progress.saturating_add(increment);
        self.is_completed = progress >= self.goal;
        self.progress = progress.min(self.goal);
        self.is_completed
    }
}

/// Challenges every new profile starts with.
pub fn default_challenges() -> Vec<Challenge> {
    vec![
        Challenge::new(
            "7_day_lockin",
            "7-Day Lock-In",
            "Study for 7 days in a row",
            7,
            500,
            ChallengeKind::Streak,
        ),
        Challenge::new(
            "100_cards",
            "Card Collector",
            "Review 100 flashcards this week",
            100,
            300,
            ChallengeKind::Flashcard,
        ),
        Challenge::new(
            "focus_today",
            "Deep Work Day",
            "Complete 3 focus sessions today",
            3,
            200,
            ChallengeKind::Focus,
        ),
    ]
}
