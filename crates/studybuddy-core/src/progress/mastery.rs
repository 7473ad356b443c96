//! Per-topic mastery scores driven by flashcard difficulty ratings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Upper bound of a mastery score.
pub const MAX_MASTERY: u8 = 100;

/// How hard a reviewed card felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Score of a topic first rated with this difficulty.
    pub fn initial_score(self) -> u8 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 10,
            Difficulty::Hard => 0,
        }
    }

    /// Apply one rating to an existing score, staying within 0..=100.
    pub fn apply(self, score: u8) -> u8 {
        match self {
            Difficulty::Easy => score.saturating_add(10).min(MAX_MASTERY),
            Difficulty::Medium => score.saturating_add(5).min(MAX_MASTERY),
            Difficulty::Hard => score.saturating_sub(15),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ValidationError::UnknownVariant {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMastery {
    pub topic: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub mastery_score: u8,
    #[serde(default)]
    pub cards_learned: u32,
}

impl TopicMastery {
    pub fn new(topic: &str, subject_id: &str, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.to_string(),
            subject_id: subject_id.to_string(),
            mastery_score: difficulty.initial_score(),
            cards_learned: 1,
        }
    }
}

/// Rate `topic`, creating its entry on first sight. Returns the updated entry.
pub fn rate_topic(
    mastery: &mut Vec<TopicMastery>,
    topic: &str,
    subject_id: &str,
    difficulty: Difficulty,
) -> TopicMastery {
    match mastery.iter_mut().find(|t| t.topic == topic) {
        Some(entry) => {
            entry.mastery_score = difficulty.apply(entry.mastery_score.min(MAX_MASTERY));
            entry.clone()
        }
        None => {
            let entry = TopicMastery::new(topic, subject_id, difficulty);
            mastery.push(entry.clone());
            entry
        }
    }
}
