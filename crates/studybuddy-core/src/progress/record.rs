//! The persisted per-profile progression record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::challenge::{default_challenges, Challenge};
use super::mastery::TopicMastery;
use super::streak::StreakData;
use crate::error::ValidationError;
use crate::rank::{ActivityState, Rank};

/// Why an answer went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    ConceptConfusion,
    Rushing,
    FormulaMisuse,
    Misreading,
    MemoryGap,
}

impl FromStr for FailureType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "concept_confusion" => Ok(FailureType::ConceptConfusion),
            "rushing" => Ok(FailureType::Rushing),
            "formula_misuse" => Ok(FailureType::FormulaMisuse),
            "misreading" => Ok(FailureType::Misreading),
            "memory_gap" => Ok(FailureType::MemoryGap),
            _ => Err(ValidationError::UnknownVariant {
                kind: "failure type",
                value: s.to_string(),
            }),
        }
    }
}

/// A completed focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub date: NaiveDate,
    pub minutes: u32,
    pub subject: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    #[serde(default)]
    pub daily: StreakData,
}

/// Everything tracked for one profile.
///
/// Field names follow the camelCase layout of the web client's stats blob,
/// so records it wrote load unchanged. Keys this type does not model are
/// kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub rank: Rank,
    #[serde(flatten)]
    pub activity: ActivityState,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub total_focus_minutes: f64,
    #[serde(default)]
    pub cards_reviewed: u32,
    #[serde(default)]
    pub streaks: Streaks,
    #[serde(default = "default_challenges")]
    pub active_challenges: Vec<Challenge>,
    #[serde(default)]
    pub failure_profile: BTreeMap<FailureType, u32>,
    #[serde(default)]
    pub topic_mastery: Vec<TopicMastery>,
    #[serde(default)]
    pub sessions: Vec<StudySession>,
}

impl ProgressRecord {
    /// Fresh record: Bronze 1, no XP, decay clock starting at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            rank: Rank::default(),
            activity: ActivityState::new(now),
            total_focus_minutes: 0.0,
            cards_reviewed: 0,
            streaks: Streaks::default(),
            active_challenges: default_challenges(),
            failure_profile: BTreeMap::new(),
            topic_mastery: Vec::new(),
            sessions: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn session_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.sessions.iter().map(|s| s.date)
    }
}
