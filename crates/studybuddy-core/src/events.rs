//! Rank events emitted by the engine and delivered to notification sinks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rank::RankTier;

/// Every rank transition or decay notice produces an Event.
/// Rendering is left to the caller; `Display` gives the default wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RankEvent {
    /// Advanced one level within the same tier.
    LevelUp { tier: RankTier, level: u8 },
    /// Completed level 3 and entered the next tier at level 1.
    TierUp { tier: RankTier },
    /// Reached the terminal Ascendant tier.
    Ascended,
    /// Inactive long enough that the next check may demote.
    DecayWarning,
    /// Lost one level (or tier) to inactivity.
    Demoted { tier: RankTier, level: u8 },
}

impl RankEvent {
    /// Upward transitions; the rest are decay notices.
    pub fn is_promotion(&self) -> bool {
        matches!(
            self,
            RankEvent::LevelUp { .. } | RankEvent::TierUp { .. } | RankEvent::Ascended
        )
    }
}

impl fmt::Display for RankEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankEvent::LevelUp { tier, level } => write!(f, "Rank Up! {tier} {level}"),
            RankEvent::TierUp { tier } => write!(f, "TIER UP! Welcome to {tier}"),
            RankEvent::Ascended => f.write_str("ASCENDED! You have reached the pinnacle."),
            RankEvent::DecayWarning => {
                f.write_str("You're about to lose a level. Study today to maintain your rank.")
            }
            RankEvent::Demoted { tier, level } => write!(
                f,
                "Rank Decreased to {tier} {level}. Consistency is required to maintain mastery."
            ),
        }
    }
}
