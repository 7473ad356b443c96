//! Rank tiers and their static progression table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level reachable within a non-terminal tier.
pub const MAX_LEVEL: u8 = 3;

/// Long-term progression band, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Elite,
    Ascendant,
}

/// Static configuration of a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierConfig {
    /// XP needed to advance one level inside the tier (0 for Ascendant).
    pub xp_per_level: u32,
    /// Tier reached after completing level 3.
    pub next_tier: Option<RankTier>,
    /// Tier a level-1 demotion drops to.
    pub prev_tier: Option<RankTier>,
}

impl RankTier {
    /// All tiers in ascending order.
    pub const ALL: [RankTier; 5] = [
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Elite,
        RankTier::Ascendant,
    ];

    pub fn config(&self) -> TierConfig {
        match self {
            RankTier::Bronze => TierConfig {
                xp_per_level: 1_000,
                next_tier: Some(RankTier::Silver),
                prev_tier: None,
            },
            RankTier::Silver => TierConfig {
                xp_per_level: 2_000,
                next_tier: Some(RankTier::Gold),
                prev_tier: Some(RankTier::Bronze),
            },
            RankTier::Gold => TierConfig {
                xp_per_level: 5_000,
                next_tier: Some(RankTier::Elite),
                prev_tier: Some(RankTier::Silver),
            },
            RankTier::Elite => TierConfig {
                xp_per_level: 20_000,
                next_tier: Some(RankTier::Ascendant),
                prev_tier: Some(RankTier::Gold),
            },
            RankTier::Ascendant => TierConfig {
                xp_per_level: 0,
                next_tier: None,
                prev_tier: Some(RankTier::Elite),
            },
        }
    }

    pub fn xp_per_level(&self) -> u32 {
        self.config().xp_per_level
    }

    pub fn next_tier(&self) -> Option<RankTier> {
        self.config().next_tier
    }

    pub fn prev_tier(&self) -> Option<RankTier> {
        self.config().prev_tier
    }

    /// Ascendant is terminal: it earns no XP and has a single level.
    pub fn is_terminal(&self) -> bool {
        self.next_tier().is_none()
    }

    /// Highest valid level for this tier.
    pub fn max_level(&self) -> u8 {
        if self.is_terminal() {
            1
        } else {
            MAX_LEVEL
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Elite => "Elite",
            RankTier::Ascendant => "Ascendant",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
