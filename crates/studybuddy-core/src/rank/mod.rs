//! Rank progression: tiers, levels, XP and inactivity decay.
//!
//! ## State Transitions
//!
//! ```text
//! gain_xp:     (T, L) -> (T, L+1)        L < 3
//!              (T, 3) -> (next(T), 1)
//! check_decay: (T, L) -> (T, L-1)        L > 1
//!              (T, 1) -> (prev(T), 3)
//!              (Ascendant, 1) -> (Elite, 3)
//! ```
//!
//! `(Bronze, 1)` is the floor for decay; `(Ascendant, 1)` absorbs upward motion.

mod engine;
mod tier;

pub use engine::{DecayOutcome, DecayPolicy, RankEngine, XpOutcome};
pub use tier::{RankTier, TierConfig, MAX_LEVEL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current position on the progression ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub tier: RankTier,
    pub level: u8,
    #[serde(rename = "currentXP")]
    pub current_xp: u32,
}

impl Rank {
    pub fn new(tier: RankTier, level: u8, current_xp: u32) -> Self {
        Self {
            tier,
            level,
            current_xp,
        }
    }

    /// XP still needed to reach the next level, `None` when Ascendant.
    pub fn xp_to_next_level(&self) -> Option<u32> {
        if self.tier.is_terminal() {
            return None;
        }
        Some(self.tier.xp_per_level().saturating_sub(self.current_xp))
    }

    /// Whether the rank satisfies the level and XP invariants of its tier.
    pub fn is_valid(&self) -> bool {
        if self.level == 0 || self.level > self.tier.max_level() {
            return false;
        }
        if self.tier.is_terminal() {
            self.current_xp == 0
        } else {
            self.current_xp < self.tier.xp_per_level()
        }
    }

    /// Clamp a rank read from untrusted storage back into its invariants.
    pub fn normalized(self) -> Self {
        let level = self.level.clamp(1, self.tier.max_level());
        let current_xp = if self.tier.is_terminal() {
            0
        } else {
            self.current_xp.min(self.tier.xp_per_level() - 1)
        };
        Self::new(self.tier, level, current_xp)
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::new(RankTier::Bronze, 1, 0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tier, self.level)
    }
}

/// Timestamps driving the inactivity decay clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityState {
    /// Most recent qualifying user action.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity_date: DateTime<Utc>,
    /// Most recent automatic demotion.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_demotion_date: Option<DateTime<Utc>>,
}

impl ActivityState {
    /// Fresh state whose decay clock starts at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_activity_date: now,
            last_demotion_date: None,
        }
    }
}
