//! XP gain and inactivity decay for ranks.
//!
//! The engine is pure: every operation takes the current state and the
//! current time and returns the new state plus the event it produced.
//! Persisting the result is the caller's job.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityState, Rank, RankTier, MAX_LEVEL};
use crate::events::RankEvent;

/// Thresholds for inactivity decay, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayPolicy {
    /// Inactivity at which the user is warned.
    #[serde(default = "default_warning_after_hours")]
    pub warning_after_hours: u32,
    /// Inactivity at which one demotion step is applied.
    #[serde(default = "default_decay_after_hours")]
    pub decay_after_hours: u32,
    /// Minimum spacing between two automatic demotions.
    #[serde(default = "default_demotion_cooldown_hours")]
    pub demotion_cooldown_hours: u32,
}

fn default_warning_after_hours() -> u32 {
    48
}
fn default_decay_after_hours() -> u32 {
    72
}
fn default_demotion_cooldown_hours() -> u32 {
    24
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            warning_after_hours: default_warning_after_hours(),
            decay_after_hours: default_decay_after_hours(),
            demotion_cooldown_hours: default_demotion_cooldown_hours(),
        }
    }
}

impl DecayPolicy {
    pub fn warning_after(&self) -> Duration {
        Duration::hours(i64::from(self.warning_after_hours))
    }

    pub fn decay_after(&self) -> Duration {
        Duration::hours(i64::from(self.decay_after_hours))
    }

    pub fn demotion_cooldown(&self) -> Duration {
        Duration::hours(i64::from(self.demotion_cooldown_hours))
    }
}

/// Result of a single `gain_xp` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpOutcome {
    pub rank: Rank,
    pub event: Option<RankEvent>,
}

/// Result of a single `check_decay` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayOutcome {
    pub rank: Rank,
    pub activity: ActivityState,
    pub demotion: Option<RankEvent>,
    pub warning: Option<RankEvent>,
}

impl DecayOutcome {
    pub fn demoted(&self) -> bool {
        self.demotion.is_some()
    }
}

/// Rank state machine.
#[derive(Debug, Clone, Default)]
pub struct RankEngine {
    policy: DecayPolicy,
}

impl RankEngine {
    /// Create an engine with the default 48h/72h/24h policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom decay policy.
    pub fn with_policy(policy: DecayPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DecayPolicy {
        &self.policy
    }

    /// Add XP to a rank.
    ///
    /// Crossing the tier threshold resets XP to zero; the excess is
    /// discarded. A single call performs at most one level-up or tier-up,
    /// however large `amount` is.
    pub fn gain_xp(&self, amount: u32, rank: &Rank) -> XpOutcome {
        let unchanged = XpOutcome {
            rank: *rank,
            event: None,
        };
        if amount == 0 || rank.tier.is_terminal() {
            return unchanged;
        }

        let new_xp = rank.current_xp.saturating_add(amount);
        let threshold = rank.tier.xp_per_level();
        if new_xp < threshold {
            return XpOutcome {
                rank: Rank::new(rank.tier, rank.level, new_xp),
                event: None,
            };
        }

        if rank.level < MAX_LEVEL {
            let level = rank.level + 1;
            tracing::info!(tier = %rank.tier, level, "level up");
            return XpOutcome {
                rank: Rank::new(rank.tier, level, 0),
                event: Some(RankEvent::LevelUp {
                    tier: rank.tier,
                    level,
                }),
            };
        }

        match rank.tier.next_tier() {
            Some(RankTier::Ascendant) => {
                tracing::info!("ascended");
                XpOutcome {
                    rank: Rank::new(RankTier::Ascendant, 1, 0),
                    event: Some(RankEvent::Ascended),
                }
            }
            Some(tier) => {
                tracing::info!(%tier, "tier up");
                XpOutcome {
                    rank: Rank::new(tier, 1, 0),
                    event: Some(RankEvent::TierUp { tier }),
                }
            }
            None => unchanged,
        }
    }

    /// One demotion step, or `None` at the Bronze 1 floor.
    pub fn demote(&self, rank: &Rank) -> Option<Rank> {
        if rank.tier == RankTier::Ascendant {
            return Some(Rank::new(RankTier::Elite, MAX_LEVEL, 0));
        }
        if rank.level > 1 {
            return Some(Rank::new(rank.tier, rank.level - 1, 0));
        }
        rank.tier
            .prev_tier()
            .map(|tier| Rank::new(tier, MAX_LEVEL, 0))
    }

    /// Time since the last qualifying activity, never negative.
    pub fn inactivity(&self, now: DateTime<Utc>, activity: &ActivityState) -> Duration {
        (now - activity.last_activity_date).max(Duration::zero())
    }

    /// Evaluate inactivity decay at `now`.
    ///
    /// Safe to call on any cadence: once a demotion is applied, further
    /// checks inside the cooldown window are no-ops.
    pub fn check_decay(
        &self,
        now: DateTime<Utc>,
        activity: &ActivityState,
        rank: &Rank,
    ) -> DecayOutcome {
        let inactive = self.inactivity(now, activity);
        let mut outcome = DecayOutcome {
            rank: *rank,
            activity: *activity,
            demotion: None,
            warning: None,
        };

        if inactive >= self.policy.warning_after() && inactive < self.policy.decay_after() {
            tracing::debug!(hours = inactive.num_hours(), "decay warning");
            outcome.warning = Some(RankEvent::DecayWarning);
            return outcome;
        }
        if inactive < self.policy.decay_after() {
            return outcome;
        }

        if let Some(last) = activity.last_demotion_date {
            if now - last < self.policy.demotion_cooldown() {
                tracing::debug!("demotion already applied inside cooldown window");
                return outcome;
            }
        }

        let Some(demoted) = self.demote(rank) else {
            tracing::debug!("rank at floor, nothing to demote");
            return outcome;
        };

        tracing::info!(
            from = %rank,
            to = %demoted,
            hours_inactive = inactive.num_hours(),
            "rank decayed"
        );
        outcome.rank = demoted;
        outcome.activity.last_demotion_date = Some(now);
        outcome.demotion = Some(RankEvent::Demoted {
            tier: demoted.tier,
            level: demoted.level,
        });
        outcome
    }

    /// Restart the decay clock at `now`.
    pub fn record_activity(&self, now: DateTime<Utc>, activity: &ActivityState) -> ActivityState {
        ActivityState {
            last_activity_date: now,
            ..*activity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn idle_for(minutes: i64) -> (DateTime<Utc>, ActivityState) {
        (t0() + Duration::minutes(minutes), ActivityState::new(t0()))
    }

    #[test]
    fn test_scenario_level_up() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(100, &Rank::new(RankTier::Bronze, 1, 950));
        assert_eq!(out.rank, Rank::new(RankTier::Bronze, 2, 0));
        assert_eq!(
            out.event,
            Some(RankEvent::LevelUp {
                tier: RankTier::Bronze,
                level: 2
            })
        );
    }

    #[test]
    fn test_scenario_tier_up() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(150, &Rank::new(RankTier::Bronze, 3, 900));
        assert_eq!(out.rank, Rank::new(RankTier::Silver, 1, 0));
        assert_eq!(
            out.event,
            Some(RankEvent::TierUp {
                tier: RankTier::Silver
            })
        );
    }

    #[test]
    fn test_scenario_ascension() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(5, &Rank::new(RankTier::Elite, 3, 19_999));
        assert_eq!(out.rank, Rank::new(RankTier::Ascendant, 1, 0));
        assert_eq!(out.event, Some(RankEvent::Ascended));
    }

    #[test]
    fn test_gain_below_threshold_accumulates() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(300, &Rank::new(RankTier::Silver, 2, 1_000));
        assert_eq!(out.rank, Rank::new(RankTier::Silver, 2, 1_300));
        assert_eq!(out.event, None);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(1_000, &Rank::default());
        assert_eq!(out.rank, Rank::new(RankTier::Bronze, 2, 0));
    }

    #[test]
    fn test_zero_gain_is_noop() {
        let engine = RankEngine::new();
        let rank = Rank::new(RankTier::Gold, 2, 4_999);
        let out = engine.gain_xp(0, &rank);
        assert_eq!(out.rank, rank);
        assert_eq!(out.event, None);
    }

    #[test]
    fn test_single_step_transition() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(10_000, &Rank::new(RankTier::Gold, 3, 4_999));
        assert_eq!(out.rank, Rank::new(RankTier::Elite, 1, 0));
        assert_eq!(
            out.event,
            Some(RankEvent::TierUp {
                tier: RankTier::Elite
            })
        );
    }

    #[test]
    fn test_huge_gain_saturates() {
        let engine = RankEngine::new();
        let out = engine.gain_xp(u32::MAX, &Rank::new(RankTier::Silver, 1, 1_999));
        assert_eq!(out.rank, Rank::new(RankTier::Silver, 2, 0));
    }

    #[test]
    fn test_demote_precedence() {
        let engine = RankEngine::new();
        assert_eq!(
            engine.demote(&Rank::new(RankTier::Ascendant, 1, 0)),
            Some(Rank::new(RankTier::Elite, 3, 0))
        );
        assert_eq!(
            engine.demote(&Rank::new(RankTier::Gold, 2, 3_000)),
            Some(Rank::new(RankTier::Gold, 1, 0))
        );
        assert_eq!(
            engine.demote(&Rank::new(RankTier::Silver, 1, 500)),
            Some(Rank::new(RankTier::Bronze, 3, 0))
        );
        assert_eq!(engine.demote(&Rank::new(RankTier::Bronze, 1, 400)), None);
    }

    #[test]
    fn test_warning_window() {
        let engine = RankEngine::new();
        let rank = Rank::new(RankTier::Gold, 2, 10);

        // 47.9 hours
        let (now, activity) = idle_for(47 * 60 + 54);
        let out = engine.check_decay(now, &activity, &rank);
        assert_eq!(out.warning, None);
        assert_eq!(out.demotion, None);

        let (now, activity) = idle_for(48 * 60);
        let out = engine.check_decay(now, &activity, &rank);
        assert_eq!(out.warning, Some(RankEvent::DecayWarning));
        assert_eq!(out.rank, rank);

        let (now, activity) = idle_for(72 * 60);
        let out = engine.check_decay(now, &activity, &rank);
        assert_eq!(out.warning, None);
        assert_eq!(
            out.demotion,
            Some(RankEvent::Demoted {
                tier: RankTier::Gold,
                level: 1
            })
        );
    }

    #[test]
    fn test_demotion_idempotent_within_cooldown() {
        let engine = RankEngine::new();
        let (now, activity) = idle_for(80 * 60);
        let rank = Rank::new(RankTier::Silver, 3, 1_500);

        let first = engine.check_decay(now, &activity, &rank);
        assert!(first.demoted());
        assert_eq!(first.rank, Rank::new(RankTier::Silver, 2, 0));
        assert_eq!(first.activity.last_demotion_date, Some(now));

        let second = engine.check_decay(now, &first.activity, &first.rank);
        assert!(!second.demoted());
        assert_eq!(second.rank, first.rank);

        let later = now + Duration::hours(23);
        let third = engine.check_decay(later, &second.activity, &second.rank);
        assert!(!third.demoted());

        let next_day = now + Duration::hours(24);
        let fourth = engine.check_decay(next_day, &third.activity, &third.rank);
        assert_eq!(fourth.rank, Rank::new(RankTier::Silver, 1, 0));
    }

    #[test]
    fn test_demotion_keeps_activity_clock() {
        let engine = RankEngine::new();
        let (now, activity) = idle_for(100 * 60);
        let out = engine.check_decay(now, &activity, &Rank::new(RankTier::Gold, 1, 0));
        assert_eq!(out.rank, Rank::new(RankTier::Silver, 3, 0));
        assert_eq!(out.activity.last_activity_date, t0());
    }

    #[test]
    fn test_floor_at_bronze_one() {
        let engine = RankEngine::new();
        let mut activity = ActivityState::new(t0());
        let rank = Rank::default();
        for day in 3..20 {
            let now = t0() + Duration::days(day);
            let out = engine.check_decay(now, &activity, &rank);
            assert_eq!(out.rank, rank);
            assert_eq!(out.demotion, None);
            assert_eq!(out.activity.last_demotion_date, None);
            activity = out.activity;
        }
    }

    #[test]
    fn test_ascendant_demotes_to_elite_three() {
        let engine = RankEngine::new();
        let (now, activity) = idle_for(72 * 60);
        let out = engine.check_decay(now, &activity, &Rank::new(RankTier::Ascendant, 1, 0));
        assert_eq!(out.rank, Rank::new(RankTier::Elite, 3, 0));
    }

    #[test]
    fn test_clock_skew_clamps_to_zero() {
        let engine = RankEngine::new();
        let activity = ActivityState::new(t0());
        let now = t0() - Duration::days(10);
        assert_eq!(engine.inactivity(now, &activity), Duration::zero());
        let out = engine.check_decay(now, &activity, &Rank::new(RankTier::Gold, 3, 0));
        assert_eq!(out.demotion, None);
        assert_eq!(out.warning, None);
    }

    #[test]
    fn test_record_activity_clears_decay() {
        let engine = RankEngine::new();
        let (now, activity) = idle_for(90 * 60);
        let refreshed = engine.record_activity(now, &activity);
        assert_eq!(refreshed.last_activity_date, now);
        let out = engine.check_decay(now, &refreshed, &Rank::new(RankTier::Gold, 3, 0));
        assert_eq!(out.demotion, None);
        assert_eq!(out.warning, None);
    }

    #[test]
    fn test_custom_policy() {
        let engine = RankEngine::with_policy(DecayPolicy {
            warning_after_hours: 1,
            decay_after_hours: 2,
            demotion_cooldown_hours: 1,
        });
        let (now, activity) = idle_for(90);
        let out = engine.check_decay(now, &activity, &Rank::new(RankTier::Gold, 3, 0));
        assert_eq!(out.warning, Some(RankEvent::DecayWarning));
    }

    fn any_rank() -> impl Strategy<Value = Rank> {
        prop_oneof![
            Just(RankTier::Bronze),
            Just(RankTier::Silver),
            Just(RankTier::Gold),
            Just(RankTier::Elite),
        ]
        .prop_flat_map(|tier| {
            (1..=MAX_LEVEL, 0..tier.xp_per_level())
                .prop_map(move |(level, xp)| Rank::new(tier, level, xp))
        })
        .boxed()
        .prop_union(Just(Rank::new(RankTier::Ascendant, 1, 0)).boxed())
    }

    proptest! {
        #[test]
        fn prop_xp_stays_below_threshold(rank in any_rank(), amount in any::<u32>()) {
            let out = RankEngine::new().gain_xp(amount, &rank);
            prop_assert!(out.rank.is_valid());
        }

        #[test]
        fn prop_ascendant_ignores_xp(amount in any::<u32>()) {
            let rank = Rank::new(RankTier::Ascendant, 1, 0);
            let out = RankEngine::new().gain_xp(amount, &rank);
            prop_assert_eq!(out.rank, rank);
            prop_assert_eq!(out.event, None);
        }

        #[test]
        fn prop_gain_moves_at_most_one_step(rank in any_rank(), amount in any::<u32>()) {
            let out = RankEngine::new().gain_xp(amount, &rank);
            let before = (rank.tier, rank.level);
            let after = (out.rank.tier, out.rank.level);
            let one_up = (rank.tier, rank.level + 1);
            let next = rank.tier.next_tier().map(|t| (t, 1));
            prop_assert!(after == before || after == one_up || Some(after) == next);
        }

        #[test]
        fn prop_demotion_keeps_rank_valid(rank in any_rank()) {
            if let Some(lower) = RankEngine::new().demote(&rank) {
                prop_assert!(lower.is_valid());
                prop_assert!(lower.tier <= rank.tier);
            }
        }
    }
}
