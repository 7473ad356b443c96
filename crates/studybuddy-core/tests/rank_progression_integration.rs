//! Integration tests for rank progression and decay over a file-backed store.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use studybuddy_core::{
    ChallengeKind, CollectingSink, Config, FileStore, ManualClock, PersistentStore, ProfileId,
    ProgressTracker, Rank, RankEngine, RankEvent, RankTier,
};
use tempfile::TempDir;

fn open(dir: &TempDir, clock: Arc<ManualClock>, sink: Arc<CollectingSink>) -> ProgressTracker {
    let store = FileStore::open(dir.path()).unwrap();
    ProgressTracker::open(
        ProfileId::new("student").unwrap(),
        Arc::new(store),
        clock,
        sink,
        &Config::default(),
    )
}

#[test]
fn test_climb_to_ascendant_and_decay_back() {
    let dir = TempDir::new().unwrap();
    let start = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let sink = Arc::new(CollectingSink::new());
    let tracker = open(&dir, clock.clone(), sink.clone());

    // One threshold-sized gain per level: 4 tiers x 3 levels.
    for tier in [RankTier::Bronze, RankTier::Silver, RankTier::Gold, RankTier::Elite] {
        for _ in 0..3 {
            tracker.award_xp(tier.xp_per_level());
        }
    }
    assert_eq!(tracker.rank(), Rank::new(RankTier::Ascendant, 1, 0));

    let events = sink.drain();
    assert_eq!(events.len(), 12);
    assert_eq!(events.last(), Some(&RankEvent::Ascended));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, RankEvent::TierUp { .. }))
            .count(),
        3
    );

    // Ascendant earns nothing further.
    assert!(tracker.award_xp(50_000).is_empty());
    assert_eq!(tracker.rank(), Rank::new(RankTier::Ascendant, 1, 0));

    // Idle past 72h: one step down, then one more per elapsed day.
    clock.advance(Duration::hours(72));
    tracker.check_decay();
    assert_eq!(tracker.rank(), Rank::new(RankTier::Elite, 3, 0));
    tracker.check_decay();
    assert_eq!(tracker.rank(), Rank::new(RankTier::Elite, 3, 0));

    clock.advance(Duration::hours(24));
    tracker.check_decay();
    assert_eq!(tracker.rank(), Rank::new(RankTier::Elite, 2, 0));

    // Reopening from disk keeps the demotion guard.
    drop(tracker);
    let reopened = open(&dir, clock.clone(), sink.clone());
    let report = reopened.check_decay();
    assert_eq!(report.demotion, None);
    assert_eq!(reopened.rank(), Rank::new(RankTier::Elite, 2, 0));
}

#[test]
fn test_activity_stops_decay() {
    let dir = TempDir::new().unwrap();
    let start = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let sink = Arc::new(CollectingSink::new());
    let tracker = open(&dir, clock.clone(), sink.clone());
    tracker.award_xp(1_000);
    sink.drain();

    clock.advance(Duration::hours(60));
    assert_eq!(tracker.check_decay().warning, Some(RankEvent::DecayWarning));
    tracker.complete_session(25, "history").unwrap();
    assert_eq!(tracker.pending_warning(), None);

    clock.advance(Duration::hours(30));
    let report = tracker.check_decay();
    assert_eq!(report.warning, None);
    assert_eq!(report.demotion, None);
    assert_eq!(tracker.rank(), Rank::new(RankTier::Bronze, 2, 100));
}

#[test]
fn test_large_gain_stops_after_one_transition() {
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
fn test_web_client_record_is_adopted() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store
        .set(
            "studybuddy_stats:student",
            r#"{ "xp": 700, "totalFocusMinutes": 340, "activeChallenges": [] }"#,
        )
        .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(now));
    let tracker = open(&dir, clock, Arc::new(CollectingSink::new()));
    assert_eq!(tracker.rank(), Rank::new(RankTier::Bronze, 1, 700));
    assert_eq!(tracker.activity().last_activity_date, now);

    let record = tracker.snapshot();
    assert_eq!(record.total_focus_minutes, 340.0);
    assert!(record.active_challenges.is_empty());

    assert!(tracker
        .update_challenge(ChallengeKind::Focus, 5)
        .completed
        .is_empty());
}
