//! Progress tracker: the single owner of a profile's record.
//!
//! Every operation locks the record, applies the rank engine, persists the
//! result and then hands emitted events to the notification sink. Saves
//! are best-effort; a failed write is logged and the in-memory state stays
//! authoritative.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use super::challenge::ChallengeKind;
use super::mastery::{rate_topic, Difficulty, TopicMastery};
use super::record::{FailureType, ProgressRecord, StudySession};
use super::streak::daily_streak;
use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::RankEvent;
use crate::notify::NotificationSink;
use crate::rank::{ActivityState, Rank, RankEngine};
use crate::storage::{
    load_record, record_key, save_record, Config, PersistentStore, ProfileId, RewardsConfig,
};

/// Result of advancing challenges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeUpdate {
    /// Ids of challenges completed by this update.
    pub completed: Vec<String>,
    pub events: Vec<RankEvent>,
}

/// Result of completing a focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub session: StudySession,
    pub rank: Rank,
    pub daily_streak: u32,
    pub completed_challenges: Vec<String>,
    pub events: Vec<RankEvent>,
}

/// Result of a decay check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayReport {
    pub rank: Rank,
    pub hours_inactive: i64,
    pub warning: Option<RankEvent>,
    pub demotion: Option<RankEvent>,
}

struct TrackerState {
    record: ProgressRecord,
    pending_warning: Option<RankEvent>,
}

pub struct ProgressTracker {
    profile: ProfileId,
    engine: RankEngine,
    rewards: RewardsConfig,
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    /// Load `profile` from `store`, falling back to a fresh record.
    pub fn open(
        profile: ProfileId,
        store: Arc<dyn PersistentStore>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
        config: &Config,
    ) -> Self {
        let record = load_record(store.as_ref(), &profile, clock.now());
        tracing::debug!(%profile, rank = %record.rank, "opened profile");
        Self {
            profile,
            engine: RankEngine::with_policy(config.decay),
            rewards: config.rewards.clone(),
            store,
            clock,
            sink,
            state: Mutex::new(TrackerState {
                record,
                pending_warning: None,
            }),
        }
    }

    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    pub fn snapshot(&self) -> ProgressRecord {
        self.lock().record.clone()
    }

    pub fn rank(&self) -> Rank {
        self.lock().record.rank
    }

    pub fn activity(&self) -> ActivityState {
        self.lock().record.activity
    }

    /// Warning raised by the last decay check, until activity clears it.
    pub fn pending_warning(&self) -> Option<RankEvent> {
        self.lock().pending_warning
    }

    /// Apply inactivity decay at the current time.
    pub fn check_decay(&self) -> DecayReport {
        self.mutate(|engine, state, now, events| {
            let record = &mut state.record;
            let outcome = engine.check_decay(now, &record.activity, &record.rank);
            record.rank = outcome.rank;
            record.activity = outcome.activity;
            state.pending_warning = outcome.warning;
            events.extend(outcome.warning);
            events.extend(outcome.demotion);
            DecayReport {
                rank: outcome.rank,
                hours_inactive: engine.inactivity(now, &record.activity).num_hours(),
                warning: outcome.warning,
                demotion: outcome.demotion,
            }
        })
    }

    /// Mark a qualifying activity, restarting the decay clock.
    pub fn record_activity(&self) -> ActivityState {
        self.mutate(|engine, state, now, _| {
            touch(engine, state, now);
            state.record.activity
        })
    }

    /// Grant XP. Any XP gain also counts as activity.
    pub fn award_xp(&self, amount: u32) -> Vec<RankEvent> {
        self.mutate(|engine, state, now, events| {
            award(engine, state, now, amount, events);
            events.clone()
        })
    }

    /// Advance every open challenge of `kind`, paying out completed ones.
    pub fn update_challenge(&self, kind: ChallengeKind, increment: u32) -> ChallengeUpdate {
        self.mutate(|engine, state, now, events| {
            let completed = advance_challenges(engine, state, now, kind, increment, events);
            ChallengeUpdate {
                completed,
                events: events.clone(),
            }
        })
    }

    /// Record a finished focus session.
    ///
    /// # Errors
    ///
    /// Returns a validation error for zero-minute sessions or an empty subject.
    pub fn complete_session(&self, minutes: u32, subject: &str) -> Result<SessionOutcome> {
        if minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "minutes".into(),
                message: "a session must last at least one minute".into(),
            }
            .into());
        }
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "subject".into(),
                message: "must not be empty".into(),
            }
            .into());
        }

        let session_xp = self.rewards.session_xp;
        Ok(self.mutate(|engine, state, now, events| {
            let session = StudySession {
                date: now.date_naive(),
                minutes,
                subject: subject.to_string(),
            };
            state.record.sessions.push(session.clone());
            state.record.total_focus_minutes += f64::from(minutes);

            award(engine, state, now, session_xp, events);
            let completed =
                advance_challenges(engine, state, now, ChallengeKind::Focus, 1, events);
            let daily_streak = refresh_daily_streak(state, now);

            SessionOutcome {
                session,
                rank: state.record.rank,
                daily_streak,
                completed_challenges: completed,
                events: events.clone(),
            }
        }))
    }

    /// Count a wrong answer against the failure profile.
    pub fn log_mistake(&self, failure: FailureType) -> u32 {
        self.mutate(|engine, state, now, _| {
            touch(engine, state, now);
            let count = state.record.failure_profile.entry(failure).or_insert(0);
            *count += 1;
            *count
        })
    }

    /// Count reviewed flashcards toward the card challenges.
    pub fn review_cards(&self, count: u32) -> ChallengeUpdate {
        self.mutate(|engine, state, now, events| {
            state.record.cards_reviewed = state.record.cards_reviewed.saturating_add(count);
            let completed =
                advance_challenges(engine, state, now, ChallengeKind::Flashcard, count, events);
            ChallengeUpdate {
                completed,
                events: events.clone(),
            }
        })
    }

    /// Rate a reviewed card's topic, adjusting its mastery score.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty topic.
    pub fn update_mastery(
        &self,
        topic: &str,
        subject: &str,
        difficulty: Difficulty,
    ) -> Result<TopicMastery> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "topic".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        Ok(self.mutate(|_, state, _, _| {
            rate_topic(&mut state.record.topic_mastery, topic, subject.trim(), difficulty)
        }))
    }

    /// Periodic tick adding elapsed on-screen study time. Not an activity.
    pub fn add_focus_time(&self, elapsed: Duration) -> f64 {
        self.mutate(|_, state, _, _| {
            let minutes = elapsed.num_milliseconds().max(0) as f64 / 60_000.0;
            state.record.total_focus_minutes += minutes;
            state.record.total_focus_minutes
        })
    }

    /// Recompute the daily streak from recorded sessions.
    pub fn refresh_streak(&self) -> u32 {
        self.mutate(|_, state, now, _| refresh_daily_streak(state, now))
    }

    /// Drop the stored record and start over.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock();
        self.store.remove(&record_key(&self.profile))?;
        state.record = ProgressRecord::new(self.clock.now());
        state.pending_warning = None;
        tracing::info!(profile = %self.profile, "profile reset");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Read-modify-write under the lock, persist, then notify outside it.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&RankEngine, &mut TrackerState, DateTime<Utc>, &mut Vec<RankEvent>) -> R,
    ) -> R {
        let mut events = Vec::new();
        let result = {
            let mut state = self.lock();
            let now = self.clock.now();
            let result = f(&self.engine, &mut *state, now, &mut events);
            if let Err(e) = save_record(self.store.as_ref(), &self.profile, &state.record) {
                tracing::warn!(profile = %self.profile, error = %e, "failed to persist record");
            }
            result
        };
        for event in &events {
            self.sink.notify(event);
        }
        result
    }
}

fn touch(engine: &RankEngine, state: &mut TrackerState, now: DateTime<Utc>) {
    state.record.activity = engine.record_activity(now, &state.record.activity);
    state.pending_warning = None;
}

fn award(
    engine: &RankEngine,
    state: &mut TrackerState,
    now: DateTime<Utc>,
    amount: u32,
    events: &mut Vec<RankEvent>,
) {
    touch(engine, state, now);
    let outcome = engine.gain_xp(amount, &state.record.rank);
    state.record.rank = outcome.rank;
    events.extend(outcome.event);
}

fn advance_challenges(
    engine: &RankEngine,
    state: &mut TrackerState,
    now: DateTime<Utc>,
    kind: ChallengeKind,
    increment: u32,
    events: &mut Vec<RankEvent>,
) -> Vec<String> {
    let mut completed = Vec::new();
    let mut rewards = Vec::new();
    for challenge in state
        .record
        .active_challenges
        .iter_mut()
        .filter(|c| c.kind == kind)
    {
        if challenge.advance(increment) {
            tracing::info!(id = %challenge.id, xp = challenge.xp_reward, "challenge completed");
            completed.push(challenge.id.clone());
            rewards.push(challenge.xp_reward);
        }
    }
    // Each payout is its own XP gain, so each may trigger one transition.
    for xp in rewards {
        award(engine, state, now, xp, events);
    }
    completed
}

fn refresh_daily_streak(state: &mut TrackerState, now: DateTime<Utc>) -> u32 {
    let record = &mut state.record;
    let today = now.date_naive();
    let current = daily_streak(record.session_dates(), today);
    let last = record.session_dates().max();
    record.streaks.daily.update(current, last);
    current
}
