//! # StudyBuddy Core Library
//!
//! This library provides the progression logic behind StudyBuddy: ranks,
//! XP, inactivity decay and the study bookkeeping that feeds them. All
//! operations are available through the standalone CLI binary; any GUI is
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Rank Engine**: A pure, wall-clock-driven state machine. Callers pass
//!   the current time in and persist what comes out
//! - **Progress Tracker**: Owns one profile's record behind a mutex,
//!   applies the engine and saves after every mutation
//! - **Storage**: Opaque key-value store for records and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`RankEngine`]: XP gain and decay state machine
//! - [`ProgressTracker`]: Per-profile service over the engine
//! - [`PersistentStore`]: Key-value persistence trait
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod progress;
pub mod rank;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::RankEvent;
pub use notify::{CollectingSink, NotificationSink, TracingSink};
pub use progress::{
    ChallengeKind, ChallengeUpdate, DecayReport, Difficulty, FailureType, ProgressRecord,
    ProgressTracker, SessionOutcome, TopicMastery,
};
pub use rank::{ActivityState, DecayPolicy, Rank, RankEngine, RankTier};
pub use storage::{Config, FileStore, MemoryStore, PersistentStore, ProfileId};
