//! Profile identity and persistence of progression records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::store::PersistentStore;
use crate::error::{Result, ValidationError};
use crate::progress::ProgressRecord;
use crate::rank::{Rank, RankTier};

/// Prefix of the store key holding a profile's record.
pub const RECORD_KEY_PREFIX: &str = "studybuddy_stats";

/// Identifies whose progression a record holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: &str) -> Result<Self, ValidationError> {
        let valid = !id.is_empty()
            && id.len() <= 64
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if !valid {
            return Err(ValidationError::InvalidValue {
                field: "profile".into(),
                message: format!(
                    "'{id}' must be 1-64 characters of letters, digits, '_' or '-'"
                ),
            });
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self("default".into())
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProfileId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProfileId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> Self {
        id.0
    }
}

/// Store key for a profile's record.
pub fn record_key(profile: &ProfileId) -> String {
    format!("{RECORD_KEY_PREFIX}:{profile}")
}

/// Load a profile's record, never failing.
///
/// Missing or unreadable data yields a fresh record. Records from before
/// ranks existed (a flat `xp` counter, no `rank`) become Bronze 1 with that
/// XP and restart the decay clock at `now`.
pub fn load_record(
    store: &dyn PersistentStore,
    profile: &ProfileId,
    now: DateTime<Utc>,
) -> ProgressRecord {
    let key = record_key(profile);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(%profile, "no stored record, starting fresh");
            return ProgressRecord::new(now);
        }
        Err(e) => {
            tracing::warn!(%profile, error = %e, "failed to read record, starting fresh");
            return ProgressRecord::new(now);
        }
    };

    match parse_record(&raw, now) {
        Ok(mut record) => {
            record.rank = record.rank.normalized();
            record
        }
        Err(e) => {
            tracing::warn!(%profile, error = %e, "malformed record, starting fresh");
            ProgressRecord::new(now)
        }
    }
}

fn parse_record(raw: &str, now: DateTime<Utc>) -> Result<ProgressRecord> {
    let mut value: serde_json::Value = serde_json::from_str(raw)?;
    let Some(obj) = value.as_object_mut() else {
        return Err(ValidationError::InvalidValue {
            field: "record".into(),
            message: "expected a JSON object".into(),
        }
        .into());
    };

    let now_ms = serde_json::Value::from(now.timestamp_millis());
    if !obj.contains_key("rank") {
        let xp = obj
            .remove("xp")
            .as_ref()
            .and_then(serde_json::Value::as_u64)
            .map_or(0, |xp| u32::try_from(xp).unwrap_or(u32::MAX));
        tracing::info!(xp, "migrating legacy record");
        let rank = Rank::new(RankTier::Bronze, 1, xp).normalized();
        obj.insert("rank".into(), serde_json::to_value(rank)?);
        obj.insert("lastActivityDate".into(), now_ms);
    } else if !obj.contains_key("lastActivityDate") {
        obj.insert("lastActivityDate".into(), now_ms);
    }

    Ok(serde_json::from_value(value)?)
}

/// Write a profile's record.
pub fn save_record(
    store: &dyn PersistentStore,
    profile: &ProfileId,
    record: &ProgressRecord,
) -> Result<()> {
    let content = serde_json::to_string(record)?;
    store.set(&record_key(profile), &content)?;
    Ok(())
}
