//! Daily study streak derived from session dates.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub last_log_date: Option<NaiveDate>,
    #[serde(default)]
    pub best: u32,
}

impl StreakData {
    /// Replace the current value, raising `best` if it was beaten.
    pub fn update(&mut self, current: u32, last_log_date: Option<NaiveDate>) {
        self.current = current;
        self.best = self.best.max(current);
        if last_log_date.is_some() {
            self.last_log_date = last_log_date;
        }
    }
}

/// Count of consecutive study days ending today or yesterday.
///
/// A day without a session yesterday or today breaks the streak. If today
/// has no session yet the streak is still alive and counts back from
/// yesterday.
pub fn daily_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let yesterday = today - Duration::days(1);

    let mut check = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&check) {
        streak += 1;
        check -= Duration::days(1);
    }
    streak
}
