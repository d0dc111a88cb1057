//! Aggregate habit completion statistics and the day streak.
//!
//! A streak counts consecutive calendar days with at least one completion.
//! Completions are only ever added; un-completing a habit does not touch
//! these numbers.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a completion changed the current streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakUpdate {
    /// Another completion on the day already counted.
    Unchanged,
    /// First completion on the day after the last one.
    Extended,
    /// First completion ever, or the chain was broken.
    Restarted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    #[serde(default)]
    total_completions: u64,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    longest_streak: u32,
    #[serde(default)]
    completion_history: BTreeMap<NaiveDate, u32>,
    /// Serialized as `""` when there has been no completion yet.
    #[serde(default, with = "date_or_empty")]
    last_completion_date: Option<NaiveDate>,
}

impl HabitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_completions(&self) -> u64 {
        self.total_completions
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_completion_date(&self) -> Option<NaiveDate> {
        self.last_completion_date
    }

    pub fn completion_history(&self) -> &BTreeMap<NaiveDate, u32> {
        &self.completion_history
    }

    /// Completions recorded on `date`.
    pub fn completions_on(&self, date: NaiveDate) -> u32 {
        self.completion_history.get(&date).copied().unwrap_or(0)
    }

    /// Number of distinct days with at least one completion.
    pub fn active_days(&self) -> usize {
        self.completion_history.values().filter(|n| **n > 0).count()
    }

    /// Record one habit completion on `date`.
    pub fn record_completion(&mut self, date: NaiveDate) -> StreakUpdate {
        self.total_completions += 1;
        *self.completion_history.entry(date).or_insert(0) += 1;

        let update = match self.last_completion_date {
            Some(last) if last == date => StreakUpdate::Unchanged,
            Some(last) if last.checked_add_days(Days::new(1)) == Some(date) => {
                self.current_streak += 1;
                StreakUpdate::Extended
            }
            _ => {
                self.current_streak = 1;
                StreakUpdate::Restarted
            }
        };

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_completion_date = Some(date);
        debug!(
            %date,
            current = self.current_streak,
            longest = self.longest_streak,
            ?update,
            "habit completion recorded"
        );
        update
    }

    /// Repair data loaded from older or hand-edited files so the invariants
    /// hold again. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.longest_streak < self.current_streak {
            warn!(
                current = self.current_streak,
                longest = self.longest_streak,
                "longest streak below current streak, raising it"
            );
            self.longest_streak = self.current_streak;
            changed = true;
        }
        let recorded: u64 = self.completion_history.values().map(|n| u64::from(*n)).sum();
        if self.total_completions < recorded {
            warn!(
                total = self.total_completions,
                recorded, "total completions below history sum, raising it"
            );
            self.total_completions = recorded;
            changed = true;
        }
        changed
    }
}

mod date_or_empty {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
