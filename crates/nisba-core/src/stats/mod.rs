//! Habit statistics: the date-aware day streak and the summary panel.

mod streak;
mod summary;

pub use streak::{HabitStats, StreakUpdate};
pub use summary::{HabitSummary, RateBand};
