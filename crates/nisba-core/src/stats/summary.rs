use chrono::NaiveDate;
use serde::Serialize;

use super::streak::HabitStats;
use crate::habit::HabitList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBand {
    High,
    Medium,
    Low,
}

impl RateBand {
    pub fn from_pct(pct: u32) -> Self {
        match pct {
            80.. => RateBand::High,
            60..=79 => RateBand::Medium,
            _ => RateBand::Low,
        }
    }
}

/// Figures for the "today" statistics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub completed_today: usize,
    pub total_habits: usize,
    /// Completions recorded in the history for today.
    pub today_completions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub active_days: usize,
    pub total_completions: u64,
    /// Completed habits over total habits, rounded. 0 with no habits.
    pub completion_rate_pct: u32,
    pub rate_band: RateBand,
}

impl HabitSummary {
    pub fn compute(stats: &HabitStats, habits: &HabitList, today: NaiveDate) -> Self {
        let completed_today = habits.completed_count();
        let total_habits = habits.len();
        let completion_rate_pct = if total_habits == 0 {
            0
        } else {
            ((completed_today * 100 + total_habits / 2) / total_habits) as u32
        };
        Self {
            completed_today,
            total_habits,
            today_completions: stats.completions_on(today),
            current_streak: stats.current_streak(),
            longest_streak: stats.longest_streak(),
            active_days: stats.active_days(),
            total_completions: stats.total_completions(),
            completion_rate_pct,
            rate_band: RateBand::from_pct(completion_rate_pct),
        }
    }
}
