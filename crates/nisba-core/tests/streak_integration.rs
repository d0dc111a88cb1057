//! Integration tests for the day streak.

use chrono::{Days, NaiveDate};
use nisba_core::{HabitStats, StreakUpdate};
use proptest::prelude::*;

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(n))
        .unwrap()
}

#[test]
fn a_month_of_daily_completions() {
    let mut stats = HabitStats::new();
    for n in 0..31 {
        stats.record_completion(day(n));
        stats.record_completion(day(n));
    }
    assert_eq!(stats.current_streak(), 31);
    assert_eq!(stats.longest_streak(), 31);
    assert_eq!(stats.total_completions(), 62);
    assert_eq!(stats.active_days(), 31);
}

#[test]
fn one_day_gap_breaks_the_chain() {
    let mut stats = HabitStats::new();
    stats.record_completion(day(0));
    stats.record_completion(day(1));
    assert_eq!(stats.record_completion(day(3)), StreakUpdate::Restarted);
    assert_eq!(stats.current_streak(), 1);
    assert_eq!(stats.longest_streak(), 2);
}

#[test]
fn stored_document_survives_roundtrip() {
    let mut stats = HabitStats::new();
    for n in [0, 1, 2, 5] {
        stats.record_completion(day(n));
    }
    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"lastCompletionDate\":\"2024-01-06\""));
    let back: HabitStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stats);
}

proptest! {
    #[test]
    fn longest_never_decreases_and_bounds_current(gaps in prop::collection::vec(0u64..4, 1..60)) {
        let mut stats = HabitStats::new();
        let mut offset = 0;
        let mut prev_longest = 0;
        for gap in gaps {
            offset += gap;
            stats.record_completion(day(offset));
            prop_assert!(stats.longest_streak() >= prev_longest);
            prop_assert!(stats.longest_streak() >= stats.current_streak());
            prev_longest = stats.longest_streak();
        }
    }

    #[test]
    fn history_sums_to_total(days in prop::collection::vec(0u64..30, 0..80)) {
        let mut stats = HabitStats::new();
        for n in &days {
            stats.record_completion(day(*n));
        }
        let sum: u64 = stats.completion_history().values().map(|n| u64::from(*n)).sum();
        prop_assert_eq!(sum, stats.total_completions());
        prop_assert_eq!(stats.total_completions(), days.len() as u64);
    }
}
