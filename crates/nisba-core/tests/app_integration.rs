//! Integration tests for the app state on disk.
//!
//! Each test opens a fresh data directory, mutates state through `App`,
//! then reopens the directory to check what survived.

use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use nisba_core::storage::database::{KEY_HABIT_STATS, KEY_TASKS};
use nisba_core::{
    App, AudioOutput, Database, HabitCategory, HabitDraft, Language, SessionType, TaskDraft,
    TaskFilter,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> App {
    App::open(dir.path(), AudioOutput::silent()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn fresh_directory_gets_defaults_and_starter_habits() {
    let dir = TempDir::new().unwrap();
    let app = open(&dir);
    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("nisba.db").exists());
    assert_eq!(app.preferences().language, Language::Ar);
    assert_eq!(app.habits().len(), 5);
    assert!(app.tasks().is_empty());
    assert_eq!(app.stats().current_streak(), 0);
}

#[test]
fn tasks_and_habits_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let (task_id, habit_id) = {
        let mut app = open(&dir);
        let task = app.add_task(TaskDraft::new("write report"), now).unwrap();
        app.add_task(TaskDraft::new("call back"), now).unwrap();
        app.toggle_task(&task.id, now).unwrap();
        let habit = app
            .add_habit(HabitDraft::new("stretch", HabitCategory::Health))
            .unwrap();
        app.toggle_habit(&habit.id, day(1)).unwrap();
        (task.id, habit.id)
    };

    let app = open(&dir);
    assert_eq!(app.tasks().len(), 2);
    assert!(app.tasks().get(&task_id).unwrap().completed);
    assert_eq!(app.tasks().filter(TaskFilter::Pending, now).len(), 1);
    assert_eq!(app.habits().len(), 6);
    assert!(app.habits().get(&habit_id).unwrap().completed);
    assert_eq!(app.stats().total_completions(), 1);
    assert_eq!(app.stats().last_completion_date(), Some(day(1)));
}

#[test]
fn deleting_every_habit_does_not_reseed() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = open(&dir);
        let ids: Vec<String> = app.habits().iter().map(|h| h.id.clone()).collect();
        for id in ids {
            app.delete_habit(&id).unwrap();
        }
    }
    assert!(open(&dir).habits().is_empty());
}

#[test]
fn streak_counts_calendar_days() {
    let dir = TempDir::new().unwrap();
    let mut app = open(&dir);
    let ids: Vec<String> = app.habits().iter().map(|h| h.id.clone()).collect();

    app.toggle_habit(&ids[0], day(1)).unwrap();
    app.toggle_habit(&ids[1], day(1)).unwrap();
    let outcome = app.toggle_habit(&ids[2], day(2)).unwrap();
    assert_eq!(outcome.day_streak, 2);

    // Unchecking never touches the day streak.
    let undo = app.toggle_habit(&ids[2], day(2)).unwrap();
    assert!(undo.streak_update.is_none());
    assert_eq!(undo.day_streak, 2);

    let summary = app.summary(day(2));
    assert_eq!(summary.today_completions, 1);
    assert_eq!(summary.total_completions, 3);
    assert_eq!(summary.completed_today, 2);
}

#[test]
fn malformed_state_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    {
        let db = Database::open_at(&dir.path().join("nisba.db")).unwrap();
        db.kv_set(KEY_TASKS, "[{\"broken\":").unwrap();
        db.kv_set(KEY_HABIT_STATS, "not json").unwrap();
    }
    let app = open(&dir);
    assert!(app.tasks().is_empty());
    assert_eq!(app.stats().total_completions(), 0);
}

#[test]
fn preferences_persist_and_reach_the_timer() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = open(&dir);
        app.set_preference("work_minutes", "40").unwrap();
        app.set_preference("auto_break", "true").unwrap();
        assert!(app.set_preference("work_minutes", "42").is_err());
    }
    let app = open(&dir);
    assert_eq!(app.preferences().work_minutes, 40);
    assert_eq!(app.engine().remaining_secs(), 40 * 60);
    assert!(app.engine().auto_advance());
}

#[test]
fn timer_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut app = open(&dir);
        app.start_timer().unwrap();
        app.advance_timer(Duration::from_secs(25 * 60));
        app.pause_timer().unwrap();
        app.save_all().unwrap();
    }
    let app = open(&dir);
    assert_eq!(app.engine().session(), SessionType::ShortBreak);
    assert_eq!(app.engine().completed_sessions(), 1);
    assert!(!app.engine().is_running());
}
