//! Basic CLI E2E tests.
//!
//! Each test runs the built `nisba` binary against its own temporary
//! data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_nisba"))
        .args(args)
        .env("NISBA_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not one JSON document")
}

/// Commands that print several pretty-printed documents in a row.
fn run_json_stream(data_dir: &TempDir, args: &[&str]) -> Vec<Value> {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::Deserializer::from_str(&stdout)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is not a JSON stream")
}

#[test]
fn test_task_add_and_list() {
    let dir = TempDir::new().unwrap();
    let task = run_json(&dir, &["task", "add", "Write report", "--priority", "high"]);
    assert_eq!(task["title"], "Write report");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["completed"], false);

    let list = run_json(&dir, &["task", "list"]);
    assert_eq!(list["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(list["counts"]["pending"], 1);
}

#[test]
fn test_task_toggle_and_filter() {
    let dir = TempDir::new().unwrap();
    let task = run_json(&dir, &["task", "add", "Call back"]);
    let id = task["id"].as_str().unwrap();

    let toggle = run_json(&dir, &["task", "toggle", id]);
    assert_eq!(toggle["became_complete"], true);
    assert_eq!(toggle["all_done"], true);

    let done = run_json(&dir, &["task", "list", "--filter", "completed"]);
    assert_eq!(done["tasks"][0]["id"], id);
    let pending = run_json(&dir, &["task", "list", "--filter", "pending"]);
    assert!(pending["tasks"].as_array().unwrap().is_empty());
}

#[test]
fn test_task_blank_title_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
}

#[test]
fn test_task_delete_unknown_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["task", "delete", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("nope"));
}

#[test]
fn test_habit_list_has_starters() {
    let dir = TempDir::new().unwrap();
    let habits = run_json(&dir, &["habit", "list"]);
    let habits = habits.as_array().unwrap();
    assert_eq!(habits.len(), 5);
    assert_eq!(habits[0]["progressPct"], 0);
}

#[test]
fn test_habit_toggle_updates_stats() {
    let dir = TempDir::new().unwrap();
    let habit = run_json(&dir, &["habit", "add", "Read", "--category", "learning"]);
    assert_eq!(habit["color"], "green");
    let id = habit["id"].as_str().unwrap();

    let outcome = run_json(&dir, &["habit", "toggle", id]);
    assert_eq!(outcome["completed"], true);
    assert_eq!(outcome["streak"], 1);
    assert_eq!(outcome["day_streak"], 1);

    let stats = run_json(&dir, &["stats", "show"]);
    assert_eq!(stats["totalCompletions"], 1);
    assert_eq!(stats["currentStreak"], 1);

    let summary = run_json(&dir, &["stats", "summary"]);
    assert_eq!(summary["completed_today"], 1);
    assert_eq!(summary["total_habits"], 6);
}

#[test]
fn test_timer_start_then_pause() {
    let dir = TempDir::new().unwrap();
    let started = run_json_stream(&dir, &["timer", "start"]);
    assert_eq!(started[0]["type"], "timer_started");
    assert_eq!(started.last().unwrap()["running"], true);

    let paused = run_json_stream(&dir, &["timer", "pause"]);
    assert_eq!(paused[0]["type"], "timer_paused");
    assert_eq!(paused.last().unwrap()["running"], false);
}

#[test]
fn test_timer_select_long_break() {
    let dir = TempDir::new().unwrap();
    let out = run_json_stream(&dir, &["timer", "select", "long-break"]);
    assert_eq!(out[0]["type"], "session_selected");
    let status = run_json_stream(&dir, &["timer", "status"]);
    let snapshot = status.last().unwrap();
    assert_eq!(snapshot["session"], "longBreak");
    assert_eq!(snapshot["remaining_secs"], 15 * 60);
    assert_eq!(snapshot["display"], "15:00");
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "set", "work_minutes", "30"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(&dir, &["config", "get", "work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let status = run_json_stream(&dir, &["timer", "status"]);
    assert_eq!(status.last().unwrap()["remaining_secs"], 30 * 60);
}

#[test]
fn test_config_rejects_out_of_range() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "work_minutes", "90"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("work_minutes"), "stderr: {stderr}");

    let (_, _, code) = run_cli(&dir, &["config", "get", "no_such_key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_today_in_english() {
    let dir = TempDir::new().unwrap();
    let today = run_json(&dir, &["today", "--language", "en"]);
    assert!(today["greeting"].as_str().unwrap().starts_with("Good"));
    assert_eq!(today["quote"]["language"], "en");
}

#[test]
fn test_welcome_only_first_visit() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_json(&dir, &["welcome"])["firstVisit"], true);
    assert_eq!(run_json(&dir, &["welcome"])["firstVisit"], false);
}

#[test]
fn test_sound_list_and_describe() {
    let dir = TempDir::new().unwrap();
    let list = run_json(&dir, &["sound", "list"]);
    assert_eq!(list["cues"].as_array().unwrap().len(), 7);
    assert_eq!(list["ambient"][0], "forest");

    let click = run_json(&dir, &["sound", "describe", "button-click"]);
    assert_eq!(click["voices"][0]["freq_hz"], 800.0);
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("nisba"));
}
