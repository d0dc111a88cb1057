use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::Subcommand;
use nisba_core::daily::app_offset;
use nisba_core::task::TaskToggle;
use nisba_core::{Cue, Priority, TaskDraft, TaskFilter};
use serde_json::json;

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date: RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD` (app time)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// List tasks
    List {
        /// all, pending, completed or overdue
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Toggle a task's completion
    Toggle {
        id: String,
    },
    /// Delete a task
    Delete {
        id: String,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let now = Utc::now();
    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            due,
        } => {
            let mut app = open_app(Audio::Silent)?;
            let mut draft = TaskDraft::new(title)
                .description(description)
                .priority(priority);
            if let Some(due) = due {
                draft = draft.due(due);
            }
            let task = app.add_task(draft, now)?;
            print_json(&task)?;
        }
        TaskAction::List { filter } => {
            let app = open_app(Audio::Silent)?;
            let tasks = app.tasks().filter(filter, now);
            print_json(&json!({
                "tasks": tasks,
                "counts": app.tasks().counts(now),
            }))?;
        }
        TaskAction::Toggle { id } => {
            let mut app = open_app(Audio::System)?;
            let toggle = app.toggle_task(&id, now)?;
            print_json(&toggle)?;
            if let Some(cue) = longest_cue(&toggle) {
                linger(&app, app.effects().is_enabled(), cue);
            }
        }
        TaskAction::Delete { id } => {
            let mut app = open_app(Audio::Silent)?;
            let task = app.delete_task(&id)?;
            print_json(&json!({ "deleted": task.id }))?;
        }
    }
    Ok(())
}

/// The cue that finishes last among those a toggle plays. Completing the
/// final open task plays both cues together.
fn longest_cue(toggle: &TaskToggle) -> Option<Cue> {
    if !toggle.became_complete {
        return None;
    }
    if !toggle.all_done {
        return Some(Cue::TaskComplete);
    }
    [Cue::TaskComplete, Cue::Achievement]
        .into_iter()
        .max_by(|a, b| a.duration_secs().total_cmp(&b.duration_secs()))
}

/// Local forms are read in the app's fixed zone; a bare date means the
/// end of that day.
fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let local = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)))
        })
        .map_err(|_| format!("invalid due date: {s}"))?;
    app_offset()
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("invalid due date: {s}"))
}
