use chrono::Utc;
use clap::Subcommand;
use nisba_core::daily::app_today;
use nisba_core::{Cue, HabitCategory, HabitDraft};
use serde_json::json;

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit
    Add {
        /// Habit title
        title: String,
        /// health, learning, lifestyle, mindfulness or productivity
        #[arg(long, default_value = "health")]
        category: HabitCategory,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List habits
    List,
    /// Toggle today's completion of a habit
    Toggle {
        id: String,
    },
    /// Delete a habit
    Delete {
        id: String,
    },
}

pub fn run(action: HabitAction) -> CliResult {
    match action {
        HabitAction::Add {
            title,
            category,
            description,
        } => {
            let mut app = open_app(Audio::Silent)?;
            let habit = app.add_habit(HabitDraft::new(title, category).description(description))?;
            print_json(&habit)?;
        }
        HabitAction::List => {
            let app = open_app(Audio::Silent)?;
            let mut habits = Vec::with_capacity(app.habits().len());
            for habit in app.habits().iter() {
                let mut value = serde_json::to_value(habit)?;
                value["progressPct"] = json!(habit.progress_pct());
                habits.push(value);
            }
            print_json(&habits)?;
        }
        HabitAction::Toggle { id } => {
            let mut app = open_app(Audio::System)?;
            let outcome = app.toggle_habit(&id, app_today(Utc::now()))?;
            print_json(&outcome)?;
            let played = outcome.streak_update.is_some() && app.effects().is_enabled();
            linger(&app, played, Cue::HabitComplete);
        }
        HabitAction::Delete { id } => {
            let mut app = open_app(Audio::Silent)?;
            let habit = app.delete_habit(&id)?;
            print_json(&json!({ "deleted": habit.id }))?;
        }
    }
    Ok(())
}
