use clap::Subcommand;
use nisba_core::{ConfigError, Cue, Preferences};

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a preference value
    Get {
        /// Preference key (e.g. "language", "work_minutes")
        key: String,
    },
    /// Set a preference value
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },
    /// List all preferences
    List,
    /// Reset preferences to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let prefs = Preferences::load_or_default();
            match prefs.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut app = open_app(Audio::System)?;
            let was_enabled = app.preferences().ui_sounds;
            app.set_preference(&key, &value)?;
            let switched_on = !was_enabled && app.preferences().ui_sounds;
            linger(&app, switched_on, Cue::ButtonClick);
            println!("ok");
        }
        ConfigAction::List => {
            let prefs = Preferences::load_or_default();
            print_json(&prefs)?;
        }
        ConfigAction::Reset => {
            let mut app = open_app(Audio::Silent)?;
            app.reset_preferences()?;
            println!("preferences reset to defaults");
        }
    }
    Ok(())
}
