use clap::Subcommand;
use nisba_core::{AmbientSound, Cue};
use serde_json::json;

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum SoundAction {
    /// List sound cues and ambient sounds
    List,
    /// Print the voice table of a cue
    Describe {
        /// Cue name, e.g. task-complete
        cue: Cue,
        /// Master volume 0.0 - 1.0
        #[arg(long, default_value_t = 1.0)]
        volume: f32,
    },
    /// Play a cue through the audio output
    Play {
        cue: Cue,
    },
}

pub fn run(action: SoundAction) -> CliResult {
    match action {
        SoundAction::List => {
            let cues: Vec<_> = Cue::ALL
                .iter()
                .map(|cue| {
                    json!({
                        "name": cue.as_str(),
                        "ui": cue.is_ui(),
                        "durationSecs": cue.duration_secs(),
                    })
                })
                .collect();
            let ambient: Vec<_> = AmbientSound::ALL.iter().map(|s| s.id()).collect();
            print_json(&json!({ "cues": cues, "ambient": ambient }))?;
        }
        SoundAction::Describe { cue, volume } => {
            print_json(&json!({
                "name": cue.as_str(),
                "durationSecs": cue.duration_secs(),
                "voices": cue.voices(volume),
            }))?;
        }
        SoundAction::Play { cue } => {
            let mut app = open_app(Audio::System)?;
            let played = app.play_cue(cue);
            print_json(&json!({ "cue": cue.as_str(), "played": played }))?;
            linger(&app, played, cue);
        }
    }
    Ok(())
}
