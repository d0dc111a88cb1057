//! Shared plumbing for the subcommands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nisba_core::{storage, App, AudioOutput, Cue};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Whether a command opens the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audio {
    System,
    Silent,
}

/// Open the app on the data directory.
pub fn open_app(audio: Audio) -> CliResult<App> {
    let dir = storage::data_dir()?;
    let output = match audio {
        Audio::System => AudioOutput::system(assets_dir(&dir)),
        Audio::Silent => AudioOutput::silent(),
    };
    Ok(App::open(&dir, output)?)
}

/// `NISBA_ASSETS_DIR`, else the data directory. Ambient loops are looked
/// up as `sounds/<id>.mp3` below it.
fn assets_dir(data_dir: &Path) -> PathBuf {
    std::env::var_os("NISBA_ASSETS_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.to_path_buf())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Keep the process alive until `cue` has played out. Clips are
/// fire-and-forget, so exiting right away would cut them off.
pub fn linger(app: &App, played: bool, cue: Cue) {
    if played && app.effects().has_output() {
        std::thread::sleep(Duration::from_secs_f32(cue.duration_secs()));
    }
}
