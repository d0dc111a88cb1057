//! Looping background sound for focus sessions.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::sink::AmbientBackend;
use crate::error::AudioError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientSound {
    #[default]
    Forest,
    Rain,
    Jazz,
    Cafe,
}

impl AmbientSound {
    pub const ALL: [AmbientSound; 4] = [
        AmbientSound::Forest,
        AmbientSound::Rain,
        AmbientSound::Jazz,
        AmbientSound::Cafe,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AmbientSound::Forest => "forest",
            AmbientSound::Rain => "rain",
            AmbientSound::Jazz => "jazz",
            AmbientSound::Cafe => "cafe",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id.trim())
    }

    /// `<root>/sounds/<id>.mp3`
    pub fn asset_path(&self, root: &Path) -> PathBuf {
        root.join("sounds").join(format!("{}.mp3", self.id()))
    }
}

impl fmt::Display for AmbientSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AmbientSound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown ambient sound: {s}"))
    }
}

/// Tracks which ambient sound is wanted and whether it is audible.
///
/// Playback the platform refuses (no user gesture yet) is remembered and
/// retried once on the next [`AmbientPlayer::on_user_interaction`], provided
/// the sound is still wanted by then.
pub struct AmbientPlayer {
    backend: Box<dyn AmbientBackend>,
    assets_dir: PathBuf,
    sound: AmbientSound,
    volume_pct: u8,
    wanted: bool,
    playing: bool,
    retry_pending: bool,
}

impl AmbientPlayer {
    pub fn new(backend: Box<dyn AmbientBackend>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            assets_dir: assets_dir.into(),
            sound: AmbientSound::default(),
            volume_pct: 50,
            wanted: false,
            playing: false,
            retry_pending: false,
        }
    }

    pub fn sound(&self) -> AmbientSound {
        self.sound
    }

    pub fn volume_pct(&self) -> u8 {
        self.volume_pct
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    /// Start the current sound looping. Returns whether it is now audible.
    pub fn start(&mut self) -> bool {
        self.wanted = true;
        self.retry_pending = false;
        self.try_play(true)
    }

    pub fn stop(&mut self) {
        if self.playing {
            self.backend.stop();
            debug!(sound = %self.sound, "ambient sound stopped");
        }
        self.wanted = false;
        self.playing = false;
        self.retry_pending = false;
    }

    /// Volume in percent, clamped to 0..=100. Applies to a playing loop
    /// immediately.
    pub fn set_volume(&mut self, volume_pct: u8) {
        self.volume_pct = volume_pct.min(100);
        if self.playing {
            self.backend.set_volume(self.gain());
        }
    }

    /// Select a sound by id. Unknown ids leave the selection untouched.
    /// A playing loop switches to the new sound right away.
    pub fn set_sound(&mut self, id: &str) -> bool {
        let Some(sound) = AmbientSound::from_id(id) else {
            debug!(id, "ignoring unknown ambient sound");
            return false;
        };
        if sound == self.sound {
            return true;
        }
        self.sound = sound;
        if self.playing {
            self.backend.stop();
            self.playing = false;
            self.try_play(true);
        }
        true
    }

    /// Called on any user gesture. Performs the deferred retry, at most once.
    pub fn on_user_interaction(&mut self) -> bool {
        if !self.retry_pending {
            return false;
        }
        self.retry_pending = false;
        if !self.wanted || self.playing {
            return false;
        }
        info!(sound = %self.sound, "retrying ambient playback after user interaction");
        self.try_play(false)
    }

    fn gain(&self) -> f32 {
        f32::from(self.volume_pct) / 100.0
    }

    fn try_play(&mut self, arm_retry: bool) -> bool {
        let path = self.sound.asset_path(&self.assets_dir);
        match self.backend.play_loop(&path, self.gain()) {
            Ok(()) => {
                self.playing = true;
                debug!(sound = %self.sound, "ambient sound playing");
                true
            }
            Err(AudioError::Blocked) => {
                self.playing = false;
                self.retry_pending = arm_retry;
                info!(sound = %self.sound, "ambient playback blocked until user interaction");
                false
            }
            Err(e) => {
                self.playing = false;
                warn!(sound = %self.sound, error = %e, "ambient playback failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Script {
        results: VecDeque<Result<(), AudioError>>,
        played: Vec<(PathBuf, f32)>,
        volumes: Vec<f32>,
        stops: usize,
    }

    #[derive(Clone, Default)]
    struct FakeBackend(Rc<RefCell<Script>>);

    impl AmbientBackend for FakeBackend {
        fn play_loop(&mut self, path: &Path, volume: f32) -> Result<(), AudioError> {
            let mut s = self.0.borrow_mut();
            s.played.push((path.to_path_buf(), volume));
            s.results.pop_front().unwrap_or(Ok(()))
        }

        fn set_volume(&mut self, volume: f32) {
            self.0.borrow_mut().volumes.push(volume);
        }

        fn stop(&mut self) {
            self.0.borrow_mut().stops += 1;
        }
    }

    fn player(results: Vec<Result<(), AudioError>>) -> (AmbientPlayer, FakeBackend) {
        let backend = FakeBackend::default();
        backend.0.borrow_mut().results = results.into();
        (AmbientPlayer::new(Box::new(backend.clone()), "/assets"), backend)
    }

    #[test]
    fn asset_paths() {
        assert_eq!(
            AmbientSound::Rain.asset_path(Path::new("/assets")),
            PathBuf::from("/assets/sounds/rain.mp3")
        );
        assert_eq!(AmbientSound::from_id("cafe"), Some(AmbientSound::Cafe));
        assert_eq!(AmbientSound::from_id("ocean"), None);
    }

    #[test]
    fn start_plays_at_volume() {
        let (mut p, backend) = player(vec![]);
        p.set_volume(30);
        assert!(p.start());
        assert!(p.is_playing());
        let s = backend.0.borrow();
        assert_eq!(s.played[0].0, PathBuf::from("/assets/sounds/forest.mp3"));
        assert!((s.played[0].1 - 0.3).abs() < 1e-6);
    }

    #[test]
    fn blocked_playback_retries_once_on_interaction() {
        let (mut p, backend) = player(vec![Err(AudioError::Blocked), Err(AudioError::Blocked)]);
        assert!(!p.start());
        assert!(p.retry_pending());

        assert!(!p.on_user_interaction());
        assert!(!p.retry_pending());
        assert!(!p.on_user_interaction());
        assert_eq!(backend.0.borrow().played.len(), 2);
    }

    #[test]
    fn retry_succeeds_after_gesture() {
        let (mut p, _) = player(vec![Err(AudioError::Blocked)]);
        p.start();
        assert!(p.on_user_interaction());
        assert!(p.is_playing());
    }

    #[test]
    fn no_retry_once_stopped() {
        let (mut p, backend) = player(vec![Err(AudioError::Blocked)]);
        p.start();
        p.stop();
        assert!(!p.on_user_interaction());
        assert_eq!(backend.0.borrow().played.len(), 1);
    }

    #[test]
    fn switching_sound_restarts_loop() {
        let (mut p, backend) = player(vec![]);
        p.start();
        assert!(p.set_sound("jazz"));
        assert!(p.is_playing());
        let s = backend.0.borrow();
        assert_eq!(s.stops, 1);
        assert_eq!(s.played[1].0, PathBuf::from("/assets/sounds/jazz.mp3"));
    }

    #[test]
    fn unknown_sound_is_ignored() {
        let (mut p, backend) = player(vec![]);
        p.start();
        assert!(!p.set_sound("ocean"));
        assert_eq!(p.sound(), AmbientSound::Forest);
        assert_eq!(backend.0.borrow().played.len(), 1);
    }

    #[test]
    fn volume_change_reaches_playing_loop() {
        let (mut p, backend) = player(vec![]);
        p.set_volume(80);
        assert!(backend.0.borrow().volumes.is_empty());
        p.start();
        p.set_volume(250);
        assert_eq!(p.volume_pct(), 100);
        assert_eq!(backend.0.borrow().volumes, vec![1.0]);
    }

    #[test]
    fn asset_failure_does_not_schedule_retry() {
        let (mut p, _) = player(vec![Err(AudioError::Asset {
            path: "/assets/sounds/forest.mp3".into(),
            message: "missing".into(),
        })]);
        assert!(!p.start());
        assert!(!p.retry_pending());
    }
}
