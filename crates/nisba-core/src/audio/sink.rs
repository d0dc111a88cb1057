//! Audio output seams.
//!
//! An output is opened once at start-up (usually with [`default_output`])
//! and handed to [`super::SoundEffects`] and [`super::AmbientPlayer`].
//! Cue playback never opens a device by itself.

use std::path::Path;

use super::synth::Clip;
use crate::error::AudioError;

/// Destination for synthesized cue clips.
///
/// `play` must not block: each clip plays to its end on its own and
/// several clips may overlap.
pub trait AudioSink {
    fn is_available(&self) -> bool {
        true
    }

    fn play(&mut self, clip: Clip) -> Result<(), AudioError>;
}

/// Looping playback of an ambient sound file.
pub trait AmbientBackend {
    fn play_loop(&mut self, path: &Path, volume: f32) -> Result<(), AudioError>;
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);
}

/// Stand-in for environments without audio output.
#[derive(Debug, Clone)]
pub struct NullSink {
    reason: String,
}

impl NullSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new("no audio backend compiled in")
    }
}

impl AudioSink for NullSink {
    fn is_available(&self) -> bool {
        false
    }

    fn play(&mut self, _clip: Clip) -> Result<(), AudioError> {
        Err(AudioError::Unavailable(self.reason.clone()))
    }
}

impl AmbientBackend for NullSink {
    fn play_loop(&mut self, _path: &Path, _volume: f32) -> Result<(), AudioError> {
        Err(AudioError::Unavailable(self.reason.clone()))
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn stop(&mut self) {}
}

/// Open the platform output, or a [`NullSink`] when there is none.
pub fn default_output() -> (Box<dyn AudioSink>, Box<dyn AmbientBackend>) {
    #[cfg(feature = "playback")]
    {
        match super::playback::open() {
            Ok((cues, ambient)) => return (Box::new(cues), Box::new(ambient)),
            Err(e) => tracing::warn!("audio output unavailable, sounds disabled: {e}"),
        }
    }
    #[cfg(not(feature = "playback"))]
    tracing::debug!("built without the `playback` feature, using silent output");

    (Box::new(NullSink::default()), Box::new(NullSink::default()))
}
