use tracing::{debug, warn};

use super::cue::Cue;
use super::sink::AudioSink;
use super::synth::{render, Clip, DEFAULT_SAMPLE_RATE};

/// Default UI-sound volume when none is configured.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Plays synthesized cues through one injected [`AudioSink`].
///
/// UI cues are gated by the enable switch and scaled by the UI volume. The
/// session-end chime is a timer notification: it ignores the UI switch and
/// plays at the volume passed to [`SoundEffects::play_chime`].
pub struct SoundEffects {
    sink: Box<dyn AudioSink>,
    enabled: bool,
    volume: f32,
    sample_rate: u32,
    warned_unavailable: bool,
}

impl SoundEffects {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            enabled: true,
            volume: DEFAULT_VOLUME,
            sample_rate: DEFAULT_SAMPLE_RATE,
            warned_unavailable: false,
        }
    }

    /// Build from stored preferences: `volume_pct` is 0 - 100.
    pub fn with_settings(sink: Box<dyn AudioSink>, enabled: bool, volume_pct: u8) -> Self {
        let mut effects = Self::new(sink);
        effects.set_enabled(enabled);
        effects.set_volume(f32::from(volume_pct) / 100.0);
        effects
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    /// Whether the sink can actually produce sound.
    pub fn has_output(&self) -> bool {
        self.sink.is_available()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Render `cue` at the current UI volume without playing it.
    pub fn render(&self, cue: Cue) -> Clip {
        render(&cue.voices(self.volume), self.sample_rate)
    }

    /// Play a UI cue. Returns whether a clip was handed to the sink.
    ///
    /// With sounds disabled this does nothing at all: no rendering and no
    /// call into the sink.
    pub fn play(&mut self, cue: Cue) -> bool {
        if !self.enabled {
            return false;
        }
        let clip = self.render(cue);
        self.emit(cue, clip)
    }

    /// Play the session-end chime at `volume` (0.0 - 1.0).
    pub fn play_chime(&mut self, volume: f32) -> bool {
        if volume.is_nan() || volume <= 0.0 {
            return false;
        }
        let clip = render(&Cue::SessionEnd.voices(volume), self.sample_rate);
        self.emit(Cue::SessionEnd, clip)
    }

    fn emit(&mut self, cue: Cue, clip: Clip) -> bool {
        if !self.sink.is_available() {
            if !self.warned_unavailable {
                warn!(%cue, "audio output unavailable, skipping sound cues");
                self.warned_unavailable = true;
            }
            return false;
        }
        match self.sink.play(clip) {
            Ok(()) => {
                debug!(%cue, "cue played");
                true
            }
            Err(e) => {
                warn!(%cue, error = %e, "failed to play sound cue");
                false
            }
        }
    }
}
