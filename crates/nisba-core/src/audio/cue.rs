//! Note tables for the UI sound cues.
//!
//! Every cue is a fixed list of [`Voice`]s. Gains are expressed relative to
//! the master volume handed to [`Cue::voices`], so the same table serves
//! every volume setting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::envelope::Envelope;
use super::filter::LowPass;

const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const C6: f32 = 1046.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    TaskComplete,
    HabitComplete,
    TabSwitch,
    ButtonClick,
    Navigation,
    Achievement,
    /// Chime at the end of a focus or break session.
    SessionEnd,
}

impl Cue {
    pub const ALL: [Cue; 7] = [
        Cue::TaskComplete,
        Cue::HabitComplete,
        Cue::TabSwitch,
        Cue::ButtonClick,
        Cue::Navigation,
        Cue::Achievement,
        Cue::SessionEnd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::TaskComplete => "task-complete",
            Cue::HabitComplete => "habit-complete",
            Cue::TabSwitch => "tab-switch",
            Cue::ButtonClick => "button-click",
            Cue::Navigation => "navigation",
            Cue::Achievement => "achievement",
            Cue::SessionEnd => "session-end",
        }
    }

    /// Whether the cue belongs to the UI sound set (gated by the UI-sound
    /// switch) rather than being the timer notification.
    pub fn is_ui(&self) -> bool {
        !matches!(self, Cue::SessionEnd)
    }

    /// Voices for this cue at master volume `volume` (0.0 - 1.0).
    pub fn voices(&self, volume: f32) -> Vec<Voice> {
        let v = volume.clamp(0.0, 1.0);
        match self {
            Cue::TaskComplete => task_complete(v),
            Cue::HabitComplete => rising_melody(v, &HABIT_MELODY, 0.5, 2.0, 0.1, 0.4),
            Cue::TabSwitch => vec![Voice::sine(600.0, 0.0, 0.25)
                .sweep_to(800.0, 0.15)
                .filtered(LowPass::new(1200.0, 0.5))
                .envelope(Envelope::new(v * 0.15, 0.05, 0.2))],
            Cue::ButtonClick => vec![Voice::sine(800.0, 0.0, 0.1)
                .filtered(LowPass::new(1200.0, 0.3))
                .envelope(Envelope::new(v * 0.12, 0.01, 0.08))],
            Cue::Navigation => [600.0f32, 750.0]
                .iter()
                .enumerate()
                .map(|(i, &freq)| {
                    Voice::sine(freq, i as f32 * 0.08, 0.2)
                        .filtered(LowPass::new(freq * 2.0, 0.3))
                        .envelope(Envelope::new(v * 0.12, 0.02, 0.15))
                })
                .collect(),
            Cue::Achievement => rising_melody(v, &ACHIEVEMENT_MELODY, 0.7, 1.5, 0.08, 0.3),
            Cue::SessionEnd => vec![Voice::sine(800.0, 0.0, 1.0)
                .envelope(Envelope::new(v, 0.1, 1.0).with_floor(0.01))],
        }
    }

    /// Length of the rendered cue in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.voices(1.0)
            .iter()
            .map(|voice| voice.onset + voice.length)
            .fold(0.0, f32::max)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cue::ALL
            .iter()
            .copied()
            .find(|cue| cue.as_str() == s.trim())
            .ok_or_else(|| format!("unknown cue: {s}"))
    }
}

/// One oscillator with its filter and envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub freq_hz: f32,
    /// Exponential glide target, reached after `sweep_secs`.
    pub sweep_to_hz: Option<f32>,
    pub sweep_secs: f32,
    /// Start, in seconds from the beginning of the cue.
    pub onset: f32,
    /// Seconds the oscillator runs before it is stopped.
    pub length: f32,
    pub filter: Option<LowPass>,
    pub envelope: Envelope,
}

impl Voice {
    pub fn sine(freq_hz: f32, onset: f32, length: f32) -> Self {
        Self {
            freq_hz,
            sweep_to_hz: None,
            sweep_secs: 0.0,
            onset,
            length,
            filter: None,
            envelope: Envelope::new(0.0, 0.0, length),
        }
    }

    pub fn sweep_to(mut self, freq_hz: f32, secs: f32) -> Self {
        self.sweep_to_hz = Some(freq_hz);
        self.sweep_secs = secs;
        self
    }

    pub fn filtered(mut self, filter: LowPass) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Instantaneous frequency `t` seconds after onset.
    pub fn freq_at(&self, t: f32) -> f32 {
        match self.sweep_to_hz {
            Some(target) if self.sweep_secs > 0.0 && self.freq_hz > 0.0 => {
                let fraction = (t / self.sweep_secs).clamp(0.0, 1.0);
                self.freq_hz * (target / self.freq_hz).powf(fraction)
            }
            Some(target) if t > 0.0 => target,
            _ => self.freq_hz,
        }
    }
}

/// (frequency, onset, duration)
type Note = (f32, f32, f32);

const HABIT_MELODY: [Note; 4] = [(C5, 0.0, 0.6), (D5, 0.2, 0.6), (E5, 0.4, 0.6), (G5, 0.6, 0.8)];

const ACHIEVEMENT_MELODY: [Note; 4] =
    [(C5, 0.0, 0.5), (E5, 0.2, 0.5), (G5, 0.4, 0.5), (C6, 0.6, 0.6)];

/// C-major triad, staggered, each note doubled by a soft fifth above.
fn task_complete(v: f32) -> Vec<Voice> {
    let mut voices = Vec::with_capacity(6);
    for (i, &freq) in [C5, E5, G5].iter().enumerate() {
        let onset = i as f32 * 0.15;
        voices.push(
            Voice::sine(freq, onset, 2.0)
                .filtered(LowPass::new(freq * 1.5, 0.7))
                .envelope(Envelope::new(v * 0.25, 0.08, 1.5).with_sustain(v * 0.15, 0.4)),
        );
        voices.push(
            Voice::sine(freq * 1.5, onset, 1.5).envelope(Envelope::new(v * 0.08, 0.1, 1.2)),
        );
    }
    voices
}

/// Ascending melody where the last two notes get a short sparkle layer at
/// `sparkle_ratio` times their pitch.
fn rising_melody(
    v: f32,
    notes: &[Note],
    resonance_db: f32,
    sparkle_ratio: f32,
    sparkle_peak: f32,
    sparkle_decay: f32,
) -> Vec<Voice> {
    let mut voices = Vec::with_capacity(notes.len() + 2);
    for (i, &(freq, onset, duration)) in notes.iter().enumerate() {
        voices.push(
            Voice::sine(freq, onset, duration)
                .filtered(LowPass::new(freq * 2.0, resonance_db))
                .envelope(
                    Envelope::new(v * 0.3, 0.1, duration).with_sustain(v * 0.15, duration * 0.7),
                ),
        );
        if i + 2 >= notes.len() {
            voices.push(
                Voice::sine(freq * sparkle_ratio, onset, sparkle_decay + 0.1).envelope(
                    Envelope::new(v * sparkle_peak, 0.05, sparkle_decay),
                ),
            );
        }
    }
    voices
}
