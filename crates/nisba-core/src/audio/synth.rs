use std::f32::consts::TAU;

use super::cue::Voice;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Mono PCM produced for one cue invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl Clip {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }

    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }
}

/// Mix `voices` into one buffer: sine oscillator, optional low-pass, then
/// the voice envelope. The mix is clamped to [-1, 1].
pub fn render(voices: &[Voice], sample_rate: u32) -> Clip {
    let sr = sample_rate.max(1);
    let span = |voice: &Voice| {
        let start = (voice.onset * sr as f32).round() as usize;
        let len = (voice.length * sr as f32).round() as usize;
        (start, len)
    };
    let total = voices
        .iter()
        .map(|v| {
            let (start, len) = span(v);
            start + len
        })
        .max()
        .unwrap_or(0);
    let mut samples = vec![0.0f32; total];

    for voice in voices {
        let (start, len) = span(voice);
        let mut filter = voice.filter.map(|f| f.biquad(sr));
        let mut phase = 0.0f32;

        for (n, out) in samples.iter_mut().skip(start).take(len).enumerate() {
            let t = n as f32 / sr as f32;
            let mut x = phase.sin();
            if let Some(bq) = filter.as_mut() {
                x = bq.process(x);
            }
            *out += x * voice.envelope.gain_at(t);

            phase += TAU * voice.freq_at(t) / sr as f32;
            if phase >= TAU {
                phase -= TAU;
            }
        }
    }

    for s in &mut samples {
        *s = s.clamp(-1.0, 1.0);
    }

    Clip {
        sample_rate: sr,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue::Cue;
    use crate::audio::envelope::Envelope;

    #[test]
    fn clip_length_matches_cue_duration() {
        let clip = render(&Cue::ButtonClick.voices(0.5), 8_000);
        assert_eq!(clip.samples.len(), 800);
        assert!((clip.duration_secs() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_volume_renders_silence() {
        let clip = render(&Cue::HabitComplete.voices(0.0), 8_000);
        assert!(!clip.samples.is_empty());
        assert!(clip.is_silent());
    }

    #[test]
    fn louder_volume_gives_louder_clip() {
        let quiet = render(&Cue::Achievement.voices(0.2), 16_000).peak();
        let loud = render(&Cue::Achievement.voices(0.8), 16_000).peak();
        assert!(loud > quiet * 3.0, "quiet={quiet} loud={loud}");
        assert!(loud <= 1.0);
    }

    #[test]
    fn voice_starts_at_its_onset() {
        let voice = Voice::sine(440.0, 0.5, 0.5).envelope(Envelope::new(1.0, 0.01, 0.5));
        let clip = render(&[voice], 1_000);
        assert!(clip.samples[..500].iter().all(|s| *s == 0.0));
        assert!(clip.samples[500..].iter().any(|s| s.abs() > 0.1));
    }
}
