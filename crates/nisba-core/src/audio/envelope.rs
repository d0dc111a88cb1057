use serde::{Deserialize, Serialize};

/// Gain every cue decays toward.
pub const SILENCE_FLOOR: f32 = 0.001;

/// Amplitude envelope: linear attack from zero to `peak`, then exponential
/// segments through an optional sustain point down to `floor`, held there
/// until the voice stops.
///
/// All times are seconds relative to the voice onset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub peak: f32,
    pub attack: f32,
    /// `(level, time)` reached exponentially after the attack.
    pub sustain: Option<(f32, f32)>,
    pub floor: f32,
    /// Time at which the gain reaches `floor`.
    pub decay_end: f32,
}

impl Envelope {
    pub fn new(peak: f32, attack: f32, decay_end: f32) -> Self {
        Self {
            peak,
            attack,
            sustain: None,
            floor: SILENCE_FLOOR,
            decay_end,
        }
    }

    pub fn with_sustain(mut self, level: f32, at: f32) -> Self {
        self.sustain = Some((level, at));
        self
    }

    pub fn with_floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || self.peak <= 0.0 {
            return 0.0;
        }
        if t < self.attack {
            return self.peak * t / self.attack;
        }

        let mut from = (self.attack, self.peak);
        let mut points = [(0.0f32, 0.0f32); 2];
        let mut n = 0;
        if let Some(sustain) = self.sustain {
            points[n] = (sustain.1, sustain.0);
            n += 1;
        }
        points[n] = (self.decay_end, self.floor);
        n += 1;

        for &(end_t, end_v) in &points[..n] {
            if t < end_t {
                return exp_ramp(from.1, end_v, (t - from.0) / (end_t - from.0));
            }
            from = (end_t, end_v);
        }
        from.1
    }
}

fn exp_ramp(from: f32, to: f32, fraction: f32) -> f32 {
    if from <= 0.0 || to <= 0.0 {
        return 0.0;
    }
    from * (to / from).powf(fraction.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn linear_attack_reaches_peak() {
        let env = Envelope::new(0.5, 0.1, 1.0);
        assert_eq!(env.gain_at(0.0), 0.0);
        assert!(close(env.gain_at(0.05), 0.25));
        assert!(close(env.gain_at(0.1), 0.5));
    }

    #[test]
    fn exponential_decay_passes_through_sustain() {
        let env = Envelope::new(0.3, 0.1, 1.5).with_sustain(0.15, 0.4);
        assert!(close(env.gain_at(0.4), 0.15));
        // halfway (in time) between 0.3 and 0.15 is the geometric mean
        assert!(close(env.gain_at(0.25), (0.3f32 * 0.15).sqrt()));
        assert!(close(env.gain_at(1.5), SILENCE_FLOOR));
        assert!(close(env.gain_at(3.0), SILENCE_FLOOR));
    }

    #[test]
    fn silent_when_peak_is_zero() {
        let env = Envelope::new(0.0, 0.1, 1.0);
        assert_eq!(env.gain_at(0.5), 0.0);
    }

    #[test]
    fn decay_is_monotonic_after_attack() {
        let env = Envelope::new(0.4, 0.08, 1.2).with_sustain(0.2, 0.4);
        let mut prev = env.gain_at(0.08);
        let mut t = 0.09;
        while t < 1.2 {
            let g = env.gain_at(t);
            assert!(g <= prev + 1e-6, "gain rose at t={t}");
            prev = g;
            t += 0.01;
        }
    }
}
