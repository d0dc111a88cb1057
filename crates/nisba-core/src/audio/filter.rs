//! Second-order low-pass filter (RBJ audio EQ cookbook coefficients).

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowPass {
    pub cutoff_hz: f32,
    /// Resonance in dB, the unit of a Web Audio low-pass `Q`. 0 dB gives
    /// a linear Q of 1.
    pub resonance_db: f32,
}

impl LowPass {
    pub fn new(cutoff_hz: f32, resonance_db: f32) -> Self {
        Self {
            cutoff_hz,
            resonance_db,
        }
    }

    /// Linear Q equivalent of the resonance setting.
    pub fn q(&self) -> f32 {
        10f32.powf(self.resonance_db / 20.0)
    }

    pub fn biquad(&self, sample_rate: u32) -> Biquad {
        let fs = sample_rate as f32;
        let cutoff = self.cutoff_hz.clamp(10.0, fs * 0.49);
        let w0 = 2.0 * PI * cutoff / fs;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * self.q());

        let a0 = 1.0 + alpha;
        Biquad {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }
}

/// Transposed direct form II biquad section.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady_state_amplitude(freq: f32, filter: LowPass) -> f32 {
        let sr = 44_100;
        let mut bq = filter.biquad(sr);
        let mut peak = 0.0f32;
        for n in 0..sr {
            let x = (2.0 * PI * freq * n as f32 / sr as f32).sin();
            let y = bq.process(x);
            if n > sr / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn passes_dc_at_unity() {
        let mut bq = LowPass::new(1000.0, 0.0).biquad(44_100);
        let mut y = 0.0;
        for _ in 0..10_000 {
            y = bq.process(1.0);
        }
        assert!((y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn attenuates_above_cutoff() {
        let filter = LowPass::new(800.0, 0.5);
        let low = steady_state_amplitude(200.0, filter);
        let high = steady_state_amplitude(6_400.0, filter);
        assert!(low > 0.9, "passband amplitude {low}");
        assert!(high < 0.05, "stopband amplitude {high}");
    }

    #[test]
    fn resonance_db_maps_to_linear_q() {
        assert!((LowPass::new(1000.0, 0.0).q() - 1.0).abs() < 1e-6);
        assert!((LowPass::new(1000.0, 20.0).q() - 10.0).abs() < 1e-4);
    }
}
