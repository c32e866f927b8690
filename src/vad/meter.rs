//! Frame loudness measurement.
//!
//! Converts a block of time-domain samples into one average magnitude on
//! a 0-255 scale, the scale the voice threshold is defined on.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::ANALYSIS_FRAME;

/// Per-bin dB range mapped onto 0-255. Bins at or below `MIN_DB` read as
/// 0, bins at or above `MAX_DB` read as 255.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;

/// FFT-based loudness meter.
///
/// Windows each frame with a Hann window, transforms it, maps every
/// positive-frequency bin's magnitude into the dB range above as a 0-255
/// value, and averages the bins.
pub struct LevelMeter {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new(ANALYSIS_FRAME)
    }
}

impl LevelMeter {
    pub fn new(frame_len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_len);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..frame_len)
            .map(|i| {
                if frame_len > 1 {
                    let denom = (frame_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let scratch = vec![Complex::new(0.0, 0.0); frame_len];

        Self {
            window,
            fft,
            scratch,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.window.len()
    }

    /// Average bin magnitude of one frame, 0-255. Frames of the wrong
    /// length read as silence.
    pub fn level(&mut self, frame: &[f32]) -> f32 {
        if frame.len() != self.window.len() {
            return 0.0;
        }

        for (i, sample) in frame.iter().enumerate() {
            self.scratch[i].re = *sample * self.window[i];
            self.scratch[i].im = 0.0;
        }

        self.fft.process(&mut self.scratch);

        let n = self.scratch.len() as f32;
        let half = (self.scratch.len() / 2).max(1);
        let mut sum = 0.0f32;
        for bin in &self.scratch[..half] {
            // Normalize so a full-scale sine lands near 0 dB at its bin.
            let magnitude = ((bin.re * bin.re + bin.im * bin.im).sqrt() * 2.0 / n).max(1e-12);
            let db = 20.0 * magnitude.log10();
            let byte = ((db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0).clamp(0.0, 255.0);
            sum += byte;
        }
        sum / half as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vad::VOICE_THRESHOLD;

    fn sine_frame(freq_bin: f32, amplitude: f32) -> Vec<f32> {
        (0..ANALYSIS_FRAME)
            .map(|i| {
                let phase =
                    2.0 * std::f32::consts::PI * freq_bin * i as f32 / ANALYSIS_FRAME as f32;
                amplitude * phase.sin()
            })
            .collect()
    }

    #[test]
    fn silence_reads_zero() {
        let mut meter = LevelMeter::default();
        let frame = vec![0.0f32; ANALYSIS_FRAME];
        assert_eq!(meter.level(&frame), 0.0);
    }

    #[test]
    fn loud_tone_crosses_the_voice_threshold() {
        let mut meter = LevelMeter::default();
        let frame = sine_frame(8.0, 0.9);
        assert!(meter.level(&frame) > VOICE_THRESHOLD);
    }

    #[test]
    fn louder_signals_read_higher() {
        let mut meter = LevelMeter::default();
        let quiet = meter.level(&sine_frame(8.0, 0.05));
        let loud = meter.level(&sine_frame(8.0, 0.9));
        assert!(loud > quiet);
    }

    #[test]
    fn wrong_length_frames_read_as_silence() {
        let mut meter = LevelMeter::default();
        let frame = vec![0.5f32; ANALYSIS_FRAME / 2];
        assert_eq!(meter.level(&frame), 0.0);
    }
}
