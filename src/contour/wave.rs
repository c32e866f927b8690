//! Converging sine-wave contours for the sustain exercise.

use std::f32::consts::TAU;

use crate::CONTOUR_WIDTH;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A converging oscillation around a center line.
///
/// The oscillation amplitude lerps from `initial_range` down to
/// `final_range` as the marker crosses the graph, so the wave visually
/// narrows onto the target. A low-amplitude high-frequency jitter term is
/// layered on for organic texture.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePattern {
    pub center_y: f32,
    pub initial_range: f32,
    pub final_range: f32,
    pub frequency: f32,
    pub phase: f32,
    /// Jitter amplitude as a fraction of the current range.
    pub jitter: f32,
}

impl WavePattern {
    /// Oscillation range at a horizontal position (lerped, converging).
    pub fn range_at(&self, x: f32) -> f32 {
        let progress = x / CONTOUR_WIDTH;
        self.initial_range - progress * (self.initial_range - self.final_range)
    }

    pub fn y_at(&self, x: f32) -> f32 {
        let progress = x / CONTOUR_WIDTH;
        let amplitude = self.range_at(x);
        let wave = (TAU * (progress * self.frequency + self.phase)).sin();
        let organic = (progress * 17.3).sin() * (amplitude * self.jitter);
        self.center_y + wave * (amplitude / 2.0) + organic
    }

    /// Upper and lower envelope bounds at a position, for drawing the
    /// converging band behind the note lanes.
    pub fn bounds_at(&self, x: f32) -> (f32, f32) {
        let half = self.range_at(x) / 2.0;
        (self.center_y - half, self.center_y + half)
    }

    /// Cosine-based evaluation used by the user-attempt trace.
    pub fn user_y_at(&self, x: f32) -> f32 {
        let progress = x / CONTOUR_WIDTH;
        let amplitude = self.range_at(x);
        let wave = (TAU * (progress * self.frequency + self.phase)).cos();
        let organic = (progress * 12.7).cos() * (amplitude * self.jitter);
        let harmonic = (progress * self.frequency * 4.0 * std::f32::consts::PI).sin()
            * (amplitude * 0.1);
        self.center_y + wave * (amplitude / 2.0) + organic + harmonic
    }
}

/// Jitter fraction shared by the catalog patterns.
const CATALOG_JITTER: f32 = 0.05;

const fn wave(center_y: f32, initial_range: f32, final_range: f32, frequency: f32, phase: f32) -> WavePattern {
    WavePattern {
        center_y,
        initial_range,
        final_range,
        frequency,
        phase,
        jitter: CATALOG_JITTER,
    }
}

/// The ten sustain patterns, in catalog order.
pub const WAVE_CATALOG: [WavePattern; 10] = [
    // Smooth sine wave convergence
    wave(180.0, 120.0, 20.0, 3.5, 0.0),
    // Fast oscillation convergence
    wave(160.0, 100.0, 15.0, 5.0, 0.5),
    // Slow wave convergence
    wave(140.0, 90.0, 25.0, 2.5, 0.0),
    // Mid-frequency convergence
    wave(220.0, 110.0, 18.0, 4.0, 0.25),
    // High frequency tight convergence
    wave(170.0, 130.0, 12.0, 6.0, 0.0),
    // Very slow convergence
    wave(190.0, 80.0, 30.0, 1.8, 0.75),
    // Medium wave with phase shift
    wave(150.0, 105.0, 22.0, 3.8, 0.3),
    // Low center smooth wave
    wave(200.0, 95.0, 28.0, 3.2, 0.6),
    // Rapid convergence
    wave(175.0, 115.0, 8.0, 4.5, 0.1),
    // Gentle convergence
    wave(185.0, 85.0, 35.0, 2.8, 0.4),
];

/// The user-attempt wave for the sustain exercise. It runs on cosine with
/// its own jitter and a secondary harmonic, so the user's trace never sits
/// exactly on the reference.
pub const SUSTAIN_USER_WAVE: WavePattern = WavePattern {
    center_y: 200.0,
    initial_range: 100.0,
    final_range: 25.0,
    frequency: 3.0,
    phase: 0.7,
    jitter: 0.08,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitude_converges_left_to_right() {
        for pattern in &WAVE_CATALOG {
            assert_eq!(pattern.range_at(0.0), pattern.initial_range);
            assert_eq!(pattern.range_at(CONTOUR_WIDTH), pattern.final_range);
            assert!(pattern.range_at(350.0) < pattern.initial_range);
            assert!(pattern.range_at(350.0) > pattern.final_range);
        }
    }

    #[test]
    fn wave_stays_near_the_envelope() {
        // Jitter can poke slightly past the band; allow its amplitude.
        for pattern in &WAVE_CATALOG {
            let mut x = 0.0f32;
            while x <= CONTOUR_WIDTH {
                let (upper, lower) = pattern.bounds_at(x);
                let slack = pattern.range_at(x) * pattern.jitter + 1e-3;
                let y = pattern.y_at(x);
                assert!(y >= upper - slack && y <= lower + slack, "x={x} y={y}");
                x += 5.0;
            }
        }
    }

    #[test]
    fn ends_settle_onto_the_center() {
        for pattern in &WAVE_CATALOG {
            let y = pattern.y_at(CONTOUR_WIDTH);
            assert!((y - pattern.center_y).abs() <= pattern.final_range);
        }
    }
}
