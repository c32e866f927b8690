//! Breakpoint-driven wave patterns for the melody exercise.

use super::START_LEVEL;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A segmented contour: the domain is divided at explicit breakpoints and
/// each segment's role cycles through descend-to-low, rise-to-high,
/// hold-high, fall-to-low (`segment_index % 4`).
///
/// Edge policy: `x` before the first breakpoint holds the fixed
/// [`START_LEVEL`]; `x` past the last breakpoint clamps to `low_level`.
/// Serialize only: the breakpoint table borrows from the static catalog.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPattern {
    /// Lower resting level of the wave, in graph pixels.
    pub low_level: f32,
    /// Upper level the wave rises to, in graph pixels.
    pub high_level: f32,
    /// Ascending x positions dividing the domain into segments.
    pub breakpoints: &'static [f32],
}

impl SegmentPattern {
    pub fn y_at(&self, x: f32) -> f32 {
        let bp = self.breakpoints;
        if bp.is_empty() || x <= bp[0] {
            return START_LEVEL;
        }

        for i in 0..bp.len() - 1 {
            let (start_x, end_x) = (bp[i], bp[i + 1]);
            if x <= end_x {
                let progress = (x - start_x) / (end_x - start_x);
                return match i % 4 {
                    // Descend from the floor to the low level
                    0 => START_LEVEL - progress * (START_LEVEL - self.low_level),
                    // Rise from low to high
                    1 => self.low_level - progress * (self.low_level - self.high_level),
                    // Hold at the high level
                    2 => self.high_level,
                    // Fall back to low
                    _ => self.high_level + progress * (self.low_level - self.high_level),
                };
            }
        }

        self.low_level
    }
}

/// The ten melody patterns, in catalog order.
pub const SEGMENT_CATALOG: [SegmentPattern; 10] = [
    // Original pattern
    SegmentPattern {
        low_level: 220.0,
        high_level: 100.0,
        breakpoints: &[
            50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0,
            650.0,
        ],
    },
    // Higher range
    SegmentPattern {
        low_level: 180.0,
        high_level: 60.0,
        breakpoints: &[
            60.0, 120.0, 180.0, 240.0, 300.0, 360.0, 420.0, 480.0, 540.0, 600.0, 660.0,
        ],
    },
    // Lower range
    SegmentPattern {
        low_level: 260.0,
        high_level: 140.0,
        breakpoints: &[
            40.0, 80.0, 120.0, 160.0, 200.0, 240.0, 280.0, 320.0, 360.0, 400.0, 440.0, 480.0,
            520.0,
        ],
    },
    // Quick changes
    SegmentPattern {
        low_level: 200.0,
        high_level: 80.0,
        breakpoints: &[
            30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0, 360.0,
            390.0,
        ],
    },
    // Longer holds
    SegmentPattern {
        low_level: 240.0,
        high_level: 120.0,
        breakpoints: &[80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0],
    },
    // Mixed levels
    SegmentPattern {
        low_level: 210.0,
        high_level: 90.0,
        breakpoints: &[
            45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 360.0, 405.0, 450.0, 495.0, 540.0,
        ],
    },
    // Wide range
    SegmentPattern {
        low_level: 250.0,
        high_level: 50.0,
        breakpoints: &[70.0, 140.0, 210.0, 280.0, 350.0, 420.0, 490.0, 560.0, 630.0],
    },
    // Narrow range
    SegmentPattern {
        low_level: 190.0,
        high_level: 130.0,
        breakpoints: &[
            35.0, 70.0, 105.0, 140.0, 175.0, 210.0, 245.0, 280.0, 315.0, 350.0, 385.0, 420.0,
        ],
    },
    // Irregular timing
    SegmentPattern {
        low_level: 230.0,
        high_level: 110.0,
        breakpoints: &[
            25.0, 75.0, 100.0, 175.0, 225.0, 275.0, 325.0, 400.0, 475.0, 525.0, 575.0, 625.0,
        ],
    },
    // Gradual changes
    SegmentPattern {
        low_level: 200.0,
        high_level: 80.0,
        breakpoints: &[100.0, 200.0, 300.0, 400.0, 500.0, 600.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_start_level_before_first_breakpoint() {
        let pattern = &SEGMENT_CATALOG[0];
        assert_eq!(pattern.y_at(0.0), START_LEVEL);
        assert_eq!(pattern.y_at(25.0), START_LEVEL);
        assert_eq!(pattern.y_at(50.0), START_LEVEL);
    }

    #[test]
    fn clamps_to_low_level_past_last_breakpoint() {
        for pattern in &SEGMENT_CATALOG {
            assert_eq!(pattern.y_at(700.0), pattern.low_level);
        }
    }

    #[test]
    fn segment_roles_cycle() {
        let pattern = &SEGMENT_CATALOG[0];
        // Segment 0 (50..100) descends toward low_level
        assert_eq!(pattern.y_at(100.0), pattern.low_level);
        // Segment 1 (100..150) rises to high_level
        assert_eq!(pattern.y_at(150.0), pattern.high_level);
        // Segment 2 (150..200) holds high
        assert_eq!(pattern.y_at(175.0), pattern.high_level);
        // Segment 3 (200..250) falls back to low
        assert_eq!(pattern.y_at(250.0), pattern.low_level);
        // Midpoint of a rising segment interpolates linearly
        let mid = pattern.y_at(125.0);
        assert!((mid - (pattern.low_level + pattern.high_level) / 2.0).abs() < 1e-3);
    }
}
