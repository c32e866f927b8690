//! Pitch-trajectory contour functions.
//!
//! A contour is a pure function `y = f(x)` over the graph domain
//! `x in [0, CONTOUR_WIDTH]`, describing the pitch line the moving marker
//! follows during a round. Three families cover all pages:
//!
//! - [`Staircase`] - explicit piecewise ramps (the fixed ascent/descent
//!   exercises and every user-attempt path drawn over them)
//! - [`SegmentPattern`] - breakpoint-driven rise/hold/fall waves selected
//!   from a catalog (the melody exercise)
//! - [`WavePattern`] - converging sine oscillations selected from a catalog
//!   (the sustain exercise)
//!
//! All families are deterministic in `(x, pattern)`; randomness lives only
//! in [`PatternPicker`], which selects a catalog entry per round.

mod picker;
mod segmented;
mod staircase;
mod wave;

pub use picker::PatternPicker;
pub use segmented::{SegmentPattern, SEGMENT_CATALOG};
pub use staircase::{
    Staircase, ASCENT, ASCENT_USER, DESCENT, DESCENT_USER, MELODY_USER,
};
pub use wave::{WavePattern, SUSTAIN_USER_WAVE, WAVE_CATALOG};

/// Level every segmented pattern starts from (the graph floor, C4 lane).
pub const START_LEVEL: f32 = 280.0;

/// One contour selected for a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contour {
    Staircase(&'static Staircase),
    Segmented(&'static SegmentPattern),
    Wave(WavePattern),
}

impl Contour {
    /// Evaluate the contour at a horizontal position.
    pub fn y_at(&self, x: f32) -> f32 {
        match self {
            Contour::Staircase(stairs) => stairs.y_at(x),
            Contour::Segmented(pattern) => pattern.y_at(x),
            Contour::Wave(pattern) => pattern.y_at(x),
        }
    }
}
