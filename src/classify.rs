//! Note classifier - maps a vertical graph position to one of 12 note slots.
//!
//! The note graph draws 12 dashed lanes, one per semitone of the displayed
//! octave: slot 0 = C4 at the bottom (280 px), slot 11 = B4 at the top
//! (5 px). A contour point is "on" a lane when it lies within the
//! tolerance band. Adjacent bands overlap by 5 px (25 px spacing, 15 px
//! tolerance); the scan runs from slot 0 upward, so the lower slot wins
//! inside an overlap.

use crate::music::{Note, PitchClass};

/// Lane centers in pixels, slot 0 = C4 (bottom) .. slot 11 = B4 (top).
pub const NOTE_POSITIONS: [f32; 12] = [
    280.0, 255.0, 230.0, 205.0, 180.0, 155.0, 130.0, 105.0, 80.0, 55.0, 30.0, 5.0,
];

/// Pixel distance within which a position counts as "on" a lane.
pub const TOLERANCE: f32 = 15.0;

/// Octave shown by the default note graph.
pub const GRAPH_OCTAVE: i8 = 4;

/// Classify a vertical position into a note slot.
///
/// Returns the first slot whose lane is within [`TOLERANCE`], or `None`
/// when the position lies outside every band (above the top lane or below
/// the bottom one).
pub fn classify(y: f32) -> Option<usize> {
    NOTE_POSITIONS
        .iter()
        .position(|&lane| (y - lane).abs() <= TOLERANCE)
}

/// The note a slot represents (slot 0 = C4 .. slot 11 = B4).
pub fn note_for_slot(slot: usize) -> Note {
    Note::new(PitchClass::from_semitone(slot as u8), GRAPH_OCTAVE)
}

/// Lane center for a slot, for drawing markers on the graph.
pub fn slot_position(slot: usize) -> f32 {
    NOTE_POSITIONS[slot]
}
