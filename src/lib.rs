pub mod choreo; // Timed stage choreography with cancellation
pub mod classify;
pub mod contour; // Pitch-trajectory pattern families
pub mod game;
pub mod lyrics; // Playback-synced lyric highlighting
pub mod music;
pub mod playback;
pub mod round; // Per-round animation driver
pub mod vad;

/// Horizontal domain of every contour function, in pixels.
pub const CONTOUR_WIDTH: f32 = 700.0;
/// Vertical extent of the note graph, in pixels (top = highest pitch).
pub const CONTOUR_HEIGHT: f32 = 300.0;
