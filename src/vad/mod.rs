//! Voice-activity detection.
//!
//! The game never analyzes *what* the user sings - only whether they are
//! singing. The detector taps the microphone, measures the average
//! frequency-bin magnitude of each analysis frame on a 0-255 scale, and
//! edge-triggers against a fixed loudness threshold. Everything decision-
//! shaped lives in clock-free, hardware-free types ([`VoiceGate`],
//! [`LevelMeter`], [`notes_for_attempt`]); the cpal plumbing in
//! [`capture`] only moves samples.

mod gate;
mod meter;

#[cfg(feature = "rtrb")]
mod capture;

pub use gate::{VoiceEdge, VoiceGate};
pub use meter::LevelMeter;

#[cfg(feature = "rtrb")]
pub use capture::VoiceDetector;

use thiserror::Error;

/// Loudness threshold on the 0-255 magnitude scale.
pub const VOICE_THRESHOLD: f32 = 30.0;

/// Samples per analysis frame (the frequency-analysis transform size).
pub const ANALYSIS_FRAME: usize = 256;

/// Why the microphone could not be started. Each variant carries its own
/// user-facing message; the UI shows it verbatim and reverts the mic
/// button to the disabled state.
#[derive(Debug, Error)]
pub enum MicError {
    #[error("microphone access was denied - allow access for this app, then tap again")]
    PermissionDenied,
    #[error("no microphone found - connect one and try again")]
    DeviceNotFound,
    #[error("audio capture is not supported on this device")]
    Unsupported,
    #[error("microphone stream failed: {0}")]
    Stream(String),
}

/// How many floating notes a voice detection requests.
///
/// Each successive detection within one mic session asks for one more
/// note, capped at 10: attempt 0 requests 5, attempt 3 requests 8,
/// attempt 5 and beyond request 10.
pub fn notes_for_attempt(attempt_count: u32) -> u32 {
    (5 + attempt_count).min(10)
}

/// One mic session's attempt counter. Reset when the mic is toggled off.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceSession {
    attempts: u32,
}

impl VoiceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record one detection and return how many notes it requests.
    pub fn record_detection(&mut self) -> u32 {
        let requested = notes_for_attempt(self.attempts);
        self.attempts += 1;
        requested
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// A detection event surfaced to the page controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The user started making noise; `requested_notes` is the count the
    /// floating-note burst should spawn.
    Started { requested_notes: u32 },
    /// The user went quiet.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_counts_grow_per_attempt_and_cap() {
        assert_eq!(notes_for_attempt(0), 5);
        assert_eq!(notes_for_attempt(3), 8);
        assert_eq!(notes_for_attempt(5), 10);
        assert_eq!(notes_for_attempt(10), 10);
    }

    #[test]
    fn session_counts_detections() {
        let mut session = VoiceSession::new();
        assert_eq!(session.record_detection(), 5);
        assert_eq!(session.record_detection(), 6);
        assert_eq!(session.attempts(), 2);
        session.reset();
        assert_eq!(session.record_detection(), 5);
    }

    #[test]
    fn mic_errors_have_distinct_messages() {
        let messages = [
            MicError::PermissionDenied.to_string(),
            MicError::DeviceNotFound.to_string(),
            MicError::Unsupported.to_string(),
            MicError::Stream("broken".into()).to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
