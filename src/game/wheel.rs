//! The sustain page's spin wheel.
//!
//! Spinning is pure theater: the wheel turns for 2 seconds, settles for a
//! beat, then lands on a uniformly random note from the common vocal
//! octaves (3 to 5). The landed note is what the overlay tells the user
//! to sustain.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::music::Note;

const SPIN_TIME: Duration = Duration::from_secs(2);
/// Beat between the wheel stopping and the note appearing.
const SETTLE_TIME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelState {
    Idle,
    Spinning,
    /// Wheel has stopped, note not revealed yet.
    Settling,
    Landed(Note),
}

#[derive(Debug, Clone, Copy)]
pub struct SpinWheel {
    state: WheelState,
    spun_at: Option<Instant>,
}

impl Default for SpinWheel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinWheel {
    pub fn new() -> Self {
        Self {
            state: WheelState::Idle,
            spun_at: None,
        }
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn selected(&self) -> Option<Note> {
        match self.state {
            WheelState::Landed(note) => Some(note),
            _ => None,
        }
    }

    /// Kick off a spin, clearing any previous selection.
    pub fn spin(&mut self, now: Instant) {
        self.state = WheelState::Spinning;
        self.spun_at = Some(now);
    }

    pub fn reset(&mut self) {
        self.state = WheelState::Idle;
        self.spun_at = None;
    }

    /// Advance the wheel; returns the note on the tick it lands.
    pub fn update<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<Note> {
        let spun_at = self.spun_at?;
        let elapsed = now.saturating_duration_since(spun_at);
        match self.state {
            WheelState::Spinning if elapsed >= SPIN_TIME => {
                self.state = WheelState::Settling;
                None
            }
            WheelState::Settling if elapsed >= SPIN_TIME + SETTLE_TIME => {
                let note = Note::random(rng, 3..=5);
                self.state = WheelState::Landed(note);
                Some(note)
            }
            _ => None,
        }
    }
}
