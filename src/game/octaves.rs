//! The piano keyboard's octave browser.
//!
//! The results page steps one octave at a time across octaves 1 to 8;
//! the catch page toggles between the low half (octave 1) and the high
//! half (octave 5). Both share the 300 ms slide animation, during which
//! further input is ignored.

use std::time::{Duration, Instant};

use crate::music::Note;

const SLIDE_TIME: Duration = Duration::from_millis(300);

pub const MIN_OCTAVE: i8 = 1;
pub const MAX_OCTAVE: i8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctaveShift {
    Up,
    Down,
}

/// How a shift maps to a target octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpMode {
    /// One octave per shift, clamped to 1..=8.
    Step,
    /// Up lands on 5, down lands on 1.
    Toggle,
}

/// Out-of-view indicators: are there highlighted notes to either side of
/// the octave on screen?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeIndicators {
    pub left: bool,
    pub right: bool,
}

impl RangeIndicators {
    pub fn for_notes(notes: &[Note], shown_octave: i8) -> Self {
        Self {
            left: notes.iter().any(|note| note.octave < shown_octave),
            right: notes.iter().any(|note| note.octave > shown_octave),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OctaveBrowser {
    mode: JumpMode,
    current: i8,
    slide: Option<(i8, OctaveShift, Instant)>,
}

impl OctaveBrowser {
    pub fn new(mode: JumpMode, start_octave: i8) -> Self {
        Self {
            mode,
            current: start_octave.clamp(MIN_OCTAVE, MAX_OCTAVE),
            slide: None,
        }
    }

    /// The octave currently on screen (the old one until a slide lands).
    pub fn current(&self) -> i8 {
        self.current
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    pub fn slide_direction(&self) -> Option<OctaveShift> {
        self.slide.map(|(_, direction, _)| direction)
    }

    /// Request a shift. Returns false when ignored (mid-slide or already
    /// at the edge).
    pub fn shift(&mut self, direction: OctaveShift, now: Instant) -> bool {
        if self.slide.is_some() {
            return false;
        }
        let target = match (self.mode, direction) {
            (JumpMode::Step, OctaveShift::Up) => self.current + 1,
            (JumpMode::Step, OctaveShift::Down) => self.current - 1,
            (JumpMode::Toggle, OctaveShift::Up) => 5,
            (JumpMode::Toggle, OctaveShift::Down) => 1,
        };
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&target) || target == self.current {
            return false;
        }
        self.slide = Some((target, direction, now + SLIDE_TIME));
        true
    }

    /// Land any slide whose animation time has elapsed.
    pub fn update(&mut self, now: Instant) {
        if let Some((target, _, lands_at)) = self.slide {
            if now >= lands_at {
                self.current = target;
                self.slide = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::PitchClass;

    #[test]
    fn step_mode_moves_one_octave_after_the_slide() {
        let start = Instant::now();
        let mut browser = OctaveBrowser::new(JumpMode::Step, 4);
        assert!(browser.shift(OctaveShift::Up, start));
        assert_eq!(browser.current(), 4);
        assert!(browser.is_sliding());

        browser.update(start + Duration::from_millis(299));
        assert_eq!(browser.current(), 4);
        browser.update(start + Duration::from_millis(300));
        assert_eq!(browser.current(), 5);
        assert!(!browser.is_sliding());
    }

    #[test]
    fn input_is_ignored_mid_slide() {
        let start = Instant::now();
        let mut browser = OctaveBrowser::new(JumpMode::Step, 4);
        assert!(browser.shift(OctaveShift::Up, start));
        assert!(!browser.shift(OctaveShift::Up, start + Duration::from_millis(100)));
        browser.update(start + Duration::from_millis(300));
        assert_eq!(browser.current(), 5);
    }

    #[test]
    fn step_mode_clamps_to_the_keyboard() {
        let start = Instant::now();
        let mut browser = OctaveBrowser::new(JumpMode::Step, 8);
        assert!(!browser.shift(OctaveShift::Up, start));
        assert_eq!(browser.current(), 8);

        let mut browser = OctaveBrowser::new(JumpMode::Step, 1);
        assert!(!browser.shift(OctaveShift::Down, start));
    }

    #[test]
    fn toggle_mode_jumps_between_the_halves() {
        let start = Instant::now();
        let mut browser = OctaveBrowser::new(JumpMode::Toggle, 1);
        assert!(browser.shift(OctaveShift::Up, start));
        browser.update(start + Duration::from_millis(300));
        assert_eq!(browser.current(), 5);

        assert!(browser.shift(OctaveShift::Down, start + Duration::from_secs(1)));
        browser.update(start + Duration::from_secs(2));
        assert_eq!(browser.current(), 1);

        // Up while already high is a no-op.
        assert!(!browser.shift(OctaveShift::Up, start + Duration::from_secs(3)));
    }

    #[test]
    fn indicators_point_at_offscreen_notes() {
        let notes = [
            Note::new(PitchClass::A, 4),
            Note::new(PitchClass::C, 3),
        ];
        let visible = RangeIndicators::for_notes(&notes, 4);
        assert!(visible.left);
        assert!(!visible.right);

        let below = RangeIndicators::for_notes(&notes, 2);
        assert!(!below.left);
        assert!(below.right);

        let between = RangeIndicators::for_notes(&notes, 3);
        assert!(!between.left);
        assert!(between.right);
    }
}
