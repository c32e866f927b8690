/*
Game Pages
==========

The game is a fixed tour through seven full-screen pages. Four of them
(ascent, descent, melody, sustain) share the same skeleton: play a
reference contour, show the extremum note, raise an overlay, prompt for
the mic, run the user's attempt, raise a second overlay with retry/next.
That skeleton is [`RoundFlow`], configured per page instead of being
copied per page.

The rest is page furniture with real state of its own:

  floating   rising note bubbles on the warmup page (burst mode after a
             voice detection, continuous mode while audio plays)
  wheel      the sustain page's spin wheel (2 s spin, then a random note)
  note_catch the catch page's left-to-right sliders and scoring
  octaves    the keyboard browser on the results page

Cross-page state is [`GameData`]: one small record a page writes and a
later page reads. Nothing else outlives a page visit.
*/

mod floating;
mod flow;
mod note_catch;
mod octaves;
mod wheel;

pub use floating::{FloatingNote, FloatingNotes, FloatingUpdate, SpawnMode};
pub use flow::{FlowEvent, FlowStage, PagePhase, RoundConfig, RoundFlow};
pub use note_catch::{CatchGame, CatchState, SliderNote, CATCH_X};
pub use octaves::{JumpMode, OctaveBrowser, OctaveShift, RangeIndicators};
pub use wheel::{SpinWheel, WheelState};

use crate::music::Note;

/// The seven pages, in tour order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Warmup,
    Ascent,
    Descent,
    Results,
    Melody,
    Sustain,
    Catch,
}

impl PageId {
    pub const ALL: [PageId; 7] = [
        PageId::Warmup,
        PageId::Ascent,
        PageId::Descent,
        PageId::Results,
        PageId::Melody,
        PageId::Sustain,
        PageId::Catch,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Warmup => "Hit some musical notes",
            PageId::Ascent => "Find your highest note",
            PageId::Descent => "Find your lowest note",
            PageId::Results => "Your vocal range",
            PageId::Melody => "Follow the melody",
            PageId::Sustain => "Sustain the note",
            PageId::Catch => "Catch the notes",
        }
    }

    /// The page the Next button leads to; the tour wraps back to warmup.
    pub fn next(self) -> PageId {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// The record that outlives page visits. Each field is written by one
/// page and read later, most of them by the results keyboard.
///
/// The melody and sustain "lowest" fields are found with the same
/// largest-slot-index rule the ascent uses; every comparison here is by
/// table index, never by pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameData {
    pub highest_from_ascent: Option<Note>,
    pub lowest_from_descent: Option<Note>,
    pub lowest_from_melody: Option<Note>,
    pub lowest_from_sustain: Option<Note>,
}

impl GameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notes the results keyboard highlights, in the order recorded.
    pub fn range_notes(&self) -> Vec<Note> {
        [
            self.highest_from_ascent,
            self.lowest_from_descent,
            self.lowest_from_melody,
            self.lowest_from_sustain,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
