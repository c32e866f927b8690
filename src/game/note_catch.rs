//! The catch page: notes slide across the graph and resolve at the
//! catch line.
//!
//! While the wheel spins, a new slider appears every 2 seconds and takes
//! 4 seconds to cross from behind the wheel to past the right edge. The
//! moment a slider reaches the catch line at x = 544 it resolves, once,
//! to caught or missed on a coin flip; a catch is worth one point. The
//! outcome is pure chance, not a skill check. Sliders fade over the last
//! 20 % of their run.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::music::Note;

const SLIDE_TIME: Duration = Duration::from_secs(4);
const SPAWN_EVERY: Duration = Duration::from_secs(2);
/// Sliders start hidden behind the wheel, left of the graph.
const ENTRY_X: f32 = -150.0;
const EXIT_X: f32 = 850.0;
/// The catch line: the left edge of the first target rectangle.
pub const CATCH_X: f32 = 544.0;
const FADE_START: f32 = 0.8;

/// How a slider resolved at the catch line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchState {
    Pending,
    Caught,
    Missed,
}

/// One sliding note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderNote {
    pub note: Note,
    pub spawned_at: Instant,
    pub state: CatchState,
}

impl SliderNote {
    /// 0 at entry, 1 at exit; clamped.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.spawned_at);
        (elapsed.as_secs_f32() / SLIDE_TIME.as_secs_f32()).min(1.0)
    }

    pub fn x(&self, now: Instant) -> f32 {
        ENTRY_X + self.progress(now) * (EXIT_X - ENTRY_X)
    }

    /// 1.0 for most of the run, fading to 0 over the last 20 %.
    pub fn opacity(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress <= FADE_START {
            1.0
        } else {
            1.0 - (progress - FADE_START) / (1.0 - FADE_START)
        }
    }

    fn done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// The catch mini-game's state.
#[derive(Debug, Clone)]
pub struct CatchGame {
    sliders: Vec<SliderNote>,
    points: u32,
    running: bool,
    next_spawn: Option<Instant>,
}

impl Default for CatchGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CatchGame {
    pub fn new() -> Self {
        Self {
            sliders: Vec::new(),
            points: 0,
            running: false,
            next_spawn: None,
        }
    }

    pub fn sliders(&self) -> &[SliderNote] {
        &self.sliders
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start spawning; the first slider appears immediately.
    pub fn start(&mut self, now: Instant) {
        self.running = true;
        self.next_spawn = Some(now);
    }

    /// Stop spawning; sliders already in flight finish their run.
    pub fn stop(&mut self) {
        self.running = false;
        self.next_spawn = None;
    }

    /// Full reset for a page re-entry.
    pub fn reset(&mut self) {
        self.stop();
        self.sliders.clear();
        self.points = 0;
    }

    /// Advance to `now`: spawn, resolve at the catch line, retire.
    pub fn update<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        while let Some(due) = self.next_spawn {
            if !self.running || now < due {
                break;
            }
            self.sliders.push(SliderNote {
                note: Note::random(rng, 0..=8),
                spawned_at: due,
                state: CatchState::Pending,
            });
            self.next_spawn = Some(due + SPAWN_EVERY);
        }

        for slider in &mut self.sliders {
            if slider.state == CatchState::Pending && slider.x(now) >= CATCH_X {
                slider.state = if rng.gen_bool(0.5) {
                    self.points += 1;
                    CatchState::Caught
                } else {
                    CatchState::Missed
                };
            }
        }

        self.sliders.retain(|slider| !slider.done(now));
    }
}
