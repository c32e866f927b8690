/*
Round Driver
============

One "round" is a single play-through of a page's contour: the marker sweeps
the graph left to right over a fixed duration while the driver classifies
every frame's position into a note slot.

Vocabulary
----------

  progress    Normalized sweep position, 0.0 -> 1.0, clamped. Derived from
              wall-clock elapsed time so frame rate never changes the speed.

  highlight   The set of note slots hit so far this round. Monotone: slots
              are only ever added, and the whole set resets at round start.

  extremum    The largest slot index seen this round. Comparison is by slot
              index in the displayed table, NOT by musical pitch - on a
              descending page the "lowest note" is reported through the same
              largest-index rule.

  generation  Cancellation token. Every start/abort bumps it; anything
              scheduled against an older generation must treat its work as
              stale and do nothing.

The driver is clock-free: callers pass `Instant`s in, which is what makes
all of the timing assertions below testable without sleeping.
*/

mod highlight;

pub use highlight::HighlightSet;

use std::time::{Duration, Instant};

use crate::classify;
use crate::contour::Contour;
use crate::music::Note;
use crate::CONTOUR_WIDTH;

/// Where a round is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Running,
    Complete,
}

/// Monotonically increasing round token; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(pub u64);

/// What one tick observed, for the caller's rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub x: f32,
    pub y: f32,
    pub slot: Option<usize>,
    /// True on exactly the tick that crossed progress 1.0.
    pub just_completed: bool,
}

/// Drives one round of a contour sweep.
#[derive(Debug, Clone)]
pub struct Round {
    contour: Contour,
    duration: Duration,
    phase: RoundPhase,
    started_at: Option<Instant>,
    progress: f32,
    highlights: HighlightSet,
    extremum: Option<usize>,
    trace: Vec<(f32, f32)>,
    generation: u64,
}

impl Round {
    pub fn new(contour: Contour, duration: Duration) -> Self {
        Self {
            contour,
            duration,
            phase: RoundPhase::Idle,
            started_at: None,
            progress: 0.0,
            highlights: HighlightSet::new(),
            extremum: None,
            trace: Vec::new(),
            generation: 0,
        }
    }

    /// Swap in a different contour; only allowed between rounds.
    pub fn set_contour(&mut self, contour: Contour) {
        debug_assert!(self.phase != RoundPhase::Running);
        self.contour = contour;
    }

    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// Largest slot index observed this round (see module docs on the
    /// index-based comparison).
    pub fn extremum_slot(&self) -> Option<usize> {
        self.extremum
    }

    /// The extremum as a note, if any slot was hit.
    pub fn extremum_note(&self) -> Option<Note> {
        self.extremum.map(classify::note_for_slot)
    }

    /// The polyline left behind by the marker so far.
    pub fn trace(&self) -> &[(f32, f32)] {
        &self.trace
    }

    /// Begin a round: all round-scoped state resets before the first tick.
    pub fn start(&mut self, now: Instant) {
        self.clear_round_state();
        self.phase = RoundPhase::Running;
        self.started_at = Some(now);
        self.generation += 1;
    }

    /// Abandon the round and return to idle. Also bumps the generation so
    /// anything still scheduled against the old round goes stale.
    pub fn abort(&mut self) {
        self.clear_round_state();
        self.phase = RoundPhase::Idle;
        self.generation += 1;
    }

    fn clear_round_state(&mut self) {
        self.progress = 0.0;
        self.started_at = None;
        self.highlights.clear();
        self.extremum = None;
        self.trace.clear();
    }

    /// Advance the round to `now`. Returns `None` unless running.
    pub fn tick(&mut self, now: Instant) -> Option<TickReport> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        let started = self.started_at?;

        let elapsed = now.saturating_duration_since(started);
        let raw = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        // Progress never moves backward within a round.
        self.progress = raw.clamp(0.0, 1.0).max(self.progress);

        let x = self.progress * CONTOUR_WIDTH;
        let y = self.contour.y_at(x);
        self.trace.push((x, y));

        let slot = classify::classify(y);
        if let Some(slot) = slot {
            self.highlights.insert(slot);
            // Largest index wins; ties keep the earlier observation.
            if self.extremum.map_or(true, |held| slot > held) {
                self.extremum = Some(slot);
            }
        }

        let just_completed = self.progress >= 1.0;
        if just_completed {
            self.phase = RoundPhase::Complete;
        }

        Some(TickReport {
            x,
            y,
            slot,
            just_completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{Contour, DESCENT, SEGMENT_CATALOG};

    fn descent_round() -> Round {
        Round::new(Contour::Staircase(&DESCENT), Duration::from_secs(3))
    }

    fn instants(count: u32, step_ms: u64) -> (Instant, Vec<Instant>) {
        let start = Instant::now();
        let ticks = (1..=count as u64)
            .map(|i| start + Duration::from_millis(i * step_ms))
            .collect();
        (start, ticks)
    }

    #[test]
    fn progress_is_monotone_and_clamped() {
        let mut round = descent_round();
        let (start, ticks) = instants(50, 100);
        round.start(start);

        let mut prev = 0.0;
        for now in ticks {
            round.tick(now);
            assert!(round.progress() >= prev);
            assert!(round.progress() <= 1.0);
            prev = round.progress();
        }
        assert_eq!(round.progress(), 1.0);
    }

    #[test]
    fn highlights_only_grow_within_a_round() {
        let mut round = descent_round();
        let (start, ticks) = instants(60, 50);
        round.start(start);

        let mut prev_len = 0;
        for now in ticks {
            round.tick(now);
            assert!(round.highlights().len() >= prev_len);
            prev_len = round.highlights().len();
        }
        assert!(prev_len > 0, "a full descent sweep should hit notes");
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut round = descent_round();
        let (start, ticks) = instants(80, 50);
        round.start(start);

        let completions = ticks
            .into_iter()
            .filter_map(|now| round.tick(now))
            .filter(|report| report.just_completed)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(round.phase(), RoundPhase::Complete);

        // Ticks after completion are ignored entirely.
        assert!(round.tick(Instant::now() + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn starting_a_new_round_resets_everything() {
        let mut round = descent_round();
        let (start, ticks) = instants(80, 50);
        round.start(start);
        for now in ticks {
            round.tick(now);
        }
        assert!(!round.highlights().is_empty());
        assert!(round.extremum_slot().is_some());
        let old_generation = round.generation();

        let restart = Instant::now();
        round.start(restart);
        assert_eq!(round.progress(), 0.0);
        assert!(round.highlights().is_empty());
        assert_eq!(round.extremum_slot(), None);
        assert!(round.trace().is_empty());
        assert_ne!(round.generation(), old_generation);
    }

    #[test]
    fn extremum_is_the_largest_slot_index() {
        // The descent starts at the top lane (high slot index) and walks
        // down, so the index-based extremum is the slot hit first.
        let mut round = descent_round();
        let (start, ticks) = instants(120, 25);
        round.start(start);
        for now in ticks {
            round.tick(now);
        }
        // y=40 at the start scans into slot 9's band first (lane 55,
        // distance exactly 15).
        assert_eq!(round.extremum_slot(), Some(9));
        assert_eq!(round.extremum_note().unwrap().to_string(), "A4");
    }

    #[test]
    fn melody_round_collects_segment_levels() {
        let mut round = Round::new(
            Contour::Segmented(&SEGMENT_CATALOG[0]),
            Duration::from_secs(3),
        );
        let (start, ticks) = instants(120, 25);
        round.start(start);
        for now in ticks {
            round.tick(now);
        }
        // low_level 220 -> slot 2 or 3 band, high_level 100 -> slot 7 band.
        assert!(round.highlights().contains(7));
        assert!(!round.highlights().is_empty());
    }

    #[test]
    fn abort_clears_and_bumps_generation() {
        let mut round = descent_round();
        let (start, ticks) = instants(10, 50);
        round.start(start);
        for now in ticks {
            round.tick(now);
        }
        let running_generation = round.generation();
        round.abort();
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert!(round.highlights().is_empty());
        assert_ne!(round.generation(), running_generation);
        assert!(round.tick(Instant::now()).is_none());
    }
}
