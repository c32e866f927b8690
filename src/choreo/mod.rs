/*
Choreography Scheduler
======================

After a round completes, the UI walks through a fixed sequence of timed
stages (show the result, let it exit, raise the glass overlay, drop it,
reveal the mic prompt). Expressed as nested one-shot timers this is
exactly the shape that produces stale-callback bugs: a timer armed by
round A firing into round B's state.

Here the whole sequence is data - a list of (hold, stage) steps - and one
scheduler interprets it. The scheduler is armed with the generation of the
round that scheduled it and checks that token on every tick: if the round
has since restarted or aborted, the entire remaining sequence is dropped
as a unit. There is nothing to "catch"; stale work simply never runs.

The scheduler fires at most one stage per tick. Stages are hundreds of
milliseconds apart and the app ticks at ~60 fps, so a tick never owes two
stages in practice; tests that jump the clock call tick repeatedly.
*/

use std::time::{Duration, Instant};

use crate::round::Generation;

/// One step of a choreography: wait `hold`, then enter `stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<S> {
    pub hold: Duration,
    pub stage: S,
}

impl<S> Step<S> {
    pub fn new(hold: Duration, stage: S) -> Self {
        Self { hold, stage }
    }
}

/// The timing constants for the post-round and post-attempt sequences,
/// all in one place instead of scattered magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Pause between round completion and the result display.
    pub result_delay: Duration,
    /// How long the extremum-note result stays up.
    pub result_visible: Duration,
    /// Exit animation time for the result display.
    pub result_exit: Duration,
    /// How long the glass overlay stays up.
    pub overlay_visible: Duration,
    /// Exit animation time for the overlay.
    pub overlay_exit: Duration,
    /// Pause before the mic prompt appears.
    pub mic_reveal: Duration,
    /// Pause between the user attempt finishing and the second overlay.
    pub attempt_settle: Duration,
    /// Pause before the strike-through lands on the second overlay.
    pub strike_delay: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            result_delay: Duration::from_millis(200),
            result_visible: Duration::from_millis(2000),
            result_exit: Duration::from_millis(1000),
            overlay_visible: Duration::from_millis(4000),
            overlay_exit: Duration::from_millis(600),
            mic_reveal: Duration::from_millis(400),
            attempt_settle: Duration::from_millis(300),
            strike_delay: Duration::from_millis(500),
        }
    }
}

/// Interprets a step sequence against an injected clock, cancellable as a
/// unit via the round generation.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    steps: Vec<Step<S>>,
    next: usize,
    armed_at: Option<Instant>,
    armed_for: Option<Generation>,
}

impl<S: Copy> Scheduler<S> {
    pub fn new(steps: Vec<Step<S>>) -> Self {
        Self {
            steps,
            next: 0,
            armed_at: None,
            armed_for: None,
        }
    }

    /// Arm the sequence on behalf of a specific round generation.
    pub fn arm(&mut self, now: Instant, generation: Generation) {
        self.next = 0;
        self.armed_at = Some(now);
        self.armed_for = Some(generation);
    }

    /// Drop everything still pending.
    pub fn cancel(&mut self) {
        self.next = 0;
        self.armed_at = None;
        self.armed_for = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once every step has fired.
    pub fn is_finished(&self) -> bool {
        self.armed_at.is_some() && self.next >= self.steps.len()
    }

    /// Fire the next due stage, if any. `current` is the generation of the
    /// round as it is *now*; a mismatch with the arming generation means
    /// the round moved on, and the whole remainder is cancelled.
    pub fn tick(&mut self, now: Instant, current: Generation) -> Option<S> {
        let armed_at = self.armed_at?;
        if self.armed_for != Some(current) {
            self.cancel();
            return None;
        }
        if self.next >= self.steps.len() {
            return None;
        }

        let due: Duration = self.steps[..=self.next].iter().map(|s| s.hold).sum();
        if now.saturating_duration_since(armed_at) >= due {
            let stage = self.steps[self.next].stage;
            self.next += 1;
            Some(stage)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        A,
        B,
        C,
    }

    fn three_steps() -> Scheduler<Stage> {
        Scheduler::new(vec![
            Step::new(Duration::from_millis(100), Stage::A),
            Step::new(Duration::from_millis(200), Stage::B),
            Step::new(Duration::from_millis(300), Stage::C),
        ])
    }

    #[test]
    fn stages_fire_at_cumulative_deadlines() {
        let mut scheduler = three_steps();
        let start = Instant::now();
        let generation = Generation(1);
        scheduler.arm(start, generation);

        assert_eq!(scheduler.tick(start + Duration::from_millis(99), generation), None);
        assert_eq!(
            scheduler.tick(start + Duration::from_millis(100), generation),
            Some(Stage::A)
        );
        // B is due at 100 + 200 = 300ms.
        assert_eq!(scheduler.tick(start + Duration::from_millis(250), generation), None);
        assert_eq!(
            scheduler.tick(start + Duration::from_millis(300), generation),
            Some(Stage::B)
        );
        assert_eq!(
            scheduler.tick(start + Duration::from_millis(600), generation),
            Some(Stage::C)
        );
        assert!(scheduler.is_finished());
        assert_eq!(scheduler.tick(start + Duration::from_secs(5), generation), None);
    }

    #[test]
    fn generation_mismatch_cancels_the_remainder() {
        let mut scheduler = three_steps();
        let start = Instant::now();
        scheduler.arm(start, Generation(1));
        assert_eq!(
            scheduler.tick(start + Duration::from_millis(100), Generation(1)),
            Some(Stage::A)
        );

        // The round restarted; every later stage must be suppressed, even
        // if its deadline has long passed.
        assert_eq!(
            scheduler.tick(start + Duration::from_secs(10), Generation(2)),
            None
        );
        assert!(!scheduler.is_armed());
        assert_eq!(
            scheduler.tick(start + Duration::from_secs(20), Generation(2)),
            None
        );
    }

    #[test]
    fn cancel_is_idempotent_and_total() {
        let mut scheduler = three_steps();
        let start = Instant::now();
        scheduler.arm(start, Generation(3));
        scheduler.cancel();
        scheduler.cancel();
        assert_eq!(scheduler.tick(start + Duration::from_secs(1), Generation(3)), None);
    }

    #[test]
    fn rearming_restarts_the_sequence() {
        let mut scheduler = three_steps();
        let start = Instant::now();
        scheduler.arm(start, Generation(1));
        assert_eq!(
            scheduler.tick(start + Duration::from_millis(150), Generation(1)),
            Some(Stage::A)
        );

        let restart = start + Duration::from_secs(1);
        scheduler.arm(restart, Generation(2));
        assert_eq!(scheduler.tick(restart + Duration::from_millis(50), Generation(2)), None);
        assert_eq!(
            scheduler.tick(restart + Duration::from_millis(100), Generation(2)),
            Some(Stage::A)
        );
    }
}
