//! Rising note bubbles on the warmup page.
//!
//! Two spawn modes, matching the two triggers: a voice detection asks for
//! an exact burst (one bubble every 200 ms until the requested count),
//! while reference audio spawns continuously at a random cadence. Each
//! bubble carries a random note from C1 to B8 and rises for 3 to 5
//! seconds; when it leaves the screen its note lands in the hit list.
//! Once spawning has stopped and the last bubble is gone, a one-shot
//! completion edge fires so the page can raise the target overlay.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::music::Note;

const BURST_SPACING: Duration = Duration::from_millis(200);
const CONTINUOUS_MIN: Duration = Duration::from_millis(500);
const CONTINUOUS_JITTER_MS: u64 = 1000;
const RISE_MIN_MS: u64 = 3000;
const RISE_MAX_MS: u64 = 5000;

/// How new bubbles are being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Exactly this many more bubbles, one per [`BURST_SPACING`].
    Burst { remaining: u32 },
    /// Keep spawning at a random cadence until stopped.
    Continuous,
}

/// One on-screen bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingNote {
    pub note: Note,
    /// Horizontal lane as a fraction of screen width, 0.0 to 0.9.
    pub lane: f32,
    /// Bubble diameter in pixels, 40 to 60.
    pub size: f32,
    pub spawned_at: Instant,
    pub rise_time: Duration,
}

impl FloatingNote {
    /// 0 at the bottom of the screen, 1 fully risen.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.spawned_at);
        (elapsed.as_secs_f32() / self.rise_time.as_secs_f32()).min(1.0)
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.spawned_at) >= self.rise_time
    }
}

/// What one update observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatingUpdate {
    /// Notes whose bubbles finished rising this tick.
    pub disappeared: Vec<Note>,
    /// True on exactly the tick the last bubble of a stopped run left.
    pub all_complete: bool,
}

/// The warmup page's bubble field.
#[derive(Debug, Clone)]
pub struct FloatingNotes {
    active: Vec<FloatingNote>,
    notes_hit: Vec<Note>,
    mode: Option<SpawnMode>,
    next_spawn: Option<Instant>,
    spawned_this_run: bool,
}

impl Default for FloatingNotes {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatingNotes {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            notes_hit: Vec::new(),
            mode: None,
            next_spawn: None,
            spawned_this_run: false,
        }
    }

    pub fn active(&self) -> &[FloatingNote] {
        &self.active
    }

    pub fn notes_hit(&self) -> &[Note] {
        &self.notes_hit
    }

    pub fn is_spawning(&self) -> bool {
        self.mode.is_some()
    }

    /// Spawn exactly `count` bubbles, the first immediately.
    pub fn start_burst(&mut self, now: Instant, count: u32) {
        if count == 0 {
            return;
        }
        self.mode = Some(SpawnMode::Burst { remaining: count });
        self.next_spawn = Some(now);
        self.spawned_this_run = false;
    }

    /// Spawn continuously until [`stop`](Self::stop), the first bubble
    /// immediately.
    pub fn start_continuous(&mut self, now: Instant) {
        self.mode = Some(SpawnMode::Continuous);
        self.next_spawn = Some(now);
        self.spawned_this_run = false;
    }

    /// Stop producing bubbles; the ones in flight finish their rise.
    pub fn stop(&mut self) {
        self.mode = None;
        self.next_spawn = None;
    }

    /// Drop everything, including the hit list (new round).
    pub fn clear(&mut self) {
        self.active.clear();
        self.notes_hit.clear();
        self.mode = None;
        self.next_spawn = None;
        self.spawned_this_run = false;
    }

    /// Advance to `now`: spawn due bubbles, retire finished ones.
    pub fn update<R: Rng>(&mut self, now: Instant, rng: &mut R) -> FloatingUpdate {
        while let (Some(mode), Some(due)) = (self.mode, self.next_spawn) {
            if now < due {
                break;
            }
            self.spawn(due, rng);
            match mode {
                SpawnMode::Burst { remaining } => {
                    if remaining <= 1 {
                        self.stop();
                    } else {
                        self.mode = Some(SpawnMode::Burst {
                            remaining: remaining - 1,
                        });
                        self.next_spawn = Some(due + BURST_SPACING);
                    }
                }
                SpawnMode::Continuous => {
                    let jitter = Duration::from_millis(rng.gen_range(0..CONTINUOUS_JITTER_MS));
                    self.next_spawn = Some(due + CONTINUOUS_MIN + jitter);
                }
            }
        }

        let mut update = FloatingUpdate::default();
        let mut kept = Vec::with_capacity(self.active.len());
        for bubble in self.active.drain(..) {
            if bubble.expired(now) {
                update.disappeared.push(bubble.note);
                self.notes_hit.push(bubble.note);
            } else {
                kept.push(bubble);
            }
        }
        self.active = kept;

        if self.mode.is_none() && self.spawned_this_run && self.active.is_empty() {
            update.all_complete = true;
            self.spawned_this_run = false;
        }
        update
    }

    fn spawn<R: Rng>(&mut self, at: Instant, rng: &mut R) {
        let rise_ms = rng.gen_range(RISE_MIN_MS..=RISE_MAX_MS);
        self.active.push(FloatingNote {
            note: Note::random(rng, 1..=8),
            lane: rng.gen_range(0.0..0.9),
            size: rng.gen_range(40.0..60.0),
            spawned_at: at,
            rise_time: Duration::from_millis(rise_ms),
        });
        self.spawned_this_run = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_spawns_the_exact_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_burst(start, 5);

        // Walk well past the burst window.
        let mut spawned = 0;
        for ms in (0..2000).step_by(16) {
            let before = field.active().len() + field.notes_hit().len();
            field.update(start + Duration::from_millis(ms), &mut rng);
            let after = field.active().len() + field.notes_hit().len();
            spawned += after.saturating_sub(before);
        }
        assert_eq!(spawned, 5);
        assert!(!field.is_spawning());
    }

    #[test]
    fn burst_spacing_is_200ms() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_burst(start, 3);

        field.update(start, &mut rng);
        assert_eq!(field.active().len(), 1);
        field.update(start + Duration::from_millis(199), &mut rng);
        assert_eq!(field.active().len(), 1);
        field.update(start + Duration::from_millis(200), &mut rng);
        assert_eq!(field.active().len(), 2);
        field.update(start + Duration::from_millis(400), &mut rng);
        assert_eq!(field.active().len(), 3);
    }

    #[test]
    fn finished_bubbles_land_in_the_hit_list_then_completion_fires_once() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_burst(start, 2);

        let mut completions = 0;
        let mut at = start;
        // Bursts finish spawning in 200ms and every rise is at most 5s.
        while at < start + Duration::from_secs(7) {
            let update = field.update(at, &mut rng);
            if update.all_complete {
                completions += 1;
            }
            at += Duration::from_millis(16);
        }
        assert_eq!(field.notes_hit().len(), 2);
        assert!(field.active().is_empty());
        assert_eq!(completions, 1);
    }

    #[test]
    fn continuous_mode_spawns_until_stopped() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_continuous(start);

        for ms in (0..4000).step_by(16) {
            field.update(start + Duration::from_millis(ms), &mut rng);
        }
        let total = field.active().len() + field.notes_hit().len();
        // Cadence is one bubble per 0.5 - 1.5s, so 4s yields at least 3.
        assert!(total >= 3, "only {total} bubbles in 4s");

        field.stop();
        let frozen = field.active().len() + field.notes_hit().len();
        for ms in (4000..6000).step_by(16) {
            field.update(start + Duration::from_millis(ms), &mut rng);
        }
        assert_eq!(field.active().len() + field.notes_hit().len(), frozen);
    }

    #[test]
    fn clear_drops_bubbles_and_the_hit_list() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_burst(start, 4);
        for ms in (0..6000).step_by(50) {
            field.update(start + Duration::from_millis(ms), &mut rng);
        }
        assert!(!field.notes_hit().is_empty());

        field.clear();
        assert!(field.active().is_empty());
        assert!(field.notes_hit().is_empty());
        assert!(!field.is_spawning());
    }

    #[test]
    fn bubbles_stay_in_their_lanes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = FloatingNotes::new();
        let start = Instant::now();
        field.start_burst(start, 10);
        for ms in (0..2200).step_by(16) {
            field.update(start + Duration::from_millis(ms), &mut rng);
        }
        for bubble in field.active() {
            assert!((0.0..0.9).contains(&bubble.lane));
            assert!((40.0..60.0).contains(&bubble.size));
            assert!((1..=8).contains(&bubble.note.octave));
        }
    }
}
