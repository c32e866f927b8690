//! The shared page skeleton: reference round, choreography, user attempt.
//!
//! Four pages play a reference contour and then let the user echo it.
//! Instead of each page carrying its own copy of that wiring, the whole
//! lifecycle is one state machine driven by one transition function, and
//! every page difference is data in [`RoundConfig`].

use std::time::{Duration, Instant};

use crate::choreo::{Delays, Scheduler, Step};
use crate::contour::Contour;
use crate::music::Note;
use crate::round::{Round, RoundPhase};

/// A timed stage entered by the choreography scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    ShowResult,
    ExitResult,
    ShowOverlay,
    ExitOverlay,
    RevealMic,
    ShowSecondOverlay,
    StrikeThrough,
}

/// Where the page is in its round lifecycle. One value, one transition
/// function; there is no combination of booleans to get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Idle,
    Playing,
    ShowingResult,
    ResultExiting,
    ShowingOverlay,
    OverlayExiting,
    AwaitingMic,
    UserAttempt,
    ShowingSecondOverlay,
    /// Second overlay with the strike-through landed; stays until the
    /// user presses Retry or Next.
    StruckThrough,
}

/// Everything that differs between the pages sharing this skeleton.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    pub reference: Contour,
    pub reference_duration: Duration,
    pub attempt: Contour,
    pub attempt_duration: Duration,
    pub delays: Delays,
}

/// What a tick observed, for the caller to react to (write the extremum
/// into the cross-page data, redraw, play a sound).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowEvent {
    ReferenceComplete { extremum: Option<Note> },
    AttemptComplete,
    StageEntered(FlowStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmedBy {
    Reference,
    Attempt,
}

/// One page's round flow: reference sweep, post-round choreography, user
/// attempt, post-attempt choreography.
#[derive(Debug, Clone)]
pub struct RoundFlow {
    delays: Delays,
    reference: Round,
    attempt: Round,
    scheduler: Scheduler<FlowStage>,
    armed_by: Option<ArmedBy>,
    phase: PagePhase,
    mic_engaged: bool,
}

impl RoundFlow {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            delays: config.delays,
            reference: Round::new(config.reference, config.reference_duration),
            attempt: Round::new(config.attempt, config.attempt_duration),
            scheduler: Scheduler::new(Vec::new()),
            armed_by: None,
            phase: PagePhase::Idle,
            mic_engaged: false,
        }
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn reference(&self) -> &Round {
        &self.reference
    }

    pub fn attempt(&self) -> &Round {
        &self.attempt
    }

    pub fn mic_engaged(&self) -> bool {
        self.mic_engaged
    }

    /// Points shown on the sustain page: one per note the attempt lit up.
    pub fn attempt_points(&self) -> u32 {
        self.attempt.highlights().len() as u32
    }

    /// Swap the reference contour (the melody page's New Pattern button).
    /// Only meaningful between rounds; also drops any pending stages.
    pub fn set_reference_contour(&mut self, contour: Contour) {
        self.reference.abort();
        self.attempt.abort();
        self.scheduler.cancel();
        self.armed_by = None;
        self.reference.set_contour(contour);
        self.phase = PagePhase::Idle;
    }

    /// Start the reference round. Restarting mid-flow is allowed and
    /// cancels everything the previous round still had scheduled.
    pub fn begin(&mut self, now: Instant) {
        self.attempt.abort();
        self.scheduler.cancel();
        self.armed_by = None;
        self.mic_engaged = false;
        self.reference.start(now);
        self.phase = PagePhase::Playing;
    }

    /// Stop everything and return to idle (stop button or page exit).
    pub fn stop(&mut self) {
        self.reference.abort();
        self.attempt.abort();
        self.scheduler.cancel();
        self.armed_by = None;
        self.mic_engaged = false;
        self.phase = PagePhase::Idle;
    }

    /// The mic button. First tap engages; second tap disengages and
    /// abandons any attempt in progress.
    pub fn toggle_mic(&mut self) {
        if self.phase == PagePhase::Idle || self.phase == PagePhase::Playing {
            return;
        }
        if self.mic_engaged {
            self.mic_engaged = false;
            self.attempt.abort();
            self.scheduler.cancel();
            self.armed_by = None;
            self.phase = PagePhase::AwaitingMic;
        } else {
            self.mic_engaged = true;
        }
    }

    /// A voice-start edge from the detector. Ignored unless the page is
    /// waiting on the mic and the mic is engaged.
    pub fn voice_detected(&mut self, now: Instant) {
        if self.phase == PagePhase::AwaitingMic && self.mic_engaged {
            self.attempt.start(now);
            self.phase = PagePhase::UserAttempt;
        }
    }

    /// Retry from the second overlay: back to the mic prompt, attempt
    /// state cleared, mic still engaged.
    pub fn retry(&mut self) {
        if matches!(
            self.phase,
            PagePhase::ShowingSecondOverlay | PagePhase::StruckThrough
        ) {
            self.attempt.abort();
            self.scheduler.cancel();
            self.armed_by = None;
            self.phase = PagePhase::AwaitingMic;
        }
    }

    /// Advance the tour: everything round-scoped dies with the page.
    pub fn finish(&mut self) {
        self.stop();
    }

    /// Advance to `now`. At most one event per tick.
    pub fn tick(&mut self, now: Instant) -> Option<FlowEvent> {
        if self.reference.phase() == RoundPhase::Running {
            let report = self.reference.tick(now)?;
            if report.just_completed {
                self.arm_post_round(now);
                return Some(FlowEvent::ReferenceComplete {
                    extremum: self.reference.extremum_note(),
                });
            }
            return None;
        }

        if self.attempt.phase() == RoundPhase::Running {
            let report = self.attempt.tick(now)?;
            if report.just_completed {
                self.arm_post_attempt(now);
                return Some(FlowEvent::AttemptComplete);
            }
            return None;
        }

        let generation = match self.armed_by? {
            ArmedBy::Reference => self.reference.generation(),
            ArmedBy::Attempt => self.attempt.generation(),
        };
        let stage = self.scheduler.tick(now, generation)?;
        self.enter(stage);
        Some(FlowEvent::StageEntered(stage))
    }

    fn enter(&mut self, stage: FlowStage) {
        self.phase = match stage {
            FlowStage::ShowResult => PagePhase::ShowingResult,
            FlowStage::ExitResult => PagePhase::ResultExiting,
            FlowStage::ShowOverlay => PagePhase::ShowingOverlay,
            FlowStage::ExitOverlay => PagePhase::OverlayExiting,
            FlowStage::RevealMic => PagePhase::AwaitingMic,
            FlowStage::ShowSecondOverlay => PagePhase::ShowingSecondOverlay,
            FlowStage::StrikeThrough => PagePhase::StruckThrough,
        };
    }

    fn arm_post_round(&mut self, now: Instant) {
        let d = &self.delays;
        let mut steps = Vec::new();
        // A round that lit no notes has no result to show.
        if self.reference.highlights().is_empty() {
            steps.push(Step::new(d.result_delay, FlowStage::ShowOverlay));
        } else {
            steps.push(Step::new(d.result_delay, FlowStage::ShowResult));
            steps.push(Step::new(d.result_visible, FlowStage::ExitResult));
            steps.push(Step::new(d.result_exit, FlowStage::ShowOverlay));
        }
        steps.push(Step::new(d.overlay_visible, FlowStage::ExitOverlay));
        // Mic button fades in once the overlay's slide-out has finished.
        steps.push(Step::new(d.overlay_exit + d.mic_reveal, FlowStage::RevealMic));

        self.scheduler = Scheduler::new(steps);
        self.scheduler.arm(now, self.reference.generation());
        self.armed_by = Some(ArmedBy::Reference);
    }

    fn arm_post_attempt(&mut self, now: Instant) {
        let d = &self.delays;
        self.scheduler = Scheduler::new(vec![
            Step::new(d.attempt_settle, FlowStage::ShowSecondOverlay),
            Step::new(d.strike_delay, FlowStage::StrikeThrough),
        ]);
        self.scheduler.arm(now, self.attempt.generation());
        self.armed_by = Some(ArmedBy::Attempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::{WavePattern, DESCENT, DESCENT_USER};

    fn descent_flow() -> RoundFlow {
        RoundFlow::new(RoundConfig {
            reference: Contour::Staircase(&DESCENT),
            reference_duration: Duration::from_secs(3),
            attempt: Contour::Staircase(&DESCENT_USER),
            attempt_duration: Duration::from_secs(5),
            delays: Delays::default(),
        })
    }

    /// Tick repeatedly until the next event, jumping the clock in small
    /// steps the way the frame loop would.
    fn run_until_event(flow: &mut RoundFlow, from: Instant, limit: Duration) -> (FlowEvent, Instant) {
        let mut at = from;
        let step = Duration::from_millis(16);
        while at <= from + limit {
            if let Some(event) = flow.tick(at) {
                return (event, at);
            }
            at += step;
        }
        panic!("no event within {limit:?} (phase {:?})", flow.phase());
    }

    #[test]
    fn full_flow_walks_every_phase_in_order() {
        let mut flow = descent_flow();
        let start = Instant::now();
        flow.begin(start);
        assert_eq!(flow.phase(), PagePhase::Playing);

        let (event, at) = run_until_event(&mut flow, start, Duration::from_secs(4));
        assert!(matches!(event, FlowEvent::ReferenceComplete { extremum: Some(_) }));

        let expected = [
            (FlowStage::ShowResult, PagePhase::ShowingResult),
            (FlowStage::ExitResult, PagePhase::ResultExiting),
            (FlowStage::ShowOverlay, PagePhase::ShowingOverlay),
            (FlowStage::ExitOverlay, PagePhase::OverlayExiting),
            (FlowStage::RevealMic, PagePhase::AwaitingMic),
        ];
        let mut at = at;
        for (stage, phase) in expected {
            let (event, when) = run_until_event(&mut flow, at, Duration::from_secs(5));
            assert_eq!(event, FlowEvent::StageEntered(stage));
            assert_eq!(flow.phase(), phase);
            at = when;
        }

        flow.toggle_mic();
        assert!(flow.mic_engaged());
        flow.voice_detected(at);
        assert_eq!(flow.phase(), PagePhase::UserAttempt);

        let (event, at) = run_until_event(&mut flow, at, Duration::from_secs(6));
        assert_eq!(event, FlowEvent::AttemptComplete);
        let (event, at) = run_until_event(&mut flow, at, Duration::from_secs(1));
        assert_eq!(event, FlowEvent::StageEntered(FlowStage::ShowSecondOverlay));
        let (event, _) = run_until_event(&mut flow, at, Duration::from_secs(1));
        assert_eq!(event, FlowEvent::StageEntered(FlowStage::StrikeThrough));
        assert_eq!(flow.phase(), PagePhase::StruckThrough);

        flow.retry();
        assert_eq!(flow.phase(), PagePhase::AwaitingMic);
        assert!(flow.attempt().highlights().is_empty());
    }

    #[test]
    fn restarting_cancels_the_previous_rounds_choreography() {
        let mut flow = descent_flow();
        let start = Instant::now();
        flow.begin(start);

        let (_, completed_at) = run_until_event(&mut flow, start, Duration::from_secs(4));

        // Restart before any stage fires; round A's stages must never run.
        let restart = completed_at + Duration::from_millis(50);
        flow.begin(restart);
        assert_eq!(flow.phase(), PagePhase::Playing);

        // Well past round A's ShowResult deadline, still mid round B.
        let later = completed_at + Duration::from_millis(400);
        let event = flow.tick(later);
        assert!(!matches!(event, Some(FlowEvent::StageEntered(_))));
        assert_eq!(flow.phase(), PagePhase::Playing);
    }

    #[test]
    fn voice_is_ignored_unless_mic_is_engaged() {
        let mut flow = descent_flow();
        let start = Instant::now();
        flow.begin(start);
        flow.voice_detected(start);
        assert_eq!(flow.phase(), PagePhase::Playing);

        let (_, at) = run_until_event(&mut flow, start, Duration::from_secs(4));
        let mut at = at;
        while flow.phase() != PagePhase::AwaitingMic {
            at += Duration::from_millis(16);
            flow.tick(at);
        }
        // Mic prompt is up but the mic is not engaged yet.
        flow.voice_detected(at);
        assert_eq!(flow.phase(), PagePhase::AwaitingMic);

        flow.toggle_mic();
        flow.voice_detected(at);
        assert_eq!(flow.phase(), PagePhase::UserAttempt);
    }

    #[test]
    fn silent_rounds_skip_the_result_display() {
        // A contour pinned above every note lane: nothing classifies.
        let silent = WavePattern {
            center_y: 310.0,
            initial_range: 0.0,
            final_range: 0.0,
            frequency: 1.0,
            phase: 0.0,
            jitter: 0.0,
        };
        let mut flow = RoundFlow::new(RoundConfig {
            reference: Contour::Wave(silent),
            reference_duration: Duration::from_millis(100),
            attempt: Contour::Staircase(&DESCENT_USER),
            attempt_duration: Duration::from_secs(5),
            delays: Delays::default(),
        });
        let start = Instant::now();
        flow.begin(start);

        let (event, at) = run_until_event(&mut flow, start, Duration::from_secs(1));
        assert!(matches!(event, FlowEvent::ReferenceComplete { extremum: None }));

        let (event, _) = run_until_event(&mut flow, at, Duration::from_secs(1));
        assert_eq!(event, FlowEvent::StageEntered(FlowStage::ShowOverlay));
        assert_eq!(flow.phase(), PagePhase::ShowingOverlay);
    }

    #[test]
    fn toggling_the_mic_off_abandons_the_attempt() {
        let mut flow = descent_flow();
        let start = Instant::now();
        flow.begin(start);
        let (_, mut at) = run_until_event(&mut flow, start, Duration::from_secs(4));
        while flow.phase() != PagePhase::AwaitingMic {
            at += Duration::from_millis(16);
            flow.tick(at);
        }
        flow.toggle_mic();
        flow.voice_detected(at);
        at += Duration::from_millis(500);
        flow.tick(at);
        assert!(flow.attempt().progress() > 0.0);

        flow.toggle_mic();
        assert!(!flow.mic_engaged());
        assert_eq!(flow.phase(), PagePhase::AwaitingMic);
        assert_eq!(flow.attempt().progress(), 0.0);
    }
}
