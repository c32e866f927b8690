//! Cadenza - application state and event loop.

use crate::ui;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cadenza::choreo::{Delays, Scheduler, Step};
use cadenza::contour::{
    Contour, PatternPicker, ASCENT, ASCENT_USER, DESCENT, DESCENT_USER, MELODY_USER,
    SEGMENT_CATALOG, SUSTAIN_USER_WAVE, WAVE_CATALOG,
};
use cadenza::game::{
    CatchGame, FloatingNotes, FlowEvent, FlowStage, GameData, JumpMode, OctaveBrowser,
    OctaveShift, PageId, PagePhase, RoundConfig, RoundFlow, SpinWheel,
};
use cadenza::lyrics::LyricTracker;
use cadenza::playback::TonePlayer;
use cadenza::round::Generation;
use cadenza::vad::{VoiceDetector, VoiceEvent, VoiceSession};

/// Reference rounds sweep the graph in 3 seconds, user attempts get 5.
const REFERENCE_TIME: Duration = Duration::from_secs(3);
const ATTEMPT_TIME: Duration = Duration::from_secs(5);

/// Where the warmup page is, outside of any contour round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupPhase {
    Idle,
    /// Reference audio playing, bubbles spawning continuously.
    Playing,
    /// A voice burst's bubbles are in flight.
    VoiceNotes,
    ShowingTarget,
    TargetExiting,
    AwaitingMic,
    /// Target struck through; Retry / Next buttons up.
    Struck,
}

/// The warmup page: bubbles plus its own small overlay choreography.
pub struct WarmupPage {
    pub field: FloatingNotes,
    pub phase: WarmupPhase,
    overlay: Scheduler<FlowStage>,
    generation: u64,
}

impl WarmupPage {
    fn new() -> Self {
        Self {
            field: FloatingNotes::new(),
            phase: WarmupPhase::Idle,
            overlay: Scheduler::new(Vec::new()),
            generation: 0,
        }
    }

    fn reset(&mut self) {
        self.field.clear();
        self.overlay.cancel();
        self.generation += 1;
        self.phase = WarmupPhase::Idle;
    }
}

/// The catch page's overlay runs on the same scheduler machinery even
/// though the page has no contour round; it keeps its own generation.
pub struct CatchPage {
    pub game: CatchGame,
    pub octaves: OctaveBrowser,
    pub overlay_shown: bool,
    pub mic_prompt: bool,
    overlay: Scheduler<FlowStage>,
    generation: u64,
}

impl CatchPage {
    fn new() -> Self {
        Self {
            game: CatchGame::new(),
            octaves: OctaveBrowser::new(JumpMode::Toggle, 1),
            overlay_shown: false,
            mic_prompt: false,
            overlay: Scheduler::new(Vec::new()),
            generation: 0,
        }
    }

    fn reset(&mut self) {
        self.game.reset();
        self.overlay.cancel();
        self.generation += 1;
        self.overlay_shown = false;
        self.mic_prompt = false;
    }
}

/// Top-level application state.
pub struct Cadenza {
    pub page: PageId,
    pub data: GameData,
    pub warmup: WarmupPage,
    pub ascent: RoundFlow,
    pub descent: RoundFlow,
    pub melody: RoundFlow,
    pub melody_picker: PatternPicker,
    pub sustain: RoundFlow,
    pub sustain_picker: PatternPicker,
    pub wheel: SpinWheel,
    pub results: OctaveBrowser,
    pub catch: CatchPage,
    pub mic_error: Option<String>,
    pub lyrics: LyricTracker,
    pub frame: u64,
    rng: StdRng,
    mic: Option<VoiceDetector>,
    sim_session: VoiceSession,
    player: Option<TonePlayer>,
    should_quit: bool,
}

impl Cadenza {
    pub fn new() -> Self {
        let delays = Delays::default();
        let flow = |reference: Contour, attempt: Contour| {
            RoundFlow::new(RoundConfig {
                reference,
                reference_duration: REFERENCE_TIME,
                attempt,
                attempt_duration: ATTEMPT_TIME,
                delays,
            })
        };

        Self {
            page: PageId::Warmup,
            data: GameData::new(),
            warmup: WarmupPage::new(),
            ascent: flow(Contour::Staircase(&ASCENT), Contour::Staircase(&ASCENT_USER)),
            descent: flow(
                Contour::Staircase(&DESCENT),
                Contour::Staircase(&DESCENT_USER),
            ),
            melody: flow(
                Contour::Segmented(&SEGMENT_CATALOG[0]),
                Contour::Staircase(&MELODY_USER),
            ),
            melody_picker: PatternPicker::new(SEGMENT_CATALOG.len()),
            sustain: flow(Contour::Wave(WAVE_CATALOG[0]), Contour::Wave(SUSTAIN_USER_WAVE)),
            sustain_picker: PatternPicker::new(WAVE_CATALOG.len()),
            wheel: SpinWheel::new(),
            results: OctaveBrowser::new(JumpMode::Step, 4),
            catch: CatchPage::new(),
            mic_error: None,
            lyrics: LyricTracker::reference_cue(REFERENCE_TIME),
            frame: 0,
            rng: StdRng::from_entropy(),
            mic: None,
            sim_session: VoiceSession::new(),
            player: None,
            should_quit: false,
        }
    }

    pub fn mic_active(&self) -> bool {
        self.mic.is_some()
    }

    pub fn is_playing_audio(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_playing())
    }

    /// Latest mic loudness on the 0-255 scale; 0 when the mic is off.
    pub fn mic_level(&self) -> f32 {
        self.mic.as_ref().map_or(0.0, VoiceDetector::level)
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.tick(now);

            terminal.draw(|frame| ui::render(frame, self))?;

            // ~60 fps input poll
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, Instant::now());
                    }
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);

        let voice_events = match self.mic.as_mut() {
            Some(mic) => mic.poll(),
            None => Vec::new(),
        };
        for event in voice_events {
            self.on_voice(event, now);
        }

        match self.page {
            PageId::Warmup => self.tick_warmup(now),
            PageId::Ascent | PageId::Descent | PageId::Melody | PageId::Sustain => {
                self.tick_flow_page(now)
            }
            PageId::Results => self.results.update(now),
            PageId::Catch => self.tick_catch(now),
        }

        // Lyric line follows the playback clock.
        if let Some(player) = &self.player {
            self.lyrics.seek(player.current_time());
        }

        // A finished reference tone stops the transport display.
        if self.player.as_ref().is_some_and(|p| p.finished()) {
            self.player = None;
        }
    }

    fn tick_warmup(&mut self, now: Instant) {
        let update = self.warmup.field.update(now, &mut self.rng);
        if update.all_complete && !self.warmup.field.notes_hit().is_empty() {
            let steps = match self.warmup.phase {
                // A voice burst goes straight to the struck-through target.
                WarmupPhase::VoiceNotes => vec![
                    Step::new(Duration::ZERO, FlowStage::ShowOverlay),
                    Step::new(Duration::from_millis(500), FlowStage::StrikeThrough),
                ],
                _ => vec![
                    Step::new(Duration::ZERO, FlowStage::ShowOverlay),
                    Step::new(Duration::from_millis(4000), FlowStage::ExitOverlay),
                    Step::new(Duration::from_millis(600), FlowStage::RevealMic),
                ],
            };
            self.warmup.overlay = Scheduler::new(steps);
            self.warmup
                .overlay
                .arm(now, Generation(self.warmup.generation));
        }

        let stage = self
            .warmup
            .overlay
            .tick(now, Generation(self.warmup.generation));
        if let Some(stage) = stage {
            self.warmup.phase = match stage {
                FlowStage::ShowOverlay => WarmupPhase::ShowingTarget,
                FlowStage::ExitOverlay => WarmupPhase::TargetExiting,
                FlowStage::RevealMic => WarmupPhase::AwaitingMic,
                FlowStage::StrikeThrough => WarmupPhase::Struck,
                _ => self.warmup.phase,
            };
        }
    }

    fn tick_flow_page(&mut self, now: Instant) {
        if self.page == PageId::Sustain {
            self.wheel.update(now, &mut self.rng);
        }

        let page = self.page;
        let flow = match page {
            PageId::Ascent => &mut self.ascent,
            PageId::Descent => &mut self.descent,
            PageId::Melody => &mut self.melody,
            PageId::Sustain => &mut self.sustain,
            _ => return,
        };

        if let Some(FlowEvent::ReferenceComplete { extremum }) = flow.tick(now) {
            match page {
                PageId::Ascent => self.data.highest_from_ascent = extremum,
                PageId::Descent => self.data.lowest_from_descent = extremum,
                PageId::Melody => self.data.lowest_from_melody = extremum,
                PageId::Sustain => self.data.lowest_from_sustain = extremum,
                _ => {}
            }
        }
    }

    fn tick_catch(&mut self, now: Instant) {
        self.catch.game.update(now, &mut self.rng);
        self.catch.octaves.update(now);

        let stage = self
            .catch
            .overlay
            .tick(now, Generation(self.catch.generation));
        match stage {
            Some(FlowStage::ShowOverlay) => self.catch.overlay_shown = true,
            Some(FlowStage::ExitOverlay) => self.catch.overlay_shown = false,
            Some(FlowStage::RevealMic) => self.catch.mic_prompt = true,
            _ => {}
        }
    }

    fn on_voice(&mut self, event: VoiceEvent, now: Instant) {
        match (self.page, event) {
            (PageId::Warmup, VoiceEvent::Started { requested_notes }) => {
                if matches!(
                    self.warmup.phase,
                    WarmupPhase::AwaitingMic | WarmupPhase::Struck
                ) {
                    self.warmup.field.clear();
                    self.warmup.overlay.cancel();
                    self.warmup.generation += 1;
                    self.warmup.field.start_burst(now, requested_notes);
                    self.warmup.phase = WarmupPhase::VoiceNotes;
                }
            }
            (PageId::Warmup, VoiceEvent::Stopped) => {
                self.warmup.field.stop();
            }
            (PageId::Ascent, VoiceEvent::Started { .. }) => self.ascent.voice_detected(now),
            (PageId::Descent, VoiceEvent::Started { .. }) => self.descent.voice_detected(now),
            (PageId::Melody, VoiceEvent::Started { .. }) => self.melody.voice_detected(now),
            (PageId::Sustain, VoiceEvent::Started { .. }) => self.sustain.voice_detected(now),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Char('n') => {
                let next = self.page.next();
                self.goto(next);
            }
            KeyCode::Char(c @ '1'..='7') => {
                let index = (c as u8 - b'1') as usize;
                self.goto(PageId::ALL[index]);
            }
            KeyCode::Char(' ') => self.primary_action(now),
            KeyCode::Char('m') => self.toggle_mic(),
            KeyCode::Char('v') => {
                // Simulated voice edge for machines without a mic.
                let requested_notes = self.sim_session.record_detection();
                self.on_voice(VoiceEvent::Started { requested_notes }, now);
            }
            KeyCode::Char('p') => {
                if self.page == PageId::Melody {
                    let pick = self.melody_picker.next(&mut self.rng);
                    self.melody
                        .set_reference_contour(Contour::Segmented(&SEGMENT_CATALOG[pick]));
                    self.stop_player();
                }
            }
            KeyCode::Char('r') => self.retry(now),
            KeyCode::Enter => self.next_from_overlay(),
            KeyCode::Left => self.shift_octave(OctaveShift::Down, now),
            KeyCode::Right => self.shift_octave(OctaveShift::Up, now),
            _ => {}
        }
    }

    /// Space: each page's play/stop control.
    fn primary_action(&mut self, now: Instant) {
        match self.page {
            PageId::Warmup => {
                if self.warmup.field.is_spawning() || self.is_playing_audio() {
                    self.warmup.field.stop();
                    self.pause_player();
                } else {
                    self.warmup.reset();
                    self.start_player(Contour::Staircase(&ASCENT), REFERENCE_TIME);
                    self.warmup.field.start_continuous(now);
                    self.warmup.phase = WarmupPhase::Playing;
                }
            }
            PageId::Ascent | PageId::Descent | PageId::Melody => {
                let mut starting = None;
                if let Some(flow) = self.current_flow_mut() {
                    if flow.phase() == PagePhase::Idle {
                        starting = Some(*flow.reference().contour());
                        flow.begin(now);
                    } else {
                        flow.stop();
                    }
                }
                match starting {
                    Some(contour) => self.start_player(contour, REFERENCE_TIME),
                    None => self.stop_player(),
                }
            }
            PageId::Sustain => {
                if self.sustain.phase() == PagePhase::Idle {
                    // Fresh wave pattern per spin, then wheel and round
                    // start together.
                    let pick = self.sustain_picker.next(&mut self.rng);
                    self.sustain
                        .set_reference_contour(Contour::Wave(WAVE_CATALOG[pick]));
                    self.wheel.spin(now);
                    self.sustain.begin(now);
                    self.start_player(Contour::Wave(WAVE_CATALOG[pick]), REFERENCE_TIME);
                } else {
                    self.sustain.stop();
                    self.wheel.reset();
                    self.stop_player();
                }
            }
            PageId::Results => {}
            PageId::Catch => {
                if self.catch.game.is_running() {
                    self.catch.game.stop();
                    self.catch.overlay.cancel();
                    self.catch.generation += 1;
                    self.catch.overlay_shown = false;
                } else {
                    self.catch.reset();
                    self.catch.game.start(now);
                    self.catch.overlay = Scheduler::new(vec![
                        Step::new(Duration::from_millis(3000), FlowStage::ShowOverlay),
                        Step::new(Duration::from_millis(4000), FlowStage::ExitOverlay),
                        Step::new(Duration::from_millis(600), FlowStage::RevealMic),
                    ]);
                    self.catch
                        .overlay
                        .arm(now, Generation(self.catch.generation));
                }
            }
        }
    }

    fn toggle_mic(&mut self) {
        if self.mic.is_some() {
            self.mic = None;
            if let Some(flow) = self.current_flow_mut() {
                if flow.mic_engaged() {
                    flow.toggle_mic();
                }
            }
            return;
        }
        match VoiceDetector::start() {
            Ok(detector) => {
                self.mic = Some(detector);
                self.mic_error = None;
                if let Some(flow) = self.current_flow_mut() {
                    flow.toggle_mic();
                }
            }
            Err(err) => {
                self.mic_error = Some(err.to_string());
            }
        }
    }

    fn retry(&mut self, _now: Instant) {
        match self.page {
            PageId::Warmup => {
                if self.warmup.phase == WarmupPhase::Struck {
                    self.warmup.field.clear();
                    self.warmup.overlay.cancel();
                    self.warmup.generation += 1;
                    self.warmup.phase = WarmupPhase::AwaitingMic;
                    self.sim_session.reset();
                    if let Some(mic) = self.mic.as_mut() {
                        mic.reset_attempts();
                    }
                }
            }
            PageId::Ascent | PageId::Descent | PageId::Melody | PageId::Sustain => {
                if let Some(flow) = self.current_flow_mut() {
                    flow.retry();
                }
            }
            _ => {}
        }
    }

    fn next_from_overlay(&mut self) {
        let at_buttons = match self.page {
            PageId::Warmup => self.warmup.phase == WarmupPhase::Struck,
            PageId::Ascent | PageId::Descent | PageId::Melody | PageId::Sustain => self
                .current_flow()
                .is_some_and(|flow| flow.phase() == PagePhase::StruckThrough),
            PageId::Results | PageId::Catch => true,
        };
        if at_buttons {
            let next = self.page.next();
            self.goto(next);
        }
    }

    fn shift_octave(&mut self, direction: OctaveShift, now: Instant) {
        match self.page {
            PageId::Results => {
                self.results.shift(direction, now);
            }
            PageId::Catch => {
                self.catch.octaves.shift(direction, now);
            }
            _ => {}
        }
    }

    fn goto(&mut self, page: PageId) {
        // Everything round-scoped dies with the page, mic included.
        self.warmup.reset();
        self.ascent.finish();
        self.descent.finish();
        self.melody.finish();
        self.sustain.finish();
        self.wheel.reset();
        self.catch.reset();
        self.stop_player();
        self.mic = None;
        self.sim_session.reset();
        self.page = page;
    }

    fn current_flow(&self) -> Option<&RoundFlow> {
        match self.page {
            PageId::Ascent => Some(&self.ascent),
            PageId::Descent => Some(&self.descent),
            PageId::Melody => Some(&self.melody),
            PageId::Sustain => Some(&self.sustain),
            _ => None,
        }
    }

    fn current_flow_mut(&mut self) -> Option<&mut RoundFlow> {
        match self.page {
            PageId::Ascent => Some(&mut self.ascent),
            PageId::Descent => Some(&mut self.descent),
            PageId::Melody => Some(&mut self.melody),
            PageId::Sustain => Some(&mut self.sustain),
            _ => None,
        }
    }

    fn start_player(&mut self, contour: Contour, duration: Duration) {
        self.lyrics = LyricTracker::reference_cue(duration);
        match TonePlayer::new(contour, duration) {
            Ok(player) => {
                player.play();
                self.player = Some(player);
            }
            Err(err) => {
                // The game is fully playable without the reference tone.
                log::warn!("reference tone unavailable: {err}");
                self.player = None;
            }
        }
    }

    fn pause_player(&mut self) {
        if let Some(player) = &self.player {
            player.pause();
        }
    }

    fn stop_player(&mut self) {
        self.player = None;
        self.lyrics.reset();
    }
}

impl Default for Cadenza {
    fn default() -> Self {
        Self::new()
    }
}
