//! TUI rendering for cadenza.
//!
//! One render entry point dispatches on the current page; each widget
//! lives in its own module and draws into the Rect it is handed.

mod bubbles;
mod chart;
mod keyboard;
mod lyrics;
mod overlay;
mod transport;
mod wheel;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use cadenza::game::{CatchState, PageId, PagePhase, RangeIndicators, RoundFlow};
use cadenza::music::Note;

use crate::app::{Cadenza, WarmupPhase};

use bubbles::{render_bubbles, render_sliders};
use chart::render_chart;
use keyboard::render_keyboard;
use lyrics::render_lyrics;
use overlay::render_overlay;
use transport::render_transport;
use wheel::render_wheel;

pub fn render(frame: &mut Frame, app: &Cadenza) {
    let now = Instant::now();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(12),   // Page body
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_transport(frame, chunks[0], app);

    match app.page {
        PageId::Warmup => render_warmup(frame, chunks[1], app, now),
        PageId::Ascent => render_flow_page(frame, chunks[1], app, &app.ascent, false),
        PageId::Descent => render_flow_page(frame, chunks[1], app, &app.descent, true),
        PageId::Melody => render_flow_page(frame, chunks[1], app, &app.melody, true),
        PageId::Sustain => render_sustain(frame, chunks[1], app),
        PageId::Results => render_results(frame, chunks[1], app),
        PageId::Catch => render_catch(frame, chunks[1], app, now),
    }

    let help = Paragraph::new(help_line(app.page))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn help_line(page: PageId) -> &'static str {
    match page {
        PageId::Warmup => " [Q] Quit  [Space] Play/Stop  [M] Mic  [V] Sing  [R] Retry  [Tab] Next page",
        PageId::Melody => " [Q] Quit  [Space] Play/Stop  [P] New pattern  [M] Mic  [V] Sing  [R] Retry  [Tab] Next page",
        PageId::Sustain => " [Q] Quit  [Space] Spin/Stop  [M] Mic  [V] Sing  [R] Retry  [Tab] Next page",
        PageId::Results => " [Q] Quit  [Left/Right] Octave  [Enter] Next page",
        PageId::Catch => " [Q] Quit  [Space] Play/Stop  [Left/Right] Octave half  [Enter] Next page",
        _ => " [Q] Quit  [Space] Play/Stop  [M] Mic  [V] Sing  [R] Retry  [Tab] Next page",
    }
}

fn render_warmup(frame: &mut Frame, area: Rect, app: &Cadenza, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    render_bubbles(frame, chunks[0], &app.warmup.field, now);
    render_lyrics(frame, chunks[1], &app.lyrics, app.is_playing_audio());

    let hits: Vec<String> = app
        .warmup
        .field
        .notes_hit()
        .iter()
        .map(Note::to_string)
        .collect();
    let hit_line = if hits.is_empty() {
        "No notes hit yet".to_string()
    } else {
        format!("Notes hit: {}", hits.join(" "))
    };
    frame.render_widget(
        Paragraph::new(hit_line).style(Style::default().fg(Color::Cyan)),
        chunks[2],
    );

    match app.warmup.phase {
        WarmupPhase::ShowingTarget | WarmupPhase::TargetExiting => {
            let exiting = app.warmup.phase == WarmupPhase::TargetExiting;
            render_overlay(frame, area, "Hit 4 notes in 3 secs", false, false, exiting);
        }
        WarmupPhase::Struck => {
            render_overlay(frame, area, "Hit 4 notes in 3 secs", true, true, false);
        }
        WarmupPhase::AwaitingMic => {
            render_mic_prompt(frame, area, app);
        }
        _ => {}
    }
}

fn render_flow_page(
    frame: &mut Frame,
    area: Rect,
    app: &Cadenza,
    flow: &RoundFlow,
    with_lyrics: bool,
) {
    if with_lyrics {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(area);
        render_chart(frame, chunks[0], flow);
        render_lyrics(frame, chunks[1], &app.lyrics, app.is_playing_audio());
    } else {
        render_chart(frame, area, flow);
    }
    render_flow_overlays(frame, area, flow);
}

fn render_sustain(frame: &mut Frame, area: Rect, app: &Cadenza) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(area);

    render_wheel(frame, chunks[0], &app.wheel, app.frame, app.sustain.attempt_points());
    render_chart(frame, chunks[1], &app.sustain);
    render_flow_overlays(frame, area, &app.sustain);
}

fn render_flow_overlays(frame: &mut Frame, area: Rect, flow: &RoundFlow) {
    match flow.phase() {
        PagePhase::ShowingResult | PagePhase::ResultExiting => {
            if let Some(note) = flow.reference().extremum_note() {
                let exiting = flow.phase() == PagePhase::ResultExiting;
                let text = format!("Your note: {note}");
                render_overlay(frame, area, &text, false, false, exiting);
            }
        }
        PagePhase::ShowingOverlay | PagePhase::OverlayExiting => {
            let exiting = flow.phase() == PagePhase::OverlayExiting;
            render_overlay(frame, area, "Now you try. Follow the line", false, false, exiting);
        }
        PagePhase::ShowingSecondOverlay => {
            render_overlay(frame, area, "Match the line you heard", false, false, false);
        }
        PagePhase::StruckThrough => {
            render_overlay(frame, area, "Match the line you heard", true, true, false);
        }
        _ => {}
    }
}

fn render_results(frame: &mut Frame, area: Rect, app: &Cadenza) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Min(1),
        ])
        .split(area);

    let range = app.data.range_notes();
    let summary = match (app.data.highest_from_ascent, app.data.lowest_from_descent) {
        (Some(high), Some(low)) => format!("Your vocal range: {low} to {high}"),
        (Some(high), None) => format!("Highest note so far: {high}"),
        (None, Some(low)) => format!("Lowest note so far: {low}"),
        (None, None) => "Sing on the earlier pages to map your range".to_string(),
    };
    frame.render_widget(
        Paragraph::new(summary).style(Style::default().fg(Color::White)),
        chunks[0],
    );

    let indicators = RangeIndicators::for_notes(&range, app.results.current());
    render_keyboard(frame, chunks[1], app.results.current(), &range, indicators);
}

fn render_catch(frame: &mut Frame, area: Rect, app: &Cadenza, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    render_sliders(frame, chunks[0], &app.catch.game, now);

    let caught: Vec<Note> = app
        .catch
        .game
        .sliders()
        .iter()
        .filter(|slider| slider.state == CatchState::Caught)
        .map(|slider| slider.note)
        .collect();
    let indicators = RangeIndicators::for_notes(&caught, app.catch.octaves.current());
    render_keyboard(
        frame,
        chunks[1],
        app.catch.octaves.current(),
        &caught,
        indicators,
    );

    if app.catch.overlay_shown {
        render_overlay(frame, area, "Catch the notes as they cross", false, false, false);
    }
    if app.catch.mic_prompt {
        render_mic_prompt(frame, area, app);
    }
}

fn render_mic_prompt(frame: &mut Frame, area: Rect, app: &Cadenza) {
    let text = if app.mic_active() {
        "Mic is live. Sing!"
    } else {
        "Tap [M] to enable the mic, then sing"
    };
    let line = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(ratatui::layout::Alignment::Center);
    let bottom = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(2),
        width: area.width,
        height: 1,
    };
    frame.render_widget(line, bottom);
}
