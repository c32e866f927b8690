//! Transport bar widget - page title, phase, mic and audio state

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cadenza::game::{PageId, PagePhase};
use cadenza::vad::VOICE_THRESHOLD;

use crate::app::{Cadenza, WarmupPhase};

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, app: &Cadenza) {
    let block = Block::default()
        .title(" cadenza ")
        .borders(Borders::ALL);

    let audio = if app.is_playing_audio() {
        Span::styled("> playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("# stopped", Style::default().fg(Color::DarkGray))
    };
    let mic = if app.mic_active() {
        Span::styled("MIC ON", Style::default().fg(Color::Green))
    } else {
        Span::styled("mic off", Style::default().fg(Color::DarkGray))
    };
    let level = if app.mic_active() {
        let color = if app.mic_level() > VOICE_THRESHOLD {
            Color::Green
        } else {
            Color::DarkGray
        };
        Span::styled(level_bars(app.mic_level()), Style::default().fg(color))
    } else {
        Span::raw("")
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.page.title()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled(phase_label(app), Style::default().fg(Color::White)),
        Span::raw("  "),
        audio,
        Span::raw("  "),
        mic,
        Span::raw(" "),
        level,
    ];
    if let Some(err) = &app.mic_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    let bar = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(bar, area);
}

/// Eight-step bar meter over the 0-255 loudness scale.
fn level_bars(level: f32) -> String {
    let filled = ((level / 255.0) * 8.0).round().clamp(0.0, 8.0) as usize;
    let mut bars = String::with_capacity(8);
    for i in 0..8 {
        bars.push(if i < filled { '|' } else { '.' });
    }
    bars
}

fn phase_label(app: &Cadenza) -> &'static str {
    match app.page {
        PageId::Warmup => match app.warmup.phase {
            WarmupPhase::Idle => "ready",
            WarmupPhase::Playing => "bubbles rising",
            WarmupPhase::VoiceNotes => "voice notes",
            WarmupPhase::ShowingTarget | WarmupPhase::TargetExiting => "target shown",
            WarmupPhase::AwaitingMic => "your turn",
            WarmupPhase::Struck => "done",
        },
        PageId::Results => "browse your range",
        PageId::Catch => {
            if app.catch.game.is_running() {
                "catching"
            } else {
                "ready"
            }
        }
        _ => {
            let flow = match app.page {
                PageId::Ascent => &app.ascent,
                PageId::Descent => &app.descent,
                PageId::Melody => &app.melody,
                _ => &app.sustain,
            };
            match flow.phase() {
                PagePhase::Idle => "ready",
                PagePhase::Playing => "listen",
                PagePhase::ShowingResult | PagePhase::ResultExiting => "your note",
                PagePhase::ShowingOverlay | PagePhase::OverlayExiting => "get ready",
                PagePhase::AwaitingMic => "your turn",
                PagePhase::UserAttempt => "sing along",
                PagePhase::ShowingSecondOverlay => "try again prompt",
                PagePhase::StruckThrough => "done",
            }
        }
    }
}
