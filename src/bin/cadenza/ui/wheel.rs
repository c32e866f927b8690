//! Note wheel widget

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cadenza::game::{SpinWheel, WheelState};
use cadenza::music::{Note, PitchClass};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Render the spin wheel: a ticking spinner while spinning, the landed
/// note once it settles.
pub fn render_wheel(frame: &mut Frame, area: Rect, wheel: &SpinWheel, tick: u64, points: u32) {
    let block = Block::default()
        .title(format!(" Wheel | Points: {points} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match wheel.state() {
        WheelState::Idle => vec![
            Line::raw(""),
            Line::from(Span::styled(
                "Press [Space] to spin",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        WheelState::Spinning => {
            // Flash through candidate notes while the wheel turns.
            let class = PitchClass::ALL[(tick % 12) as usize];
            let octave = 3 + (tick / 12 % 3) as i8;
            let flash = Note::new(class, octave);
            vec![
                Line::from(Span::styled(
                    SPINNER[(tick % 4) as usize].to_string(),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    flash.to_string(),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        WheelState::Settling => vec![
            Line::raw(""),
            Line::from(Span::styled("...", Style::default().fg(Color::Yellow))),
        ],
        WheelState::Landed(note) => vec![
            Line::from(Span::styled(
                "Sustain this note:",
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                note.to_string(),
                Style::default().fg(Color::Green),
            )),
        ],
    };

    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, inner);
}
