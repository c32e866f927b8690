//! Floating-note and slider-note canvases

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};

use cadenza::game::{CatchGame, CatchState, FloatingNotes, CATCH_X};

/// Render the warmup bubble field. Bubbles rise from the bottom edge;
/// a bubble's progress maps straight onto canvas height.
pub fn render_bubbles(frame: &mut Frame, area: Rect, field: &FloatingNotes, now: Instant) {
    let block = Block::default()
        .title(" Warmup ")
        .borders(Borders::ALL);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| {
            for bubble in field.active() {
                let x = bubble.lane as f64 * 100.0;
                let y = bubble.progress(now) as f64 * 100.0;
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: bubble.size as f64 / 12.0,
                    color: Color::Cyan,
                });
                ctx.print(
                    x,
                    y,
                    Span::styled(bubble.note.to_string(), Style::default().fg(Color::White)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

/// Render the note-catch lane. Sliders travel left to right; the catch
/// line marks where pending notes resolve.
pub fn render_sliders(frame: &mut Frame, area: Rect, game: &CatchGame, now: Instant) {
    let block = Block::default()
        .title(format!(" Catch | Points: {} ", game.points()))
        .borders(Borders::ALL);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([-150.0, 850.0])
        .y_bounds([0.0, 10.0])
        .paint(|ctx| {
            ctx.draw(&CanvasLine {
                x1: CATCH_X as f64,
                y1: 0.0,
                x2: CATCH_X as f64,
                y2: 10.0,
                color: Color::Yellow,
            });
            for slider in game.sliders() {
                let color = match slider.state {
                    CatchState::Pending => Color::White,
                    CatchState::Caught => Color::Green,
                    CatchState::Missed => Color::Red,
                };
                let color = if slider.opacity(now) < 1.0 {
                    Color::DarkGray
                } else {
                    color
                };
                let y = 1.0 + slider.note.octave as f64;
                ctx.print(
                    slider.x(now) as f64,
                    y,
                    Span::styled(slider.note.to_string(), Style::default().fg(color)),
                );
            }
        });

    frame.render_widget(canvas, area);
}
