//! Pitch contour chart widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Block, Borders,
    },
    Frame,
};

use cadenza::classify::{note_for_slot, NOTE_POSITIONS};
use cadenza::contour::{Contour, WavePattern};
use cadenza::game::RoundFlow;
use cadenza::{CONTOUR_HEIGHT, CONTOUR_WIDTH};

/// Render the contour graph: note lanes, the reference trace, and the
/// user attempt trace. Graph y grows downward, so the canvas flips it.
pub fn render_chart(frame: &mut Frame, area: Rect, flow: &RoundFlow) {
    let block = Block::default()
        .title(" Pitch ")
        .borders(Borders::ALL);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, CONTOUR_WIDTH as f64])
        .y_bounds([0.0, CONTOUR_HEIGHT as f64])
        .paint(|ctx| {
            draw_lanes(ctx, flow);
            if let Contour::Wave(pattern) = flow.reference().contour() {
                draw_band(ctx, pattern);
            }
            ctx.layer();
            draw_trace(ctx, flow.reference().trace(), Color::Cyan);
            draw_trace(ctx, flow.attempt().trace(), Color::Magenta);
        });

    frame.render_widget(canvas, area);
}

fn draw_lanes(ctx: &mut Context, flow: &RoundFlow) {
    for slot in 0..NOTE_POSITIONS.len() {
        let y = flip(NOTE_POSITIONS[slot]);
        let hit = flow.reference().highlights().contains(slot)
            || flow.attempt().highlights().contains(slot);
        let color = if hit { Color::Green } else { Color::DarkGray };
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: y,
            x2: CONTOUR_WIDTH as f64,
            y2: y,
            color,
        });
        let label = Span::styled(
            note_for_slot(slot).to_string(),
            Style::default().fg(color),
        );
        ctx.print(4.0, y, label);
    }
}

/// The converging envelope around a wave contour, drawn as two faint
/// boundary curves.
fn draw_band(ctx: &mut Context, pattern: &WavePattern) {
    const STEP: f32 = 10.0;
    let mut x = 0.0f32;
    while x + STEP <= CONTOUR_WIDTH {
        let (lo_a, hi_a) = pattern.bounds_at(x);
        let (lo_b, hi_b) = pattern.bounds_at(x + STEP);
        for (a, b) in [(lo_a, lo_b), (hi_a, hi_b)] {
            ctx.draw(&CanvasLine {
                x1: x as f64,
                y1: flip(a),
                x2: (x + STEP) as f64,
                y2: flip(b),
                color: Color::Blue,
            });
        }
        x += STEP;
    }
}

fn draw_trace(ctx: &mut Context, trace: &[(f32, f32)], color: Color) {
    for pair in trace.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].0 as f64,
            y1: flip(pair[0].1),
            x2: pair[1].0 as f64,
            y2: flip(pair[1].1),
            color,
        });
    }
    if let Some(&(x, y)) = trace.last() {
        ctx.draw(&Points {
            coords: &[(x as f64, flip(y))],
            color: Color::White,
        });
    }
}

fn flip(y: f32) -> f64 {
    (CONTOUR_HEIGHT - y) as f64
}
