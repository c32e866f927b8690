//! Centered message overlay

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a message card centered over the page. `struck` crosses the
/// message out and shows the Retry / Next buttons; `exiting` dims the
/// whole card during its slide-out window.
pub fn render_overlay(frame: &mut Frame, area: Rect, text: &str, struck: bool, buttons: bool, exiting: bool) {
    let width = (text.len() as u16 + 8).max(30).min(area.width);
    let height = if buttons { 5 } else { 4 };
    let card = centered(area, width, height);

    let border_style = if exiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(card);

    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let mut message_style = if exiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    if struck {
        message_style = message_style.add_modifier(Modifier::CROSSED_OUT);
    }

    let mut lines = vec![Line::from(Span::styled(text.to_string(), message_style))];
    if buttons {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "[R] Retry    [Enter] Next page",
            Style::default().fg(Color::Yellow),
        )));
    }

    let card_text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(card_text, inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
