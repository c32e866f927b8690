//! One-octave piano keyboard widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cadenza::game::RangeIndicators;
use cadenza::music::{Note, PitchClass};

/// Render one octave of keys with the notes the player has produced lit
/// up. Arrows at either end point toward notes outside this octave.
pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    octave: i8,
    highlighted: &[Note],
    indicators: RangeIndicators,
) {
    let block = Block::default()
        .title(format!(" Octave {octave} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut keys = Vec::new();
    let arrow_style = Style::default().fg(Color::Yellow);
    keys.push(Span::styled(
        if indicators.left { "< " } else { "  " },
        arrow_style,
    ));
    for class in PitchClass::ALL {
        let note = Note::new(class, octave);
        let lit = highlighted.contains(&note);
        let style = if lit {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else if class.is_sharp() {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        };
        keys.push(Span::styled(format!(" {:<3}", class.name()), style));
        keys.push(Span::raw(" "));
    }
    keys.push(Span::styled(if indicators.right { ">" } else { " " }, arrow_style));

    let mut numbers = vec![Span::raw("  ")];
    for class in PitchClass::ALL {
        let note = Note::new(class, octave);
        numbers.push(Span::styled(
            format!(" {:<3}", note.key_number()),
            Style::default().fg(Color::DarkGray),
        ));
        numbers.push(Span::raw(" "));
    }

    let lines = vec![Line::from(keys), Line::from(numbers)];
    frame.render_widget(Paragraph::new(lines), inner);
}
