//! Lyric line widget - the reference cue text, lit while it is sung

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use cadenza::lyrics::LyricTracker;

/// Render the active lyric with a thin progress rail underneath the
/// text. The line lights up only while audio is actually playing inside
/// the chunk's window.
pub fn render_lyrics(frame: &mut Frame, area: Rect, tracker: &LyricTracker, playing: bool) {
    let Some(chunk) = tracker.active() else {
        return;
    };

    let lit = playing && tracker.is_highlighted();
    let text_style = if lit {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let rail_width = area.width.saturating_sub(chunk.text.len() as u16 + 3) as usize;
    let filled = (tracker.progress() * rail_width as f32) as usize;
    let rail = format!(
        "{}{}",
        "=".repeat(filled),
        "-".repeat(rail_width.saturating_sub(filled))
    );

    let line = Line::from(vec![
        Span::styled(chunk.text.clone(), text_style),
        Span::raw("  "),
        Span::styled(rail, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
