//! Scrollable transcript — user messages and bot replies.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use watt_core::types::Sender;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Energy Assistant ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Build display lines from messages (bottom-up with scroll offset)
    let visible_height = inner.height as usize;
    let total = app.messages.len();
    let end = total.saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(visible_height * 2); // overshoot for wrapping

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.messages[start..end] {
        let (fg, label) = match msg.sender {
            Sender::User => (Color::Cyan, "you"),
            Sender::Bot => (Color::Green, "bot"),
        };
        let time = msg.timestamp.with_timezone(&chrono::Local).format("%H:%M");

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", label), Style::default().fg(fg).bold()),
            Span::styled(time.to_string(), Style::default().fg(Color::DarkGray)),
        ]));
        for line in msg.text.lines() {
            lines.push(Line::styled(format!("  {}", line), Style::default().fg(fg)));
        }
        lines.push(Line::raw(""));
    }

    if app.pending > 0 {
        lines.push(Line::styled(
            "bot is typing...",
            Style::default().fg(Color::DarkGray).italic(),
        ));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
