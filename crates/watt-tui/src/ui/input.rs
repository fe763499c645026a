//! Question line for the assistant.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use watt_core::types::ChatState;

use crate::app::App;

const PROMPT: &str = "⚡ ";
/// The bolt renders two cells wide.
const PROMPT_WIDTH: u16 = 3;
const PLACEHOLDER: &str = "Ask about appliances, bills, or saving tips";

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = match (app.input_focused, app.state) {
        (false, _) => Color::DarkGray,
        (true, ChatState::Typing) => Color::Yellow,
        (true, ChatState::Idle) => Color::Green,
    };

    let hint = if app.suggestions().is_empty() {
        " Enter send · Tab scroll mode "
    } else {
        " Enter send · Alt+1-4 quick reply · Tab scroll mode "
    };
    let block = Block::default()
        .title(" Energy Assistant ")
        .title_bottom(Line::from(hint).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body = if app.input.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray).italic())
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(Color::White))
    };
    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Yellow)),
        body,
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    if app.input_focused {
        frame.set_cursor_position(Position::new(
            inner.x + PROMPT_WIDTH + app.input.chars().count() as u16,
            inner.y,
        ));
    }
}
