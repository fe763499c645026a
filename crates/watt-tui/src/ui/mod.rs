//! TUI layout compositing — assembles all UI panels.

mod appliances;
mod chat;
mod input;
mod status;
mod suggestions;

use ratatui::prelude::*;

use crate::app::App;

/// Render the full TUI layout.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // ┌──────────────────────────────────┐
    // │ Suggestions (until first send)   │
    // ├────────────┬─────────────────────┤
    // │ Appliances │     Transcript      │
    // │  + bill    │                     │
    // │            │                     │
    // ├────────────┴─────────────────────┤
    // │ Status bar                       │
    // ├──────────────────────────────────┤
    // │ Input                            │
    // └──────────────────────────────────┘

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),   // suggestions
            Constraint::Min(10),     // content
            Constraint::Length(1),   // status
            Constraint::Length(3),   // input
        ])
        .split(area);

    suggestions::draw(frame, app, main_layout[0]);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(36), // appliances
            Constraint::Min(30),    // transcript
        ])
        .split(main_layout[1]);

    appliances::draw(frame, app, content_layout[0]);
    chat::draw(frame, app, content_layout[1]);
    status::draw(frame, app, main_layout[2]);
    input::draw(frame, app, main_layout[3]);
}
