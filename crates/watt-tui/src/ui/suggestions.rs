//! Quick-reply bar, shown until the first message is sent.

use ratatui::prelude::*;
use ratatui::widgets::Tabs;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = app
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, s)| format!(" Alt+{} {} ", i + 1, s))
        .collect();

    if titles.is_empty() {
        return;
    }

    let tabs = Tabs::new(titles)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::DarkGray))
        .divider("|");

    frame.render_widget(tabs, area);
}
