//! Status bar — typing indicator, viewer greeting, bill total.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use watt_core::types::ChatState;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let state_color = match app.state {
        ChatState::Idle => Color::DarkGray,
        ChatState::Typing => Color::Green,
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", app.state),
            Style::default().fg(Color::Black).bg(state_color),
        ),
        Span::raw(format!(" {} ", app.welcome)),
        Span::styled(
            format!(
                " {}: {:.1} kWh  ${:.2} ",
                app.bill.month, app.bill.total_consumption_kwh, app.bill.total_cost
            ),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let status = Paragraph::new(Line::from(spans));
    frame.render_widget(status, area);
}
