//! Appliance list with efficiency badges, plus the month's bill breakdown.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use watt_core::types::Efficiency;

use crate::app::App;

fn efficiency_color(efficiency: Efficiency) -> Color {
    match efficiency {
        Efficiency::Excellent => Color::Green,
        Efficiency::Good => Color::Blue,
        Efficiency::Average => Color::Yellow,
        Efficiency::Poor => Color::Red,
    }
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" My Appliances ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for report in &app.appliances {
        let a = &report.appliance;
        lines.push(Line::from(vec![
            Span::raw(format!(" {:<17}", a.name)),
            Span::raw(format!("{:>5}W ", a.current_watts)),
            Span::styled(
                format!("{:<9}", report.efficiency),
                Style::default().fg(efficiency_color(report.efficiency)),
            ),
            Span::styled(
                format!(" ${:.2}/day", report.daily_cost),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!(" Bill - {}", app.bill.month),
        Style::default().fg(Color::Cyan).italic(),
    ));
    for line in &app.bill.items {
        lines.push(Line::from(vec![
            Span::raw(format!(" {:<17}", line.item.appliance)),
            Span::raw(format!("${:>6.2} ", line.item.cost)),
            Span::styled(
                format!("{:.0}%", line.share_percent),
                Style::default().fg(efficiency_color(line.item.efficiency)),
            ),
        ]));
    }
    lines.push(Line::raw(format!(
        " Avg. daily {:.1} kWh / ${:.2}",
        app.bill.avg_daily_kwh, app.bill.avg_daily_cost
    )));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}
