pub mod panel;

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    render_grid(frame, chunks[0], app);
    render_status(frame, chunks[1], app);
}

fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    if app.panels.is_empty() {
        let text = Paragraph::new("No widgets available. Check your config and API keys.")
            .alignment(Alignment::Center);
        frame.render_widget(text, area);
        return;
    }

    // Panels are sorted by (row, col); group consecutive ones by row.
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut current_row = None;
    for (i, panel) in app.panels.iter().enumerate() {
        if current_row != Some(panel.position.row) {
            rows.push(Vec::new());
            current_row = Some(panel.position.row);
        }
        if let Some(row) = rows.last_mut() {
            row.push(i);
        }
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row.len() as u32); row.len()])
            .split(*row_area);

        for (&index, col_area) in row.iter().zip(cols.iter()) {
            panel::render(frame, *col_area, &app.panels[index], index == app.selected);
        }
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Tab: next  Enter: look up  Esc: quit ",
        Style::default().fg(Color::DarkGray),
    )];

    if !app.unavailable.is_empty() {
        let names: Vec<&str> = app.unavailable.iter().map(|(name, _)| name.as_str()).collect();
        spans.push(Span::styled(
            format!("| disabled: {} (missing API key?)", names.join(", ")),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
