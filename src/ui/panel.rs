use crate::app::Panel;
use crate::surface::{InputSurface, Tone};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, panel: &Panel, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let block = Block::default()
        .title(format!(" {} ", panel.title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input_height = if panel.kind().takes_input() { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(input_height), Constraint::Min(1)])
        .split(inner);

    if panel.kind().takes_input() {
        let mut spans = vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(panel.input.value()),
        ];
        if selected {
            spans.push(Span::styled(
                "_",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    }

    if panel.is_loading() {
        frame.render_widget(
            Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
        return;
    }

    let state = panel.display.snapshot();
    let headline_style = match state.tone {
        Tone::Normal => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        Tone::Error => Style::default().fg(Color::Red),
    };

    let mut lines = vec![Line::from(Span::styled(state.headline, headline_style))];
    if let Some(detail) = state.detail.filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(
            detail,
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(icon) = state.icon_url {
        lines.push(Line::from(Span::styled(
            format!("icon: {}", icon),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, chunks[1]);
}
