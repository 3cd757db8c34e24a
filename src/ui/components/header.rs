use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the fixed header with title and backend info
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(vec![Span::styled(
            app.title.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![Span::styled(
            app.backend_label.as_str(),
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(header, area);
}
