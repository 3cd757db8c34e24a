use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;

pub fn render_response(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![Span::styled(
        "Response:",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )]));
    if let Some(question) = &app.last_question {
        lines.push(Line::from(Span::styled(
            format!("Q: {}", question),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(text.lines().map(|line| {
        Line::from(Span::styled(line, Style::default().fg(Color::White)))
    }));

    let paragraph = Paragraph::new(lines)
        .scroll((app.scroll_offset, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
