use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Red heading followed by the error text, one line per message line
pub fn render_error(frame: &mut Frame, area: Rect, heading: &str, message: &str) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            heading,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]),
    ];
    lines.extend(
        message
            .lines()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Red)))),
    );

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
