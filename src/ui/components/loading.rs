use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// "Thinking..." placeholder shown while the chain runs
pub fn render_thinking(frame: &mut Frame, area: Rect, question: Option<&str>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "⏳ Thinking...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )]),
    ];
    if let Some(question) = question {
        lines.push(Line::from(Span::styled(
            format!("Q: {}", question),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
