use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

/// Render the keybindings bar at the bottom
pub fn render_keybindings(frame: &mut Frame, app: &App, area: Rect) {
    let keys: Vec<(&str, &str)> = match &app.state {
        AppState::Idle => {
            let mut keys = vec![("Enter", "Ask"), ("Ctrl+U", "Clear")];
            if app.outcome.is_some() {
                keys.push(("↑/↓ PgUp/PgDn", "Scroll"));
            }
            keys.push(("Esc", "Quit"));
            keys
        }
        AppState::AwaitingResult => vec![("Esc", "Quit")],
        AppState::Halted(_) => vec![("q", "Quit")],
    };

    // Build the line with key highlights
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default())];

    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            *key,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::White),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(paragraph, area);
}
