use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

const PROMPT: &str = " What question do you have in mind? ";

pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = visible_window(&app.input, app.cursor_pos, inner_width);

    let (text_style, border_color) = match app.state {
        AppState::Idle => (Style::default().fg(Color::White), Color::Cyan),
        AppState::AwaitingResult => (Style::default().fg(Color::Gray), Color::DarkGray),
        AppState::Halted(_) => (Style::default().fg(Color::DarkGray), Color::DarkGray),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(PROMPT);

    let paragraph = Paragraph::new(Line::from(Span::styled(visible, text_style))).block(block);
    frame.render_widget(paragraph, area);

    if app.state == AppState::Idle && area.width > 2 && area.height > 2 {
        frame.set_cursor_position(Position::new(area.x + 1 + cursor_col as u16, area.y + 1));
    }
}

/// Slice of `input` that fits in `width` columns with the cursor in view,
/// plus the cursor's display column within that slice
fn visible_window(input: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<(char, usize)> = input.chars().map(|c| (c, char_width(c))).collect();
    let cursor = cursor.min(chars.len());

    // Walk back from the cursor, leaving a column for it at the end
    let mut start = cursor;
    let mut cursor_col = 0;
    while start > 0 && cursor_col + chars[start - 1].1 < width {
        start -= 1;
        cursor_col += chars[start].1;
    }

    let mut used = 0;
    let visible = chars[start..]
        .iter()
        .take_while(|(_, w)| {
            used += w;
            used <= width
        })
        .map(|(c, _)| *c)
        .collect();
    (visible, cursor_col)
}

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    Span::raw(&*c.encode_utf8(&mut buf)).width()
}
