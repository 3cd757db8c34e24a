use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, AppState, Outcome};

use super::components::{
    error::render_error, header::render_header, input::render_input,
    keybindings::render_keybindings, loading::render_thinking, response::render_response,
};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Question box
            Constraint::Min(3),    // Output
            Constraint::Length(2), // Keybindings bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_output(frame, app, padded(chunks[2]));
    render_keybindings(frame, app, chunks[3]);
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    match &app.state {
        AppState::Halted(message) => render_error(
            frame,
            area,
            message,
            "Fix the configuration and restart.",
        ),
        AppState::AwaitingResult => render_thinking(frame, area, app.last_question.as_deref()),
        AppState::Idle => match &app.outcome {
            Some(Outcome::Response(text)) => render_response(frame, app, area, text),
            Some(Outcome::Failed(err)) => {
                render_error(frame, area, "Error while generating response:", err)
            }
            None => {}
        },
    }
}

/// Width the response is wrapped to on a terminal `total_width` columns wide
pub fn output_width(total_width: u16) -> u16 {
    padded(Rect::new(0, 0, total_width, 1)).width
}

/// Inset by one column on each side
fn padded(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new("Local LLM Demo", "Ollama · gemma:2b")
    }

    #[test]
    fn idle_screen_shows_title_and_prompt() {
        let text = screen(&app());
        assert!(text.contains("Local LLM Demo"));
        assert!(text.contains("Ollama · gemma:2b"));
        assert!(text.contains("What question do you have in mind?"));
        assert!(!text.contains("Response:"));
    }

    #[test]
    fn shows_thinking_while_awaiting() {
        let mut app = app();
        app.input = "ping".to_string();
        app.cursor_pos = 4;
        app.submit();

        let text = screen(&app);
        assert!(text.contains("Thinking..."));
        assert!(text.contains("Q: ping"));
    }

    #[test]
    fn shows_response_text() {
        let mut app = app();
        app.finish(Outcome::Response("pong\nsecond line".to_string()));

        let text = screen(&app);
        assert!(text.contains("Response:"));
        assert!(text.contains("pong"));
        assert!(text.contains("second line"));
    }

    #[test]
    fn shows_generation_error() {
        let mut app = app();
        app.finish(Outcome::Failed("Ollama API error (404): model not found".to_string()));

        let text = screen(&app);
        assert!(text.contains("Error while generating response:"));
        assert!(text.contains("model not found"));
    }

    #[test]
    fn output_width_matches_padding() {
        assert_eq!(output_width(80), 78);
        assert_eq!(output_width(1), 0);
    }

    #[test]
    fn shows_halt_message() {
        let app = App::halted(
            "Hosted LLM Demo",
            "Groq",
            "Error initializing Groq LLM: GROQ_API_KEY environment variable not set".to_string(),
        );

        let text = screen(&app);
        assert!(text.contains("Error initializing Groq LLM"));
        assert!(text.contains("q Quit"));
        assert!(!text.contains("Enter Ask"));
    }
}
