use ratatui::text::Span;

/// Application state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Accepting input
    Idle,
    /// A question has been submitted and the chain is running
    AwaitingResult,
    /// The backend could not be set up; no input is accepted
    Halted(String),
}

/// Result of the most recent submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response(String),
    Failed(String),
}

/// The main application
pub struct App {
    /// Current state
    pub state: AppState,
    /// Page title
    pub title: String,
    /// Backend and model shown under the title
    pub backend_label: String,
    /// Text in the question box
    pub input: String,
    /// Cursor position in `input`, in chars
    pub cursor_pos: usize,
    /// Question the current outcome belongs to
    pub last_question: Option<String>,
    /// Outcome of the last submission
    pub outcome: Option<Outcome>,
    /// Scroll offset for the response view
    pub scroll_offset: u16,
    /// Width the response is wrapped to; 0 until the first frame
    pub output_width: u16,
    /// Should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(title: &str, backend_label: &str) -> Self {
        Self {
            state: AppState::Idle,
            title: title.to_string(),
            backend_label: backend_label.to_string(),
            input: String::new(),
            cursor_pos: 0,
            last_question: None,
            outcome: None,
            scroll_offset: 0,
            output_width: 0,
            should_quit: false,
        }
    }

    /// Create app that refuses input because setup failed
    pub fn halted(title: &str, backend_label: &str, message: String) -> Self {
        let mut app = Self::new(title, backend_label);
        app.state = AppState::Halted(message);
        app
    }

    /// Take the current input as a question, if there is one.
    ///
    /// Blank input is not a question. The input box keeps its text so the
    /// same question can be re-asked.
    pub fn submit(&mut self) -> Option<String> {
        if self.state != AppState::Idle || self.input.trim().is_empty() {
            return None;
        }
        let question = self.input.clone();
        self.last_question = Some(question.clone());
        self.outcome = None;
        self.scroll_offset = 0;
        self.state = AppState::AwaitingResult;
        Some(question)
    }

    /// Record the chain result and go back to accepting input
    pub fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.scroll_offset = 0;
        self.state = AppState::Idle;
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert character at cursor
    pub fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor_pos);
        self.input.insert(index, c);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            let index = self.byte_index(self.cursor_pos - 1);
            self.input.remove(index);
            self.cursor_pos -= 1;
        }
    }

    /// Delete character under cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor_pos < self.input_len() {
            let index = self.byte_index(self.cursor_pos);
            self.input.remove(index);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.input_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input_len();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Scroll the response, stopping with its last row at the top
    pub fn scroll_down(&mut self, lines: u16) {
        let limit = self.response_rows().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(limit);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Rows the response view takes at `output_width`
    fn response_rows(&self) -> u16 {
        let Some(Outcome::Response(text)) = &self.outcome else {
            return 0;
        };
        // "Response:", the optional "Q:" line, then a blank line
        let header = if self.last_question.is_some() { 3 } else { 2 };
        let body: usize = text
            .lines()
            .map(|line| wrapped_rows(line, self.output_width))
            .sum();
        u16::try_from(header + body).unwrap_or(u16::MAX)
    }
}

fn wrapped_rows(line: &str, width: u16) -> usize {
    let columns = Span::raw(line).width();
    if width == 0 || columns == 0 {
        1
    } else {
        columns.div_ceil(width as usize)
    }
}
