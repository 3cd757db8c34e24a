mod action;
mod app;
mod command;
mod config;
mod domain;
mod ui;
mod update;

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io;
use std::pin::pin;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use action::Action;
use app::App;
use command::{execute_command, Command};
use config::{AppConfig, BackendKind, Overrides};
use domain::RelayChain;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Ask an LLM a question - hosted (Groq) or local (Ollama)")]
struct Cli {
    /// Backend to use (overrides LLM_RELAY_BACKEND)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Model name (overrides GROQ_MODEL / OLLAMA_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Backend base URL (overrides GROQ_BASE_URL / OLLAMA_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Ask a single question, print the answer and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Where to write logs
    #[arg(long, default_value = ".llm-relay.log")]
    log_file: String,
}

/// What the UI needs to know about the backend, whether or not it came up
struct Startup {
    title: &'static str,
    backend_label: String,
    chain: Result<RelayChain, String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let overrides = Overrides {
        backend: cli.backend,
        model: cli.model.clone(),
        base_url: cli.base_url.clone(),
    };
    let startup = start_backend(&overrides, |var| std::env::var(var).ok());

    if let Some(question) = &cli.question {
        return run_once(startup.chain, question).await;
    }

    let mut app = startup.app();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, startup.chain.as_ref().ok()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

impl Startup {
    /// Fresh app, halted if the backend could not be set up
    fn app(&self) -> App {
        match &self.chain {
            Ok(_) => App::new(self.title, &self.backend_label),
            Err(message) => App::halted(self.title, &self.backend_label, message.clone()),
        }
    }
}

/// Resolve configuration from `lookup` and build the chain. Failures become
/// the message the UI shows instead of accepting input.
fn start_backend<F>(overrides: &Overrides, lookup: F) -> Startup
where
    F: Fn(&str) -> Option<String>,
{
    let config = match AppConfig::resolve(overrides, lookup) {
        Ok(config) => config,
        Err(e) => {
            let kind = e.backend().or(overrides.backend);
            error!(error = %e, "configuration error");
            return Startup {
                title: kind.unwrap_or(BackendKind::Ollama).title(),
                backend_label: kind.map(|k| k.label()).unwrap_or("LLM").to_string(),
                chain: Err(init_error(kind, &e)),
            };
        }
    };

    let kind = config.kind();
    info!(
        backend = ?config.backend,
        project = %config.trace.project,
        tracing = config.trace.enabled,
        "configuration resolved"
    );

    let chain = domain::build_chain(&config)
        .inspect(|chain| info!(model = chain.model_name(), "backend ready"))
        .map_err(|e| {
            error!(error = %e, "failed to initialize backend");
            init_error(Some(kind), &e)
        });

    Startup {
        title: kind.title(),
        backend_label: format!("{} · {}", kind.label(), config.backend.model()),
        chain,
    }
}

fn init_error(kind: Option<BackendKind>, err: &dyn std::fmt::Display) -> String {
    match kind {
        Some(kind) => format!("Error initializing {} LLM: {}", kind.label(), err),
        None => format!("Error initializing LLM: {}", err),
    }
}

async fn run_once(chain: Result<RelayChain, String>, question: &str) -> Result<()> {
    let chain = chain.map_err(anyhow::Error::msg)?;
    if question.trim().is_empty() {
        anyhow::bail!("Question is empty");
    }

    let answer = chain
        .invoke(question)
        .await
        .context("Error while generating response")?;
    println!("{}", answer);
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    chain: Option<&RelayChain>,
) -> Result<()> {
    loop {
        app.output_width = ui::output_width(terminal.size()?.width);
        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            let commands = handle_event(app, event::read()?);
            process_commands(terminal, app, chain, commands).await?;
        }
    }

    Ok(())
}

/// Feed a terminal event through `update`. Only key presses count.
fn handle_event(app: &mut App, event: Event) -> Vec<Command> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => update::update(
            app,
            Action::Input {
                code: key.code,
                modifiers: key.modifiers,
            },
        ),
        _ => Vec::new(),
    }
}

/// Run commands to completion, feeding their actions back through `update`.
/// Keys pressed meanwhile are handled in the pending state, so only quit
/// gets through; quitting drops the in-flight call.
async fn process_commands(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    chain: Option<&RelayChain>,
    commands: Vec<Command>,
) -> Result<()> {
    let Some(chain) = chain else {
        return Ok(());
    };

    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let mut running = pin!(execute_command(command, chain));
        let mut tick = tokio::time::interval(Duration::from_millis(50));

        let action = loop {
            tokio::select! {
                action = running.as_mut() => break action,
                _ = tick.tick() => {
                    while event::poll(Duration::ZERO)? {
                        queue.extend(handle_event(app, event::read()?));
                    }
                    if app.should_quit {
                        return Ok(());
                    }
                    terminal.draw(|f| ui::render(f, app))?;
                }
            }
        };

        if let Some(action) = action {
            queue.extend(update::update(app, action));
        }
    }

    Ok(())
}
