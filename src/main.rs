use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod cat;
mod config;
mod error;
mod handler;
mod mood;
mod ollama;
mod prompt;
mod session;
mod state;
mod tui;
mod ui;

use app::App;
use config::{Config, OLLAMA_URL_ENV};
use mood::Mood;
use ollama::OllamaClient;
use session::ChatSession;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "catgpt", version)]
#[command(about = "Chat with a cat who can type, served by your local Ollama")]
struct Cli {
    /// Ollama base URL (overrides $OLLAMA_API_URL and the config file)
    #[arg(long)]
    url: Option<String>,
    /// Model to talk to instead of the first one Ollama lists
    #[arg(short, long)]
    model: Option<String>,
    /// Starting mood: funny, sassy, sleepy, playful, grumpy, affectionate, mischievous
    #[arg(long, value_parser = parse_mood)]
    mood: Option<Mood>,
    /// Where to write the log (default: <cache dir>/catgpt/catgpt.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_mood(s: &str) -> Result<Mood, String> {
    Mood::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = Mood::all().iter().map(|m| m.as_str()).collect();
        format!("unknown mood '{}', expected one of: {}", s, known.join(", "))
    })
}

/// The terminal belongs to the TUI, so logs go to a file.
fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?
            .join("catgpt")
            .join("catgpt.log"),
    };
    let dir = log_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", log_path.display()))?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, file_name));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not read config, using defaults");
        Config::default()
    });

    let base_url = config.resolve_url(cli.url.clone(), std::env::var(OLLAMA_URL_ENV).ok());
    let mood = config.resolve_mood(cli.mood);
    let preferred_model = config.resolve_model(cli.model.clone());

    info!(%base_url, mood = mood.as_str(), ?preferred_model, "starting catgpt");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let session = ChatSession::new(mood, preferred_model);
    let mut app = App::new(session, OllamaClient::new(&base_url), events.sender());
    app.discover_models();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
