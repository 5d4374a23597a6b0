//! Terminal UI for coleta that lets users pick a state and city and browse recycling
//! collection points there.

mod app;
mod input;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use coleta_core::{AppConfig, Collaborators, ColetaService, Dispatcher, LogConfig, Outcome, Session};
use coleta_provider_backend as backend;
use coleta_provider_ibge as ibge;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;
use crate::input::Action;

#[derive(Parser, Debug)]
#[command(name = "coleta", version, about = "Find recycling collection points")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// File the log is appended to
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Some(file) = cli.log_file {
        config.log.file = file;
    }
    config.validate()?;

    init_logging(&config.log)?;
    info!(
        "starting coleta (locality={}, backend={})",
        config.locality_api_url, config.backend_api_url
    );

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .build()?;

    let collaborators = Collaborators::new(
        ibge::plugin(client.clone(), &config.locality_api_url),
        backend::plugin(client, &config.backend_api_url),
        Arc::new(config.location.source()),
    );
    let service = Arc::new(ColetaService::new(Arc::new(collaborators)));
    let (dispatcher, outcomes) = Dispatcher::channel(service);

    // App state
    let (session, commands) = Session::start();
    dispatcher.dispatch_all(commands);
    let app = App::new(session);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &dispatcher, outcomes).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("coleta stopped");
    res
}

/// Log to a file; stderr would tear the alternate screen.
fn init_logging(config: &LogConfig) -> Result<()> {
    let level: LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("invalid log level {}", config.level))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("cannot open log file {}", config.file))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    dispatcher: &Dispatcher,
    mut outcomes: UnboundedReceiver<Outcome>,
) -> Result<()> {
    loop {
        // Settle whatever finished since the last frame
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (small timeout so outcomes show up promptly)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Dispatch(commands) => dispatcher.dispatch_all(commands),
            }
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}
