use std::fs::{self, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use taskboard::app::App;
use taskboard::cli::{self, Cli, Commands, Services};
use taskboard::config::{self, Config};
use taskboard::notify::Toasts;
use taskboard::ui;

fn main() -> Result<()> {
    let args = Cli::parse();
    let interactive = matches!(args.command, None | Some(Commands::Board));

    init_logging(interactive)?;
    let config = config::load_config()?.with_api_url(args.api_url.clone());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match args.command {
        Some(command) if !interactive => {
            let services = Services::console(&config)?;
            rt.block_on(cli::run(&services, command))
        }
        _ => rt.block_on(run_board(&config)),
    }
}

/// Default to WARN; RUST_LOG=debug for more. The board logs to a file so the
/// screen stays clean.
fn init_logging(interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if interactive {
        let path = config::get_log_file()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

async fn run_board(config: &Config) -> Result<()> {
    let toasts = Toasts::new();
    let services = Services::new(config, Arc::new(toasts.clone()))?;
    let mut app = App::new(services.board(), services.auth(), services.router.clone(), toasts);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal UI failed")
}
