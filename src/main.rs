use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::{io, time::Duration};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod app;
mod app_event;
mod browser;
mod cli;
mod config;
mod error;
mod models;
mod ui;

use app::App;
use cli::Args;
use config::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = match &args.config_dir {
        Some(dir) => ConfigManager::with_dir(dir.clone())?,
        None => ConfigManager::new()?,
    };
    let mut app_config = config_manager.load_config()?;

    // Command line overrides last for this run only
    if let Some(dest) = &args.dest {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        app_config.download_dir = Some(dest.display().to_string());
    }
    if args.no_decompress {
        app_config.decompress_zip = false;
    }

    // Setup logging
    let log_dir = config_manager.log_dir(&app_config);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
    let log_file = log_dir.join(format!(
        "diskr_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file)?;

    fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::from_default_env().add_directive("diskr=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .init();

    debug!("Starting diskr, config in {:?}", config_manager.get_config_dir());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config_manager, app_config, &args.path);
    app.startup(args.token);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Application error: {:#}", err);
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw::<B>(f, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Results of background requests land between frames
        app.process_events();

        if app.should_quit {
            return Ok(());
        }
    }
}
