mod app;
mod config;
mod score;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "scorecalc")]
#[command(version)]
#[command(about = "A terminal score keeper with quick add/subtract presets")]
struct Args {
    /// Use this config file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Start with the score set to this whole number
    #[arg(short, long, value_name = "N", allow_hyphen_values = true)]
    set: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, filtered by RUST_LOG)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load()?,
    };

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let app = build_app(&args, config)?;
    run_tui(app).await
}

/// Create the app, committing `--set` the same way the set-score field does
fn build_app(args: &Args, config: AppConfig) -> Result<App> {
    let mut app = App::new(config);
    if let Some(text) = args.set.as_deref() {
        app.controller.update_pending_text(text);
        app.controller.commit_text()?;
    }
    Ok(app)
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(mut app: App) -> Result<()> {
    tracing::info!(score = app.controller.score(), "Starting scorecalc");

    loop {
        let mut terminal = setup_terminal()?;
        let result = run_app(&mut terminal, &mut app);
        let restored = restore_terminal(&mut terminal);
        if let Err(e) = &restored {
            tracing::error!("Failed to restore terminal: {:#}", e);
        }
        result?;
        restored?;

        if !app.suspend_requested {
            return Ok(());
        }

        // The view is torn down here; only the score state crosses the shell session
        let snapshot = app.snapshot();
        let config = app.config.clone();
        drop(terminal);
        tracing::info!(snapshot = %serde_json::to_string(&snapshot)?, "Suspending to shell");

        let shell_result = run_shell().await;

        app = App::restore(config, snapshot);
        match shell_result {
            Ok(()) => app.set_status("Welcome back"),
            Err(e) => {
                tracing::warn!("Shell failed: {:#}", e);
                app.set_status(format!("Error: {}", e));
            }
        }
        tracing::info!(score = app.controller.score(), "Resumed");
    }
}

fn run_app(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit || app.suspend_requested {
            return Ok(());
        }

        app.tick();
    }
}

async fn run_shell() -> Result<()> {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string());
    println!("scorecalc suspended, exit the shell to return");

    let status = tokio::process::Command::new(&shell)
        .status()
        .await
        .with_context(|| format!("could not start {}", shell))?;

    if !status.success() {
        tracing::debug!("{} exited with {}", shell, status);
    }
    Ok(())
}
