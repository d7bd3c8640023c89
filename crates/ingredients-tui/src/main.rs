mod app;
mod game;
mod logging;
mod render;
mod theme;

use app::{App, Settings};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Defuse the Ingredients module: cook the secret dish before the bomb goes off
#[derive(Debug, Parser)]
#[command(name = "ingredients", version, about)]
struct Cli {
    /// Seed for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,

    /// Bomb countdown in minutes
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=99))]
    minutes: u64,

    /// Strikes before the bomb explodes
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    max_strikes: u64,

    /// Append tracing output to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Color theme
    #[arg(long, default_value = "dark", value_parser = ["dark", "light", "high-contrast"])]
    theme: String,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            duration: Duration::from_secs(self.minutes * 60),
            max_strikes: self.max_strikes as usize,
            seed: self.seed,
            theme: self.theme.clone(),
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init(path)?;
    }
    tracing::info!(seed = ?cli.seed, minutes = cli.minutes, max_strikes = cli.max_strikes, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, cli.settings());

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal error");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, settings: Settings) -> io::Result<()> {
    let mut app = App::new(settings);
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        // Render
        render::render(stdout, &app)?;
        stdout.flush()?;

        // Handle input, waking up in time for the next tick
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
            }
        }

        // Bomb timer and command pacing
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
