mod app;
mod render;
mod theme;

use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mathdash_core::{Difficulty, GameConfig, GameMode, LeaderboardStore, Operator};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use theme::Theme;

/// Timed mental arithmetic in the terminal
#[derive(Debug, Parser)]
#[command(name = "mathdash", version, about)]
struct Cli {
    /// Operators to practice, comma separated (+,-,x,/)
    #[arg(long, value_delimiter = ',', default_value = "+")]
    ops: Vec<Operator>,

    /// easy, medium or hard
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,

    /// Name shown on the leaderboard
    #[arg(long, default_value = "")]
    name: String,

    /// Untimed, unscored rounds
    #[arg(long)]
    practice: bool,

    /// dark or light
    #[arg(long, default_value = "dark")]
    theme: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the top scores and exit
    Leaderboard,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = LeaderboardStore::auto();
    log::info!("leaderboard backends: {:?}", store.status());

    if let Some(Command::Leaderboard) = cli.command {
        for (i, entry) in store.fetch().iter().enumerate() {
            println!("{}", render::format_entry(i + 1, entry));
        }
        return Ok(());
    }

    let mode = if cli.practice {
        GameMode::Practice
    } else {
        GameMode::Ranked
    };
    let config = GameConfig::new(cli.ops, cli.difficulty)
        .with_player(&cli.name)
        .with_mode(mode);
    let mut app = App::new(config, store, Theme::by_name(&cli.theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        // Handle input with timeout so the clock keeps running
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_rate {
            app.tick(elapsed);
            last_tick = Instant::now();
        }
    }

    Ok(())
}
