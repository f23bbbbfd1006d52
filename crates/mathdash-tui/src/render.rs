use crate::app::{App, MessageKind, ScreenState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use mathdash_core::{GameConfig, GameMode, LeaderboardEntry, SessionState};
use std::io;

/// Seconds left when the timer switches to the warning color
const LOW_TIME_SECS: u32 = 10;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let start_x = term_width.saturating_sub(44) / 2;
    let start_y = if term_height > 20 { 2 } else { 0 };

    execute!(stdout, Hide, Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Ready => render_ready_screen(stdout, app, start_x, start_y)?,
        ScreenState::Playing => render_game_screen(stdout, app, start_x, start_y)?,
        ScreenState::Results => render_results_screen(stdout, app, start_x, start_y)?,
        ScreenState::Leaderboard => {
            line(stdout, start_x, start_y, app.theme.key, "LEADERBOARD")?;
            render_board(stdout, app, &app.board, start_x, start_y + 2)?;
            line(
                stdout,
                start_x,
                start_y + 14,
                app.theme.info,
                "[Enter] play   [any key] back   [q] quit",
            )?;
        }
    }

    if let Some((ref msg, kind)) = app.message {
        let color = match kind {
            MessageKind::Info => app.theme.info,
            MessageKind::Good => app.theme.success,
            MessageKind::Bad => app.theme.error,
        };
        line(stdout, start_x, start_y + 16, color, msg)?;
    }

    queue!(stdout, ResetColor)?;
    execute!(stdout, Show)?;
    Ok(())
}

fn render_ready_screen(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let config = app.engine.config();
    let ops: Vec<&str> = config.operators.iter().map(|op| op.symbol()).collect();
    let mode = match config.mode {
        GameMode::Ranked => "Ranked (60s)",
        GameMode::Practice => "Practice",
    };

    line(stdout, x, y, app.theme.key, "MATH DASH")?;
    line(stdout, x, y + 2, app.theme.fg, &format!("Player:     {}", display_name(&config.player_name)))?;
    line(stdout, x, y + 3, app.theme.fg, &format!("Difficulty: {}", config.difficulty))?;
    line(stdout, x, y + 4, app.theme.fg, &format!("Operators:  {}", ops.join(" ")))?;
    line(stdout, x, y + 5, app.theme.fg, &format!("Mode:       {}", mode))?;
    line(
        stdout,
        x,
        y + 7,
        app.theme.info,
        "[Enter] start   [b] leaderboard   [q] quit",
    )
}

fn render_game_screen(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let state = app.engine.state();
    let ranked = app.engine.config().is_ranked();

    if ranked {
        let timer_color = if state.time_left <= LOW_TIME_SECS {
            app.theme.timer_low
        } else {
            app.theme.timer
        };
        line(stdout, x, y, timer_color, &format!("Time  {}", state.time_left_string()))?;
        line(
            stdout,
            x + 16,
            y,
            app.theme.fg,
            &format!("Score {:>4}   Streak {}", state.score, state.streak),
        )?;
    } else {
        line(stdout, x, y, app.theme.info, "Practice - no clock")?;
    }

    if let Some(ref problem) = state.current_problem {
        line(stdout, x + 4, y + 3, app.theme.problem, &format!("{} = ?", problem))?;
    }
    line(stdout, x + 4, y + 5, app.theme.input, &format!("> {}_", app.input))?;

    line(
        stdout,
        x,
        y + 8,
        app.theme.info,
        "[Enter] answer   [Tab] skip   [Esc] end round",
    )
}

fn render_results_screen(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let state = app.engine.state();
    line(stdout, x, y, app.theme.key, results_title(app.engine.config(), state))?;
    if app.engine.config().is_ranked() {
        line(
            stdout,
            x,
            y + 1,
            app.theme.fg,
            &format!("Final score {}   Skips {}", state.score, state.skips_used),
        )?;
    }
    render_board(stdout, app, &app.board, x, y + 3)?;
    line(
        stdout,
        x,
        y + 15,
        app.theme.info,
        "[Enter] play again   [r] reset   [q] quit",
    )
}

/// Header for the results screen, depending on how the round ended
fn results_title(config: &GameConfig, state: &SessionState) -> &'static str {
    if !config.is_ranked() {
        "PRACTICE OVER"
    } else if state.time_left == 0 {
        "TIME'S UP"
    } else {
        "ROUND ENDED"
    }
}

fn render_board(
    stdout: &mut io::Stdout,
    app: &App,
    board: &[LeaderboardEntry],
    x: u16,
    y: u16,
) -> io::Result<()> {
    let player = &app.engine.config().player_name;
    for (i, entry) in board.iter().enumerate() {
        let color = if !player.is_empty() && entry.player_name == *player {
            app.theme.success
        } else {
            app.theme.fg
        };
        line(stdout, x, y + i as u16, color, &format_entry(i + 1, entry))?;
    }
    Ok(())
}

/// One leaderboard row, also used by the plain listing
pub fn format_entry(rank: usize, entry: &LeaderboardEntry) -> String {
    format!(
        "{:>2}. {:<16} {:>5}  {:<6} {}",
        rank,
        display_name(&entry.player_name),
        entry.score,
        entry.difficulty.to_string(),
        entry.operation
    )
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "Anonymous"
    } else {
        name
    }
}

fn line(stdout: &mut io::Stdout, x: u16, y: u16, color: Color, text: &str) -> io::Result<()> {
    queue!(stdout, MoveTo(x, y), SetForegroundColor(color), Print(text))
}
