use crate::app::{App, InputMode, MessageKind, ScreenState};
use crate::game::{format_bomb_time, Outcome};
use crossterm::{
    cursor::{Hide, MoveTo},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use ingredients_core::{required_digit, Course, RecipeCatalog, Technique, HELP_MESSAGE};
use std::io;

/// Width of the module display box, borders included
const DISPLAY_WIDTH: u16 = 30;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    match app.screen_state {
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Manual => render_manual_screen(stdout, app, term_width, term_height)?,
        ScreenState::Win => render_win_screen(stdout, app, term_width, term_height)?,
        ScreenState::Lose => render_lose_screen(stdout, app, term_width, term_height)?,
    }

    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let start_x = term_width.saturating_sub(60) / 2 + 1;
    let start_y = if term_height > 24 { 2 } else { 1 };

    render_info_panel(stdout, app, start_x, start_y)?;
    render_display(stdout, app, start_x, start_y + 4)?;
    render_buttons(stdout, app, start_x, start_y + 9)?;
    render_command_line(stdout, app, start_x, start_y + 11)?;
    render_controls(stdout, app, start_x, start_y + 14)?;

    if let Some((ref msg, kind)) = app.message {
        render_message(stdout, app, msg, kind, term_width)?;
    }

    if app.show_help {
        render_help(stdout, app, term_width, term_height)?;
    }

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ INGREDIENTS ═══")
    )?;

    let left = game.remaining();
    let timer_color = if left.as_secs() < 60 { theme.error } else { theme.info };
    execute!(
        stdout,
        MoveTo(x + 32, y),
        SetForegroundColor(theme.info),
        Print("Bomb: "),
        SetForegroundColor(timer_color),
        Print(format_bomb_time(left))
    )?;

    let strikes: String = (0..game.max_strikes())
        .map(|i| if i < game.strikes() { 'X' } else { '·' })
        .collect();
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print("Strikes: "),
        SetForegroundColor(theme.error),
        Print(strikes)
    )?;

    execute!(
        stdout,
        MoveTo(x + 32, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Session {}", game.session().id()))
    )?;

    Ok(())
}

fn render_display(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();
    let inner = (DISPLAY_WIDTH - 2) as usize;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.border),
        Print(format!("┌{}┐", "─".repeat(inner))),
        MoveTo(x, y + 1),
        Print("│"),
        SetBackgroundColor(theme.display_bg),
        SetForegroundColor(theme.key),
        Print(" ◀"),
        SetForegroundColor(theme.display_fg),
        Print(format!("{:^width$}", session.display(), width = inner - 4)),
        SetForegroundColor(theme.key),
        Print("▶ "),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        Print("│"),
        MoveTo(x, y + 2),
        Print(format!("└{}┘", "─".repeat(inner)))
    )?;

    let remaining = session.current_ingredients().len();
    let position = if remaining == 0 {
        "empty".to_string()
    } else {
        format!("{}/{}", session.cursor_index() + 1, remaining)
    };
    execute!(
        stdout,
        MoveTo(x + 1, y + 3),
        SetForegroundColor(theme.info),
        Print(format!("Item {:<8} Added: {}", position, session.added().len()))
    )?;

    Ok(())
}

fn render_buttons(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    for (i, technique) in Technique::ALL.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x + i as u16 * 14, y),
            SetForegroundColor(theme.key),
            Print(format!("[{}] ", i + 1)),
            SetForegroundColor(theme.button),
            Print(technique.to_string())
        )?;
    }

    Ok(())
}

fn render_command_line(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    if let Some(running) = &app.running {
        let status = match running.awaiting {
            Some(digit) => format!("Running: {}  (waiting for a {})", running.text, digit),
            None => format!("Running: {}", running.text),
        };
        execute!(
            stdout,
            MoveTo(x, y + 1),
            SetForegroundColor(theme.info),
            Print(status)
        )?;
    }

    match app.mode {
        InputMode::Command => execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(theme.key),
            Print(":"),
            SetForegroundColor(theme.fg),
            Print(&app.command_line),
            SetForegroundColor(theme.key),
            Print("_")
        ),
        InputMode::Normal => execute!(
            stdout,
            MoveTo(x, y),
            SetForegroundColor(theme.info),
            Print("Press : to type a command, ? for help")
        ),
    }
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let controls = [
        ("←/→ h/l", "Scroll"),
        ("Enter/a", "Add"),
        ("r", "Reset"),
        ("1-4", "Technique"),
        (":", "Command"),
        ("Esc", "Stop cmd"),
        ("?", "Help"),
        ("m", "Recipes"),
        ("t", "Theme"),
        ("n", "New puzzle"),
        ("q", "Quit"),
    ];

    // Display in 3 columns (4 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 20;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>8}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    kind: MessageKind,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;
    let color = match kind {
        MessageKind::Info => theme.fg,
        MessageKind::Good => theme.success,
        MessageKind::Bad => theme.error,
    };

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(color),
        SetBackgroundColor(theme.display_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_help(stdout: &mut io::Stdout, app: &App, term_width: u16, term_height: u16) -> io::Result<()> {
    let theme = &app.theme;

    let max_width = 52;
    let wrapped = wrap_text(HELP_MESSAGE, max_width);

    let box_width = (max_width + 4) as u16;
    let box_height = (wrapped.len() + 4) as u16;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(theme.display_bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.key),
        Print("Commands")
    )?;

    for (i, line) in wrapped.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(theme.fg),
            Print(line)
        )?;
    }

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    Ok(())
}

/// Lines of the recipe book: recipes grouped by course, then the digit table
fn manual_lines() -> Vec<String> {
    let catalog = RecipeCatalog::global();
    let mut lines = Vec::new();

    for course in Course::ALL {
        lines.push(format!("── {} ──", course));
        for recipe in catalog.recipes().iter().filter(|r| r.course() == course) {
            let ingredients: Vec<&str> = recipe.ingredients().map(|i| i.name()).collect();
            lines.push(format!(
                "  {:<26} {:<7} {}",
                recipe.name(),
                recipe.technique().to_string(),
                ingredients.join(", ")
            ));
        }
        lines.push(String::new());
    }

    lines.push("── Timer digit ──".to_string());
    let header: String = Course::ALL.iter().map(|c| format!("{:>10}", c.to_string())).collect();
    lines.push(format!("  {:<8}{}", "", header));
    for technique in Technique::ALL {
        let row: String = Course::ALL
            .iter()
            .map(|&c| format!("{:>10}", required_digit(technique, c)))
            .collect();
        lines.push(format!("  {:<8}{}", technique.to_string(), row));
    }

    lines
}

fn render_manual_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let x = term_width.saturating_sub(90) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.key),
        Print("═══ RECIPE BOOK ═══"),
        MoveTo(x + 40, 0),
        SetForegroundColor(theme.info),
        Print(format!("Bomb: {}", app.game.time_string()))
    )?;

    let lines = manual_lines();
    let visible = term_height.saturating_sub(4) as usize;
    let first = app.manual_scroll.min(lines.len().saturating_sub(visible));

    for (i, line) in lines.iter().skip(first).take(visible).enumerate() {
        let color = if line.starts_with("──") { theme.key } else { theme.fg };
        execute!(
            stdout,
            MoveTo(x, 2 + i as u16),
            SetForegroundColor(color),
            Print(line)
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, term_height.saturating_sub(1)),
        SetForegroundColor(theme.info),
        Print("↑/↓ scroll   Esc back")
    )?;

    Ok(())
}

// Win/Lose screens

fn render_banner(
    stdout: &mut io::Stdout,
    lines: &[(String, crossterm::style::Color)],
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let y = term_height.saturating_sub(lines.len() as u16) / 2;
    for (i, (text, color)) in lines.iter().enumerate() {
        let x = term_width.saturating_sub(text.chars().count() as u16) / 2;
        execute!(
            stdout,
            MoveTo(x, y + i as u16),
            SetForegroundColor(*color),
            Print(text)
        )?;
    }
    Ok(())
}

fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let target = app.game.session().target();

    let lines = [
        ("✦  DELICIOUS!  ✦".to_string(), theme.success),
        (String::new(), theme.fg),
        (format!("You served {}", target.name()), theme.fg),
        (
            format!("Time left {}   Strikes {}", app.game.time_string(), app.game.strikes()),
            theme.info,
        ),
        (String::new(), theme.fg),
        ("n: new puzzle   q: quit".to_string(), theme.key),
    ];
    render_banner(stdout, &lines, term_width, term_height)
}

fn render_lose_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let target = app.game.session().target();
    let reason = match app.outcome {
        Some(Outcome::TimedOut) => "The timer ran out.",
        _ => "Too many strikes.",
    };
    let ingredients: Vec<&str> = target.ingredients().map(|i| i.name()).collect();

    let lines = [
        ("✸  BOOM  ✸".to_string(), theme.error),
        (String::new(), theme.fg),
        (reason.to_string(), theme.fg),
        (
            format!(
                "The dish was {} ({}, press on {})",
                target.name(),
                target.technique(),
                target.required_digit()
            ),
            theme.info,
        ),
        (ingredients.join(", "), theme.info),
        (String::new(), theme.fg),
        ("n: new puzzle   q: quit".to_string(), theme.key),
    ];
    render_banner(stdout, &lines, term_width, term_height)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
