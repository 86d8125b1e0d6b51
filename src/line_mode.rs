use crate::config::{Config, Rgb};
use crate::session::{Command, Session, Status};
use anyhow::Result;
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    color::{self, Fg},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineAction {
    Run(Command),
    Quit,
    Ignore,
}

fn key_action(key: Key) -> LineAction {
    match key {
        Key::Ctrl('c') | Key::Ctrl('d') | Key::Char('q') => LineAction::Quit,
        Key::Char(c) => Command::from_char(c).map_or(LineAction::Ignore, LineAction::Run),
        Key::Backspace => LineAction::Run(Command::Backspace),
        Key::Esc | Key::Delete => LineAction::Run(Command::Clear),
        _ => LineAction::Ignore,
    }
}

fn fg(rgb: Rgb) -> Fg<color::Rgb> {
    Fg(color::Rgb(rgb.0, rgb.1, rgb.2))
}

pub fn run_line(config: Config) -> Result<()> {
    let theme = &config.theme;
    let mut stdout = stdout().lock().into_raw_mode()?;
    info!("line mode started");

    write!(stdout, "pocketcalc\r\n")?;
    write!(stdout, "Operators: + - * / ^ ( ), % (modulo before a number, percentage otherwise)\r\n")?;
    write!(stdout, "Enter or = evaluates, Esc clears, a inserts ANS, n toggles sign, q quits\r\n\r\n")?;

    let mut session = Session::new();
    redraw(&mut stdout, &session, &config)?;

    for key in stdin().keys() {
        let command = match key_action(key?) {
            LineAction::Quit => break,
            LineAction::Ignore => continue,
            LineAction::Run(command) => command,
        };
        session.apply(command);

        if command == Command::Evaluate {
            match session.status() {
                Status::Evaluated { .. } => {
                    if let Some(entry) = session.history().last() {
                        write!(stdout, "\r{}  {}{}{}\r\n", ClearLine, fg(theme.equals.bg), entry.display(), Fg(color::Reset))?;
                    }
                }
                Status::Failed(err) => {
                    write!(stdout, "\r{}  {}Error: {}{}\r\n", ClearLine, fg(theme.danger.bg), err, Fg(color::Reset))?;
                }
                Status::Idle => {}
            }
        }
        redraw(&mut stdout, &session, &config)?;
    }

    write!(stdout, "\r\n")?;
    stdout.flush()?;
    info!(evaluations = session.history().len(), "quitting");
    Ok(())
}

fn redraw<W: Write>(out: &mut W, session: &Session, config: &Config) -> Result<()> {
    write!(
        out,
        "\r{}{}> {}{}",
        ClearLine,
        fg(config.theme.display_fg),
        session.main_display(),
        Fg(color::Reset)
    )?;
    out.flush()?;
    Ok(())
}
