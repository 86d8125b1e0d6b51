pub mod app;
pub mod keypad;
mod ui;
mod helpers;

use crate::config::Config;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    execute,
    cursor::{Hide, Show},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::panic;
use tracing::info;


pub fn run_tui(config: Config) -> Result<()> {
    let mut terminal = setup_terminal()?;
    install_panic_hook();
    let mut app = App::new(config);
    info!("terminal ui started");

    let result = ui::run_ui_loop(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(Into::into)
}

/// Puts the terminal back before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
        default_hook(info);
    }));
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture, Show)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    Ok(())
}
