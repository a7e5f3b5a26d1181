//! Raw-mode session owned by [`App::run`](crate::app::App::run).
//!
//! Raw mode and the alternate screen are left when the session drops,
//! when an error report is printed and when the process panics.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct Session {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Session {
    /// Switch the terminal into chat mode.
    ///
    /// The cursor stays visible; the focused input places it.
    pub fn start() -> Result<Self> {
        enable_raw_mode()?;
        Self::enter().inspect_err(|_| restore())
    }

    fn enter() -> Result<Self> {
        execute!(stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        restore();
    }
}

/// Best effort; each step runs even if an earlier one failed.
fn restore() {
    let _ = execute!(stdout(), cursor::Show);
    let _ = execute!(stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Route panics and error reports through [`restore`] first.
///
/// Call before [`Session::start`] so a failing startup also prints cleanly.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
