//! Raw-mode alternate-screen session.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;

/// Puts the terminal into raw mode on the alternate screen and restores it on
/// drop, including when the event loop returns early with an error.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter(title: &str) -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self { active: true };
        execute!(
            stdout(),
            EnterAlternateScreen,
            EnableFocusChange,
            Hide,
            SetTitle(title)
        )?;
        tracing::debug!(target: "runtime.terminal", "terminal_entered");
        Ok(guard)
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            restore()?;
            tracing::debug!(target: "runtime.terminal", "terminal_left");
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Return the terminal to cooked mode on the main screen. Safe to call when
/// the terminal was never entered.
pub fn restore() -> Result<()> {
    execute!(stdout(), DisableFocusChange, LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}
