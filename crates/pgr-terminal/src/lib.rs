//! Terminal backend abstraction and crossterm implementation.
//!
//! Beyond the alternate-screen/raw-mode dance, this pager optionally tracks
//! xterm mouse mode 1002 (button-event tracking, the mode that reports drag
//! motion) directly as raw escape sequences -- crossterm's own
//! `EnableMouseCapture` bundles modes 1000/1002/1003 plus SGR extended
//! coordinates, which is more than this pager's mouse handling (click,
//! drag-to-select, scroll) needs. On final exit the terminal is additionally
//! reset with a raw restoration sequence so a crashed or killed session
//! never leaves the user's shell in alternate-screen/raw-mode limbo.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use std::io::{Write, stdout};

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

const MOUSE_MODE_1002_ON: &[u8] = b"\x1b[?1002h";
const MOUSE_MODE_1002_OFF: &[u8] = b"\x1b[?1002l";
/// Cursor/attribute reset (`\ec`), clear screen (`\e[2J`), clear line plus
/// carriage return (`\e[2K\r`), and reset character attributes (`\e[0;10m`).
const RESTORE_SEQUENCE: &[u8] = b"\x1bc\x1b[2J\x1b[2K\r\x1b[0;10m";

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
    mouse_enabled: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false, mouse_enabled: false }
    }

    /// As [`new`](Self::new), but additionally toggles xterm mouse mode 1002
    /// on entry/exit. Callers gate this on `TerminalCapabilities::supports_mouse`
    /// and the user's `--mouse` preference.
    pub fn with_mouse(mouse_enabled: bool) -> Self {
        Self { entered: false, mouse_enabled }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self, active: true })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            if self.mouse_enabled {
                stdout().write_all(MOUSE_MODE_1002_ON)?;
                stdout().flush()?;
            }
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            if self.mouse_enabled {
                stdout().write_all(MOUSE_MODE_1002_OFF)?;
            }
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            stdout().write_all(RESTORE_SEQUENCE)?;
            stdout().flush()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_disabled_by_default() {
        let backend = CrosstermBackend::new();
        assert!(!backend.mouse_enabled);
    }

    #[test]
    fn with_mouse_records_the_toggle() {
        let backend = CrosstermBackend::with_mouse(true);
        assert!(backend.mouse_enabled);
    }

    #[test]
    fn restore_sequence_resets_then_clears_then_resets_attributes() {
        let s = std::str::from_utf8(RESTORE_SEQUENCE).unwrap();
        assert!(s.starts_with('\u{1b}'));
        assert!(s.contains("\u{1b}[2J"));
        assert!(s.ends_with("\u{1b}[0;10m"));
    }
}
