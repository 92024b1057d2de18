//! Keystroke -> command translation.
//!
//! Nothing downstream of [`pgr_events::Command`]/[`NavCommand`] knows a
//! single thing about keybindings -- this module is the only place a
//! physical key is ever mentioned. Bindings follow the usual vi/less
//! muscle memory (`hjkl`, `g`/`G`, `/`/`?`, `n`/`N`) since that's what
//! everyone piping `psql`/`sqlplus` output through a pager already expects.

use pgr_events::{Command, ExportTarget, KeyCode, KeyEvent, KeyModifiers};
use pgr_state::NavCommand;

/// What one keystroke means, once digit-prefix accumulation is resolved.
pub enum Intent {
    Digit(u32),
    Nav(NavCommand),
    Cmd(Command),
    /// Enter the search/goto prompt (the runtime owns prompt text entry).
    StartSearch { backward: bool },
    StartGoto,
    None,
}

/// Translate one keystroke seen in normal (non-prompt) mode. `has_digits`
/// tells the caller whether a numeric prefix is pending, so `g`/`G` can
/// decide between "first/last row" and "goto line N".
pub fn translate(key: KeyEvent, has_digits: bool) -> Intent {
    let ctrl = key.mods.contains(KeyModifiers::CTRL);
    let shift = key.mods.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && !ctrl => Intent::Digit(c as u32 - '0' as u32),

        KeyCode::Char('j') | KeyCode::Down => Intent::Nav(NavCommand::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Intent::Nav(NavCommand::CursorUp),
        KeyCode::Char('h') | KeyCode::Left if !shift => {
            Intent::Nav(NavCommand::MoveLeft { by_column: false })
        }
        KeyCode::Char('l') | KeyCode::Right if !shift => {
            Intent::Nav(NavCommand::MoveRight { by_column: false })
        }
        KeyCode::Char('H') | KeyCode::Left if shift => {
            Intent::Nav(NavCommand::MoveLeft { by_column: true })
        }
        KeyCode::Char('L') | KeyCode::Right if shift => {
            Intent::Nav(NavCommand::MoveRight { by_column: true })
        }
        KeyCode::Char('0') if ctrl => Intent::Nav(NavCommand::ShowFirstCol),
        KeyCode::Char('$') => Intent::Nav(NavCommand::ShowLastCol),
        KeyCode::Char('^') => Intent::Nav(NavCommand::ShowFirstCol),

        KeyCode::Char(' ') | KeyCode::PageDown | KeyCode::Char('f') if !ctrl => {
            Intent::Nav(NavCommand::PageDown)
        }
        KeyCode::Char('b') | KeyCode::PageUp => Intent::Nav(NavCommand::PageUp),
        KeyCode::Char('d') if ctrl => Intent::Nav(NavCommand::HalfPageDown),
        KeyCode::Char('u') if ctrl => Intent::Nav(NavCommand::HalfPageUp),
        KeyCode::Char('f') if ctrl => Intent::Nav(NavCommand::PageDown),

        KeyCode::Char('g') if !has_digits => Intent::Nav(NavCommand::CursorFirstRow),
        KeyCode::Char('G') if !has_digits => Intent::Nav(NavCommand::CursorLastRow),
        KeyCode::Char('g') | KeyCode::Char('G') => Intent::StartGoto,
        KeyCode::Home => Intent::Nav(NavCommand::CursorFirstRow),
        KeyCode::End => Intent::Nav(NavCommand::CursorLastRow),

        KeyCode::Char('/') => Intent::StartSearch { backward: false },
        KeyCode::Char('?') => Intent::StartSearch { backward: true },
        KeyCode::Char('n') => Intent::Cmd(Command::SearchNext),
        KeyCode::Char('N') => Intent::Cmd(Command::SearchPrev),
        KeyCode::Esc => Intent::Cmd(Command::ClearSearch),

        KeyCode::Char('m') => Intent::Cmd(Command::ToggleBookmark),
        KeyCode::Char('v') => Intent::Cmd(Command::MarkRows),
        KeyCode::Char('V') => Intent::Cmd(Command::MarkBlock),
        KeyCode::Char('c') if ctrl => Intent::Cmd(Command::MarkColumns),
        KeyCode::Char('u') if !ctrl => Intent::Cmd(Command::CancelMark),

        KeyCode::Char('y') => Intent::Cmd(Command::Export { target: ExportTarget::Clipboard }),
        KeyCode::Char('Y') => Intent::Cmd(Command::Export { target: ExportTarget::File }),

        KeyCode::Char('F') => Intent::Cmd(Command::ToggleFreeze),
        KeyCode::Char('s') => Intent::Cmd(Command::Sort { column: 0, descending: false }),
        KeyCode::Char('S') => Intent::Cmd(Command::Sort { column: 0, descending: true }),
        KeyCode::Char('c') if !ctrl => Intent::Cmd(Command::ClearSort),

        KeyCode::Char('i') => Intent::Cmd(Command::ToggleSearchHighlight),
        KeyCode::Char('I') => Intent::Cmd(Command::ToggleLineHighlight),
        KeyCode::Char('p') => Intent::Cmd(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') if ctrl => Intent::Cmd(Command::Refresh),

        KeyCode::Char('q') | KeyCode::Char('Q') => Intent::Cmd(Command::Quit),

        _ => Intent::None,
    }
}

/// The vertical-cursor-aware column an `s`/`S` sort keystroke targets: the
/// column the vertical cursor sits on, or column 0 when it is disabled.
pub fn sort_column(vertical_cursor_column: usize) -> usize {
    vertical_cursor_column.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgr_events::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, mods: KeyModifiers::empty() }
    }

    #[test]
    fn digit_without_ctrl_is_a_digit_intent() {
        match translate(key(KeyCode::Char('5')), false) {
            Intent::Digit(5) => {}
            _ => panic!("expected digit"),
        }
    }

    #[test]
    fn bare_g_goes_to_first_row() {
        assert!(matches!(translate(key(KeyCode::Char('g')), false), Intent::Nav(NavCommand::CursorFirstRow)));
    }

    #[test]
    fn g_with_pending_digits_starts_goto() {
        assert!(matches!(translate(key(KeyCode::Char('g')), true), Intent::StartGoto));
    }

    #[test]
    fn slash_starts_forward_search() {
        assert!(matches!(translate(key(KeyCode::Char('/')), false), Intent::StartSearch { backward: false }));
    }
}
