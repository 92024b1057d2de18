//! The typed navigation command enum driven into [`crate::NavigationState`].
//!
//! Translated upstream from keystrokes, mouse events, menu selections, or
//! backslash-commands — none of which this crate knows about. It only sees
//! the resulting intent.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    ScrollUp,
    ScrollDown,
    CursorFirstRow,
    CursorLastRow,
    /// Positive: 1-based line number from data start. Negative: counts back
    /// from the last row (`-1` is the last row).
    GotoLine(i64),
    MoveLeft { by_column: bool },
    MoveRight { by_column: bool },
    ShowFirstCol,
    ShowLastCol,
}
