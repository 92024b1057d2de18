//! Emit a composed [`Frame`] to the terminal with crossterm.
//!
//! Mirrors the teacher's writer: queue every command against stdout, flush
//! once at the end. `AttrRole` maps onto a small, theme-agnostic set of
//! `SetAttribute`/`SetForegroundColor` calls -- real color theming is out of
//! scope, so every role gets either plain text, reverse video, or a dim
//! shade, just enough to make the six viewports visually legible.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::attr::AttrRole;
use crate::engine::Composed;
use crate::frame::CellFlags;

fn style_for(role: AttrRole, flags: CellFlags, highlight_lines: bool) -> (Option<Color>, Attribute) {
    match role {
        AttrRole::Selection | AttrRole::SelectionCursor => (Some(Color::Black), Attribute::Reverse),
        AttrRole::CrossCursor | AttrRole::CrossCursorBorder => (None, Attribute::Reverse),
        AttrRole::CursorBookmark | AttrRole::CursorData | AttrRole::CursorLine | AttrRole::CursorPattern => {
            (None, Attribute::Reverse)
        }
        AttrRole::BookmarkData | AttrRole::BookmarkLine => (Some(Color::Yellow), Attribute::Bold),
        AttrRole::FoundStr => (Some(Color::Green), Attribute::Bold),
        AttrRole::Line => {
            if highlight_lines {
                (Some(Color::Cyan), Attribute::Reset)
            } else {
                (None, Attribute::Reset)
            }
        }
        AttrRole::Data => {
            if flags.contains(CellFlags::ODD_RECORD) {
                (None, Attribute::Dim)
            } else {
                (None, Attribute::Reset)
            }
        }
    }
}

/// Paint one composed frame plus its status line, honoring the
/// `--no-highlight-lines` toggle's effect on border coloring (everything
/// else about the palette is fixed).
pub fn paint<W: Write>(out: &mut W, composed: &Composed, highlight_lines: bool) -> io::Result<()> {
    let frame = &composed.frame;
    for y in 0..frame.height {
        queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        let mut last_style: Option<(Option<Color>, Attribute)> = None;
        for (cluster, _w, cell, x) in frame.row_leaders(y) {
            queue!(out, MoveTo(x, y))?;
            let style = style_for(cell.attr, cell.flags, highlight_lines);
            if last_style != Some(style) {
                queue!(out, SetAttribute(Attribute::Reset))?;
                if let Some(color) = style.0 {
                    queue!(out, SetForegroundColor(color))?;
                }
                queue!(out, SetAttribute(style.1))?;
                last_style = Some(style);
            }
            queue!(out, Print(cluster))?;
        }
    }
    queue!(out, SetAttribute(Attribute::Reset))?;
    queue!(out, MoveTo(0, frame.height), Clear(ClearType::CurrentLine))?;
    queue!(out, Print(&composed.status_line))?;
    out.flush()
}
