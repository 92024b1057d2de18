//! Status line composition.
//!
//! Two-stage pipeline mirroring the rest of this crate's style: a `compose`
//! step produces ordered segments, a `format` step renders them into the
//! final string. Keeping the split means a future caller (error banner,
//! watch countdown) can inject/replace a segment without re-deriving the
//! whole line.
//!
//! Format: `V:[col/cols x..y] FC:f C:a..b/max L:[first + offset r/total] pct%`

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusContext {
    /// 1-based vertical cursor column, or 0 if disabled.
    pub vertical_cursor_column: usize,
    pub total_columns: usize,
    /// First/last visible display-column of the body viewport.
    pub visible_col_range: (usize, usize),
    pub freezed_cols: u8,
    pub first_row: usize,
    pub cursor_row_rel: usize,
    pub total_rows: usize,
    pub watch_seconds_left: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment {
    VerticalCursor { col: usize, total: usize },
    VisibleRange { lo: usize, hi: usize, max: usize },
    FreezedCols(u8),
    Position { first_row: usize, offset: usize, total: usize },
    Percent(u8),
    Watch(Option<u64>),
    Error(String),
}

pub fn compose(ctx: &StatusContext) -> Vec<StatusSegment> {
    if let Some(err) = &ctx.error {
        return vec![StatusSegment::Error(err.clone())];
    }
    let mut segs = Vec::new();
    if let Some(w) = ctx.watch_seconds_left {
        segs.push(StatusSegment::Watch(Some(w)));
    }
    segs.push(StatusSegment::VerticalCursor {
        col: ctx.vertical_cursor_column,
        total: ctx.total_columns,
    });
    segs.push(StatusSegment::VisibleRange {
        lo: ctx.visible_col_range.0,
        hi: ctx.visible_col_range.1,
        max: ctx.total_columns,
    });
    segs.push(StatusSegment::FreezedCols(ctx.freezed_cols));
    let absolute_row = ctx.first_row + ctx.cursor_row_rel;
    segs.push(StatusSegment::Position {
        first_row: ctx.first_row,
        offset: ctx.cursor_row_rel,
        total: ctx.total_rows,
    });
    let pct = if ctx.total_rows <= 1 {
        100
    } else {
        ((absolute_row as f64 / (ctx.total_rows - 1) as f64) * 100.0).round() as u8
    };
    segs.push(StatusSegment::Percent(pct));
    segs
}

pub fn format(segs: &[StatusSegment]) -> String {
    let mut out = String::new();
    for seg in segs {
        match seg {
            StatusSegment::Error(e) => {
                out.push_str(e);
                return out;
            }
            StatusSegment::Watch(Some(secs)) => out.push_str(&format!("[{secs}s] ")),
            StatusSegment::Watch(None) => out.push_str("[paused] "),
            StatusSegment::VerticalCursor { col, total } => {
                out.push_str(&format!("V:[{col}/{total}] "));
            }
            StatusSegment::VisibleRange { lo, hi, max } => {
                out.push_str(&format!("C:{lo}..{hi}/{max} "));
            }
            StatusSegment::FreezedCols(f) => out.push_str(&format!("FC:{f} ")),
            StatusSegment::Position { first_row, offset, total } => {
                out.push_str(&format!("L:[{first_row} + {offset} {}/{total}] ", first_row + offset));
            }
            StatusSegment::Percent(pct) => out.push_str(&format!("{pct}%")),
        }
    }
    out.trim_end().to_string()
}

pub fn build_status_line(ctx: &StatusContext) -> String {
    format(&compose(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_replaces_status_entirely() {
        let ctx = StatusContext {
            vertical_cursor_column: 0,
            total_columns: 3,
            visible_col_range: (0, 10),
            freezed_cols: 0,
            first_row: 0,
            cursor_row_rel: 0,
            total_rows: 10,
            watch_seconds_left: None,
            error: Some("disk full".into()),
        };
        assert_eq!(build_status_line(&ctx), "disk full");
    }

    #[test]
    fn happy_path_contains_all_segments() {
        let ctx = StatusContext {
            vertical_cursor_column: 2,
            total_columns: 5,
            visible_col_range: (0, 40),
            freezed_cols: 1,
            first_row: 10,
            cursor_row_rel: 3,
            total_rows: 100,
            watch_seconds_left: Some(4),
            error: None,
        };
        let line = build_status_line(&ctx);
        assert!(line.contains("V:[2/5]"));
        assert!(line.contains("FC:1"));
        assert!(line.contains("L:[10 + 3 13/100]"));
        assert!(line.starts_with("[4s]"));
    }

    #[test]
    fn percent_is_100_at_last_row() {
        let ctx = StatusContext {
            vertical_cursor_column: 0,
            total_columns: 1,
            visible_col_range: (0, 1),
            freezed_cols: 0,
            first_row: 9,
            cursor_row_rel: 0,
            total_rows: 10,
            watch_seconds_left: None,
            error: None,
        };
        assert!(build_status_line(&ctx).ends_with("100%"));
    }
}
