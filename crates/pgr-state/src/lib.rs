//! Navigation and selection state machine.
//!
//! Two state types live here, both intentionally free of any terminal or
//! event-loop dependency so they can be constructed and exercised in
//! isolation:
//!
//! - [`NavigationState`]: cursor position, scroll offsets, frozen-column
//!   bookkeeping, and the body/footer focus split.
//! - [`Selection`]: the mark-mode sum type and the rectangle it derives.
//!
//! Both persist across a table reload (watch mode, streaming) via
//! [`NavigationState::rebind`], which re-clamps every field to the new
//! table's dimensions rather than resetting them.

pub mod command;
pub mod selection;

pub use command::NavCommand;
pub use selection::{MarkMode, Selection, SelectionRect};

use pgr_model::DataDesc;

/// Horizontal/vertical size of the scrollable body viewport, in display
/// cells. Excludes frozen rows/columns, the footer, and chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Body,
    Footer,
}

/// How far a column-aware horizontal motion is allowed to walk before giving
/// up and clamping (§4.4: "up to ~30 display columns").
const COLUMN_SCAN_LIMIT: usize = 30;

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub first_row: usize,
    pub footer_cursor_col: usize,
    /// 1-based column index, or 0 if the vertical cursor is disabled.
    pub vertical_cursor_column: usize,
    pub last_x_focus: usize,
    pub freezed_cols: u8,
    pub focus: Focus,
    pub vertical_cursor_enabled: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            cursor_row: 0,
            cursor_col: 0,
            first_row: 0,
            footer_cursor_col: 0,
            vertical_cursor_column: 0,
            last_x_focus: 0,
            freezed_cols: 0,
            focus: Focus::Body,
            vertical_cursor_enabled: false,
        }
    }
}

impl NavigationState {
    pub fn new(freezed_cols: u8) -> Self {
        Self {
            freezed_cols: freezed_cols.min(9),
            ..Self::default()
        }
    }

    fn data_row_count(desc: &DataDesc) -> usize {
        desc.last_data_row.saturating_sub(desc.first_data_row) + 1
    }

    fn max_first_row(&self, desc: &DataDesc, viewport: Viewport) -> usize {
        Self::data_row_count(desc).saturating_sub(viewport.rows)
    }

    /// Re-clamp every field after a reload grows/shrinks the table. Search
    /// term, selection, and cursor position are preserved up to clamping;
    /// nothing is reset outright.
    pub fn rebind(&mut self, desc: &DataDesc, viewport: Viewport) {
        let rows = Self::data_row_count(desc);
        if rows == 0 {
            self.cursor_row = 0;
            self.first_row = 0;
            return;
        }
        self.cursor_row = self.cursor_row.min(rows - 1);
        self.first_row = self.first_row.min(self.max_first_row(desc, viewport));
        if let Some(cols) = desc.columns.checked_sub(1) {
            self.vertical_cursor_column = self.vertical_cursor_column.min(cols + 1);
        }
    }

    /// Apply one command. Returns `true` if the motion was clamped at an
    /// edge (caller beeps unless running in quiet mode).
    pub fn apply(&mut self, cmd: NavCommand, desc: &DataDesc, viewport: Viewport) -> bool {
        let rows = Self::data_row_count(desc);
        if rows == 0 {
            return true;
        }
        let last_row_idx = rows - 1;
        match cmd {
            NavCommand::CursorUp => {
                if self.cursor_row == 0 {
                    if self.first_row > 0 {
                        self.first_row -= 1;
                        false
                    } else {
                        true
                    }
                } else {
                    self.cursor_row -= 1;
                    if self.cursor_row < self.first_row {
                        self.first_row = self.cursor_row;
                    }
                    false
                }
            }
            NavCommand::CursorDown => {
                if self.cursor_row >= last_row_idx {
                    true
                } else {
                    self.cursor_row += 1;
                    if self.cursor_row >= self.first_row + viewport.rows {
                        self.first_row += 1;
                    }
                    false
                }
            }
            NavCommand::PageUp => self.page(desc, viewport, -(viewport.rows as isize)),
            NavCommand::PageDown => self.page(desc, viewport, viewport.rows as isize),
            NavCommand::HalfPageUp => self.page(desc, viewport, -((viewport.rows / 2).max(1) as isize)),
            NavCommand::HalfPageDown => self.page(desc, viewport, (viewport.rows / 2).max(1) as isize),
            NavCommand::ScrollUp => self.scroll(desc, viewport, -1),
            NavCommand::ScrollDown => self.scroll(desc, viewport, 1),
            NavCommand::CursorFirstRow => {
                let clamped = self.cursor_row == 0 && self.first_row == 0;
                self.cursor_row = 0;
                self.first_row = 0;
                clamped
            }
            NavCommand::CursorLastRow => {
                let clamped = self.cursor_row == last_row_idx;
                self.cursor_row = last_row_idx;
                self.first_row = self.max_first_row(desc, viewport);
                clamped
            }
            NavCommand::GotoLine(n) => self.goto_line(desc, viewport, n),
            NavCommand::MoveLeft { by_column } => self.move_horizontal(desc, viewport, -1, by_column),
            NavCommand::MoveRight { by_column } => self.move_horizontal(desc, viewport, 1, by_column),
            NavCommand::ShowFirstCol => {
                self.cursor_col = 0;
                if self.vertical_cursor_enabled {
                    self.vertical_cursor_column = self.freezed_cols as usize + 1;
                }
                false
            }
            NavCommand::ShowLastCol => {
                self.show_last_col(desc, viewport);
                false
            }
        }
    }

    fn page(&mut self, desc: &DataDesc, viewport: Viewport, delta: isize) -> bool {
        let rows = Self::data_row_count(desc) as isize;
        let max_first = self.max_first_row(desc, viewport) as isize;
        let rel = self.cursor_row as isize - self.first_row as isize;
        let new_first = (self.first_row as isize + delta).clamp(0, max_first.max(0));
        let clamped = new_first == self.first_row as isize;
        self.first_row = new_first as usize;
        let new_cursor = (new_first + rel).clamp(0, rows.saturating_sub(1).max(0));
        self.cursor_row = new_cursor as usize;
        clamped
    }

    fn scroll(&mut self, desc: &DataDesc, viewport: Viewport, delta: isize) -> bool {
        let max_first = self.max_first_row(desc, viewport) as isize;
        let new_first = (self.first_row as isize + delta).clamp(0, max_first.max(0));
        let clamped = new_first == self.first_row as isize;
        self.first_row = new_first as usize;
        self.cursor_row = self
            .cursor_row
            .max(self.first_row)
            .min(self.first_row + viewport.rows.saturating_sub(1));
        clamped
    }

    /// Positive `n` is 1-based from data start; negative counts back from
    /// the last row. Always clamped into range.
    fn goto_line(&mut self, desc: &DataDesc, viewport: Viewport, n: i64) -> bool {
        let rows = Self::data_row_count(desc) as i64;
        let target = if n >= 0 {
            (n - 1).max(0)
        } else {
            (rows + n).max(0)
        };
        let clamped_target = target.min(rows - 1).max(0) as usize;
        self.cursor_row = clamped_target;
        let max_first = self.max_first_row(desc, viewport);
        self.first_row = clamped_target
            .saturating_sub(viewport.rows.saturating_sub(1))
            .min(max_first)
            .max(0);
        if self.cursor_row < self.first_row {
            self.first_row = self.cursor_row;
        }
        false
    }

    /// Display-column width of the frozen-column band (0 if no columns are
    /// frozen). Callers composing a frame need this to split the LUC/FixCols
    /// regions from the scrolling body.
    pub fn frozen_width(&self, desc: &DataDesc) -> usize {
        let f = self.freezed_cols as usize;
        if f == 0 || f >= desc.cranges.len() {
            return 0;
        }
        desc.cranges[f].xmin
    }

    /// Column-aware horizontal motion: walks toward the next `I` classifier
    /// boundary (bounded by `COLUMN_SCAN_LIMIT`) when `by_column`, otherwise
    /// moves one display column. When the vertical cursor is enabled, also
    /// steps `vertical_cursor_column` and scrolls so the destination column
    /// is fully visible.
    fn move_horizontal(
        &mut self,
        desc: &DataDesc,
        viewport: Viewport,
        dir: isize,
        by_column: bool,
    ) -> bool {
        if by_column && desc.headline_transl.is_some() {
            return self.move_to_adjacent_column(desc, viewport, dir);
        }
        let max_col = desc.maxx.saturating_sub(viewport.cols);
        let new_col = (self.cursor_col as isize + dir).clamp(0, max_col as isize);
        let clamped = new_col == self.cursor_col as isize;
        self.cursor_col = new_col as usize;
        clamped
    }

    fn move_to_adjacent_column(&mut self, desc: &DataDesc, viewport: Viewport, dir: isize) -> bool {
        let transl = desc.headline_transl.as_ref().unwrap();
        let bytes = transl.as_bytes();
        let frozen_width = self.frozen_width(desc);
        let current_abs = frozen_width + self.cursor_col;
        let mut x = current_abs as isize;
        let mut steps = 0;
        loop {
            x += dir;
            steps += 1;
            if x < 0 || x as usize >= bytes.len() || steps > COLUMN_SCAN_LIMIT {
                return true;
            }
            if bytes[x as usize] == b'I' {
                break;
            }
        }
        let target_col = if self.vertical_cursor_enabled {
            let next_idx = if dir > 0 {
                self.vertical_cursor_column.saturating_add(1)
            } else {
                self.vertical_cursor_column.saturating_sub(1).max(1)
            };
            next_idx.clamp(self.freezed_cols as usize + 1, desc.columns.max(1))
        } else {
            self.vertical_cursor_column
        };
        if self.vertical_cursor_enabled && target_col >= 1 && target_col <= desc.cranges.len() {
            self.vertical_cursor_column = target_col;
            self.last_x_focus = target_col;
            self.reveal_column(desc, viewport, target_col - 1);
        }
        false
    }

    /// Scroll the body horizontally so data column `idx` (0-based) is fully
    /// visible: prefer revealing its left edge, falling back to its right
    /// edge when the column itself is wider than the scrollable viewport.
    fn reveal_column(&mut self, desc: &DataDesc, viewport: Viewport, idx: usize) {
        let Some(crange) = desc.cranges.get(idx) else {
            return;
        };
        let frozen_width = self.frozen_width(desc);
        let scrollable_width = viewport.cols.saturating_sub(frozen_width.min(viewport.cols));
        let rel_xmin = crange.xmin.saturating_sub(frozen_width);
        let rel_xmax = crange.xmax.saturating_sub(frozen_width);
        let col_width = rel_xmax + 1 - rel_xmin;
        if col_width > scrollable_width {
            self.cursor_col = (rel_xmax + 1).saturating_sub(scrollable_width);
        } else if rel_xmin < self.cursor_col || rel_xmax >= self.cursor_col + scrollable_width {
            self.cursor_col = rel_xmin;
        }
    }

    fn show_last_col(&mut self, desc: &DataDesc, viewport: Viewport) {
        if desc.cranges.is_empty() {
            return;
        }
        let last = desc.cranges.len() - 1;
        self.vertical_cursor_column = if self.vertical_cursor_enabled { desc.columns } else { 0 };
        self.reveal_column(desc, viewport, last);
    }

    /// Transition focus to the footer viewport (independent horizontal
    /// offset, no vertical cursor) when the cursor is dragged below the
    /// last data row and a footer is visible. Re-entering the body restores
    /// its prior offset automatically since `cursor_col` is untouched.
    pub fn focus_footer(&mut self) {
        self.focus = Focus::Footer;
    }

    pub fn focus_body(&mut self) {
        self.focus = Focus::Body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgr_model::{BorderType, CRange, DataDesc, LineStyle};

    fn desc_5_cols(col_width: usize) -> DataDesc {
        let mut cranges = Vec::new();
        let mut x = 0usize;
        for _ in 0..5 {
            cranges.push(CRange {
                xmin: x,
                xmax: x + col_width - 1,
                name_byte_offset: 0,
                name_byte_size: 0,
                name_width: 0,
            });
            x += col_width + 1;
        }
        let maxx = x - 1;
        let mut transl = String::new();
        for (i, c) in cranges.iter().enumerate() {
            for _ in c.xmin..=c.xmax {
                transl.push('d');
            }
            if i + 1 < cranges.len() {
                transl.push('I');
            }
        }
        DataDesc {
            title_rows: 0,
            border_top_row: None,
            border_head_row: Some(0),
            border_bottom_row: None,
            first_data_row: 1,
            last_data_row: 20,
            last_row: 20,
            footer_row: None,
            border_type: BorderType::None,
            linestyle: LineStyle::Ascii,
            is_expanded_mode: false,
            maxx,
            maxbytes: maxx,
            headline_transl: Some(transl),
            columns: 5,
            cranges,
            namesline: None,
            order_map: None,
            has_multilines: false,
        }
    }

    #[test]
    fn cursor_down_clamps_at_last_row() {
        let desc = desc_5_cols(4);
        let mut nav = NavigationState::new(0);
        let vp = Viewport { rows: 5, cols: 20 };
        for _ in 0..100 {
            nav.apply(NavCommand::CursorDown, &desc, vp);
        }
        assert_eq!(nav.cursor_row, 19);
    }

    #[test]
    fn freeze_cols_show_first_col_lands_on_first_unfrozen() {
        let desc = desc_5_cols(4);
        let mut nav = NavigationState::new(1);
        nav.vertical_cursor_enabled = true;
        let vp = Viewport { rows: 5, cols: 10 };
        nav.apply(NavCommand::ShowFirstCol, &desc, vp);
        assert_eq!(nav.cursor_col, 0);
        assert_eq!(nav.vertical_cursor_column, 2);
    }

    #[test]
    fn move_right_by_column_steps_vertical_cursor_and_reveals_column() {
        let desc = desc_5_cols(4);
        let mut nav = NavigationState::new(1);
        nav.vertical_cursor_enabled = true;
        nav.vertical_cursor_column = 2;
        let vp = Viewport { rows: 5, cols: 10 };
        for _ in 0..3 {
            nav.apply(NavCommand::MoveRight { by_column: true }, &desc, vp);
        }
        assert_eq!(nav.vertical_cursor_column, 5);
        let crange = &desc.cranges[4];
        let frozen = nav.frozen_width(&desc);
        assert!(crange.xmax - frozen < nav.cursor_col + vp.cols);
    }

    #[test]
    fn goto_line_negative_counts_from_end() {
        let desc = desc_5_cols(4);
        let mut nav = NavigationState::new(0);
        let vp = Viewport { rows: 5, cols: 20 };
        nav.apply(NavCommand::GotoLine(-1), &desc, vp);
        assert_eq!(nav.cursor_row, 19);
    }

    #[test]
    fn rebind_clamps_cursor_into_shrunk_table() {
        let desc = desc_5_cols(4);
        let mut nav = NavigationState::new(0);
        nav.cursor_row = 19;
        let mut shrunk = desc.clone();
        shrunk.last_data_row = 3;
        let vp = Viewport { rows: 5, cols: 20 };
        nav.rebind(&shrunk, vp);
        assert!(nav.cursor_row <= 3);
    }
}
