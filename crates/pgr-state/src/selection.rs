//! Mark mode and the rectangular selection it derives.
//!
//! `MarkMode` is a closed sum type (no source `switch`-on-int survives the
//! translation) covering every way a user can start marking cells: a
//! keyboard toggle, shift+cursor, or a mouse drag over the body or header
//! band. At most one rectangle exists at a time; entering a new mode always
//! replaces whatever was there.

use pgr_model::DataDesc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkMode {
    None,
    /// Whole rows selected, all columns.
    Rows,
    /// A column block anchored at a specific vertical-cursor column.
    Block(usize),
    /// Shift+cursor: follows the cursor until a non-motion key arrives.
    Cursor,
    Mouse,
    MouseBlock,
    MouseColumns,
}

impl MarkMode {
    pub fn is_mouse(self) -> bool {
        matches!(self, MarkMode::Mouse | MarkMode::MouseBlock | MarkMode::MouseColumns)
    }

    pub fn is_column_scoped(self) -> bool {
        matches!(self, MarkMode::Block(_) | MarkMode::MouseBlock | MarkMode::MouseColumns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mode: MarkMode,
    pub anchor_row: usize,
    /// Display-column anchor, meaningful only for column-scoped modes.
    pub anchor_col: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self { mode: MarkMode::None, anchor_row: 0, anchor_col: 0 }
    }
}

/// Derived rectangle, in data-row-relative rows and display columns. `None`
/// on either axis is the "all" sentinel (whole-row or whole-column span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub first_row: usize,
    pub rows: usize,
    pub first_column: Option<usize>,
    pub columns: Option<usize>,
}

impl SelectionRect {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let row_ok = row >= self.first_row && row < self.first_row + self.rows;
        let col_ok = match (self.first_column, self.columns) {
            (Some(fc), Some(cols)) => col >= fc && col < fc + cols,
            _ => true,
        };
        row_ok && col_ok
    }

    pub fn area(&self, total_columns: usize) -> usize {
        self.rows * self.columns.unwrap_or(total_columns)
    }
}

impl Selection {
    pub fn mark_rows(&mut self, cursor_row: usize) {
        self.mode = MarkMode::Rows;
        self.anchor_row = cursor_row;
    }

    /// `anchor_col_abs` is the absolute display column of the anchor cell
    /// (the caller resolves `vertical_cursor_column` to a display column via
    /// `cranges` before calling this).
    pub fn mark_block(&mut self, cursor_row: usize, anchor_col_abs: usize) {
        self.mode = MarkMode::Block(anchor_col_abs);
        self.anchor_row = cursor_row;
        self.anchor_col = anchor_col_abs;
    }

    pub fn mark_cursor(&mut self, cursor_row: usize, cursor_col: usize) {
        self.mode = MarkMode::Cursor;
        self.anchor_row = cursor_row;
        self.anchor_col = cursor_col;
    }

    pub fn mark_mouse(&mut self, row: usize, col: usize, block: bool) {
        self.mode = if block { MarkMode::MouseBlock } else { MarkMode::Mouse };
        self.anchor_row = row;
        self.anchor_col = col;
    }

    pub fn mark_mouse_columns(&mut self, col: usize) {
        self.mode = MarkMode::MouseColumns;
        self.anchor_col = col;
    }

    /// A non-motion key in a mouse mode cancels it (§4.5).
    pub fn cancel_if_mouse(&mut self) {
        if self.mode.is_mouse() {
            self.mode = MarkMode::None;
        }
    }

    /// Any navigation key collapses `Cursor` mode back to `None` once the
    /// caller decides the shift-chord ended (the event-translation layer,
    /// out of scope here, is what actually knows "shift released").
    pub fn collapse_cursor(&mut self) {
        if self.mode == MarkMode::Cursor {
            self.mode = MarkMode::None;
        }
    }

    pub fn unmark(&mut self) {
        self.mode = MarkMode::None;
    }

    pub fn select_all(&mut self, total_rows: usize) -> SelectionRect {
        self.mode = MarkMode::Rows;
        self.anchor_row = 0;
        SelectionRect { first_row: 0, rows: total_rows, first_column: None, columns: None }
    }

    /// Derive the rectangle for the current mode given the live cursor
    /// position. A fix-up on the column axis avoids a one-display-column
    /// gap at the seam between the frozen-columns viewport and the
    /// scrolling body (§4.6): column ranges are always expressed in
    /// absolute display columns, computed from `cranges`, never from the
    /// scrolling body's local coordinate space.
    pub fn rect(&self, cursor_row: usize, cursor_col_abs: usize, desc: &DataDesc) -> SelectionRect {
        match self.mode {
            MarkMode::None => SelectionRect { first_row: cursor_row, rows: 0, first_column: None, columns: None },
            MarkMode::Rows | MarkMode::Mouse | MarkMode::Cursor => {
                let (lo, hi) = order(self.anchor_row, cursor_row);
                SelectionRect { first_row: lo, rows: hi - lo + 1, first_column: None, columns: None }
            }
            MarkMode::Block(_) | MarkMode::MouseBlock => {
                let (row_lo, row_hi) = order(self.anchor_row, cursor_row);
                let (col_lo, col_hi) = order(self.anchor_col, cursor_col_abs);
                let (first_column, columns) = column_span(desc, col_lo, col_hi);
                SelectionRect {
                    first_row: row_lo,
                    rows: row_hi - row_lo + 1,
                    first_column: Some(first_column),
                    columns: Some(columns),
                }
            }
            MarkMode::MouseColumns => {
                let (col_lo, col_hi) = order(self.anchor_col, cursor_col_abs);
                let (first_column, columns) = column_span(desc, col_lo, col_hi);
                SelectionRect { first_row: 0, rows: usize::MAX, first_column: Some(first_column), columns: Some(columns) }
            }
        }
    }
}

fn order(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Snap a raw display-column range onto whole-column boundaries using the
/// detected `cranges`, so a selection that starts or ends mid-column still
/// covers that entire column (the fix-up mentioned in §4.5/§4.6).
fn column_span(desc: &DataDesc, col_lo: usize, col_hi: usize) -> (usize, usize) {
    if desc.cranges.is_empty() {
        return (col_lo, col_hi - col_lo + 1);
    }
    let idx_lo = desc
        .cranges
        .iter()
        .position(|c| col_lo <= c.xmax)
        .unwrap_or(0);
    let idx_hi = desc
        .cranges
        .iter()
        .rposition(|c| col_hi >= c.xmin)
        .unwrap_or(desc.cranges.len() - 1);
    let first = desc.cranges[idx_lo].xmin;
    let last = desc.cranges[idx_hi.max(idx_lo)].xmax;
    (first, last - first + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgr_model::{BorderType, CRange, LineStyle};

    fn desc() -> DataDesc {
        DataDesc {
            title_rows: 0,
            border_top_row: None,
            border_head_row: Some(0),
            border_bottom_row: None,
            first_data_row: 1,
            last_data_row: 10,
            last_row: 10,
            footer_row: None,
            border_type: BorderType::None,
            linestyle: LineStyle::Ascii,
            is_expanded_mode: false,
            maxx: 20,
            maxbytes: 20,
            headline_transl: None,
            columns: 2,
            cranges: vec![
                CRange { xmin: 0, xmax: 4, name_byte_offset: 0, name_byte_size: 0, name_width: 0 },
                CRange { xmin: 6, xmax: 10, name_byte_offset: 0, name_byte_size: 0, name_width: 0 },
            ],
            namesline: None,
            order_map: None,
            has_multilines: false,
        }
    }

    #[test]
    fn rows_mode_spans_anchor_to_cursor() {
        let mut sel = Selection::default();
        sel.mark_rows(2);
        let rect = sel.rect(5, 0, &desc());
        assert_eq!(rect.first_row, 2);
        assert_eq!(rect.rows, 4);
        assert_eq!(rect.first_column, None);
    }

    #[test]
    fn block_mode_snaps_to_whole_columns() {
        let mut sel = Selection::default();
        sel.mark_block(0, 0);
        // cursor lands mid-way into the second column (col 8); should still
        // snap to cover that whole column, not a partial span.
        let rect = sel.rect(0, 8, &desc());
        assert_eq!(rect.first_column, Some(0));
        assert_eq!(rect.columns, Some(11));
    }

    #[test]
    fn select_all_spans_every_row_and_column() {
        let mut sel = Selection::default();
        let rect = sel.select_all(10);
        assert_eq!(rect.rows, 10);
        assert_eq!(rect.columns, None);
    }

    #[test]
    fn mouse_mode_cancelled_by_non_motion_key() {
        let mut sel = Selection::default();
        sel.mark_mouse(0, 0, false);
        sel.cancel_if_mouse();
        assert_eq!(sel.mode, MarkMode::None);
    }
}
