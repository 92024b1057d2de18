//! Viewport geometry: tiling the terminal into the six logical regions
//! (§4.6) plus the row-number gutter and scrollbar track.
//!
//! Viewports share drawing logic and vary only in coordinate origin, size,
//! and which classifier/attribute data they expose — a polymorphic
//! interface over `{classifier_at, attr_for, origin, size}` rather than any
//! dynamic dispatch, per the flat-capability design used throughout this
//! crate.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportKind {
    Luc,
    FixRows,
    FixCols,
    Rows,
    Footer,
    RowNum,
    RowNumLuc,
    VScrollbar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn area(&self) -> u32 {
        self.w as u32 * self.h as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutRegions {
    pub luc: Rect,
    pub fix_rows: Rect,
    pub fix_cols: Rect,
    pub rows: Rect,
    pub footer: Option<Rect>,
    pub rownum: Option<Rect>,
    pub rownum_luc: Option<Rect>,
    pub vscrollbar: Option<Rect>,
    pub body_rows: u16,
}

pub struct LayoutParams {
    pub term_w: u16,
    pub term_h: u16,
    pub status_rows: u16,
    pub frozen_rows: u16,
    pub frozen_cols_width: u16,
    pub footer_rows: u16,
    pub rownum_width: u16,
    pub scrollbar: bool,
}

/// Tile the terminal into every region this pager paints. `status_rows`
/// (bottom bar) is reserved but not itself part of the returned regions.
pub fn compute(p: &LayoutParams) -> LayoutRegions {
    let usable_rows = p.term_h.saturating_sub(p.status_rows);
    let body_rows = usable_rows
        .saturating_sub(p.frozen_rows)
        .saturating_sub(p.footer_rows);
    let scrollbar_w = if p.scrollbar { 1 } else { 0 };
    let main_x = p.rownum_width;
    let main_w = p.term_w.saturating_sub(p.rownum_width).saturating_sub(scrollbar_w);

    let luc = Rect { x: main_x, y: 0, w: p.frozen_cols_width.min(main_w), h: p.frozen_rows };
    let fix_rows = Rect {
        x: main_x + luc.w,
        y: 0,
        w: main_w.saturating_sub(luc.w),
        h: p.frozen_rows,
    };
    let fix_cols = Rect { x: main_x, y: p.frozen_rows, w: luc.w, h: body_rows };
    let rows = Rect {
        x: main_x + luc.w,
        y: p.frozen_rows,
        w: main_w.saturating_sub(luc.w),
        h: body_rows,
    };
    let footer = (p.footer_rows > 0).then_some(Rect {
        x: main_x,
        y: p.frozen_rows + body_rows,
        w: main_w,
        h: p.footer_rows,
    });
    let (rownum, rownum_luc) = if p.rownum_width > 0 {
        (
            Some(Rect { x: 0, y: p.frozen_rows, w: p.rownum_width, h: body_rows }),
            Some(Rect { x: 0, y: 0, w: p.rownum_width, h: p.frozen_rows }),
        )
    } else {
        (None, None)
    };
    let vscrollbar = p.scrollbar.then_some(Rect {
        x: main_x + main_w,
        y: p.frozen_rows,
        w: 1,
        h: body_rows,
    });

    LayoutRegions { luc, fix_rows, fix_cols, rows, footer, rownum, rownum_luc, vscrollbar, body_rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_tile_the_terminal_without_gaps() {
        let p = LayoutParams {
            term_w: 80,
            term_h: 24,
            status_rows: 1,
            frozen_rows: 1,
            frozen_cols_width: 5,
            footer_rows: 1,
            rownum_width: 4,
            scrollbar: true,
        };
        let r = compute(&p);
        assert_eq!(r.luc.w + r.fix_rows.w + r.rownum.unwrap().w + r.vscrollbar.unwrap().w, 80);
        assert_eq!(r.luc.h, r.fix_rows.h);
        assert_eq!(r.fix_cols.h, r.rows.h);
        assert_eq!(r.fix_cols.h, r.body_rows);
        let footer = r.footer.unwrap();
        assert_eq!(footer.y, r.rows.y + r.rows.h);
        assert_eq!(r.luc.h + r.body_rows + footer.h, p.term_h - p.status_rows);
    }

    #[test]
    fn no_footer_when_footer_rows_zero() {
        let p = LayoutParams {
            term_w: 40,
            term_h: 10,
            status_rows: 1,
            frozen_rows: 1,
            frozen_cols_width: 0,
            footer_rows: 0,
            rownum_width: 0,
            scrollbar: false,
        };
        let r = compute(&p);
        assert!(r.footer.is_none());
        assert!(r.rownum.is_none());
    }
}
