//! Frame assembly: joins table structure, navigation state, selection, and
//! search-match data into the single [`Frame`] + status line the terminal
//! backend paints each tick.
//!
//! The six logical viewports (`viewport::compute`) share one walking loop
//! (`paint_region`): for every cell it classifies the column
//! (`DataDesc::classifier_at`), reads the source grapheme, optionally
//! upgrades it to a Unicode border glyph (`ascii_upgrade`), and resolves its
//! attribute (`attr::resolve`) -- the one and only place priority is decided.
//! Frozen viewports and the scrolling body differ only in which absolute
//! table row/column range they expose.

use crate::ascii_upgrade::{self, BorderRow};
use crate::attr::{self, AttrRole, CellContext};
use crate::frame::{CellFlags, Frame};
use crate::status::{self, StatusContext};
use crate::viewport::{self, LayoutParams, LayoutRegions, Rect};
use pgr_model::DataDesc;
use pgr_search::SearchEngine;
use pgr_state::{NavigationState, Selection};
use pgr_text::{LineStore, width};

/// Render-affecting toggles that live outside the navigation/selection
/// state machines. Field names mirror `pgr_config::EffectiveOptions` so a
/// caller can build one straight from the other.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_cursor: bool,
    pub show_scrollbar: bool,
    pub highlight_search: bool,
    pub highlight_lines: bool,
    pub highlight_odd_rec: bool,
    pub hide_header_line: bool,
    pub force_uniborder: bool,
    pub rownum: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_cursor: true,
            show_scrollbar: true,
            highlight_search: true,
            highlight_lines: true,
            highlight_odd_rec: false,
            hide_header_line: false,
            force_uniborder: false,
            rownum: false,
        }
    }
}

/// Everything [`compose`] needs read-only access to on a repaint.
pub struct RenderInputs<'a> {
    pub store: &'a LineStore,
    pub desc: &'a DataDesc,
    pub nav: &'a NavigationState,
    pub selection: &'a Selection,
    pub search: &'a SearchEngine,
    pub options: &'a RenderOptions,
    pub watch_seconds_left: Option<u64>,
    pub error: Option<String>,
}

/// Fully composed output of one repaint: the chrome+body frame, its region
/// layout (so the terminal backend knows where each viewport landed), and
/// the separately-painted status line.
pub struct Composed {
    pub frame: Frame,
    pub regions: LayoutRegions,
    pub status_line: String,
}

fn border_row_of(desc: &DataDesc, abs_row: usize) -> BorderRow {
    if Some(abs_row) == desc.border_top_row {
        BorderRow::Top
    } else if Some(abs_row) == desc.border_head_row {
        BorderRow::Head
    } else if Some(abs_row) == desc.border_bottom_row {
        BorderRow::Bottom
    } else {
        BorderRow::Data
    }
}

/// Byte-range-free display-column ranges covering every cached match on
/// `logical_row`, widened to the pattern's own display width.
fn pattern_ranges(search: &SearchEngine, store: &LineStore, logical_row: usize) -> Vec<(usize, usize)> {
    if search.pattern().is_empty() {
        return Vec::new();
    }
    let pat_width = width::clusters(search.pattern()).map(|(_, _, w)| w).sum::<usize>().max(1);
    search
        .matches_for(store, logical_row)
        .into_iter()
        .map(|(_, col)| (col, col + pat_width))
        .collect()
}

fn in_ranges(ranges: &[(usize, usize)], col: usize) -> bool {
    ranges.iter().any(|&(lo, hi)| col >= lo && col < hi)
}

struct RowSource<'a> {
    text: &'a str,
    bookmarked: bool,
    odd_record: bool,
    pattern_ranges: Vec<(usize, usize)>,
}

fn row_source<'a>(
    store: &'a LineStore,
    search: &SearchEngine,
    options: &RenderOptions,
    position: usize,
) -> RowSource<'a> {
    match store.display_at(position) {
        Some((logical, text, info)) => RowSource {
            text,
            bookmarked: info.is_bookmark(),
            odd_record: options.highlight_odd_rec && info.record_offset % 2 == 1,
            pattern_ranges: if options.highlight_search {
                pattern_ranges(search, store, logical)
            } else {
                Vec::new()
            },
        },
        None => RowSource { text: "", bookmarked: false, odd_record: false, pattern_ranges: Vec::new() },
    }
}

/// Paint one rectangular region. `table_row_of` maps a row offset within the
/// rect (0-based) to the absolute display-position row it shows; `is_data`
/// gates whether selection/row-cursor/vertical-cursor highlighting applies
/// at all (header bands and the footer never carry them).
#[allow(clippy::too_many_arguments)]
fn paint_region(
    frame: &mut Frame,
    rect: Rect,
    col_start: usize,
    desc: &DataDesc,
    store: &LineStore,
    nav: &NavigationState,
    selection: &Selection,
    search: &SearchEngine,
    options: &RenderOptions,
    is_data: bool,
    table_row_of: impl Fn(u16) -> usize,
) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }
    let sel_rect = if is_data {
        let cursor_col_abs = match desc.cranges.get(nav.vertical_cursor_column.saturating_sub(1)) {
            Some(c) if nav.vertical_cursor_column > 0 => c.xmin,
            _ => nav.frozen_width(desc) + nav.cursor_col,
        };
        Some(selection.rect(nav.cursor_row, cursor_col_abs, desc))
    } else {
        None
    };
    for y in 0..rect.h {
        let abs_row = table_row_of(y);
        let src = row_source(store, search, options, abs_row);
        let row_rel = abs_row.wrapping_sub(desc.first_data_row);
        let under_row_cursor = is_data && options.show_cursor && abs_row == desc.first_data_row + nav.cursor_row;
        let border_row = border_row_of(desc, abs_row);
        let mut x = 0u16;
        while x < rect.w {
            let abs_col = col_start + x as usize;
            let classifier = desc.classifier_at(abs_col);
            let under_vertical_cursor = is_data
                && nav.vertical_cursor_column != 0
                && desc.column_at(abs_col) == Some(nav.vertical_cursor_column - 1);
            let in_selection = sel_rect.map(|r| r.contains(row_rel, abs_col)).unwrap_or(false);
            let pattern_match = in_ranges(&src.pattern_ranges, abs_col);
            let ctx = CellContext {
                classifier,
                in_selection,
                under_row_cursor,
                under_vertical_cursor,
                bookmarked: src.bookmarked,
                pattern_match,
            };
            let role = attr::resolve(ctx);
            let (cluster, cell_width) = match width::cluster_at_col(src.text, abs_col) {
                Some((c, start, w)) if start == abs_col => (c.to_string(), w),
                Some(_) => (String::new(), 0),
                None => (" ".to_string(), 1),
            };
            if cell_width == 0 {
                x += 1;
                continue;
            }
            let upgraded = if options.force_uniborder && desc.linestyle == pgr_model::LineStyle::Ascii {
                cluster
                    .chars()
                    .next()
                    .filter(|_| cluster.chars().count() == 1)
                    .and_then(|c| ascii_upgrade::upgrade(classifier, border_row, c))
                    .map(|c| c.to_string())
            } else {
                None
            };
            let mut flags = CellFlags::empty();
            if under_row_cursor {
                flags |= CellFlags::CURSOR;
            }
            if src.odd_record {
                flags |= CellFlags::ODD_RECORD;
            }
            frame.set_cluster(
                rect.x + x,
                rect.y + y,
                upgraded.as_deref().unwrap_or(&cluster),
                cell_width as u16,
                flags,
                role,
            );
            x += cell_width as u16;
        }
    }
}

fn paint_rownum(frame: &mut Frame, rect: Rect, desc: &DataDesc, first_row: usize) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }
    for y in 0..rect.h {
        let row_rel = first_row + y as usize;
        if desc.first_data_row + row_rel > desc.last_data_row {
            continue;
        }
        let label = format!("{:>width$} ", row_rel + 1, width = rect.w.saturating_sub(1) as usize);
        let mut x = 0u16;
        for (_, cluster, w) in width::clusters(&label) {
            if x >= rect.w {
                break;
            }
            frame.set_cluster(rect.x + x, rect.y + y, cluster, w as u16, CellFlags::empty(), AttrRole::Line);
            x += w as u16;
        }
    }
}

/// Assemble one full repaint: geometry, every viewport's cells, and the
/// status line. `term_w`/`term_h` are the full terminal size; `status_rows`
/// is reserved at the bottom and excluded from the returned frame.
pub fn compose(term_w: u16, term_h: u16, status_rows: u16, inputs: &RenderInputs) -> Composed {
    let desc = inputs.desc;
    let nav = inputs.nav;
    let store = inputs.store;
    let options = inputs.options;

    let frozen_rows = if desc.headline_transl.is_some() && !options.hide_header_line {
        (desc.first_data_row as u16).min(term_h)
    } else {
        0
    };
    let frozen_cols_width = nav.frozen_width(desc) as u16;
    let footer_rows = if desc.footer_row.is_some() { 1 } else { 0 };
    let total_rows = desc.last_data_row.saturating_sub(desc.first_data_row) + 1;
    let rownum_width = if options.rownum {
        total_rows.max(1).to_string().len() as u16 + 1
    } else {
        0
    };

    let params = LayoutParams {
        term_w,
        term_h,
        status_rows,
        frozen_rows,
        frozen_cols_width,
        footer_rows,
        rownum_width,
        scrollbar: options.show_scrollbar,
    };
    let regions = viewport::compute(&params);
    let mut frame = Frame::new(term_w, term_h.saturating_sub(status_rows));

    paint_region(
        &mut frame, regions.luc, 0, desc, store, nav, inputs.selection, inputs.search, options, false,
        |y| y as usize,
    );
    paint_region(
        &mut frame, regions.fix_rows, frozen_cols_width as usize + nav.cursor_col, desc, store, nav,
        inputs.selection, inputs.search, options, false, |y| y as usize,
    );
    paint_region(
        &mut frame, regions.fix_cols, 0, desc, store, nav, inputs.selection, inputs.search, options, true,
        |y| desc.first_data_row + nav.first_row + y as usize,
    );
    paint_region(
        &mut frame, regions.rows, frozen_cols_width as usize + nav.cursor_col, desc, store, nav,
        inputs.selection, inputs.search, options, true,
        |y| desc.first_data_row + nav.first_row + y as usize,
    );
    if let (Some(rect), Some(footer_row)) = (regions.footer, desc.footer_row) {
        paint_region(
            &mut frame, rect, nav.footer_cursor_col, desc, store, nav, inputs.selection, inputs.search, options,
            false, move |_| footer_row,
        );
    }
    if let Some(rect) = regions.rownum {
        paint_rownum(&mut frame, rect, desc, nav.first_row);
    }
    if let Some(rect) = regions.rownum_luc {
        // Header band never carries row numbers; keep the gutter blank.
        let _ = rect;
    }
    if let Some(rect) = regions.vscrollbar {
        let max_first = total_rows.saturating_sub(regions.body_rows as usize);
        let (y, size) = crate::scrollbar::slider_geometry(rect.h, total_rows, nav.first_row, max_first);
        for dy in y..y + size {
            frame.set_cluster(rect.x, rect.y + dy, "\u{2588}", 1, CellFlags::empty(), AttrRole::Line);
        }
    }

    let visible_cols = regions.rows.w as usize;
    let status_ctx = StatusContext {
        vertical_cursor_column: nav.vertical_cursor_column,
        total_columns: desc.columns,
        visible_col_range: (
            nav.cursor_col,
            nav.cursor_col + visible_cols.min(desc.maxx.saturating_sub(nav.cursor_col).max(1)),
        ),
        freezed_cols: nav.freezed_cols,
        first_row: nav.first_row,
        cursor_row_rel: nav.cursor_row.saturating_sub(nav.first_row),
        total_rows,
        watch_seconds_left: inputs.watch_seconds_left,
        error: inputs.error.clone(),
    };
    let status_line = status::build_status_line(&status_ctx);

    Composed { frame, regions, status_line }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgr_model::{BorderType, CRange, LineStyle};

    fn desc_3_cols() -> DataDesc {
        let cranges = vec![
            CRange { xmin: 0, xmax: 3, name_byte_offset: 0, name_byte_size: 0, name_width: 0 },
            CRange { xmin: 5, xmax: 8, name_byte_offset: 0, name_byte_size: 0, name_width: 0 },
            CRange { xmin: 10, xmax: 13, name_byte_offset: 0, name_byte_size: 0, name_width: 0 },
        ];
        DataDesc {
            title_rows: 0,
            border_top_row: None,
            border_head_row: Some(0),
            border_bottom_row: None,
            first_data_row: 1,
            last_data_row: 3,
            last_row: 3,
            footer_row: None,
            border_type: BorderType::None,
            linestyle: LineStyle::Ascii,
            is_expanded_mode: false,
            maxx: 14,
            maxbytes: 14,
            headline_transl: Some("dddd dddd dddd".replace(' ', "I")),
            columns: 3,
            cranges,
            namesline: None,
            order_map: None,
            has_multilines: false,
        }
    }

    fn store() -> LineStore {
        let mut s = LineStore::new();
        s.append("name col2 col3");
        s.append("aaaa bbbb cccc");
        s.append("dddd eeee ffff");
        s.append("gggg hhhh iiii");
        s
    }

    #[test]
    fn compose_places_cursor_row_with_cursor_data_attr() {
        let desc = desc_3_cols();
        let store = store();
        let nav = NavigationState::new(0);
        let selection = Selection::default();
        let search = SearchEngine::new();
        let options = RenderOptions::default();
        let inputs = RenderInputs {
            store: &store,
            desc: &desc,
            nav: &nav,
            selection: &selection,
            search: &search,
            options: &options,
            watch_seconds_left: None,
            error: None,
        };
        let composed = compose(20, 6, 1, &inputs);
        let cell = composed.frame.cell_at(composed.regions.rows.x, composed.regions.rows.y).unwrap();
        assert_eq!(cell.attr, AttrRole::CursorData);
        assert_eq!(cell.cluster, "a");
    }

    #[test]
    fn compose_highlights_search_match() {
        let desc = desc_3_cols();
        let mut store = store();
        let mut search = SearchEngine::new();
        search.set_pattern("bbbb", pgr_search::CasePolicy::CaseSensitive, &mut store);
        let mut nav = NavigationState::new(0);
        nav.cursor_row = 1; // off the matched row, so CursorPattern doesn't mask FoundStr

        let selection = Selection::default();
        let options = RenderOptions::default();
        let inputs = RenderInputs {
            store: &store,
            desc: &desc,
            nav: &nav,
            selection: &selection,
            search: &search,
            options: &options,
            watch_seconds_left: None,
            error: None,
        };
        let composed = compose(20, 6, 1, &inputs);
        let cell = composed.frame.cell_at(composed.regions.rows.x + 5, composed.regions.rows.y).unwrap();
        assert_eq!(cell.attr, AttrRole::FoundStr);
    }

    #[test]
    fn compose_frozen_columns_show_same_leading_cell_in_luc_and_fix_cols() {
        let desc = desc_3_cols();
        let store = store();
        let mut nav = NavigationState::new(1);
        nav.cursor_col = 3;
        let selection = Selection::default();
        let search = SearchEngine::new();
        let options = RenderOptions::default();
        let inputs = RenderInputs {
            store: &store,
            desc: &desc,
            nav: &nav,
            selection: &selection,
            search: &search,
            options: &options,
            watch_seconds_left: None,
            error: None,
        };
        let composed = compose(20, 6, 1, &inputs);
        let luc_cell = composed.frame.cell_at(composed.regions.luc.x, composed.regions.luc.y).unwrap();
        assert_eq!(luc_cell.cluster, "n");
        let fix_cols_cell = composed.frame.cell_at(composed.regions.fix_cols.x, composed.regions.fix_cols.y).unwrap();
        assert_eq!(fix_cols_cell.cluster, "a");
    }
}
