//! Which rows/columns an export covers, and how that maps onto the
//! underlying `LineStore`/`DataDesc`.

use pgr_model::DataDesc;
use pgr_text::LineStore;

/// A rectangular row/column restriction expressed in the same terms as a
/// mark-mode block selection: rows relative to `first_data_row`, columns as
/// absolute display columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowColScope {
    pub first_row_rel: usize,
    pub rows: usize,
    pub first_col_abs: Option<usize>,
    pub col_width: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    AllLines,
    TopN(usize),
    BottomN(usize),
    MarkedLines,
    SearchedLines,
    Selected(RowColScope),
    /// Row relative to `first_data_row`.
    CurrentLine(usize),
    /// Row relative to `first_data_row`; formatted as one `name,value` line
    /// per column regardless of the requested [`crate::Format`].
    ExtendedCurrentLine(usize),
    Column(usize),
}

/// Resolve a scope to the ordered list of underlying logical line indices it
/// covers, walking in display order (honoring any installed order map).
pub fn resolve_lines(store: &LineStore, desc: &DataDesc, scope: &Scope) -> Vec<usize> {
    let first = desc.first_data_row;
    let last = desc.last_data_row;
    if first > last {
        return Vec::new();
    }
    let all: Vec<usize> = data_row_positions(store, desc);

    match scope {
        Scope::AllLines | Scope::Column(_) => all,
        Scope::TopN(n) => all.into_iter().take(*n).collect(),
        Scope::BottomN(n) => {
            let len = all.len();
            all.into_iter().skip(len.saturating_sub(*n)).collect()
        }
        Scope::MarkedLines => all.into_iter().filter(|&i| store.info(i).is_bookmark()).collect(),
        Scope::SearchedLines => all.into_iter().filter(|&i| store.info(i).has_match()).collect(),
        Scope::CurrentLine(rel) | Scope::ExtendedCurrentLine(rel) => {
            // Pull in the rest of the record: a cursor landing on a
            // continuation line must still export the whole wrapped row.
            let mut idx = *rel;
            let mut run = Vec::new();
            loop {
                let Some(&logical) = all.get(idx) else { break };
                run.push(logical);
                if !store.info(logical).is_continuation() {
                    break;
                }
                idx += 1;
            }
            run
        }
        Scope::Selected(rc) => all.into_iter().skip(rc.first_row_rel).take(rc.rows).collect(),
    }
}

/// Logical line indices for the data-row range, in display (order-map)
/// order, filtered to just that range.
fn data_row_positions(store: &LineStore, desc: &DataDesc) -> Vec<usize> {
    let first = desc.first_data_row;
    let last = desc.last_data_row;
    match store.order_map() {
        Some(map) => map
            .iter()
            .copied()
            .filter(|&logical| logical >= first && logical <= last)
            .collect(),
        None => (first..=last).collect(),
    }
}

/// Which crange indices a scope's column restriction selects, in crange
/// order. Most scopes select every column.
pub fn column_indices(desc: &DataDesc, scope: &Scope) -> Vec<usize> {
    match scope {
        Scope::Column(idx) => {
            if *idx < desc.cranges.len() {
                vec![*idx]
            } else {
                Vec::new()
            }
        }
        Scope::Selected(RowColScope { first_col_abs: Some(lo), col_width: Some(w), .. }) => desc
            .cranges
            .iter()
            .enumerate()
            .filter(|(_, c)| c.xmin >= *lo && c.xmax < lo + w)
            .map(|(i, _)| i)
            .collect(),
        _ => (0..desc.cranges.len()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc_with_rows(first: usize, last: usize, columns: usize) -> DataDesc {
        let mut d = DataDesc::unstructured(last, 10, 10);
        d.first_data_row = first;
        d.last_data_row = last;
        d.columns = columns;
        d
    }

    #[test]
    fn top_n_and_bottom_n_clip_to_available_rows() {
        let mut store = LineStore::new();
        for i in 0..5 {
            store.append(format!("{i}"));
        }
        let desc = desc_with_rows(0, 4, 0);
        assert_eq!(resolve_lines(&store, &desc, &Scope::TopN(2)), vec![0, 1]);
        assert_eq!(resolve_lines(&store, &desc, &Scope::BottomN(2)), vec![3, 4]);
    }

    #[test]
    fn marked_lines_filters_by_bookmark_bit() {
        let mut store = LineStore::new();
        for i in 0..3 {
            store.append(format!("{i}"));
        }
        store.set_mark(1, pgr_text::LineMask::BOOKMARK);
        let desc = desc_with_rows(0, 2, 0);
        assert_eq!(resolve_lines(&store, &desc, &Scope::MarkedLines), vec![1]);
    }
}
