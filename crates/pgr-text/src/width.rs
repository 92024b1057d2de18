//! Grapheme-aware display width helpers.
//!
//! Column math throughout the pager (header classifier length, column
//! ranges, cursor clamping) is expressed in terminal display columns, not
//! bytes or chars. This module centralizes the cluster -> column mapping so
//! the rest of the crate never calls `unicode-width` directly.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width, in terminal columns, of one extended grapheme cluster.
pub fn egc_width(cluster: &str) -> usize {
    UnicodeWidthStr::width(cluster).max(if cluster.is_empty() { 0 } else { 1 })
}

/// Iterate `(byte_offset, cluster, width)` triples for a line, left to right.
pub fn clusters(s: &str) -> impl Iterator<Item = (usize, &str, usize)> {
    s.grapheme_indices(true)
        .map(|(i, g)| (i, g, egc_width(g)))
}

/// Map a byte offset within `s` to its display-column offset, by summing
/// the width of every whole cluster before it.
pub fn byte_to_display_col(s: &str, byte_offset: usize) -> usize {
    let mut col = 0usize;
    for (start, cluster, w) in clusters(s) {
        if start >= byte_offset {
            break;
        }
        col += w;
    }
    col
}

/// Map a display column to the byte offset of the cluster occupying it
/// (clamped to the string length if the column is beyond the last cluster).
pub fn display_col_to_byte(s: &str, target_col: usize) -> usize {
    let mut col = 0usize;
    for (start, _cluster, w) in clusters(s) {
        if col >= target_col {
            return start;
        }
        col += w;
    }
    s.len()
}

/// Return the cluster occupying `target_col`, along with its starting
/// column and width. `None` past the end of the line (callers should treat
/// that as a blank cell).
pub fn cluster_at_col(s: &str, target_col: usize) -> Option<(&str, usize, usize)> {
    let mut col = 0usize;
    for (_start, cluster, w) in clusters(s) {
        if target_col < col + w {
            return Some((cluster, col, w));
        }
        col += w;
    }
    None
}

/// Display width of an entire string: the sum of its grapheme clusters'
/// widths (so combining marks and ZWJ sequences don't inflate it the way a
/// naive per-`char` sum would).
pub fn display_width(s: &str) -> usize {
    clusters(s).map(|(_, _, w)| w).sum()
}

/// Trim leading/trailing ASCII spaces, returning the byte range `[lo, hi)`
/// of the trimmed substring within `s`.
pub fn trim_byte_range(s: &str) -> (usize, usize) {
    let lo = s.len() - s.trim_start_matches(' ').len();
    let hi = s.trim_end_matches(' ').len();
    if lo >= hi { (lo, lo) } else { (lo, hi) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_one_per_char() {
        assert_eq!(egc_width("a"), 1);
    }

    #[test]
    fn wide_cjk_is_two_columns() {
        assert_eq!(egc_width("中"), 2);
    }

    #[test]
    fn byte_to_col_roundtrips_through_col_to_byte() {
        let s = "ab中de";
        let byte = display_col_to_byte(s, 3); // a(1) b(1) 中(2) -> col 3 lands mid-中? col2 is start of 中
        assert_eq!(byte_to_display_col(s, byte), 2);
    }

    #[test]
    fn display_width_sums_cluster_widths() {
        assert_eq!(display_width("ab中de"), 6);
    }

    #[test]
    fn trim_range_strips_spaces_only() {
        let s = "  hi  ";
        let (lo, hi) = trim_byte_range(s);
        assert_eq!(&s[lo..hi], "hi");
    }

    #[test]
    fn cluster_at_col_finds_wide_char_and_past_end() {
        let s = "a中";
        assert_eq!(cluster_at_col(s, 0), Some(("a", 0, 1)));
        assert_eq!(cluster_at_col(s, 1), Some(("中", 1, 2)));
        assert_eq!(cluster_at_col(s, 2), Some(("中", 1, 2)));
        assert_eq!(cluster_at_col(s, 3), None);
    }
}
