//! Append-only bucketed line storage for tabular pager input.
//!
//! A pager session never mutates the lines it has read; it only appends (while
//! streaming a FIFO/query) and annotates individual lines with bookmark and
//! search-match bits. `LineStore` is built around that access pattern: lines
//! are grouped into fixed-size buckets so that an append during streaming
//! never reallocates, and therefore never invalidates a `(bucket, offset)`
//! reference a reader is holding onto mid-iteration.
//!
//! Invariants:
//! - Appending never moves an already-written line; bucket boundaries are
//!   fixed at `BUCKET_SIZE`.
//! - `LineInfo` is lazily allocated per bucket on first write so a freshly
//!   streamed file that never gets bookmarked/searched pays nothing extra.
//! - An `order_map`, when installed, is consulted before bucket/offset
//!   translation; storage order itself is never rewritten by sort.

use unicode_width::UnicodeWidthStr;

pub mod width;

pub const BUCKET_SIZE: usize = 1024;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineMask: u8 {
        const BOOKMARK             = 0b0000_0001;
        const FOUND_PATTERN        = 0b0000_0010;
        const FOUND_PATTERN_MULTI  = 0b0000_0100;
        const CONTINUATION         = 0b0000_1000;
    }
}

/// Per-line metadata. Allocated lazily; absent means "all bits clear, no
/// match cached, record offset 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineInfo {
    pub mask: LineMask,
    /// Display-column of the first search match on this line, if cached.
    pub start_char: u32,
    /// Offset of this line's logical record from the start of the data
    /// range, used for odd/even record highlighting.
    pub record_offset: u32,
}

impl LineInfo {
    pub fn is_bookmark(&self) -> bool {
        self.mask.contains(LineMask::BOOKMARK)
    }
    pub fn is_continuation(&self) -> bool {
        self.mask.contains(LineMask::CONTINUATION)
    }
    pub fn has_match(&self) -> bool {
        self.mask.contains(LineMask::FOUND_PATTERN)
    }
    pub fn has_multi_match(&self) -> bool {
        self.mask.contains(LineMask::FOUND_PATTERN_MULTI)
    }
}

#[derive(Default)]
struct Bucket {
    lines: Vec<String>,
    infos: Option<Vec<LineInfo>>,
}

impl Bucket {
    fn info_mut(&mut self, offset: usize) -> &mut LineInfo {
        if self.infos.is_none() {
            self.infos = Some(vec![LineInfo::default(); self.lines.len()]);
        }
        let infos = self.infos.as_mut().unwrap();
        if offset >= infos.len() {
            infos.resize(self.lines.len(), LineInfo::default());
        }
        &mut infos[offset]
    }

    fn info(&self, offset: usize) -> LineInfo {
        self.infos
            .as_ref()
            .and_then(|v| v.get(offset).copied())
            .unwrap_or_default()
    }
}

/// Ordered, append-only sequence of input lines plus per-line metadata.
///
/// Logical line numbers are 0-based and dense: the `n`th line ever appended
/// is always `get(n)`, regardless of any installed `order_map` (the order
/// map only affects iteration order, never addressing).
#[derive(Default)]
pub struct LineStore {
    buckets: Vec<Bucket>,
    len: usize,
    /// Optional permutation over logical indices, produced by sort. Iteration
    /// consults this before walking storage; direct `get` bypasses it.
    order_map: Option<Vec<usize>>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn locate(idx: usize) -> (usize, usize) {
        (idx / BUCKET_SIZE, idx % BUCKET_SIZE)
    }

    /// Append one line. O(1) amortized; never touches earlier buckets.
    pub fn append(&mut self, line: impl Into<String>) -> usize {
        let idx = self.len;
        let (bucket_idx, _) = Self::locate(idx);
        if bucket_idx >= self.buckets.len() {
            self.buckets.push(Bucket::default());
        }
        self.buckets[bucket_idx].lines.push(line.into());
        self.len += 1;
        idx
    }

    pub fn get(&self, idx: usize) -> Option<(&str, LineInfo)> {
        if idx >= self.len {
            return None;
        }
        let (b, o) = Self::locate(idx);
        let bucket = &self.buckets[b];
        Some((bucket.lines[o].as_str(), bucket.info(o)))
    }

    pub fn text(&self, idx: usize) -> Option<&str> {
        self.get(idx).map(|(t, _)| t)
    }

    pub fn info(&self, idx: usize) -> LineInfo {
        self.get(idx).map(|(_, i)| i).unwrap_or_default()
    }

    pub fn set_mark(&mut self, idx: usize, bits: LineMask) {
        if idx >= self.len {
            return;
        }
        let (b, o) = Self::locate(idx);
        self.buckets[b].info_mut(o).mask |= bits;
    }

    pub fn clear_mark(&mut self, idx: usize, bits: LineMask) {
        if idx >= self.len {
            return;
        }
        let (b, o) = Self::locate(idx);
        self.buckets[b].info_mut(o).mask.remove(bits);
    }

    pub fn xor_mark(&mut self, idx: usize, bits: LineMask) {
        if idx >= self.len {
            return;
        }
        let (b, o) = Self::locate(idx);
        let info = self.buckets[b].info_mut(o);
        info.mask ^= bits;
    }

    pub fn set_start_char(&mut self, idx: usize, start_char: u32) {
        if idx >= self.len {
            return;
        }
        let (b, o) = Self::locate(idx);
        self.buckets[b].info_mut(o).start_char = start_char;
    }

    pub fn set_record_offset(&mut self, idx: usize, record_offset: u32) {
        if idx >= self.len {
            return;
        }
        let (b, o) = Self::locate(idx);
        self.buckets[b].info_mut(o).record_offset = record_offset;
    }

    /// Clear FOUND_PATTERN / FOUND_PATTERN_MULTI on every line. Called
    /// whenever the search pattern changes so stale caches don't leak into a
    /// new search.
    pub fn clear_search_bits_all(&mut self) {
        let clear = LineMask::FOUND_PATTERN | LineMask::FOUND_PATTERN_MULTI;
        for bucket in &mut self.buckets {
            if let Some(infos) = bucket.infos.as_mut() {
                for info in infos {
                    info.mask.remove(clear);
                    info.start_char = 0;
                }
            }
        }
    }

    /// Replace the entire contents of the store and drop all line info and
    /// any installed order map. Not a general mutation API -- the store is
    /// append-only for the rest of a session. Its one sanctioned caller is
    /// structure detection's CSV/TSV reformatting pass, which runs once
    /// right after load and before anything holds a reference into the
    /// store, so the "stable references across an append" guarantee above
    /// is never at stake.
    pub fn replace_all(&mut self, lines: Vec<String>) {
        self.buckets.clear();
        self.len = 0;
        self.order_map = None;
        for line in lines {
            self.append(line);
        }
    }

    /// Install a reordering permutation (logical index -> logical index) for
    /// iteration. `perm.len()` must equal `self.len()`.
    pub fn apply_order_map(&mut self, perm: Option<Vec<usize>>) {
        self.order_map = perm;
    }

    pub fn order_map(&self) -> Option<&[usize]> {
        self.order_map.as_deref()
    }

    /// Translate an iteration position (0-based, in display order) to the
    /// underlying logical index.
    fn resolve(&self, position: usize) -> Option<usize> {
        match &self.order_map {
            Some(map) => map.get(position).copied(),
            None => {
                if position < self.len {
                    Some(position)
                } else {
                    None
                }
            }
        }
    }

    /// Resolve a single display position (as opposed to a logical index) to
    /// its `(logical index, text, info)` triple. O(1) whether or not an
    /// order map is installed.
    pub fn display_at(&self, position: usize) -> Option<(usize, &str, LineInfo)> {
        let logical = self.resolve(position)?;
        let (text, info) = self.get(logical)?;
        Some((logical, text, info))
    }

    /// Number of lines visible in display order (same as `len()` unless an
    /// order map has been installed with a different length).
    pub fn display_len(&self) -> usize {
        self.order_map.as_ref().map(|m| m.len()).unwrap_or(self.len)
    }

    /// Forward iterator over display positions, starting at `from` (a
    /// position, not necessarily a logical index when an order map is set).
    pub fn iter_from(&self, from: usize) -> impl Iterator<Item = (usize, &str, LineInfo)> {
        let len = self.order_map.as_ref().map(|m| m.len()).unwrap_or(self.len);
        (from..len).filter_map(move |pos| {
            let logical = self.resolve(pos)?;
            let (text, info) = self.get(logical)?;
            Some((logical, text, info))
        })
    }

    /// Backward iterator over display positions, starting at `from` and
    /// walking toward position 0 inclusive.
    pub fn iter_from_rev(&self, from: usize) -> impl Iterator<Item = (usize, &str, LineInfo)> {
        let len = self.order_map.as_ref().map(|m| m.len()).unwrap_or(self.len);
        let start = from.min(len.saturating_sub(1));
        (0..=start).rev().filter_map(move |pos| {
            let logical = self.resolve(pos)?;
            let (text, info) = self.get(logical)?;
            Some((logical, text, info))
        })
    }
}

/// Display width of a UTF-8 string, honoring double-width CJK and
/// zero-width combining marks via `unicode-width`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_get_roundtrip() {
        let mut store = LineStore::new();
        for i in 0..(BUCKET_SIZE * 2 + 5) {
            store.append(format!("line {i}"));
        }
        assert_eq!(store.len(), BUCKET_SIZE * 2 + 5);
        assert_eq!(store.text(0), Some("line 0"));
        assert_eq!(store.text(BUCKET_SIZE), Some(format!("line {BUCKET_SIZE}")).as_deref());
        assert_eq!(store.text(store.len() - 1), Some("line 2053"));
    }

    #[test]
    fn marks_are_independent_bits() {
        let mut store = LineStore::new();
        store.append("a");
        store.append("b");
        store.set_mark(0, LineMask::BOOKMARK);
        store.set_mark(1, LineMask::FOUND_PATTERN);
        assert!(store.info(0).is_bookmark());
        assert!(!store.info(0).has_match());
        assert!(store.info(1).has_match());
        store.clear_search_bits_all();
        assert!(!store.info(1).has_match());
        assert!(store.info(0).is_bookmark());
    }

    #[test]
    fn order_map_reorders_iteration_not_storage() {
        let mut store = LineStore::new();
        store.append("a");
        store.append("b");
        store.append("c");
        store.apply_order_map(Some(vec![2, 0, 1]));
        let order: Vec<_> = store.iter_from(0).map(|(_, t, _)| t).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        // Storage is untouched.
        assert_eq!(store.text(0), Some("a"));
    }

    #[test]
    fn replace_all_resets_storage_and_order_map() {
        let mut store = LineStore::new();
        store.append("a");
        store.append("b");
        store.set_mark(0, LineMask::BOOKMARK);
        store.apply_order_map(Some(vec![1, 0]));
        store.replace_all(vec!["x".to_string(), "y".to_string(), "z".to_string()]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.text(0), Some("x"));
        assert!(!store.info(0).is_bookmark());
        assert_eq!(store.order_map(), None);
    }

    #[test]
    fn iter_from_rev_walks_backward_inclusive() {
        let mut store = LineStore::new();
        for c in ["a", "b", "c"] {
            store.append(c);
        }
        let order: Vec<_> = store.iter_from_rev(2).map(|(_, t, _)| t).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
