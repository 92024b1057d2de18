//! Substring search with smart-case policies, row/column scoping, and a
//! per-line match cache so redraws cost O(1) per visible line after the
//! first scan.
//!
//! No general regex: the pager only ever looks for a literal substring,
//! optionally case-folded. That keeps the matcher trivially fast and its
//! semantics easy to reason about (no catastrophic backtracking, no locale
//! surprises).

use pgr_text::{LineMask, LineStore, width};
use std::collections::HashMap;

/// How case is handled when comparing the pattern against line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    CaseSensitive,
    IgnoreCase,
    /// Smart-case: folds case only when the pattern itself is all-lowercase,
    /// decided once at `set_pattern` time.
    IgnoreLowerCase,
}

/// A located match: logical line, byte offset, and display-column offset of
/// its first code point (the latter computed by measuring the display width
/// of everything before it on the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub byte: usize,
    pub column: usize,
}

fn fold(s: &str) -> String {
    s.chars().flat_map(|c| c.to_lowercase()).collect()
}

/// All scoping and result state for the active search. One instance is
/// shared across the navigation loop so `search_next`/`search_prev` can
/// incrementally progress through a buffer.
#[derive(Default)]
pub struct SearchEngine {
    pattern: String,
    fold_active: bool,
    row_scope: Option<(usize, usize)>,
    col_scope: Option<(usize, usize)>,
    /// Cache of match positions per logical line, populated lazily on first
    /// visit. Absence means "not yet scanned"; `Some(vec![])` means "scanned,
    /// no matches".
    cache: HashMap<usize, Vec<(usize, usize)>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.pattern.is_empty()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Install a new pattern, clearing cached match state on both the
    /// engine and the line store (so stale FOUND_PATTERN bits from a
    /// previous search never leak through).
    pub fn set_pattern(&mut self, term: &str, policy: CasePolicy, store: &mut LineStore) {
        self.pattern = term.to_string();
        self.fold_active = match policy {
            CasePolicy::CaseSensitive => false,
            CasePolicy::IgnoreCase => true,
            CasePolicy::IgnoreLowerCase => !term.chars().any(|c| c.is_uppercase()),
        };
        self.cache.clear();
        store.clear_search_bits_all();
    }

    pub fn clear(&mut self, store: &mut LineStore) {
        self.pattern.clear();
        self.cache.clear();
        self.row_scope = None;
        self.col_scope = None;
        store.clear_search_bits_all();
    }

    pub fn set_row_scope(&mut self, range: Option<(usize, usize)>) {
        self.row_scope = range;
    }

    pub fn set_col_scope(&mut self, range: Option<(usize, usize)>) {
        self.col_scope = range;
    }

    fn needle(&self) -> String {
        if self.fold_active {
            fold(&self.pattern)
        } else {
            self.pattern.clone()
        }
    }

    /// Every byte offset in `line` where the (possibly folded) pattern
    /// begins, restricted to the active column scope.
    fn raw_matches(&self, line: &str) -> Vec<(usize, usize)> {
        if self.pattern.is_empty() {
            return Vec::new();
        }
        let haystack = if self.fold_active { fold(line) } else { line.to_string() };
        let needle = self.needle();
        let mut out = Vec::new();
        let mut start = 0usize;
        while let Some(rel) = haystack[start..].find(&needle) {
            let byte = start + rel;
            // `fold` can change byte lengths (e.g. German ß), so map the
            // folded-haystack offset back to the original line by display
            // column instead of trusting byte equality when folding.
            let col = if self.fold_active {
                width::byte_to_display_col(&haystack, byte)
            } else {
                width::byte_to_display_col(line, byte)
            };
            if self.col_in_scope(col) {
                out.push((byte, col));
            }
            start = byte + needle.len().max(1);
        }
        out
    }

    fn col_in_scope(&self, col: usize) -> bool {
        match self.col_scope {
            Some((lo, hi)) => col >= lo && col <= hi,
            None => true,
        }
    }

    fn row_in_scope(&self, row: usize) -> bool {
        match self.row_scope {
            Some((lo, hi)) => row >= lo && row <= hi,
            None => true,
        }
    }

    /// Ensure `line`'s matches are cached, scanning and writing
    /// FOUND_PATTERN/FOUND_PATTERN_MULTI/`start_char` into the store on
    /// first visit.
    fn ensure_scanned(&mut self, store: &mut LineStore, line: usize) -> &[(usize, usize)] {
        if !self.cache.contains_key(&line) {
            let matches = match store.text(line) {
                Some(text) if self.row_in_scope(line) => self.raw_matches(text),
                _ => Vec::new(),
            };
            if let Some(&(_, first_col)) = matches.first() {
                store.set_mark(line, LineMask::FOUND_PATTERN);
                if matches.len() >= 2 {
                    store.set_mark(line, LineMask::FOUND_PATTERN_MULTI);
                }
                store.set_start_char(line, first_col as u32);
            }
            self.cache.insert(line, matches);
        }
        self.cache.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Matches for `line`, reading from cache if already scanned (pure,
    /// read-only; does not populate the line store).
    pub fn matches_for(&self, store: &LineStore, line: usize) -> Vec<(usize, usize)> {
        if let Some(cached) = self.cache.get(&line) {
            return cached.clone();
        }
        match store.text(line) {
            Some(text) if self.row_in_scope(line) => self.raw_matches(text),
            _ => Vec::new(),
        }
    }

    /// Next match strictly after `(from_line, from_byte)`. Starts just past
    /// the current match if the cursor sits on an already-found line;
    /// otherwise starts at the beginning of the next line. Does not wrap:
    /// returns `None` once the store is exhausted.
    pub fn search_next(
        &mut self,
        store: &mut LineStore,
        from_line: usize,
        from_byte: usize,
    ) -> Option<Match> {
        if !self.is_active() {
            return None;
        }
        let matches = self.ensure_scanned(store, from_line).to_vec();
        if let Some(&(byte, col)) = matches.iter().find(|&&(b, _)| b > from_byte) {
            return Some(Match { line: from_line, byte, column: col });
        }
        let mut line = from_line + 1;
        while line < store.len() {
            let matches = self.ensure_scanned(store, line);
            if let Some(&(byte, col)) = matches.first() {
                return Some(Match { line, byte, column: col });
            }
            line += 1;
        }
        None
    }

    /// Previous match strictly before `(from_line, from_byte)`. Does not
    /// wrap.
    pub fn search_prev(
        &mut self,
        store: &mut LineStore,
        from_line: usize,
        from_byte: usize,
    ) -> Option<Match> {
        if !self.is_active() {
            return None;
        }
        let matches = self.ensure_scanned(store, from_line).to_vec();
        if let Some(&(byte, col)) = matches.iter().rev().find(|&&(b, _)| b < from_byte) {
            return Some(Match { line: from_line, byte, column: col });
        }
        let mut line = from_line;
        while line > 0 {
            line -= 1;
            let matches = self.ensure_scanned(store, line);
            if let Some(&(byte, col)) = matches.last() {
                return Some(Match { line, byte, column: col });
            }
        }
        None
    }

    /// First data column (by index into `cranges`-ordered search, left to
    /// right) whose name matches the term, case-folded the same way as line
    /// search. Used by "search in column names" commands.
    pub fn column_search(&self, names: &[&str]) -> Option<usize> {
        if self.pattern.is_empty() {
            return None;
        }
        let needle = self.needle();
        names.iter().position(|name| {
            let hay = if self.fold_active { fold(name) } else { name.to_string() };
            hay.contains(&needle)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(lines: &[&str]) -> LineStore {
        let mut s = LineStore::new();
        for l in lines {
            s.append(*l);
        }
        s
    }

    #[test]
    fn smart_case_pattern_with_uppercase_is_sensitive() {
        let mut store = store_of(&["Foo bar", "foo bar"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("Foo", CasePolicy::IgnoreLowerCase, &mut store);
        assert!(eng.search_next(&mut store, 0, 0).is_none());
        let m = eng.search_next(&mut store, usize::MAX, 0);
        assert!(m.is_none());
        // direct scan check
        assert_eq!(eng.raw_matches("Foo bar").len(), 1);
        assert_eq!(eng.raw_matches("foo bar").len(), 0);
    }

    #[test]
    fn smart_case_pattern_all_lowercase_is_insensitive() {
        let mut store = store_of(&["Foo", "foo"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("foo", CasePolicy::IgnoreLowerCase, &mut store);
        assert_eq!(eng.raw_matches("Foo").len(), 1);
        assert_eq!(eng.raw_matches("foo").len(), 1);
    }

    #[test]
    fn next_then_prev_returns_to_same_match() {
        let mut store = store_of(&["xx cat xx cat xx"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("cat", CasePolicy::CaseSensitive, &mut store);
        let first = eng.search_next(&mut store, 0, 0).unwrap();
        let second = eng.search_next(&mut store, first.line, first.byte).unwrap();
        let back = eng.search_prev(&mut store, second.line, second.byte).unwrap();
        assert_eq!(back, first);
    }

    #[test]
    fn does_not_wrap_past_end() {
        let mut store = store_of(&["cat"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("cat", CasePolicy::CaseSensitive, &mut store);
        let m = eng.search_next(&mut store, 0, 0).unwrap();
        assert!(eng.search_next(&mut store, m.line, m.byte).is_none());
    }

    #[test]
    fn column_scope_filters_matches() {
        let mut store = store_of(&["cat cat"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("cat", CasePolicy::CaseSensitive, &mut store);
        eng.set_col_scope(Some((4, 10)));
        let matches = eng.ensure_scanned(&mut store, 0);
        assert_eq!(matches, &[(4, 4)]);
    }

    #[test]
    fn caching_sets_multi_match_bit() {
        let mut store = store_of(&["cat cat cat"]);
        let mut eng = SearchEngine::new();
        eng.set_pattern("cat", CasePolicy::CaseSensitive, &mut store);
        eng.ensure_scanned(&mut store, 0);
        assert!(store.info(0).has_match());
        assert!(store.info(0).has_multi_match());
    }
}
