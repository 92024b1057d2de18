//! Table structure recognition ("headline translation").
//!
//! A single pass over freshly loaded (or reloaded) lines infers which row is
//! the header separator, where the top/bottom borders sit, and the
//! per-display-column classifier that everything downstream — rendering,
//! navigation, export — treats as the single source of truth for "is column
//! x a border or data cell?" (`DataDesc::headline_transl`).
//!
//! Detection never fails outright: malformed or unstructured input degrades
//! gracefully to `columns == 0` / `headline_transl == None`, which callers
//! treat as "render this as plain text".

pub mod detect;

pub use detect::{detect, detect_with_hints};

/// One of the four roles a display column can play along the header
/// separator row. The sole authority everything downstream consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierChar {
    /// Leftmost outer border column.
    BorderLeft,
    /// Rightmost outer border column.
    BorderRight,
    /// Interior column separator.
    Interior,
    /// Ordinary data column.
    Data,
}

impl ClassifierChar {
    pub fn as_byte(self) -> u8 {
        match self {
            ClassifierChar::BorderLeft => b'L',
            ClassifierChar::BorderRight => b'R',
            ClassifierChar::Interior => b'I',
            ClassifierChar::Data => b'd',
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'L' => Some(Self::BorderLeft),
            b'R' => Some(Self::BorderRight),
            b'I' => Some(Self::Interior),
            b'd' => Some(Self::Data),
            _ => None,
        }
    }
}

/// Outer/grid border presence, as inferred from the border-like lines found
/// during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    /// No outer border lines; only (at most) the header separator.
    None,
    /// A top and/or bottom border line, but no grid between every row.
    Outer,
    /// Full grid: border lines bracket the table and interior separators
    /// appear between columns.
    Full,
}

impl BorderType {
    pub fn as_u8(self) -> u8 {
        match self {
            BorderType::None => 0,
            BorderType::Outer => 1,
            BorderType::Full => 2,
        }
    }

    /// Parse a `--border=N` CLI value. `None` for any value outside `0..=2`
    /// (treated the same as the flag being absent: fall back to detection).
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0 => Some(BorderType::None),
            1 => Some(BorderType::Outer),
            2 => Some(BorderType::Full),
            _ => None,
        }
    }
}

/// `--csv`/`--tsv`: reformat delimited input into a column grid before the
/// usual border/headline detection runs, instead of treating it as already-
/// tabular text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Auto,
    Csv,
    Tsv,
}

/// Detector inputs beyond the raw line sequence (§4.2): a forced border
/// style and a delimited-input reformatting hint.
#[derive(Debug, Clone, Default)]
pub struct DetectHints {
    pub border_override: Option<BorderType>,
    pub input_format: InputFormat,
}

/// Border glyph family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Ascii,
    Unicode,
}

/// A single data column's extent and name location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CRange {
    /// Display-column range, inclusive on both ends.
    pub xmin: usize,
    pub xmax: usize,
    /// Byte offset and size of the (untrimmed) column name within
    /// `DataDesc::namesline`'s text.
    pub name_byte_offset: usize,
    pub name_byte_size: usize,
    /// Display width of the trimmed column name.
    pub name_width: usize,
}

impl CRange {
    pub fn width(&self) -> usize {
        self.xmax + 1 - self.xmin
    }
}

/// Result of structure detection: immutable except for the line-info bits
/// (bookmark/search) that live in `pgr_text::LineStore` itself.
#[derive(Debug, Clone)]
pub struct DataDesc {
    pub title_rows: usize,
    pub border_top_row: Option<usize>,
    pub border_head_row: Option<usize>,
    pub border_bottom_row: Option<usize>,
    pub first_data_row: usize,
    pub last_data_row: usize,
    pub last_row: usize,
    pub footer_row: Option<usize>,
    pub border_type: BorderType,
    pub linestyle: LineStyle,
    pub is_expanded_mode: bool,
    pub maxx: usize,
    pub maxbytes: usize,
    /// Per-display-column classifier over the header separator row. `None`
    /// when no separator row was found (unstructured text view).
    pub headline_transl: Option<String>,
    pub columns: usize,
    pub cranges: Vec<CRange>,
    pub namesline: Option<usize>,
    pub order_map: Option<Vec<usize>>,
    pub has_multilines: bool,
}

impl DataDesc {
    /// A `DataDesc` describing an unstructured (plain-text) view: used when
    /// detection finds no usable header separator.
    pub fn unstructured(last_row: usize, maxx: usize, maxbytes: usize) -> Self {
        Self {
            title_rows: 0,
            border_top_row: None,
            border_head_row: None,
            border_bottom_row: None,
            first_data_row: 0,
            last_data_row: last_row,
            last_row,
            footer_row: None,
            border_type: BorderType::None,
            linestyle: LineStyle::Ascii,
            is_expanded_mode: false,
            maxx,
            maxbytes,
            headline_transl: None,
            columns: 0,
            cranges: Vec::new(),
            namesline: None,
            order_map: None,
            has_multilines: false,
        }
    }

    pub fn classifier_at(&self, x: usize) -> ClassifierChar {
        self.headline_transl
            .as_ref()
            .and_then(|s| s.as_bytes().get(x).copied())
            .and_then(ClassifierChar::from_byte)
            .unwrap_or(ClassifierChar::Data)
    }

    /// Index of the data column containing display column `x`, if any.
    pub fn column_at(&self, x: usize) -> Option<usize> {
        self.cranges
            .iter()
            .position(|c| x >= c.xmin && x <= c.xmax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_roundtrips_through_bytes() {
        for c in [
            ClassifierChar::BorderLeft,
            ClassifierChar::BorderRight,
            ClassifierChar::Interior,
            ClassifierChar::Data,
        ] {
            assert_eq!(ClassifierChar::from_byte(c.as_byte()), Some(c));
        }
    }
}
