//! ASCII -> Unicode border glyph substitution (`--force-uniborder`).
//!
//! Only engaged when the detected style is ASCII; looks up the classifier
//! plus which border row (top/head/bottom/interior) the cell is on to pick
//! the matching box-drawing glyph.

use pgr_model::ClassifierChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderRow {
    Top,
    Head,
    Bottom,
    /// A plain data row (only its `L`/`I`/`R` columns are border glyphs).
    Data,
}

/// Map an ASCII border source character to its Unicode upgrade, or `None`
/// to leave the character as-is (e.g. plain data cells are never touched).
pub fn upgrade(classifier: ClassifierChar, row: BorderRow, source: char) -> Option<char> {
    match classifier {
        ClassifierChar::Data => {
            if source == '-' { Some('\u{2500}') } else { None }
        }
        ClassifierChar::BorderLeft => match (row, source) {
            (BorderRow::Top, '+') => Some('\u{250c}'),
            (BorderRow::Bottom, '+') => Some('\u{2514}'),
            (_, '+') | (_, '|') => Some('\u{251c}'),
            _ => None,
        },
        ClassifierChar::Interior => match (row, source) {
            (BorderRow::Top, '+') => Some('\u{252c}'),
            (BorderRow::Bottom, '+') => Some('\u{2534}'),
            (_, '+') => Some('\u{253c}'),
            (_, '|') => Some('\u{2502}'),
            _ => None,
        },
        ClassifierChar::BorderRight => match (row, source) {
            (BorderRow::Top, '+') => Some('\u{2510}'),
            (BorderRow::Bottom, '+') => Some('\u{2518}'),
            (_, '+') | (_, '|') => Some('\u{2524}'),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dash_becomes_horizontal_rule() {
        assert_eq!(upgrade(ClassifierChar::Data, BorderRow::Data, '-'), Some('\u{2500}'));
    }

    #[test]
    fn interior_plus_on_head_row_becomes_cross() {
        assert_eq!(upgrade(ClassifierChar::Interior, BorderRow::Head, '+'), Some('\u{253c}'));
    }

    #[test]
    fn left_plus_on_top_row_becomes_top_left_corner() {
        assert_eq!(upgrade(ClassifierChar::BorderLeft, BorderRow::Top, '+'), Some('\u{250c}'));
    }

    #[test]
    fn left_plus_on_bottom_row_becomes_bottom_left_corner() {
        assert_eq!(upgrade(ClassifierChar::BorderLeft, BorderRow::Bottom, '+'), Some('\u{2514}'));
    }
}
