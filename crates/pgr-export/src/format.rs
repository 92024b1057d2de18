//! Per-format row serialization: quoting rules and row/statement shape.

use crate::identifiers::quote_identifier;
use crate::sql::quote_sql_literal;
use crate::NullPolicy;
use pgr_model::DataDesc;
use pgr_text::LineStore;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Csv,
    TsvC,
    PipeSeparated,
    SqlValues,
    Insert,
    InsertWithComments,
}

/// Column display name: the trimmed slice of `namesline` at the crange's
/// recorded byte range, or `col<n>` (1-based) when there's no name line
/// (e.g. an unstructured/expanded-mode view).
pub fn column_name(store: &LineStore, desc: &DataDesc, col_idx: usize) -> String {
    if let (Some(line_idx), Some(crange)) = (desc.namesline, desc.cranges.get(col_idx))
        && let Some(text) = store.text(line_idx)
    {
        let lo = crange.name_byte_offset;
        let hi = (lo + crange.name_byte_size).min(text.len());
        if lo <= hi && hi <= text.len() {
            let name = text[lo..hi].trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    format!("col{}", col_idx + 1)
}

/// CSV's quoting-trigger set: `"`, `,`, tab, and any line-ending character.
fn csv_needs_quote(s: &str) -> bool {
    s.contains(['"', ',', '\t', '\r', '\n'])
}

/// TSV-compat's trigger set: same as CSV minus the comma (tab-separated, so
/// a bare comma is never ambiguous).
fn tsv_needs_quote(s: &str) -> bool {
    s.contains(['"', '\t', '\r', '\n'])
}

fn quote_wrap(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// A field for CSV: NULL collapses to an empty (unquoted) cell; an empty
/// but non-null field becomes an explicit `""`; anything needing escaping
/// is quote-wrapped.
pub fn csv_field(raw: &str, policy: &NullPolicy) -> String {
    let trimmed = raw.trim();
    if policy.is_null(trimmed) {
        return String::new();
    }
    if trimmed.is_empty() {
        return "\"\"".to_string();
    }
    if csv_needs_quote(trimmed) {
        quote_wrap(trimmed)
    } else {
        trimmed.to_string()
    }
}

fn tsv_field(raw: &str, policy: &NullPolicy) -> String {
    let trimmed = raw.trim().replace('\n', " ");
    if policy.is_null(trimmed.trim()) {
        return String::new();
    }
    if trimmed.is_empty() {
        return "\"\"".to_string();
    }
    if tsv_needs_quote(&trimmed) {
        quote_wrap(&trimmed)
    } else {
        trimmed
    }
}

fn pipe_field(raw: &str, policy: &NullPolicy) -> String {
    let trimmed = raw.trim();
    if policy.is_null(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

pub fn write_row<W: Write>(
    out: &mut W,
    fmt: Format,
    policy: &NullPolicy,
    table_name: &str,
    col_names: &[String],
    fields: &[String],
    row_number: usize,
) -> Result<(), std::io::Error> {
    match fmt {
        Format::Text => unreachable!("Text is handled directly by the caller"),
        Format::Csv => {
            let row: Vec<String> = fields.iter().map(|f| csv_field(f, policy)).collect();
            writeln!(out, "{}", row.join(","))
        }
        Format::TsvC => {
            let row: Vec<String> = fields.iter().map(|f| tsv_field(f, policy)).collect();
            writeln!(out, "{}", row.join("\t"))
        }
        Format::PipeSeparated => {
            let row: Vec<String> = fields.iter().map(|f| pipe_field(f, policy)).collect();
            writeln!(out, "{}", row.join(" | "))
        }
        Format::SqlValues => {
            let row: Vec<String> = fields.iter().map(|f| quote_sql_literal(f, policy)).collect();
            writeln!(out, "{}", row.join(","))
        }
        Format::Insert => {
            let table = quote_identifier(table_name);
            let cols: Vec<String> = col_names.iter().map(|n| quote_identifier(n)).collect();
            let vals: Vec<String> = fields.iter().map(|f| quote_sql_literal(f, policy)).collect();
            writeln!(out, "INSERT INTO {table}({}) VALUES ({});", cols.join(", "), vals.join(", "))
        }
        Format::InsertWithComments => {
            let table = quote_identifier(table_name);
            writeln!(out, "-- row {}", row_number + 1)?;
            writeln!(out, "INSERT INTO {table} VALUES (")?;
            let last = fields.len().saturating_sub(1);
            for (i, field) in fields.iter().enumerate() {
                let val = quote_sql_literal(field, policy);
                let comma = if i == last { "" } else { "," };
                let name = col_names.get(i).map(String::as_str).unwrap_or("?");
                writeln!(out, "  {val}{comma} -- {}. {name}", i + 1)?;
            }
            writeln!(out, ");")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsv_quoting_trigger_set_excludes_comma() {
        assert!(!tsv_needs_quote("a,b"));
        assert!(tsv_needs_quote("a\tb"));
    }

    #[test]
    fn csv_quoting_trigger_set_includes_comma() {
        assert!(csv_needs_quote("a,b"));
    }

    #[test]
    fn csv_quoting_trigger_set_includes_tab() {
        assert!(csv_needs_quote("a\tb"));
    }
}
