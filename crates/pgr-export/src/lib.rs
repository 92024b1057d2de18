//! Export pipeline: serialize a chosen subset of cells to text, CSV,
//! TSV-compat, pipe-separated, or SQL, honoring NULL conventions and
//! multiline-cell reassembly.
//!
//! Every format walks the same record iterator ([`records_for_scope`]); only
//! the per-field quoting and the row separator differ (`format.rs`). Any
//! I/O error aborts the export and is surfaced to the caller rather than
//! partially writing a corrupt file — except a broken pipe on a downstream
//! consumer that exited with status 0, which is success, not failure
//! (§4.7/§7): callers distinguish that case at the `pclose`/process-exit
//! layer, outside this crate's `std::io::Write` boundary.

pub mod format;
pub mod identifiers;
pub mod scope;
pub mod sql;

pub use format::Format;
pub use scope::{RowColScope, Scope};

use pgr_model::DataDesc;
use pgr_text::LineStore;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct NullPolicy {
    pub empty_string_is_null: bool,
    pub nullstr: Option<String>,
}

impl Default for NullPolicy {
    fn default() -> Self {
        Self { empty_string_is_null: false, nullstr: None }
    }
}

impl NullPolicy {
    pub fn is_null(&self, trimmed: &str) -> bool {
        if self.empty_string_is_null && trimmed.is_empty() {
            return true;
        }
        if let Some(n) = &self.nullstr
            && trimmed == n
        {
            return true;
        }
        trimmed == "\u{2205}"
    }
}

/// One reassembled logical record: one trimmed string per selected data
/// column, already multiline-joined.
pub struct Record {
    pub fields: Vec<String>,
}

/// Walk `store` for the given `scope`, grouping continuation runs into
/// single records and splitting each record's text into columns via
/// `desc.headline_transl`/`desc.cranges`. Column selection (`col_indices`)
/// narrows which cranges populate `Record::fields`, in crange order.
pub fn records_for_scope(
    store: &LineStore,
    desc: &DataDesc,
    scope: &Scope,
    col_indices: &[usize],
) -> Vec<Record> {
    let line_indices = scope::resolve_lines(store, desc, scope);
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < line_indices.len() {
        let mut run = vec![line_indices[i]];
        while store.info(*run.last().unwrap()).is_continuation() && i + 1 < line_indices.len() {
            i += 1;
            run.push(line_indices[i]);
        }
        i += 1;
        out.push(build_record(store, desc, &run, col_indices));
    }
    out
}

fn build_record(store: &LineStore, desc: &DataDesc, run: &[usize], col_indices: &[usize]) -> Record {
    let mut fields = vec![String::new(); col_indices.len()];
    for (slot, &col_idx) in col_indices.iter().enumerate() {
        let Some(crange) = desc.cranges.get(col_idx) else { continue };
        let mut parts = Vec::new();
        for &line_idx in run {
            let text = store.text(line_idx).unwrap_or("");
            let stripped = strip_continuation_marker(text);
            let part = column_slice(stripped, crange.xmin, crange.xmax);
            parts.push(part.trim().to_string());
        }
        fields[slot] = parts.concat();
    }
    Record { fields }
}

fn strip_continuation_marker(line: &str) -> &str {
    let trimmed_end = line.trim_end_matches(' ');
    for marker in ['+', '\u{21b5}', '\u{2026}'] {
        if let Some(stripped) = trimmed_end.strip_suffix(marker) {
            return stripped;
        }
    }
    line
}

fn column_slice(line: &str, xmin: usize, xmax: usize) -> &str {
    let lo = pgr_text::width::display_col_to_byte(line, xmin);
    let hi = pgr_text::width::display_col_to_byte(line, xmax + 1).min(line.len());
    if lo >= hi || lo > line.len() { "" } else { &line[lo..hi.max(lo)] }
}

/// Full pipeline: resolve scope, reassemble records, format, write.
pub fn export<W: Write>(
    store: &LineStore,
    desc: &DataDesc,
    scope: &Scope,
    fmt: Format,
    null_policy: &NullPolicy,
    table_name: &str,
    out: &mut W,
) -> Result<(), ExportError> {
    if let Scope::ExtendedCurrentLine(row_rel) = scope {
        return export_extended_current_line(store, desc, *row_rel, null_policy, out);
    }

    if matches!(fmt, Format::Text) {
        for idx in scope::resolve_lines(store, desc, scope) {
            if let Some(text) = store.text(idx) {
                writeln!(out, "{text}")?;
            }
        }
        return Ok(());
    }

    let col_indices = scope::column_indices(desc, scope);
    let records = records_for_scope(store, desc, scope, &col_indices);
    let col_names: Vec<String> = col_indices
        .iter()
        .map(|&i| format::column_name(store, desc, i))
        .collect();

    for (row_number, record) in records.iter().enumerate() {
        format::write_row(out, fmt, null_policy, table_name, &col_names, &record.fields, row_number)?;
    }
    Ok(())
}

fn export_extended_current_line<W: Write>(
    store: &LineStore,
    desc: &DataDesc,
    row_rel: usize,
    null_policy: &NullPolicy,
    out: &mut W,
) -> Result<(), ExportError> {
    let col_indices: Vec<usize> = (0..desc.cranges.len()).collect();
    let scope = Scope::CurrentLine(row_rel);
    let records = records_for_scope(store, desc, &scope, &col_indices);
    let Some(record) = records.first() else { return Ok(()) };
    for (i, field) in record.fields.iter().enumerate() {
        let name = format::column_name(store, desc, i);
        let value = format::csv_field(field, null_policy);
        writeln!(out, "{name},{value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_and_desc(lines: &[&str]) -> (LineStore, DataDesc) {
        let mut store = LineStore::new();
        for l in lines {
            store.append(*l);
        }
        let desc = pgr_model::detect(&mut store);
        (store, desc)
    }

    /// Builds a fixed-width-column table (every cell padded to `col_width`)
    /// so header, border, and data rows line up without hand counting.
    fn build_table(col_names: &[&str], rows: &[&[&str]], col_width: usize) -> (LineStore, DataDesc) {
        let header = col_names
            .iter()
            .map(|c| format!("{c:<col_width$}"))
            .collect::<Vec<_>>()
            .join("|");
        let border = col_names
            .iter()
            .map(|_| "-".repeat(col_width))
            .collect::<Vec<_>>()
            .join("+");
        let mut lines = vec![header, border];
        for row in rows {
            lines.push(
                row.iter()
                    .map(|v| format!("{v:<col_width$}"))
                    .collect::<Vec<_>>()
                    .join("|"),
            );
        }
        let mut store = LineStore::new();
        for l in &lines {
            store.append(l.clone());
        }
        let desc = pgr_model::detect(&mut store);
        (store, desc)
    }

    #[test]
    fn csv_export_quotes_embedded_quotes_and_commas() {
        let (store, desc) = build_table(&["a"], &[&["he said \"hi\", ok"]], 20);
        let mut out = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::Csv, &NullPolicy::default(), "t", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), "\"he said \"\"hi\"\", ok\"");
    }

    #[test]
    fn csv_empty_field_distinguishes_null_policy() {
        let (store, desc) = store_and_desc(&[" a ", "---", "   "]);
        let mut out = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::Csv, &NullPolicy::default(), "t", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), "\"\"");

        let policy = NullPolicy { empty_string_is_null: true, nullstr: None };
        let mut out2 = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::Csv, &policy, "t", &mut out2).unwrap();
        assert_eq!(String::from_utf8(out2).unwrap().trim_end(), "");
    }

    #[test]
    fn multiline_reassembly_joins_continuation_record() {
        let (store, desc) = store_and_desc(&[
            " a     | b   ",
            "-------+-----",
            " hello | wor+",
            "       | ld  ",
        ]);
        assert!(desc.has_multilines);
        let mut out = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::Csv, &NullPolicy::default(), "t", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), "hello,world");
    }

    #[test]
    fn sql_values_formats_numbers_strings_and_null() {
        let (store, desc) = build_table(
            &["id", "name", "city"],
            &[&["42", "\u{2205}", "O'Brien"]],
            10,
        );
        let policy = NullPolicy { empty_string_is_null: false, nullstr: Some("\u{2205}".into()) };
        let mut out = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::SqlValues, &policy, "t", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), "42,NULL,'O''Brien'");
    }

    #[test]
    fn insert_emits_quoted_identifiers_when_needed() {
        let (store, desc) = store_and_desc(&[" Id ", "----", " 1  "]);
        let mut out = Vec::new();
        export(&store, &desc, &Scope::AllLines, Format::Insert, &NullPolicy::default(), "my table", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("INSERT INTO \"my table\""));
    }
}
