//! Command-line surface. Only the flags that affect core pager behavior are
//! defined here; argument *parsing* itself is an ambient/outer concern the
//! rest of the workspace never touches directly.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "pgr", version, about = "Terminal pager for tabular query output")]
pub struct CliArgs {
    /// File to page through. Reads stdin when omitted.
    pub path: Option<PathBuf>,

    /// Number of leading columns to freeze against horizontal scroll.
    #[arg(long)]
    pub freezecols: Option<u8>,

    /// Force a border style (0=none, 1=outer, 2=full) instead of the
    /// detected one.
    #[arg(long)]
    pub border: Option<u8>,

    #[arg(long)]
    pub no_cursor: bool,

    #[arg(long)]
    pub vertical_cursor: bool,

    #[arg(long)]
    pub no_scrollbar: bool,

    #[arg(long)]
    pub no_highlight_search: bool,

    #[arg(long)]
    pub no_highlight_lines: bool,

    /// Case-insensitive search.
    #[arg(long)]
    pub ignore_case: bool,

    /// Smart-case search: fold case only when the pattern is all-lowercase.
    #[arg(long = "IGNORE-CASE")]
    pub ignore_lower_case: bool,

    #[arg(long)]
    pub hide_header_line: bool,

    #[arg(long)]
    pub highlight_odd_rec: bool,

    /// String that marks a NULL value (beyond the built-in empty-field and
    /// `\u{2205}` conventions).
    #[arg(long)]
    pub null: Option<String>,

    #[arg(long)]
    pub csv: bool,

    #[arg(long)]
    pub tsv: bool,

    /// Reload the data source every SEC seconds.
    #[arg(long)]
    pub watch: Option<u64>,

    #[arg(long)]
    pub quit_if_one_screen: bool,

    /// Override the discovered persisted-config-file path.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_long_flag_is_honored() {
        let args = CliArgs::parse_from(["pgr", "--IGNORE-CASE"]);
        assert!(args.ignore_lower_case);
        assert!(!args.ignore_case);
    }

    #[test]
    fn numeric_flags_parse() {
        let args = CliArgs::parse_from(["pgr", "--freezecols=2", "--border=2", "--watch=5"]);
        assert_eq!(args.freezecols, Some(2));
        assert_eq!(args.border, Some(2));
        assert_eq!(args.watch, Some(5));
    }
}
