//! Startup configuration: CLI flags over a persisted settings file over
//! built-in defaults, resolved once into [`EffectiveOptions`] that the rest
//! of the workspace consumes as plain typed fields.

pub mod cli;
pub mod file;
pub mod history;

pub use cli::CliArgs;
pub use file::{ConfigFileError, PersistedConfig};

use pgr_export::{Format, NullPolicy};
use pgr_search::CasePolicy;

#[derive(Debug, Clone)]
pub struct EffectiveOptions {
    pub freeze_cols: u8,
    /// `None` means "use the detected border style".
    pub border_override: Option<u8>,
    pub show_cursor: bool,
    pub vertical_cursor: bool,
    pub show_scrollbar: bool,
    pub highlight_search: bool,
    pub highlight_lines: bool,
    pub case_policy: CasePolicy,
    pub hide_header_line: bool,
    pub highlight_odd_rec: bool,
    pub null_policy: NullPolicy,
    pub input_format: Option<Format>,
    pub watch_seconds: Option<u64>,
    pub quit_if_one_screen: bool,
}

impl EffectiveOptions {
    /// CLI flags win; persisted config fills gaps; defaults fill the rest.
    pub fn resolve(args: &CliArgs, persisted: &PersistedConfig) -> Self {
        let bool_opt = |cli_flag: bool, key: &str, default: bool| -> bool {
            if cli_flag {
                true
            } else {
                persisted.get_bool(key).unwrap_or(default)
            }
        };

        let case_policy = if args.ignore_case {
            CasePolicy::IgnoreCase
        } else if args.ignore_lower_case {
            CasePolicy::IgnoreLowerCase
        } else if persisted.get_bool("ignore_case").unwrap_or(false) {
            CasePolicy::IgnoreCase
        } else if persisted.get_bool("ignore_lower_case").unwrap_or(false) {
            CasePolicy::IgnoreLowerCase
        } else {
            CasePolicy::CaseSensitive
        };

        let input_format = if args.csv {
            Some(Format::Csv)
        } else if args.tsv {
            Some(Format::TsvC)
        } else {
            None
        };

        let nullstr = args
            .null
            .clone()
            .or_else(|| persisted.get_string("null").map(str::to_string));

        Self {
            freeze_cols: args
                .freezecols
                .or_else(|| persisted.get_int("freezecols").map(|v| v as u8))
                .unwrap_or(0),
            border_override: args.border.or_else(|| persisted.get_int("border").map(|v| v as u8)),
            show_cursor: !bool_opt(args.no_cursor, "no_cursor", false),
            vertical_cursor: bool_opt(args.vertical_cursor, "vertical_cursor", false),
            show_scrollbar: !bool_opt(args.no_scrollbar, "no_scrollbar", false),
            highlight_search: !bool_opt(args.no_highlight_search, "no_highlight_search", false),
            highlight_lines: !bool_opt(args.no_highlight_lines, "no_highlight_lines", false),
            case_policy,
            hide_header_line: bool_opt(args.hide_header_line, "hide_header_line", false),
            highlight_odd_rec: bool_opt(args.highlight_odd_rec, "highlight_odd_rec", false),
            null_policy: NullPolicy { empty_string_is_null: false, nullstr },
            input_format,
            watch_seconds: args.watch.or_else(|| persisted.get_int("watch").map(|v| v as u64)),
            quit_if_one_screen: bool_opt(args.quit_if_one_screen, "quit_if_one_screen", false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_flag_overrides_persisted_value() {
        let args = CliArgs::parse_from(["pgr", "--freezecols=3"]);
        let mut persisted = PersistedConfig::default();
        persisted.set("freezecols", toml::Value::Integer(1));
        let opts = EffectiveOptions::resolve(&args, &persisted);
        assert_eq!(opts.freeze_cols, 3);
    }

    #[test]
    fn persisted_value_fills_gap_when_cli_silent() {
        let args = CliArgs::parse_from(["pgr"]);
        let mut persisted = PersistedConfig::default();
        persisted.set("freezecols", toml::Value::Integer(2));
        let opts = EffectiveOptions::resolve(&args, &persisted);
        assert_eq!(opts.freeze_cols, 2);
    }

    #[test]
    fn ignore_case_beats_ignore_lower_case_when_both_set() {
        let args = CliArgs::parse_from(["pgr", "--ignore-case", "--IGNORE-CASE"]);
        let persisted = PersistedConfig::default();
        let opts = EffectiveOptions::resolve(&args, &persisted);
        assert_eq!(opts.case_policy, CasePolicy::IgnoreCase);
    }
}
