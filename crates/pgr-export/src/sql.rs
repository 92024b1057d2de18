//! SQL scalar literal formatting for `Format::SqlValues`/`Format::Insert`.

use crate::NullPolicy;

/// Render `raw` as a SQL literal: `NULL` if the trimmed value satisfies
/// `policy`, the bare token if it's a decimal number or the literal `NULL`,
/// otherwise a single-quoted string with embedded quotes doubled.
pub fn quote_sql_literal(raw: &str, policy: &NullPolicy) -> String {
    let trimmed = raw.trim();
    if policy.is_null(trimmed) {
        return "NULL".to_string();
    }
    if trimmed.eq_ignore_ascii_case("null") || is_decimal_number(trimmed) {
        trimmed.to_string()
    } else {
        format!("'{}'", trimmed.replace('\'', "''"))
    }
}

fn is_decimal_number(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut chars = s.chars().peekable();
    if matches!(chars.peek(), Some('-') | Some('+')) {
        chars.next();
    }
    let mut any_digit = false;
    let mut dots = 0;
    for c in chars {
        if c == '.' {
            dots += 1;
            if dots > 1 {
                return false;
            }
        } else if c.is_ascii_digit() {
            any_digit = true;
        } else {
            return false;
        }
    }
    any_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_decimals_pass_through_unquoted() {
        let p = NullPolicy::default();
        assert_eq!(quote_sql_literal("42", &p), "42");
        assert_eq!(quote_sql_literal("-3.14", &p), "-3.14");
    }

    #[test]
    fn two_dots_is_not_a_number() {
        let p = NullPolicy::default();
        assert_eq!(quote_sql_literal("1.2.3", &p), "'1.2.3'");
    }

    #[test]
    fn embedded_single_quote_is_doubled() {
        let p = NullPolicy::default();
        assert_eq!(quote_sql_literal("O'Brien", &p), "'O''Brien'");
    }

    #[test]
    fn null_policy_wins_over_literal_text() {
        let p = NullPolicy { empty_string_is_null: false, nullstr: Some("N/A".into()) };
        assert_eq!(quote_sql_literal("N/A", &p), "NULL");
    }
}
