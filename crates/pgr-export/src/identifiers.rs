//! SQL identifier quoting for table/column names in `Format::Insert` and
//! `Format::InsertWithComments` output.

/// Quote `name` with double quotes (doubling any embedded `"`) unless it is
/// already a bare lowercase SQL identifier: starts with a letter, contains
/// only `[a-z0-9_]`.
pub fn quote_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let is_bare = starts_with_letter
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if is_bare {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_lowercase_identifier_is_unquoted() {
        assert_eq!(quote_identifier("customer_id"), "customer_id");
    }

    #[test]
    fn mixed_case_or_spaced_identifier_is_quoted() {
        assert_eq!(quote_identifier("Customer Id"), "\"Customer Id\"");
        assert_eq!(quote_identifier("1id"), "\"1id\"");
    }

    #[test]
    fn embedded_quote_is_doubled() {
        assert_eq!(quote_identifier("weird\"name"), "\"weird\"\"name\"");
    }
}
