// ABOUTME: Single-quote escaping for values the tool places into shell commands.
// ABOUTME: Operator templates are never passed through here.

/// Wrap `value` in single quotes, escaping embedded quotes as `'\''`.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_value() {
        assert_eq!(quote("/var/www"), "'/var/www'");
    }

    #[test]
    fn escapes_embedded_quote() {
        assert_eq!(quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn empty_value_stays_an_argument() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn metacharacters_are_inert() {
        assert_eq!(quote("v1.0.0 $(rm -rf /)"), "'v1.0.0 $(rm -rf /)'");
    }
}
