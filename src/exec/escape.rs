// src/exec/escape.rs

//! Quoting helpers for values interpolated into shell command lines.
//!
//! Everything that originates from the user or the config file goes through
//! [`shell_quote`] before it is placed on a command line, so that it reaches
//! the tool as exactly one argument no matter what characters it contains.

/// Quote `text` as a single POSIX shell word.
///
/// The result is always wrapped in single quotes; embedded single quotes are
/// closed, escaped and reopened (`'\''`). Inside single quotes the shell
/// performs no expansion at all, so `$`, `;`, backticks and whitespace are
/// all literal.
pub fn shell_quote(text: &str) -> String {
    let safe = text.replace('\'', r"'\''");
    format!("'{safe}'")
}

/// Quote `name` as a MySQL identifier (backticks, embedded backticks doubled).
///
/// Used where a database name ends up *inside* an SQL statement; the whole
/// statement is then shell-quoted as one word on top of this.
pub fn sql_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain_and_empty() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("shop"), "'shop'");
        assert_eq!(shell_quote("my backups"), "'my backups'");
    }

    #[test]
    fn quote_embedded_single_quote() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn quote_leaves_metacharacters_inert() {
        assert_eq!(shell_quote("a; rm -rf /"), "'a; rm -rf /'");
        assert_eq!(shell_quote("$(whoami)"), "'$(whoami)'");
    }

    #[test]
    fn sql_identifier_doubles_backticks() {
        assert_eq!(sql_identifier("shop"), "`shop`");
        assert_eq!(sql_identifier("we`ird"), "`we``ird`");
    }
}
