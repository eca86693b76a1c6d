use std::env;
use std::io::{self, Write};

pub fn split_args(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Drops one pair of matching surrounding quotes.
pub fn strip_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 && b[0] == b[b.len() - 1] && (b[0] == b'"' || b[0] == b'\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

pub fn echo(line: &str, out: &mut dyn Write) -> io::Result<()> {
    let text = line.get(4..).unwrap_or("").trim_start();
    writeln!(out, "{}", strip_quotes(text))
}

/// `\e NAME` or `\e $NAME`. List-like values are printed one element per line.
pub fn env(line: &str, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
    let Some(token) = line.get(2..).and_then(|rest| rest.split_whitespace().next()) else {
        return Ok(());
    };
    let name = token.strip_prefix('$').unwrap_or(token);
    if name.is_empty() {
        return Ok(());
    }

    let Some(value) = env::var_os(name) else {
        return writeln!(err, "{}: not found", name);
    };
    let value = value.to_string_lossy();
    if value.contains(':') {
        for part in value.split(':').filter(|p| !p.is_empty()) {
            writeln!(out, "{}", part)?;
        }
        Ok(())
    } else {
        writeln!(out, "{}", value)
    }
}

/// Prints what sits between the first and the last single quote.
pub fn debug(line: &str, out: &mut dyn Write) -> io::Result<()> {
    match (line.find('\''), line.rfind('\'')) {
        (Some(first), Some(last)) if first != last => writeln!(out, "{}", &line[first + 1..last]),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echoed(line: &str) -> String {
        let mut out = Vec::new();
        echo(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn env_lookup(line: &str) -> (String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        env(line, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn quotes() {
        assert_eq!(strip_quotes("\"a b\""), "a b");
        assert_eq!(strip_quotes("'a b'"), "a b");
        assert_eq!(strip_quotes("'a b\""), "'a b\"");
        assert_eq!(strip_quotes("'"), "'");
        assert_eq!(strip_quotes("''"), "");
    }

    #[test]
    fn echo_text() {
        assert_eq!(echoed("echo"), "\n");
        assert_eq!(echoed("echo    "), "\n");
        assert_eq!(echoed("echo  hello   world"), "hello   world\n");
        assert_eq!(echoed("echo 'quoted text'"), "quoted text\n");
    }

    #[test]
    fn env_scalar_and_list() {
        env::set_var("KUBSH_TEST_SCALAR", "plain");
        env::set_var("KUBSH_TEST_LIST", "/usr/bin::/bin:");

        assert_eq!(env_lookup("\\e KUBSH_TEST_SCALAR").0, "plain\n");
        assert_eq!(env_lookup("\\e $KUBSH_TEST_LIST").0, "/usr/bin\n/bin\n");
    }

    #[test]
    fn env_missing() {
        let (out, err) = env_lookup("\\e $KUBSH_TEST_UNSET_VARIABLE");

        assert_eq!(out, "");
        assert_eq!(err, "KUBSH_TEST_UNSET_VARIABLE: not found\n");
    }

    #[test]
    fn env_without_name() {
        assert_eq!(env_lookup("\\e"), (String::new(), String::new()));
        assert_eq!(env_lookup("\\e $"), (String::new(), String::new()));
    }

    #[test]
    fn debug_quotes() {
        let mut out = Vec::new();
        debug("debug 'it''s here'", &mut out).unwrap();
        debug("debug 'unterminated", &mut out).unwrap();
        debug("debug none", &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "it''s here\n");
    }
}
