//! Value escaper — re-escape option values for later shell interpretation.

/// Characters that are never escaped, on top of ASCII letters and digits.
///
/// `$` stays literal so that `$VARNAME` survives until assembly time.
const SAFE_PUNCTUATION: &[char] = &['_', '-', '.', ',', ':', '/', '@', '\\', '$'];

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || SAFE_PUNCTUATION.contains(&c)
}

/// Escape a single option value.
///
/// Unsafe characters get a backslash prefix; a newline becomes `'\n'` so a
/// POSIX shell keeps it literal. The empty value becomes `''`.
pub fn escape_value(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(value.len() * 2);
    for c in value.chars() {
        match c {
            '\n' => out.push_str("'\n'"),
            c if is_safe(c) => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Escape the value part of a `key=value` option.
///
/// Only the text after the first `=` is touched. Bare flags (`-Xmx512M`) and
/// options whose `=` is the last character come back unchanged.
pub fn escape_option(option: &str) -> String {
    match option.split_once('=') {
        Some((key, value)) if !value.is_empty() => format!("{}={}", key, escape_value(value)),
        _ => option.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_flag_unchanged() {
        assert_eq!(escape_option("-Xmx512M"), "-Xmx512M");
        assert_eq!(escape_option("-XX:+UseG1GC"), "-XX:+UseG1GC");
    }

    #[test]
    fn trailing_equals_unchanged() {
        assert_eq!(escape_option("-Dkey="), "-Dkey=");
    }

    #[test]
    fn only_value_is_escaped() {
        assert_eq!(escape_option("-Dprop=a b(c)"), r"-Dprop=a\ b\(c\)");
        assert_eq!(escape_option("-Dk=v=w"), r"-Dk=v\=w");
    }

    #[test]
    fn key_is_never_escaped() {
        assert_eq!(escape_option("-D(odd key)=x y"), r"-D(odd key)=x\ y");
    }

    #[test]
    fn safe_characters_pass_through() {
        let value = r"abcXYZ019_-.,:/@\$HOME";
        assert_eq!(escape_value(value), value);
    }

    #[test]
    fn unsafe_characters_get_backslash() {
        assert_eq!(escape_value("50%&x;y"), r"50\%\&x\;y");
        assert_eq!(escape_value("\"q'"), "\\\"q\\'");
        assert_eq!(escape_value("a+b"), r"a\+b");
    }

    #[test]
    fn newline_becomes_quote_pair() {
        assert_eq!(escape_value("a\nb"), "a'\n'b");
    }

    #[test]
    fn empty_value_is_quoted() {
        assert_eq!(escape_value(""), "''");
    }
}
