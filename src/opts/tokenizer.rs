//! Tokenizer — raw option string → option tokens.

use thiserror::Error;

/// Errors produced while splitting an option string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// Input ended inside a quoted region.
    #[error("unterminated {quote} quote in option string: {input}")]
    UnterminatedQuote {
        /// The quote character left open (`'` or `"`).
        quote: char,
        /// The full string as supplied, for the operator to fix.
        input: String,
    },
}

/// Split a raw option string into tokens using shell-like quoting rules.
///
/// - `'...'` is literal, no escapes.
/// - `"..."` is literal except `\x` yields `x`.
/// - Unquoted `\x` yields `x`; whitespace separates tokens.
///
/// Empty or whitespace-only input yields no tokens. A trailing lone backslash
/// is kept as a literal backslash.
pub fn tokenize(raw: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for c in raw.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        if in_single {
            if c == '\'' {
                in_single = false;
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '\\' => escaped = true,
            '"' => in_double = !in_double,
            '\'' if !in_double => in_single = true,
            c if c.is_whitespace() && !in_double => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_single || in_double {
        return Err(TokenizeError::UnterminatedQuote {
            quote: if in_single { '\'' } else { '"' },
            input: raw.to_string(),
        });
    }

    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(raw: &str) -> Vec<String> {
        tokenize(raw).unwrap()
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(toks("").is_empty());
        assert!(toks("   ").is_empty());
        assert!(toks("\t \n").is_empty());
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(toks("  -Xmx1g   -Xss1m  "), vec!["-Xmx1g", "-Xss1m"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(toks(r"-Da='x \y z'"), vec![r"-Da=x \y z"]);
    }

    #[test]
    fn double_quotes_honor_escapes() {
        assert_eq!(toks(r#"-Da="x \"y\" z""#), vec![r#"-Da=x "y" z"#]);
        assert_eq!(toks(r#""it's""#), vec!["it's"]);
    }

    #[test]
    fn backslash_escapes_outside_quotes() {
        assert_eq!(toks(r"hello\ world next"), vec!["hello world", "next"]);
        assert_eq!(toks(r"a\'b"), vec!["a'b"]);
    }

    #[test]
    fn adjacent_quoted_regions_join_one_token() {
        assert_eq!(toks(r#"a'b c'"d e"f"#), vec!["ab cd ef"]);
    }

    #[test]
    fn quoted_newline_is_kept() {
        assert_eq!(toks("a'\n'b"), vec!["a\nb"]);
    }

    #[test]
    fn trailing_backslash_is_literal() {
        assert_eq!(toks(r"abc\"), vec![r"abc\"]);
    }

    #[test]
    fn unterminated_single_quote() {
        let err = tokenize("-Da='oops").unwrap_err();
        assert_eq!(
            err,
            TokenizeError::UnterminatedQuote {
                quote: '\'',
                input: "-Da='oops".to_string(),
            }
        );
        assert!(err.to_string().contains("-Da='oops"));
    }

    #[test]
    fn unterminated_double_quote() {
        assert!(matches!(
            tokenize(r#"-Da="x \" y"#),
            Err(TokenizeError::UnterminatedQuote { quote: '"', .. })
        ));
    }

    #[test]
    fn escaped_quote_does_not_open_region() {
        assert_eq!(toks(r#"\"x"#), vec![r#""x"#]);
    }
}
