//! Comma splitting for list casts.
//!
//! Behaves like a POSIX shell lexer whose only separator is `,`: runs of
//! separators collapse, empty tokens are dropped, quotes group text and are
//! removed, a backslash escapes the next character outside single quotes.

/// Error splitting a comma-separated value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvError {
    #[error("no closing quotation")]
    UnclosedQuote,

    #[error("no escaped character")]
    TrailingEscape,
}

/// Split `input` into its comma-separated tokens.
///
/// Surrounding whitespace is preserved; callers strip it per element.
pub fn split_csv(input: &str) -> Result<Vec<String>, CsvError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // A quoted empty string still produces a token.
    let mut has_token = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(q) => {
                if c == q {
                    quote = None;
                } else if c == '\\' {
                    let next = chars.next().ok_or(CsvError::UnclosedQuote)?;
                    if next != q && next != '\\' {
                        current.push('\\');
                    }
                    current.push(next);
                } else {
                    current.push(c);
                }
            }
            None => match c {
                ',' => {
                    if has_token {
                        tokens.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                '\'' | '"' => {
                    quote = Some(c);
                    has_token = true;
                }
                '\\' => {
                    let next = chars.next().ok_or(CsvError::TrailingEscape)?;
                    current.push(next);
                    has_token = true;
                }
                other => {
                    current.push(other);
                    has_token = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(CsvError::UnclosedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}
