//! Token construction shorthands shared by the lexer and the parser.
//!
//! Both macros expand to plain struct literals and closures, so the caller
//! must have `Token` (and for handlers, `Lexer`) in scope.

/// `Token { kind, value, position }`.
///
/// ```ignore
/// let eof = MK_TOKEN!(TokenKind::EOF, String::new(), lexer.current_position());
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $position:expr) => {
        Token {
            kind: $kind,
            value: $value,
            position: $position,
        }
    };
}

/// A pattern handler emitting the matched text as a token of `$kind`,
/// positioned where the match starts.
///
/// # Example
///
/// ```ignore
/// RegexPattern::new(r"\+", MK_DEFAULT_HANDLER!(TokenKind::Plus))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &Lexer, matched: &str| Some(MK_TOKEN!($kind, String::from(matched), lexer.current_position()))
    };
}
