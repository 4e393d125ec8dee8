#![allow(clippy::module_inception)]

pub mod ast;
pub mod diagnostics;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;

extern crate regex;

/// Location of a token in the (blank-line normalised) source text.
///
/// `offset` is a byte offset, `line` and `column` are 1-based and count
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }
}

/// Returns the text of a 1-based line number, without its line terminator.
pub fn get_line(source: &str, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line - 1)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}
