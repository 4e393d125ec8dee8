//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using a priority ordered regex table
//! - Recognition of keywords, identifiers, attributes, literals and operators
//! - Token position tracking (byte offset, line, column) for diagnostics
//! - Comments and intra-line whitespace, which are dropped
//!
//! Newlines are kept as tokens because they terminate statements.

pub mod lexer;
pub mod tokens;
