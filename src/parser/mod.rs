//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, assignments, calls, control flow)
//! - Expression parsing (binary and unary ops, function calls, literals)
//! - Attributes, including `@import_symbol` declarations
//! - Symbol definition, scope checks and type propagation, performed in the
//!   same pass through the file's `Resolver`
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
