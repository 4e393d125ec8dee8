//! Scope and forward-reference resolution.
//!
//! The resolver owns the symbol tables used while parsing a single file:
//!
//! - A global table plus a stack of scope frames (function, conditional,
//!   loop, attribute); only function frames bind names
//! - Uniqueness checks across every visible table
//! - Names used before their definition, validated when the definition
//!   arrives or at the end of the file

pub mod resolver;
pub mod scope;
pub mod symbols;

#[cfg(test)]
mod tests;
