/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The statement and expression enums and the Program root
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the statement nodes
/// - types: Specific and base types and the operator typing rules
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
