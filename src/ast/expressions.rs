use crate::lexer::tokens::{Token, TokenKind};

use super::{ast::Expr, types::BaseType};

/// `left <operator> right`.
///
/// `token` locates the operator in source; for desugared compound
/// assignments it is the `+=`-style token while `operator` is the plain
/// binary operator.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: TokenKind,
    pub token: Token,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub base_type: BaseType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: TokenKind,
    pub token: Token,
    pub operand: Box<Expr>,
    pub base_type: BaseType,
}

/// A call. `return_type` is `None` when the callee has no return type or
/// could not be resolved at the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: Token,
    pub arguments: Vec<Expr>,
    pub return_type: Option<BaseType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub token: Token,
    pub base_type: BaseType,
}

impl LiteralExpr {
    /// Raw lexeme, quotes included for strings and chars.
    pub fn value(&self) -> &str {
        &self.token.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: Token,
    pub base_type: BaseType,
}
