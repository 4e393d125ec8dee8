use crate::lexer::tokens::{Token, TokenKind};

use super::{
    ast::{Expr, Stmt},
    types::{BaseType, SpecificType},
};

/// A function parameter. Imported symbols only declare parameter types, so
/// their parameters have no name.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Option<Token>,
    pub type_token: Token,
}

/// `func name(params) -> type { body }`, or an `@import_symbol` declaration,
/// in which case `keyword` is the attribute token and there is no body.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDeclStmt {
    pub keyword: Token,
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Token>,
    pub body: Option<BlockStmt>,
}

impl FuncDeclStmt {
    pub fn is_import(&self) -> bool {
        self.keyword.is(TokenKind::Attribute)
    }

    pub fn return_base_type(&self) -> Option<BaseType> {
        self.return_type
            .as_ref()
            .map(|token| SpecificType::from_name(&token.value).base_type())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: Token,
    pub type_token: Token,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(BlockStmt),
    If(Box<IfStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// A bare `return` carries a `null` literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Expr,
}

/// `name = value`. Compound forms arrive here already desugared into a
/// binary expression over the target.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub name: Token,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Expression(Expr),
    Import(FuncDeclStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStmt {
    pub token: Token,
    pub value: Option<AttributeValue>,
}

impl AttributeStmt {
    pub fn name(&self) -> &str {
        &self.token.value
    }
}
