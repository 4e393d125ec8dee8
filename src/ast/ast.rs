use log::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::{
    expressions::{BinaryExpr, CallExpr, LiteralExpr, UnaryExpr, VariableExpr},
    statements::{
        AssignmentStmt, AttributeStmt, FuncDeclStmt, IfStmt, ReturnStmt, VarDeclStmt, WhileStmt,
    },
    types::BaseType,
};

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FuncDecl(FuncDeclStmt),
    VarDecl(VarDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    Break(Token),
    Continue(Token),
    Return(ReturnStmt),
    Assignment(AssignmentStmt),
    Attribute(AttributeStmt),
    Expression(Expr),
}

/// Expression kinds. Every node carries the base type computed while it was
/// parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Literal(LiteralExpr),
    Variable(VariableExpr),
}

impl Expr {
    /// `None` only for calls without a known return type.
    pub fn base_type(&self) -> Option<&BaseType> {
        match self {
            Expr::Binary(expr) => Some(&expr.base_type),
            Expr::Unary(expr) => Some(&expr.base_type),
            Expr::Call(expr) => expr.return_type.as_ref(),
            Expr::Literal(expr) => Some(&expr.base_type),
            Expr::Variable(expr) => Some(&expr.base_type),
        }
    }

    /// The token diagnostics about this expression point at.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Binary(expr) => &expr.token,
            Expr::Unary(expr) => &expr.token,
            Expr::Call(expr) => &expr.name,
            Expr::Literal(expr) => &expr.token,
            Expr::Variable(expr) => &expr.name,
        }
    }
}

/// A parsed file: leading attributes, then statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub attributes: Vec<AttributeStmt>,
    pub statements: Vec<Stmt>,
    attribute_append_possible: bool,
}

impl Default for Program {
    fn default() -> Self {
        Program::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Program {
            attributes: vec![],
            statements: vec![],
            attribute_append_possible: true,
        }
    }

    /// Appends a top-level statement. Attributes are accepted only until the
    /// first other statement has been appended.
    pub fn append(&mut self, stmt: Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Attribute(attribute) => {
                if !self.attribute_append_possible {
                    return Err(Error::new(
                        ErrorImpl::AttributeOrder,
                        attribute.token.position,
                        attribute.token.len(),
                    ));
                }

                trace!("appending attribute {}", attribute.name());
                self.attributes.push(attribute);
            }
            stmt => {
                self.attribute_append_possible = false;
                self.statements.push(stmt);
            }
        }

        Ok(())
    }
}
