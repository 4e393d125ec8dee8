use std::collections::HashMap;

use crate::{
    ast::ast::{Expr, Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Logical,
    Bitwise,
    Comparison,
    Additive,
    Multiplicative,
    Power,
    Unary,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Xor, BindingPower::Logical, parse_binary_expr);

    // Bitwise
    parser.led(TokenKind::BitwiseAnd, BindingPower::Bitwise, parse_binary_expr);
    parser.led(TokenKind::BitwiseOr, BindingPower::Bitwise, parse_binary_expr);
    parser.led(TokenKind::BitwiseLeftShift, BindingPower::Bitwise, parse_binary_expr);
    parser.led(TokenKind::BitwiseRightShift, BindingPower::Bitwise, parse_binary_expr);

    // Comparison
    parser.led(TokenKind::Equals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Comparison, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Comparison, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Minus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Multiply, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Divide, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Modulo, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::Power, BindingPower::Power, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_literal_expr);
    parser.nud(TokenKind::Float, parse_literal_expr);
    parser.nud(TokenKind::String, parse_literal_expr);
    parser.nud(TokenKind::Char, parse_literal_expr);
    parser.nud(TokenKind::Boolean, parse_literal_expr);
    parser.nud(TokenKind::Null, parse_literal_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Unary
    parser.nud(TokenKind::Plus, parse_unary_expr);
    parser.nud(TokenKind::Minus, parse_unary_expr);
    parser.nud(TokenKind::Not, parse_unary_expr);
    parser.nud(TokenKind::BitwiseNot, parse_unary_expr);

    // Statements
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Func, parse_func_decl_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::Attribute, parse_attribute_stmt);
    parser.stmt(TokenKind::OpenParen, parse_expression_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
