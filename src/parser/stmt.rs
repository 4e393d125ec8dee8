use log::debug;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{BinaryExpr, LiteralExpr, VariableExpr},
        statements::{
            AssignmentStmt, AttributeStmt, AttributeValue, BlockStmt, ElseBranch, FuncDeclStmt,
            IfStmt, Parameter, ReturnStmt, VarDeclStmt, WhileStmt,
        },
        types::{binary_result_type, describe_type, BaseType, SpecificType},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    resolver::{scope::FrameKind, symbols::Symbol},
    MK_TOKEN,
};

use super::{
    expr::{parse_call, parse_expr},
    lookups::BindingPower,
    parser::Parser,
};

/// Parses one statement, including the check for its terminator.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    let handler = match parser.get_stmt_lookup().get(&kind) {
        Some(handler) => *handler,
        None => {
            let token = parser.current_token();
            let error = if kind.is_keyword() {
                ErrorImpl::UnexpectedKeyword {
                    keyword: token.value.clone(),
                }
            } else {
                ErrorImpl::UnexpectedToken {
                    expected: String::from("statement"),
                    found: token.describe(),
                }
            };
            return Err(Error::new(error, token.position, token.len()));
        }
    };

    let stmt = handler(parser)?;
    expect_terminator(parser)?;

    Ok(stmt)
}

fn expect_terminator(parser: &Parser) -> Result<(), Error> {
    if parser.at_statement_end() {
        return Ok(());
    }

    let token = parser.current_token();
    Err(Error::new(
        ErrorImpl::ExpectedTerminator {
            found: token.describe(),
        },
        token.position,
        token.len(),
    ))
}

/// `{` statements `}`. Blank lines and semicolons between statements are
/// skipped.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    parser.enter_block();

    let mut statements = vec![];
    parser.skip_terminators();

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::EOF {
            return Err(parser.unexpected(TokenKind::CloseCurly.describe()));
        }

        statements.push(parse_stmt(parser)?);
        parser.skip_terminators();
    }

    parser.exit_block();
    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt { statements })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if(parser)?))
}

fn parse_if(parser: &mut Parser) -> Result<IfStmt, Error> {
    let keyword = parser.advance().clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();

    parser.enter_scope(FrameKind::Conditional, &keyword)?;
    let body = parse_block(parser)?;
    parser.exit_scope(FrameKind::Conditional)?;

    let skipped = parser.skip_newlines();

    if parser.current_token_kind() != TokenKind::Else {
        // The newlines belong to whoever parses the next statement.
        parser.rewind(skipped);
        return Ok(IfStmt {
            condition,
            body,
            else_branch: None,
        });
    }

    let else_token = parser.advance().clone();
    parser.skip_newlines();

    parser.enter_scope(FrameKind::Conditional, &else_token)?;
    let else_branch = if parser.current_token_kind() == TokenKind::If {
        ElseBranch::If(Box::new(parse_if(parser)?))
    } else {
        ElseBranch::Block(parse_block(parser)?)
    };
    parser.exit_scope(FrameKind::Conditional)?;

    Ok(IfStmt {
        condition,
        body,
        else_branch: Some(else_branch),
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance().clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();

    parser.enter_scope(FrameKind::Loop, &keyword)?;
    let body = parse_block(parser)?;
    parser.exit_scope(FrameKind::Loop)?;

    Ok(Stmt::While(WhileStmt { condition, body }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Break(parser.advance().clone()))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Continue(parser.advance().clone()))
}

/// `func name(a: type, ...) -> type { body }`
///
/// The function is bound twice: a bodiless placeholder right after the
/// signature, so the body can call it, and the finished declaration once the
/// body is parsed.
pub fn parse_func_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance().clone();
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;

    parser.enter_scope(FrameKind::Function, &keyword)?;

    let mut parameters = vec![];
    parser.skip_newlines();

    while parser.current_token_kind() != TokenKind::CloseParen {
        let parameter_name = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let type_token = parser.expect(TokenKind::Identifier)?;

        parser
            .resolver_mut()
            .define(Symbol::parameter(&parameter_name, &type_token))?;

        parameters.push(Parameter {
            name: Some(parameter_name),
            type_token,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
        parser.skip_newlines();
    }
    parser.advance();

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?)
    } else {
        None
    };

    parser.skip_newlines();

    let mut func = FuncDeclStmt {
        keyword,
        name,
        parameters,
        return_type,
        body: None,
    };
    parser.resolver_mut().define(Symbol::function(&func))?;

    let body = parse_block(parser)?;
    parser.exit_scope(FrameKind::Function)?;

    func.body = Some(body);
    parser.resolver_mut().delete(&func.name.value);
    parser.resolver_mut().define(Symbol::function(&func))?;

    debug!(
        "function '{}' with {} parameter(s)",
        func.name.value,
        func.parameters.len()
    );

    Ok(Stmt::FuncDecl(func))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance().clone();

    let value = if parser.at_statement_end() {
        Expr::Literal(LiteralExpr {
            token: MK_TOKEN!(TokenKind::Null, String::from("null"), keyword.position),
            base_type: BaseType::Null,
        })
    } else {
        parse_expr(parser, BindingPower::Default)?
    };

    Ok(Stmt::Return(ReturnStmt { keyword, value }))
}

/// `var name: type` with an optional `= value`.
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let type_token = parser.expect(TokenKind::Identifier)?;

    if parser.at_statement_end() {
        let var = VarDeclStmt {
            name,
            type_token,
            value: None,
        };
        parser.resolver_mut().define(Symbol::variable(&var))?;

        return Ok(Stmt::VarDecl(var));
    }

    if parser.current_token_kind() != TokenKind::Assign {
        return Err(parser.unexpected("newline, semicolon or assignment"));
    }
    let assign = parser.advance().clone();

    let value = parse_expr(parser, BindingPower::Default)?;

    let specific = SpecificType::from_name(&type_token.value);
    let expected = specific.base_type();
    if value.base_type() != Some(&expected) {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: expected.to_string(),
                received: describe_type(value.base_type()),
            },
            assign.position,
            assign.len(),
        ));
    }

    check_literal_range(parser, &specific, &value);

    let var = VarDeclStmt {
        name,
        type_token,
        value: Some(value),
    };
    parser.resolver_mut().define(Symbol::variable(&var))?;

    Ok(Stmt::VarDecl(var))
}

/// Warns when a literal initializer does not fit its declared sized type.
fn check_literal_range(parser: &mut Parser, specific: &SpecificType, value: &Expr) {
    let (negative, literal) = match value {
        Expr::Literal(literal) => (false, literal),
        Expr::Unary(unary) if unary.operator == TokenKind::Minus => match unary.operand.as_ref() {
            Expr::Literal(literal) => (true, literal),
            _ => return,
        },
        _ => return,
    };

    let position = value.token().position;
    let length = literal.token.len() + usize::from(negative);
    let sign = if negative { "-" } else { "" };

    match literal.token.kind {
        TokenKind::Integer => {
            let Some((min, max)) = specific.int_bounds() else {
                return;
            };
            let magnitude = literal.value().parse::<i128>().unwrap_or(i128::MAX);
            let number = if negative { -magnitude } else { magnitude };

            if number < min || number > max {
                parser.warn(
                    format!(
                        "literal {}{} is out of range for type '{}' ({}..={})",
                        sign,
                        literal.value(),
                        specific,
                        min,
                        max
                    ),
                    position,
                    length,
                );
            }
        }
        TokenKind::Float => {
            let Some(max) = specific.float_max() else {
                return;
            };
            let magnitude = literal.value().parse::<f64>().unwrap_or(f64::INFINITY);

            if magnitude > max {
                parser.warn(
                    format!(
                        "literal {}{} is out of range for type '{}'",
                        sign,
                        literal.value(),
                        specific
                    ),
                    position,
                    length,
                );
            }
        }
        _ => {}
    }
}

/// Identifier-led statements: assignment, call, or a bare expression.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek(1).kind.is_assignment() {
        return parse_assignment(parser);
    }

    parse_expression_stmt(parser)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Expression(parse_expr(parser, BindingPower::Default)?))
}

/// `name = value` or `name <op>= value`, the latter desugared to
/// `name = name <op> value`.
fn parse_assignment(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.advance().clone();
    let operator = parser.advance().clone();

    let value = parse_expr(parser, BindingPower::Default)?;

    let declared = match parser.resolver().lookup_declared_type(&name) {
        Ok(declared) => declared.clone(),
        Err(_) => {
            return Err(Error::new(
                ErrorImpl::AssignToUndeclared {
                    name: name.value.clone(),
                },
                name.position,
                name.len(),
            ))
        }
    };

    let expected = BaseType::of_declaration(&declared);
    if value.base_type() != Some(&expected) {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: expected.to_string(),
                received: describe_type(value.base_type()),
            },
            operator.position,
            operator.len(),
        ));
    }

    let value = match operator.kind.compound_operator() {
        Some(binary_operator) => {
            let base_type = binary_result_type(&expected, &expected).ok_or_else(|| {
                Error::new(
                    ErrorImpl::IllegalOperation {
                        operator: operator.value.clone(),
                        left: expected.to_string(),
                        right: expected.to_string(),
                    },
                    operator.position,
                    operator.len(),
                )
            })?;

            Expr::Binary(BinaryExpr {
                operator: binary_operator,
                token: operator,
                left: Box::new(Expr::Variable(VariableExpr {
                    name: name.clone(),
                    base_type: expected,
                })),
                right: Box::new(value),
                base_type,
            })
        }
        None => value,
    };

    Ok(Stmt::Assignment(AssignmentStmt { name, value }))
}

/// `@name`, `@name <expression>` or
/// `@import_symbol name(type, ...) -> type`.
pub fn parse_attribute_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    if parser.at_statement_end() {
        return Ok(Stmt::Attribute(AttributeStmt { token, value: None }));
    }

    parser.enter_scope(FrameKind::Attribute, &token)?;

    let value = if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek(1).kind == TokenKind::OpenParen
    {
        AttributeValue::Import(parse_import(parser, &token)?)
    } else {
        AttributeValue::Expression(parse_expr(parser, BindingPower::Default)?)
    };

    if !matches!(
        parser.current_token_kind(),
        TokenKind::Newline | TokenKind::Semicolon | TokenKind::EOF
    ) {
        let found = parser.current_token();
        return Err(Error::new(
            ErrorImpl::ExpectedAttributeTerminator {
                found: found.describe(),
            },
            found.position,
            found.len(),
        ));
    }

    parser.exit_scope(FrameKind::Attribute)?;

    Ok(Stmt::Attribute(AttributeStmt {
        token,
        value: Some(value),
    }))
}

/// Declares an external function. Every argument is a type name and the
/// resulting declaration has unnamed parameters and no body.
fn parse_import(parser: &mut Parser, attribute: &Token) -> Result<FuncDeclStmt, Error> {
    if attribute.value != "@import_symbol" {
        return Err(Error::new(
            ErrorImpl::SymbolOutsideImport {
                attribute: attribute.value.clone(),
            },
            attribute.position,
            attribute.len(),
        ));
    }

    let (name, arguments) = parse_call(parser, false)?;

    let parameters = arguments
        .into_iter()
        .map(|argument| match argument {
            Expr::Variable(variable) => Ok(Parameter {
                name: None,
                type_token: variable.name,
            }),
            other => {
                let token = other.token();
                Err(Error::new(
                    ErrorImpl::ExpectedArgumentType {
                        found: token.value.clone(),
                    },
                    token.position,
                    token.len(),
                ))
            }
        })
        .collect::<Result<Vec<Parameter>, Error>>()?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?)
    } else {
        None
    };

    let import = FuncDeclStmt {
        keyword: attribute.clone(),
        name,
        parameters,
        return_type,
        body: None,
    };
    parser.resolver_mut().define(Symbol::function(&import))?;

    debug!("imported symbol '{}'", import.name.value);

    Ok(import)
}
