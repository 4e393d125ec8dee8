use log::debug;

use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, LiteralExpr, UnaryExpr, VariableExpr},
        types::{binary_result_type, describe_type, unary_result_type, BaseType, SpecificType},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            let token = parser.current_token();
            return Err(Error::new(
                ErrorImpl::ExpectedExpression {
                    found: token.describe(),
                },
                token.position,
                token.len(),
            ));
        }
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep extending lhs
    while let Some(next_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&parser.current_token_kind()) {
            Some(led) => *led,
            None => break,
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    let base_type = match (left.base_type(), right.base_type()) {
        (Some(l), Some(r)) => binary_result_type(l, r),
        _ => None,
    };

    let Some(base_type) = base_type else {
        return Err(Error::new(
            ErrorImpl::IllegalOperation {
                operator: operator.value.clone(),
                left: describe_type(left.base_type()),
                right: describe_type(right.base_type()),
            },
            operator.position,
            operator.len(),
        ));
    };

    Ok(Expr::Binary(BinaryExpr {
        operator: operator.kind,
        token: operator,
        left: Box::new(left),
        right: Box::new(right),
        base_type,
    }))
}

pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let Some(base_type) = operand.base_type().and_then(unary_result_type) else {
        return Err(Error::new(
            ErrorImpl::IllegalUnaryOperation {
                operator: operator.value.clone(),
                operand: describe_type(operand.base_type()),
            },
            operator.position,
            operator.len(),
        ));
    };

    Ok(Expr::Unary(UnaryExpr {
        operator: operator.kind,
        token: operator,
        operand: Box::new(operand),
        base_type,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();
    let Some(base_type) = BaseType::of_literal(token.kind) else {
        return Err(parser.unexpected("literal"));
    };
    parser.advance();

    Ok(Expr::Literal(LiteralExpr { token, base_type }))
}

pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.peek(1).kind == TokenKind::OpenParen {
        return parse_call_expr(parser);
    }

    parse_variable_expr(parser)
}

/// A variable reference.
///
/// Inside an attribute value a built-in type name stands for its own base
/// type and functions may be named; elsewhere naming a function without
/// calling it is an error.
fn parse_variable_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.advance().clone();

    if parser.resolver().in_attribute() {
        let base_type = match SpecificType::builtin(&name.value) {
            Some(specific) => specific.base_type(),
            None => BaseType::of_declaration(parser.resolver().lookup_declared_type(&name)?),
        };

        return Ok(Expr::Variable(VariableExpr { name, base_type }));
    }

    let base_type = BaseType::of_declaration(parser.resolver().lookup_declared_type(&name)?);
    if base_type == BaseType::Function {
        return Err(Error::new(
            ErrorImpl::FunctionAsValue {
                name: name.value.clone(),
            },
            name.position,
            name.len(),
        ));
    }

    Ok(Expr::Variable(VariableExpr { name, base_type }))
}

fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (name, arguments) = parse_call(parser, true)?;
    let return_type = call_return_type(parser, &name);

    Ok(Expr::Call(CallExpr {
        name,
        arguments,
        return_type,
    }))
}

/// `name(arg, ...)`, returning the callee token and the arguments.
///
/// With `check_defined` the callee is recorded as a forward reference when
/// it is not visible yet, and rejected when it is visible but not a
/// function.
pub fn parse_call(parser: &mut Parser, check_defined: bool) -> Result<(Token, Vec<Expr>), Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;

    if check_defined {
        if let Some(symbol) = parser.resolver().lookup(&name.value) {
            if !symbol.is_function() {
                return Err(Error::new(
                    ErrorImpl::NotAFunction {
                        name: name.value.clone(),
                    },
                    name.position,
                    name.len(),
                ));
            }
        }

        parser.resolver_mut().mark_forward_reference(&name);
    }

    parser.skip_newlines();

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::EOF {
            return Err(parser.unexpected(TokenKind::CloseParen.describe()));
        }

        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
        parser.skip_newlines();
    }
    parser.advance();

    Ok((name, arguments))
}

/// Return type of a call: taken from the callee when it is visible,
/// otherwise from its declaration further down the file.
fn call_return_type(parser: &Parser, name: &Token) -> Option<BaseType> {
    if let Some(symbol) = parser.resolver().visible_function(&name.value) {
        return symbol.return_base_type();
    }

    let return_type = scan_forward_return_type(parser.tokens(), parser.get_pos(), &name.value);
    debug!(
        "forward call to '{}' typed as {}",
        name.value,
        describe_type(return_type.as_ref())
    );

    return_type
}

/// Scans the raw tokens from `from` for `func name(` or
/// `@import_symbol name(`, skips to the first `)` and reads the type after
/// an `->`, if any.
fn scan_forward_return_type(tokens: &[Token], from: usize, name: &str) -> Option<BaseType> {
    for index in from.max(1)..tokens.len() {
        let token = &tokens[index];
        let previous = &tokens[index - 1];

        let declares = previous.is(TokenKind::Func)
            || (previous.is(TokenKind::Attribute) && previous.value == "@import_symbol");
        let opens = tokens
            .get(index + 1)
            .is_some_and(|next| next.is(TokenKind::OpenParen));

        if !token.is(TokenKind::Identifier) || token.value != name || !declares || !opens {
            continue;
        }

        let close = index
            + 1
            + tokens[index + 1..]
                .iter()
                .position(|t| t.is(TokenKind::CloseParen))?;

        return match (tokens.get(close + 1), tokens.get(close + 2)) {
            (Some(arrow), Some(return_type)) if arrow.is(TokenKind::Arrow) => {
                Some(SpecificType::from_name(&return_type.value).base_type())
            }
            _ => None,
        };
    }

    None
}
