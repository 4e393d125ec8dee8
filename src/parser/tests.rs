//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs together
//! with the scope, forward-reference and type checks done while parsing:
//! - Variable and function declarations
//! - Expressions, precedence and operator typing
//! - Control flow statements
//! - Attributes and imported symbols

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        statements::{AttributeValue, ElseBranch},
        types::BaseType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::{parse, Parser};

fn parse_with_parser(source: &str) -> (Parser, Result<Program, Error>) {
    let tokens = tokenize(source).unwrap();
    parse(tokens, Rc::new("test.imp".to_string()))
}

fn parse_source(source: &str) -> Result<Program, Error> {
    parse_with_parser(source).1
}

fn parse_error(source: &str) -> Error {
    parse_source(source).unwrap_err()
}

fn var_value(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::VarDecl(var) => var.value.as_ref().unwrap(),
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_source("var x: i32 = 5").unwrap();

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0] {
        Stmt::VarDecl(var) => {
            assert_eq!(var.name.value, "x");
            assert_eq!(var.type_token.value, "i32");
            assert_eq!(
                var.value.as_ref().unwrap().base_type(),
                Some(&BaseType::Integer)
            );
        }
        other => panic!("expected variable declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_declaration_without_value() {
    let program = parse_source("var name: str\nname = \"imp\"").unwrap();

    assert_eq!(program.statements.len(), 2);
    assert!(matches!(&program.statements[1], Stmt::Assignment(a) if a.name.value == "name"));
}

#[test]
fn test_redefinition_cites_first_definition() {
    let error = parse_error("var x: i32 = 5\nvar x: i32 = 6");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AlreadyDefined {
            name: "x".to_string()
        }
    );
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_notes()[0].message, "'x' defined here");
    assert_eq!(error.get_notes()[0].position.line, 1);
    assert_eq!(error.get_notes()[0].position.column, 5);
}

#[test]
fn test_forward_reference_to_later_function() {
    let program = parse_source("func main() { foo() }\nfunc foo() {}").unwrap();

    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_undefined_function_reported_at_call_site() {
    let error = parse_error("func main() { foo() }");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::NotDefined {
            name: "foo".to_string()
        }
    );
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 15);
}

#[test]
fn test_self_recursion_is_typed() {
    let program = parse_source("func fact(n: i32) -> i32 { return fact(n-1) }").unwrap();

    let Stmt::FuncDecl(func) = &program.statements[0] else {
        panic!("expected function");
    };
    let body = func.body.as_ref().unwrap();
    let Stmt::Return(ret) = &body.statements[0] else {
        panic!("expected return");
    };
    let Expr::Call(call) = &ret.value else {
        panic!("expected call");
    };

    assert_eq!(call.name.value, "fact");
    assert_eq!(call.return_type, Some(BaseType::Integer));
    assert_eq!(call.arguments[0].base_type(), Some(&BaseType::Integer));
}

#[test]
fn test_mutual_recursion() {
    let source = "func a() -> i32 {\n    return b()\n}\nfunc b() -> i32 {\n    return a()\n}";

    assert!(parse_source(source).is_ok());
}

#[test]
fn test_forward_call_typed_from_later_declaration() {
    let source = "func main() {\n    var x: i32 = later()\n}\nfunc later() -> i64 {\n    return 1\n}";

    assert!(parse_source(source).is_ok());
}

#[test]
fn test_forward_call_without_return_type_is_untyped() {
    let source = "func main() {\n    var x: i32 = later()\n}\nfunc later() {\n}";
    let error = parse_error(source);

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeMatchError {
            expected: "Integer".to_string(),
            received: "None".to_string()
        }
    );
}

#[test]
fn test_forward_reference_must_be_function() {
    let error = parse_error("func main() {\n    later()\n}\nvar later: i32 = 1");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::RequiredToBeFunction {
            name: "later".to_string()
        }
    );
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_notes()[0].position.line, 4);
}

#[test]
fn test_type_mismatch_names_both_types() {
    let error = parse_error("var x: i32 = \"hi\"");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeMatchError {
            expected: "Integer".to_string(),
            received: "String".to_string()
        }
    );
    assert_eq!(error.get_position().column, 12);
}

#[test]
fn test_binary_operand_typing() {
    let program = parse_source(
        "var a: i32 = 1 + 2\nvar b: f64 = 1 + 2.5\nvar c: f32 = 1.5 * 2.5\nvar d: str = \"a\" + \"b\"",
    )
    .unwrap();

    let types: Vec<Option<&BaseType>> = program
        .statements
        .iter()
        .map(|stmt| var_value(stmt).base_type())
        .collect();

    assert_eq!(
        types,
        vec![
            Some(&BaseType::Integer),
            Some(&BaseType::Float),
            Some(&BaseType::Float),
            Some(&BaseType::String),
        ]
    );
}

#[test]
fn test_illegal_binary_operations() {
    for source in [
        "var b: bool = true && false",
        "var x: i32 = 1 + \"a\"",
        "var c: char = 'a' + 'b'",
        "var x: i32 = 1 == null",
    ] {
        let error = parse_error(source);
        assert!(
            matches!(error.get_impl(), ErrorImpl::IllegalOperation { .. }),
            "{}: {:?}",
            source,
            error
        );
    }

    let error = parse_error("var x: i32 = 1 + \"a\"");
    assert_eq!(
        error.to_string(),
        "illegal operation ('+') on types 'Integer' and 'String'"
    );
}

#[test]
fn test_operator_precedence() {
    let program = parse_source("var x: i32 = 1 + 2 * 3 ^ 2 < 4 && 5").unwrap();

    let Expr::Binary(and) = var_value(&program.statements[0]) else {
        panic!("expected binary expression");
    };
    assert_eq!(and.operator, TokenKind::And);

    let Expr::Binary(less) = and.left.as_ref() else {
        panic!("expected comparison");
    };
    assert_eq!(less.operator, TokenKind::Less);

    let Expr::Binary(plus) = less.left.as_ref() else {
        panic!("expected addition");
    };
    assert_eq!(plus.operator, TokenKind::Plus);

    let Expr::Binary(times) = plus.right.as_ref() else {
        panic!("expected multiplication");
    };
    assert_eq!(times.operator, TokenKind::Multiply);
    assert!(matches!(times.right.as_ref(), Expr::Binary(power) if power.operator == TokenKind::Power));
}

#[test]
fn test_left_associativity_and_grouping() {
    let program = parse_source("var x: i32 = (1 - 2) - 3\nvar y: i32 = 1 - (2 - 3)").unwrap();

    let Expr::Binary(first) = var_value(&program.statements[0]) else {
        panic!("expected binary expression");
    };
    assert!(matches!(first.left.as_ref(), Expr::Binary(_)));
    assert!(matches!(first.right.as_ref(), Expr::Literal(_)));

    let Expr::Binary(second) = var_value(&program.statements[1]) else {
        panic!("expected binary expression");
    };
    assert!(matches!(second.left.as_ref(), Expr::Literal(_)));
    assert!(matches!(second.right.as_ref(), Expr::Binary(_)));
}

#[test]
fn test_unary_expressions() {
    let program = parse_source("var x: i32 = -5\nvar y: f64 = -(1.5)").unwrap();

    assert_eq!(var_value(&program.statements[0]).base_type(), Some(&BaseType::Integer));
    assert_eq!(var_value(&program.statements[1]).base_type(), Some(&BaseType::Float));

    let error = parse_error("var b: bool = !true");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::IllegalUnaryOperation {
            operator: "!".to_string(),
            operand: "Boolean".to_string()
        }
    );
}

#[test]
fn test_attribute_after_statement_fails() {
    let error = parse_error("@entry\nvar x: i32 = 1\nvar y: i32 = 2\n@late");

    assert_eq!(error.get_impl(), &ErrorImpl::AttributeOrder);
    assert_eq!(error.get_position().line, 4);

    let error = parse_error("var x: i32 = 1\n@late");
    assert_eq!(error.get_impl(), &ErrorImpl::AttributeOrder);
}

#[test]
fn test_import_symbol() {
    let program =
        parse_source("@entry\n@import_symbol printf(str, i32) -> i32\n@version 3\nprintf(\"%d\", 4)")
            .unwrap();

    assert_eq!(program.attributes.len(), 3);
    assert!(program.attributes[0].value.is_none());

    let Some(AttributeValue::Import(import)) = &program.attributes[1].value else {
        panic!("expected import");
    };
    assert!(import.is_import());
    assert!(import.body.is_none());
    assert_eq!(import.name.value, "printf");
    assert_eq!(import.parameters.len(), 2);
    assert!(import.parameters.iter().all(|p| p.name.is_none()));
    assert_eq!(import.parameters[1].type_token.value, "i32");
    assert_eq!(import.return_base_type(), Some(BaseType::Integer));

    assert!(matches!(
        &program.attributes[2].value,
        Some(AttributeValue::Expression(Expr::Literal(_)))
    ));

    let Stmt::Expression(Expr::Call(call)) = &program.statements[0] else {
        panic!("expected call");
    };
    assert_eq!(call.return_type, Some(BaseType::Integer));
}

#[test]
fn test_import_symbol_requires_type_arguments() {
    let error = parse_error("@import_symbol puts(1)");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ExpectedArgumentType {
            found: "1".to_string()
        }
    );
}

#[test]
fn test_symbol_definition_outside_import() {
    let error = parse_error("@extern puts(str)");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::SymbolOutsideImport {
            attribute: "@extern".to_string()
        }
    );
}

#[test]
fn test_attribute_value_needs_terminator() {
    let error = parse_error("@import_symbol puts(str) -> i32 extra");

    assert!(matches!(
        error.get_impl(),
        ErrorImpl::ExpectedAttributeTerminator { .. }
    ));
}

#[test]
fn test_nested_function_rejected() {
    let error = parse_error("func outer() {\n    func inner() {}\n}");

    assert_eq!(error.get_impl(), &ErrorImpl::NestedFunction);
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_conditional_definition_rejected() {
    let error = parse_error("func main() {\n    if 1 {\n        var x: i32 = 1\n    }\n}");

    assert_eq!(error.get_impl(), &ErrorImpl::ConditionalDefinition);
    assert_eq!(error.get_position().line, 3);
}

#[test]
fn test_loop_body_shares_function_scope() {
    let error = parse_error(
        "func main() {\n    while 1 {\n        var i: i32 = 0\n    }\n    var i: i32 = 1\n}",
    );

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AlreadyDefined {
            name: "i".to_string()
        }
    );
}

#[test]
fn test_parameters_are_locals() {
    let program = parse_source(
        "func add(a: i32, b: i32) -> i32 {\n    return a + b\n}\nvar a: str = \"outside\"",
    )
    .unwrap();

    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_function_used_as_value() {
    let error = parse_error("func f() {}\nvar x: i32 = f");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::FunctionAsValue {
            name: "f".to_string()
        }
    );
}

#[test]
fn test_calling_a_variable() {
    let error = parse_error("var x: i32 = 1\nx()");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::NotAFunction {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_assignment_to_undeclared_variable() {
    let error = parse_error("x = 1");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AssignToUndeclared {
            name: "x".to_string()
        }
    );
}

#[test]
fn test_assignment_type_mismatch() {
    let error = parse_error("var x: i32 = 1\nx = 2.5");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeMatchError {
            expected: "Integer".to_string(),
            received: "Float".to_string()
        }
    );
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().column, 3);
}

#[test]
fn test_compound_assignment_desugars() {
    let program = parse_source("var x: i32 = 1\nx += 2").unwrap();

    let Stmt::Assignment(assignment) = &program.statements[1] else {
        panic!("expected assignment");
    };
    let Expr::Binary(binary) = &assignment.value else {
        panic!("expected desugared binary expression");
    };

    assert_eq!(binary.operator, TokenKind::Plus);
    assert_eq!(binary.token.kind, TokenKind::PlusAssign);
    assert!(matches!(binary.left.as_ref(), Expr::Variable(v) if v.name.value == "x"));
    assert!(matches!(binary.right.as_ref(), Expr::Literal(l) if l.value() == "2"));
    assert_eq!(binary.base_type, BaseType::Integer);
}

#[test]
fn test_if_else_chain() {
    let source = "var x: i32 = 1\nif x == 1 {\n    x = 2\n}\nelse if x == 2 {\n    x = 3\n} else {\n    x = 4\n}\nx = 5";
    let program = parse_source(source).unwrap();

    assert_eq!(program.statements.len(), 3);

    let Stmt::If(if_stmt) = &program.statements[1] else {
        panic!("expected if");
    };
    let Some(ElseBranch::If(nested)) = &if_stmt.else_branch else {
        panic!("expected else if");
    };
    assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
}

#[test]
fn test_if_without_else_keeps_following_statement() {
    let program = parse_source("var x: i32 = 1\nif x {\n}\n\n\nx = 2").unwrap();

    assert_eq!(program.statements.len(), 3);
    assert!(matches!(&program.statements[1], Stmt::If(i) if i.else_branch.is_none()));
}

#[test]
fn test_while_break_continue() {
    let source = "func main() {\n    while 1 {\n        break\n        continue;\n    }\n}";
    let program = parse_source(source).unwrap();

    let Stmt::FuncDecl(func) = &program.statements[0] else {
        panic!("expected function");
    };
    let Stmt::While(while_stmt) = &func.body.as_ref().unwrap().statements[0] else {
        panic!("expected while");
    };

    assert!(matches!(while_stmt.body.statements[0], Stmt::Break(_)));
    assert!(matches!(while_stmt.body.statements[1], Stmt::Continue(_)));
}

#[test]
fn test_bare_return_is_null() {
    let program = parse_source("func f() {\n    return\n}\nfunc g() { return }").unwrap();

    for stmt in &program.statements {
        let Stmt::FuncDecl(func) = stmt else {
            panic!("expected function");
        };
        let Stmt::Return(ret) = &func.body.as_ref().unwrap().statements[0] else {
            panic!("expected return");
        };
        assert_eq!(ret.value.base_type(), Some(&BaseType::Null));
    }
}

#[test]
fn test_statement_needs_terminator() {
    let error = parse_error("var x: i32 = 1 var y: i32 = 2");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ExpectedTerminator {
            found: "keyword var".to_string()
        }
    );

    let error = parse_error("var x: i32 = 1 }");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ExpectedTerminator {
            found: "closing brace".to_string()
        }
    );
}

#[test]
fn test_semicolons_separate_statements() {
    let program = parse_source("var x: i32 = 1; var y: i32 = 2;; x = y").unwrap();

    assert_eq!(program.statements.len(), 3);
}

#[test]
fn test_unexpected_keyword() {
    let error = parse_error("else {}");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedKeyword {
            keyword: "else".to_string()
        }
    );
}

#[test]
fn test_unterminated_block() {
    let error = parse_error("func f() {\n    var x: i32 = 1\n");

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            expected: "closing brace".to_string(),
            found: "end of file".to_string()
        }
    );
}

#[test]
fn test_parenthesized_expression_statement() {
    let program = parse_source("(1 + 2) * 3").unwrap();

    assert!(matches!(
        &program.statements[0],
        Stmt::Expression(Expr::Binary(b)) if b.operator == TokenKind::Multiply
    ));
}

#[test]
fn test_literal_range_warnings() {
    let (parser, result) =
        parse_with_parser("var a: u8 = 300\nvar b: i8 = -128\nvar c: i8 = -129\nvar d: f32 = 1.0");

    assert!(result.is_ok());
    assert_eq!(parser.get_file().as_str(), "test.imp");
    assert_eq!(parser.warnings().len(), 2);
    assert_eq!(parser.warnings()[0].position.line, 1);
    assert_eq!(parser.warnings()[1].position.line, 3);
    assert_eq!(parser.warnings()[1].length, 4);
}
