//! Unit tests for the resolver.

use pretty_assertions::assert_eq;

use crate::{
    ast::types::BaseType,
    errors::errors::ErrorImpl,
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    resolver::Resolver,
    scope::{FrameKind, ScopeError},
    symbols::{Symbol, SymbolKind},
};

fn ident(name: &str, line: usize, column: usize) -> Token {
    Token {
        kind: TokenKind::Identifier,
        value: name.to_string(),
        position: Position::new(line * 100 + column, line, column),
    }
}

fn variable(name: &str, line: usize) -> Symbol {
    Symbol {
        name: ident(name, line, 5),
        declared: ident("i32", line, 8),
        kind: SymbolKind::Variable,
    }
}

fn function(name: &str, line: usize) -> Symbol {
    Symbol {
        name: ident(name, line, 6),
        declared: Token {
            kind: TokenKind::Func,
            value: "func".to_string(),
            position: Position::new(line * 100 + 1, line, 1),
        },
        kind: SymbolKind::Function { return_type: None },
    }
}

#[test]
fn test_define_and_lookup_global() {
    let mut resolver = Resolver::new();
    resolver.define(variable("x", 1)).unwrap();

    let declared = resolver.lookup_declared_type(&ident("x", 2, 1)).unwrap();
    assert_eq!(declared.value, "i32");
    assert_eq!(
        resolver.lookup("x").unwrap().declared_base_type(),
        BaseType::Integer
    );
}

#[test]
fn test_redefinition_cites_prior_definition() {
    let mut resolver = Resolver::new();
    resolver.define(variable("x", 1)).unwrap();

    let error = resolver.define(variable("x", 2)).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AlreadyDefined {
            name: "x".to_string()
        }
    );
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_notes()[0].message, "'x' defined here");
    assert_eq!(error.get_notes()[0].position.line, 1);
}

#[test]
fn test_locals_conflict_with_globals() {
    let mut resolver = Resolver::new();
    resolver.define(variable("x", 1)).unwrap();
    resolver.enter(FrameKind::Function).unwrap();

    assert!(resolver.define(variable("x", 2)).is_err());
}

#[test]
fn test_locals_disappear_with_their_frame() {
    let mut resolver = Resolver::new();
    resolver.enter(FrameKind::Function).unwrap();
    resolver.define(variable("y", 2)).unwrap();
    resolver.exit(FrameKind::Function).unwrap();

    assert!(resolver.lookup("y").is_none());
    resolver.define(variable("y", 5)).unwrap();
}

#[test]
fn test_blocks_share_function_namespace() {
    let mut resolver = Resolver::new();
    resolver.enter(FrameKind::Function).unwrap();
    resolver.enter(FrameKind::Loop).unwrap();
    resolver.define(variable("i", 2)).unwrap();
    resolver.exit(FrameKind::Loop).unwrap();

    assert!(resolver.lookup("i").is_some());
}

#[test]
fn test_conditional_definition_rejected() {
    let mut resolver = Resolver::new();
    resolver.enter(FrameKind::Function).unwrap();
    resolver.enter(FrameKind::Conditional).unwrap();
    resolver.enter(FrameKind::Loop).unwrap();

    let error = resolver.define(variable("x", 3)).unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::ConditionalDefinition);
}

#[test]
fn test_frame_stack_errors() {
    let mut resolver = Resolver::new();

    assert_eq!(
        resolver.exit(FrameKind::Loop),
        Err(ScopeError::EmptyStack {
            expected: FrameKind::Loop
        })
    );

    resolver.enter(FrameKind::Function).unwrap();
    assert_eq!(
        resolver.enter(FrameKind::Function),
        Err(ScopeError::AlreadyInFunction)
    );
    assert_eq!(
        resolver.exit(FrameKind::Conditional),
        Err(ScopeError::Mismatch {
            expected: FrameKind::Conditional,
            found: FrameKind::Function
        })
    );
    assert_eq!(resolver.level(), 1);
}

#[test]
fn test_forward_reference_resolved_by_function() {
    let mut resolver = Resolver::new();
    resolver.enter(FrameKind::Function).unwrap();
    resolver.mark_forward_reference(&ident("foo", 1, 15));
    assert_eq!(resolver.pending("foo").unwrap().level, 1);

    resolver.exit(FrameKind::Function).unwrap();
    assert_eq!(resolver.pending("foo").unwrap().level, 0);

    resolver.define(function("foo", 2)).unwrap();
    assert!(resolver.pending("foo").is_none());
    assert!(resolver.end_of_file().is_ok());
}

#[test]
fn test_forward_reference_requires_function() {
    let mut resolver = Resolver::new();
    resolver.mark_forward_reference(&ident("foo", 1, 1));

    let error = resolver.define(variable("foo", 2)).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::RequiredToBeFunction {
            name: "foo".to_string()
        }
    );
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_notes()[0].position.line, 2);
}

#[test]
fn test_deeper_definition_does_not_resolve_reference() {
    let mut resolver = Resolver::new();
    resolver.mark_forward_reference(&ident("foo", 1, 1));

    resolver.enter(FrameKind::Function).unwrap();
    resolver.define(variable("foo", 2)).unwrap();
    resolver.exit(FrameKind::Function).unwrap();

    assert!(resolver.pending("foo").is_some());
}

#[test]
fn test_visible_name_is_not_pending() {
    let mut resolver = Resolver::new();
    resolver.define(function("foo", 1)).unwrap();
    resolver.mark_forward_reference(&ident("foo", 2, 1));

    assert!(resolver.pending("foo").is_none());
    assert!(resolver.visible_function("foo").is_some());
}

#[test]
fn test_delete_then_redefine() {
    let mut resolver = Resolver::new();
    resolver.define(function("foo", 1)).unwrap();

    let removed = resolver.delete("foo").unwrap();
    assert_eq!(removed.name(), "foo");
    resolver.define(function("foo", 1)).unwrap();
}

#[test]
fn test_end_of_file_reports_earliest_use() {
    let mut resolver = Resolver::new();
    resolver.mark_forward_reference(&ident("later", 4, 1));
    resolver.mark_forward_reference(&ident("first", 2, 3));

    let error = resolver.end_of_file().unwrap_err();

    assert_eq!(error.to_string(), "'first' is not defined");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_notes().len(), 1);
    assert_eq!(error.get_notes()[0].message, "'later' is not defined");
}
