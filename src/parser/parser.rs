//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level parse
//! loop. The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and a statement handler table keyed by the leading
//! token.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! and owns the file's `Resolver`, so names are defined and checked while
//! nodes are built.

use std::{collections::HashMap, rc::Rc};

use log::{debug, info};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl, ErrorNote},
    lexer::tokens::{Token, TokenKind},
    resolver::{resolver::Resolver, scope::FrameKind, scope::ScopeError},
    Position, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The tokens to parse, always ending with `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for infix operator binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Symbol tables for this file
    resolver: Resolver,
    /// Number of enclosing `{ }` blocks
    block_depth: usize,
    /// Non-fatal findings
    warnings: Vec<ErrorNote>,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// An `EOF` token is appended when the stream does not already end with
    /// one.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if !tokens.last().is_some_and(|token| token.is(TokenKind::EOF)) {
            let position = tokens
                .last()
                .map(|token| token.position)
                .unwrap_or_default();
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::new(), position));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            resolver: Resolver::new(),
            block_depth: 0,
            warnings: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Looks `n` tokens ahead; past the end this is the `EOF` token.
    pub fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Advances to the next token and returns the previous token.
    /// The cursor never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Moves the cursor back over `count` tokens.
    pub fn rewind(&mut self, count: usize) {
        self.pos = self.pos.saturating_sub(count);
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Expects a token of the specified kind and consumes it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(self.unexpected(expected_kind.describe()));
        }

        Ok(self.advance().clone())
    }

    /// "expected X, got <current token>" at the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
            token.position,
            token.len(),
        )
    }

    /// Skips newline tokens and returns how many were skipped.
    pub fn skip_newlines(&mut self) -> usize {
        let mut count = 0;
        while self.current_token_kind() == TokenKind::Newline {
            self.advance();
            count += 1;
        }
        count
    }

    /// Skips newline and semicolon tokens and returns how many were skipped.
    pub fn skip_terminators(&mut self) -> usize {
        let mut count = 0;
        while self.current_token_kind().is_terminator() {
            self.advance();
            count += 1;
        }
        count
    }

    /// Whether the current token may end a statement: a newline, a
    /// semicolon, the end of the file, or (inside a block) a closing brace.
    pub fn at_statement_end(&self) -> bool {
        match self.current_token_kind() {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EOF => true,
            TokenKind::CloseCurly => self.block_depth > 0,
            _ => false,
        }
    }

    pub fn enter_block(&mut self) {
        self.block_depth += 1;
    }

    pub fn exit_block(&mut self) {
        self.block_depth = self.block_depth.saturating_sub(1);
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    /// Enters a scope frame. Opening a function inside another function is
    /// reported at `at`; other frame errors are internal.
    pub fn enter_scope(&mut self, kind: FrameKind, at: &Token) -> Result<(), Error> {
        self.resolver.enter(kind).map_err(|error| match error {
            ScopeError::AlreadyInFunction => {
                Error::new(ErrorImpl::NestedFunction, at.position, at.len())
            }
            other => self.internal_error(other),
        })
    }

    pub fn exit_scope(&mut self, kind: FrameKind) -> Result<(), Error> {
        self.resolver
            .exit(kind)
            .map_err(|error| self.internal_error(error))
    }

    fn internal_error(&self, error: ScopeError) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::Internal {
                message: error.to_string(),
            },
            token.position,
            token.len(),
        )
    }

    /// Records a non-fatal finding.
    pub fn warn(&mut self, message: String, position: Position, length: usize) {
        debug!("warning: {}", message);
        self.warnings.push(ErrorNote {
            message,
            position,
            length,
        });
    }

    pub fn warnings(&self) -> &[ErrorNote] {
        &self.warnings
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix registration leaves the binding power table alone, so tokens
    /// like `-` keep their infix precedence.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn get_file(&self) -> &Rc<String> {
        &self.file
    }
}

/// Parses a stream of tokens into a `Program`.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, parses statements until EOF and finally
/// checks that every forward reference found its definition. Parsing stops
/// at the first error.
///
/// Returns the Parser (for its warnings and final cursor) together with the
/// result.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    info!("parsing {}", file);
    let result = parse_program(&mut parser);

    (parser, result)
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let mut program = Program::new();

    loop {
        parser.skip_terminators();
        if parser.current_token_kind() == TokenKind::EOF {
            break;
        }

        let stmt = parse_stmt(parser)?;
        program.append(stmt)?;
    }

    parser.resolver().end_of_file()?;

    debug!(
        "{}: parsed {} attribute(s) and {} statement(s)",
        parser.get_file(),
        program.attributes.len(),
        program.statements.len()
    );

    Ok(program)
}
