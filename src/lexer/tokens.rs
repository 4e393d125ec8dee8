use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("func", TokenKind::Func);
        map.insert("return", TokenKind::Return);
        map.insert("var", TokenKind::Var);
        map.insert("true", TokenKind::Boolean);
        map.insert("false", TokenKind::Boolean);
        map.insert("null", TokenKind::Null);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Newline,

    Identifier,
    Attribute,
    Integer,
    Float,
    String,
    Char,
    Boolean,
    Null,

    Arrow,

    // Comparison
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,

    // Assignment
    Assign,
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    PowerAssign,
    ModuloAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseLeftShiftAssign,
    BitwiseRightShiftAssign,

    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Modulo,

    // Logical
    And,
    Or,
    Xor,
    Not,

    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseNot,
    BitwiseLeftShift,
    BitwiseRightShift,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,

    Comma,
    Semicolon,
    Colon,

    // Reserved
    If,
    Else,
    While,
    Break,
    Continue,
    Func,
    Return,
    Var,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Func
                | TokenKind::Return
                | TokenKind::Var
        )
    }

    /// Kinds whose lexeme is worth quoting back to the user.
    pub fn carries_value(&self) -> bool {
        self.is_keyword()
            || matches!(
                self,
                TokenKind::Identifier
                    | TokenKind::Attribute
                    | TokenKind::Integer
                    | TokenKind::Float
                    | TokenKind::String
                    | TokenKind::Char
            )
    }

    pub fn is_assignment(&self) -> bool {
        self.compound_operator().is_some() || *self == TokenKind::Assign
    }

    /// The binary operator a compound assignment desugars to.
    pub fn compound_operator(&self) -> Option<TokenKind> {
        match self {
            TokenKind::PlusAssign => Some(TokenKind::Plus),
            TokenKind::MinusAssign => Some(TokenKind::Minus),
            TokenKind::MultiplyAssign => Some(TokenKind::Multiply),
            TokenKind::DivideAssign => Some(TokenKind::Divide),
            TokenKind::PowerAssign => Some(TokenKind::Power),
            TokenKind::ModuloAssign => Some(TokenKind::Modulo),
            TokenKind::AndAssign => Some(TokenKind::And),
            TokenKind::OrAssign => Some(TokenKind::Or),
            TokenKind::XorAssign => Some(TokenKind::Xor),
            TokenKind::BitwiseAndAssign => Some(TokenKind::BitwiseAnd),
            TokenKind::BitwiseOrAssign => Some(TokenKind::BitwiseOr),
            TokenKind::BitwiseLeftShiftAssign => Some(TokenKind::BitwiseLeftShift),
            TokenKind::BitwiseRightShiftAssign => Some(TokenKind::BitwiseRightShift),
            _ => None,
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }

    /// Name used in diagnostics: punctuation gets a readable phrase, everything
    /// else its lower-case kind name.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::OpenParen => "opening parenthesis",
            TokenKind::CloseParen => "closing parenthesis",
            TokenKind::OpenCurly => "opening brace",
            TokenKind::CloseCurly => "closing brace",
            TokenKind::OpenBracket => "opening bracket",
            TokenKind::CloseBracket => "closing bracket",
            TokenKind::Assign => "assignment operator",
            TokenKind::EOF => "end of file",
            TokenKind::Newline => "newline",
            TokenKind::Identifier => "identifier",
            TokenKind::Attribute => "attribute",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::Arrow => "arrow",
            TokenKind::Comma => "comma",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Colon => "colon",
            kind if kind.is_keyword() => "keyword",
            kind if kind.is_assignment() => "compound assignment",
            _ => "operator",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.carries_value() {
            write!(
                f,
                "Token({}, {:?}, line={}, column={})",
                self.kind, self.value, self.position.line, self.position.column
            )
        } else {
            write!(
                f,
                "Token({}, line={}, column={})",
                self.kind, self.position.line, self.position.column
            )
        }
    }
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Width of the token in columns, used for caret underlines.
    pub fn len(&self) -> usize {
        self.value.chars().count().max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// "identifier foo", "closing brace", "operator '+'"...
    pub fn describe(&self) -> String {
        if self.kind.carries_value() {
            format!("{} {}", self.kind.describe(), self.value)
        } else if self.kind.describe() == "operator" || self.kind.describe() == "compound assignment" {
            format!("{} '{}'", self.kind.describe(), self.value)
        } else {
            self.kind.describe().to_string()
        }
    }
}
