//! Type model for the AST.
//!
//! Declared ("specific") types are the names written in source (`u8`, `f64`,
//! `str`...). Every specific type maps onto a structural base type, which is
//! what expression nodes carry and what type checks compare. Names that are
//! not built in pass through as `Unresolved`, reserved for user-defined types.

use std::fmt::Display;

use crate::lexer::tokens::{Token, TokenKind};

/// Represents the declared type names of the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecificType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Named(String),
}

impl SpecificType {
    /// Built-in type for a name, if the name is one.
    pub fn builtin(name: &str) -> Option<SpecificType> {
        let specific = match name {
            "u8" => SpecificType::U8,
            "u16" => SpecificType::U16,
            "u32" => SpecificType::U32,
            "u64" => SpecificType::U64,
            "i8" => SpecificType::I8,
            "i16" => SpecificType::I16,
            "i32" => SpecificType::I32,
            "i64" => SpecificType::I64,
            "f32" => SpecificType::F32,
            "f64" => SpecificType::F64,
            "bool" => SpecificType::Bool,
            "char" => SpecificType::Char,
            "str" => SpecificType::Str,
            _ => return None,
        };

        Some(specific)
    }

    pub fn from_name(name: &str) -> SpecificType {
        SpecificType::builtin(name).unwrap_or_else(|| SpecificType::Named(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            SpecificType::U8 => "u8",
            SpecificType::U16 => "u16",
            SpecificType::U32 => "u32",
            SpecificType::U64 => "u64",
            SpecificType::I8 => "i8",
            SpecificType::I16 => "i16",
            SpecificType::I32 => "i32",
            SpecificType::I64 => "i64",
            SpecificType::F32 => "f32",
            SpecificType::F64 => "f64",
            SpecificType::Bool => "bool",
            SpecificType::Char => "char",
            SpecificType::Str => "str",
            SpecificType::Named(name) => name,
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            SpecificType::U8
            | SpecificType::U16
            | SpecificType::U32
            | SpecificType::U64
            | SpecificType::I8
            | SpecificType::I16
            | SpecificType::I32
            | SpecificType::I64 => BaseType::Integer,
            SpecificType::F32 | SpecificType::F64 => BaseType::Float,
            SpecificType::Bool => BaseType::Boolean,
            SpecificType::Char => BaseType::Char,
            SpecificType::Str => BaseType::String,
            SpecificType::Named(name) => BaseType::Unresolved(name.clone()),
        }
    }

    /// Inclusive value range of a sized integer type.
    pub fn int_bounds(&self) -> Option<(i128, i128)> {
        let bounds = match self {
            SpecificType::U8 => (0, u8::MAX as i128),
            SpecificType::U16 => (0, u16::MAX as i128),
            SpecificType::U32 => (0, u32::MAX as i128),
            SpecificType::U64 => (0, u64::MAX as i128),
            SpecificType::I8 => (i8::MIN as i128, i8::MAX as i128),
            SpecificType::I16 => (i16::MIN as i128, i16::MAX as i128),
            SpecificType::I32 => (i32::MIN as i128, i32::MAX as i128),
            SpecificType::I64 => (i64::MIN as i128, i64::MAX as i128),
            _ => return None,
        };

        Some(bounds)
    }

    /// Largest finite magnitude of a float type.
    pub fn float_max(&self) -> Option<f64> {
        match self {
            SpecificType::F32 => Some(f32::MAX as f64),
            SpecificType::F64 => Some(f64::MAX),
            _ => None,
        }
    }
}

impl Display for SpecificType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Structural type category carried by expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Integer,
    Float,
    Boolean,
    Char,
    String,
    Null,
    Function,
    Unresolved(String),
}

impl BaseType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, BaseType::Integer | BaseType::Float)
    }

    /// Base type of a literal token, `None` for non-literal kinds.
    pub fn of_literal(kind: TokenKind) -> Option<BaseType> {
        match kind {
            TokenKind::Integer => Some(BaseType::Integer),
            TokenKind::Float => Some(BaseType::Float),
            TokenKind::String => Some(BaseType::String),
            TokenKind::Char => Some(BaseType::Char),
            TokenKind::Boolean => Some(BaseType::Boolean),
            TokenKind::Null => Some(BaseType::Null),
            _ => None,
        }
    }

    /// Base type of the token a binding was declared with: a type name for
    /// variables and parameters, the `func` keyword or `@import_symbol`
    /// attribute for functions.
    pub fn of_declaration(token: &Token) -> BaseType {
        match token.kind {
            TokenKind::Func | TokenKind::Attribute => BaseType::Function,
            _ => SpecificType::from_name(&token.value).base_type(),
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseType::Integer => write!(f, "Integer"),
            BaseType::Float => write!(f, "Float"),
            BaseType::Boolean => write!(f, "Boolean"),
            BaseType::Char => write!(f, "Char"),
            BaseType::String => write!(f, "String"),
            BaseType::Null => write!(f, "Null"),
            BaseType::Function => write!(f, "Function"),
            BaseType::Unresolved(name) => write!(f, "{}", name),
        }
    }
}

/// Result type of any binary operator.
///
/// Numbers combine to `Float` unless both sides are `Integer`; two strings
/// give a `String`. Every other pairing is illegal.
pub fn binary_result_type(left: &BaseType, right: &BaseType) -> Option<BaseType> {
    match (left, right) {
        (BaseType::Integer, BaseType::Integer) => Some(BaseType::Integer),
        (l, r) if l.is_numeric() && r.is_numeric() => Some(BaseType::Float),
        (BaseType::String, BaseType::String) => Some(BaseType::String),
        _ => None,
    }
}

/// Result type of a unary operator: the operand's own type, numbers only.
pub fn unary_result_type(operand: &BaseType) -> Option<BaseType> {
    if operand.is_numeric() {
        Some(operand.clone())
    } else {
        None
    }
}

/// Human-readable name for a possibly untyped value.
pub fn describe_type(base_type: Option<&BaseType>) -> String {
    match base_type {
        Some(base_type) => base_type.to_string(),
        None => String::from("None"),
    }
}
