use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Which stage of the front end rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Lexical,
    Syntax,
    Semantic,
    Internal,
}

/// A secondary location attached to an error ("defined here").
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNote {
    pub message: String,
    pub position: Position,
    pub length: usize,
}

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    length: usize,
    notes: Vec<ErrorNote>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position, length: usize) -> Self {
        Error {
            internal_error: error_impl,
            position,
            length,
            notes: vec![],
        }
    }

    pub fn with_note(mut self, message: impl Into<String>, position: Position, length: usize) -> Self {
        self.notes.push(ErrorNote {
            message: message.into(),
            position,
            length,
        });
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_length(&self) -> usize {
        self.length
    }

    pub fn get_notes(&self) -> &[ErrorNote] {
        &self.notes
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn class(&self) -> ErrorClass {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorClass::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedKeyword { .. }
            | ErrorImpl::ExpectedTerminator { .. }
            | ErrorImpl::ExpectedAttributeTerminator { .. }
            | ErrorImpl::ExpectedExpression { .. } => ErrorClass::Syntax,
            ErrorImpl::Internal { .. } => ErrorClass::Internal,
            _ => ErrorClass::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedKeyword { .. } => "UnexpectedKeyword",
            ErrorImpl::ExpectedTerminator { .. } => "ExpectedTerminator",
            ErrorImpl::ExpectedAttributeTerminator { .. } => "ExpectedAttributeTerminator",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::AlreadyDefined { .. } => "AlreadyDefined",
            ErrorImpl::NotDefined { .. } => "NotDefined",
            ErrorImpl::RequiredToBeFunction { .. } => "RequiredToBeFunction",
            ErrorImpl::ConditionalDefinition => "ConditionalDefinition",
            ErrorImpl::NestedFunction => "NestedFunction",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::IllegalOperation { .. } => "IllegalOperation",
            ErrorImpl::IllegalUnaryOperation { .. } => "IllegalUnaryOperation",
            ErrorImpl::FunctionAsValue { .. } => "FunctionAsValue",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::AssignToUndeclared { .. } => "AssignToUndeclared",
            ErrorImpl::SymbolOutsideImport { .. } => "SymbolOutsideImport",
            ErrorImpl::ExpectedArgumentType { .. } => "ExpectedArgumentType",
            ErrorImpl::AttributeOrder => "AttributeOrder",
            ErrorImpl::Internal { .. } => "Internal",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::ExpectedTerminator { .. } => ErrorTip::Suggestion(String::from(
                "Separate statements with a newline or a semicolon",
            )),
            ErrorImpl::RequiredToBeFunction { name } => ErrorTip::Suggestion(format!(
                "`{}` is called before its definition, so it has to be defined with `func`",
                name
            )),
            ErrorImpl::ConditionalDefinition => ErrorTip::Suggestion(String::from(
                "Declare the name before the `if` and assign to it inside",
            )),
            ErrorImpl::NestedFunction => ErrorTip::Suggestion(String::from(
                "Move the inner function to the top level of the file",
            )),
            ErrorImpl::FunctionAsValue { name } => {
                ErrorTip::Suggestion(format!("Did you mean to call it: `{}()`?", name))
            }
            ErrorImpl::AssignToUndeclared { name } => {
                ErrorTip::Suggestion(format!("Declare it first: `var {}: <type>`", name))
            }
            ErrorImpl::AttributeOrder => ErrorTip::Suggestion(String::from(
                "Move every attribute above the first statement",
            )),
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("undefined token: {token}")]
    UnrecognisedToken { token: char },

    // Syntax
    #[error("expected {expected}, got {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected keyword '{keyword}'")]
    UnexpectedKeyword { keyword: String },
    #[error("expected newline or semicolon, got {found}")]
    ExpectedTerminator { found: String },
    #[error("expected newline or semicolon after attribute value, got {found}")]
    ExpectedAttributeTerminator { found: String },
    #[error("expected expression, got {found}")]
    ExpectedExpression { found: String },

    // Semantic
    #[error("'{name}' is already defined")]
    AlreadyDefined { name: String },
    #[error("'{name}' is not defined")]
    NotDefined { name: String },
    #[error("'{name}' is required to be a function")]
    RequiredToBeFunction { name: String },
    #[error("cannot define variable or function conditionally")]
    ConditionalDefinition,
    #[error("cannot define function inside another function")]
    NestedFunction,
    #[error("cannot assign value of type {received} to variable of type {expected}")]
    TypeMatchError { expected: String, received: String },
    #[error("illegal operation ('{operator}') on types '{left}' and '{right}'")]
    IllegalOperation {
        operator: String,
        left: String,
        right: String,
    },
    #[error("illegal unary operation ('{operator}') on type '{operand}'")]
    IllegalUnaryOperation { operator: String, operand: String },
    #[error("expected fixed value or variable name, got function '{name}'")]
    FunctionAsValue { name: String },
    #[error("'{name}' is not a function")]
    NotAFunction { name: String },
    #[error("tried to assign to undeclared variable '{name}'")]
    AssignToUndeclared { name: String },
    #[error("symbol definition is only allowed for imported symbols (attribute '@import_symbol'), not '{attribute}'")]
    SymbolOutsideImport { attribute: String },
    #[error("in imported symbol, expected argument type, got {found}")]
    ExpectedArgumentType { found: String },
    #[error("attributes must be at the beginning of the file")]
    AttributeOrder,

    // Internal
    #[error("internal compiler error: {message}")]
    Internal { message: String },
}
