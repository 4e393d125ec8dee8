use std::{collections::HashMap, fmt::Display};

use thiserror::Error;

use super::symbols::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Function,
    Conditional,
    Loop,
    Attribute,
}

impl Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameKind::Function => write!(f, "function"),
            FrameKind::Conditional => write!(f, "conditional"),
            FrameKind::Loop => write!(f, "loop"),
            FrameKind::Attribute => write!(f, "attribute"),
        }
    }
}

/// One entry of the scope stack. Only function frames hold bindings.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    pub kind: FrameKind,
    pub locals: Option<HashMap<String, Symbol>>,
}

impl ScopeFrame {
    pub fn new(kind: FrameKind) -> Self {
        let locals = match kind {
            FrameKind::Function => Some(HashMap::new()),
            _ => None,
        };

        ScopeFrame { kind, locals }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("already inside a function")]
    AlreadyInFunction,
    #[error("tried to leave {expected} scope, but no scope is active")]
    EmptyStack { expected: FrameKind },
    #[error("tried to leave {expected} scope, but the innermost scope is {found}")]
    Mismatch {
        expected: FrameKind,
        found: FrameKind,
    },
}
