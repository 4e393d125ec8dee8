use crate::{
    ast::{
        statements::{FuncDeclStmt, VarDeclStmt},
        types::{BaseType, SpecificType},
    },
    lexer::tokens::Token,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Function { return_type: Option<Token> },
    Variable,
    Parameter,
}

/// A named binding.
///
/// `declared` is the token that carries the binding's type: the type name
/// for variables and parameters, the `func` keyword (or `@import_symbol`
/// attribute) for functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: Token,
    pub declared: Token,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn function(func: &FuncDeclStmt) -> Self {
        Symbol {
            name: func.name.clone(),
            declared: func.keyword.clone(),
            kind: SymbolKind::Function {
                return_type: func.return_type.clone(),
            },
        }
    }

    pub fn variable(var: &VarDeclStmt) -> Self {
        Symbol {
            name: var.name.clone(),
            declared: var.type_token.clone(),
            kind: SymbolKind::Variable,
        }
    }

    pub fn parameter(name: &Token, type_token: &Token) -> Self {
        Symbol {
            name: name.clone(),
            declared: type_token.clone(),
            kind: SymbolKind::Parameter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name.value
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    pub fn declared_base_type(&self) -> BaseType {
        BaseType::of_declaration(&self.declared)
    }

    /// Base return type of a function; `None` for functions without one and
    /// for non-functions.
    pub fn return_base_type(&self) -> Option<BaseType> {
        match &self.kind {
            SymbolKind::Function {
                return_type: Some(token),
            } => Some(SpecificType::from_name(&token.value).base_type()),
            _ => None,
        }
    }
}
