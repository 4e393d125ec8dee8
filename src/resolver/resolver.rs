use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::{
    scope::{FrameKind, ScopeError, ScopeFrame},
    symbols::Symbol,
};

/// A name used before any definition of it was visible.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReference {
    /// Shallowest function nesting level the name was referenced at.
    pub level: usize,
    pub token: Token,
}

/// Symbol tables and scope bookkeeping for one file.
///
/// Holds the global table, the stack of scope frames and the names that are
/// still waiting for a definition further down the file. A fresh resolver is
/// created for every parse.
#[derive(Debug, Default)]
pub struct Resolver {
    globals: HashMap<String, Symbol>,
    stack: Vec<ScopeFrame>,
    pending: HashMap<String, PendingReference>,
    level: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver::default()
    }

    pub fn enter(&mut self, kind: FrameKind) -> Result<(), ScopeError> {
        if kind == FrameKind::Function && self.in_function() {
            return Err(ScopeError::AlreadyInFunction);
        }

        trace!("entering {} scope (depth {})", kind, self.stack.len());
        self.stack.push(ScopeFrame::new(kind));

        if kind == FrameKind::Function {
            self.level += 1;
        }

        Ok(())
    }

    /// Pops the innermost frame, which has to be of `kind`.
    ///
    /// Leaving a function clamps every pending reference down to the new
    /// level, so a name used inside a function stays pending at the level
    /// that encloses the function.
    pub fn exit(&mut self, kind: FrameKind) -> Result<(), ScopeError> {
        let top = self
            .stack
            .last()
            .ok_or(ScopeError::EmptyStack { expected: kind })?;

        if top.kind != kind {
            return Err(ScopeError::Mismatch {
                expected: kind,
                found: top.kind,
            });
        }

        self.stack.pop();
        trace!("left {} scope (depth {})", kind, self.stack.len());

        if kind == FrameKind::Function {
            self.level -= 1;

            for pending in self.pending.values_mut() {
                if pending.level > self.level {
                    pending.level = self.level;
                }
            }
        }

        Ok(())
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn in_function(&self) -> bool {
        self.level > 0
    }

    pub fn in_conditional(&self) -> bool {
        self.stack
            .iter()
            .any(|frame| frame.kind == FrameKind::Conditional)
    }

    pub fn in_attribute(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|frame| frame.kind == FrameKind::Attribute)
    }

    /// Finds a visible binding, innermost function first, then globals.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.stack
            .iter()
            .rev()
            .filter_map(|frame| frame.locals.as_ref())
            .find_map(|locals| locals.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub fn visible_function(&self, name: &str) -> Option<&Symbol> {
        self.lookup(name).filter(|symbol| symbol.is_function())
    }

    /// Token carrying the declared type of a visible name.
    pub fn lookup_declared_type(&self, token: &Token) -> Result<&Token, Error> {
        self.lookup(&token.value)
            .map(|symbol| &symbol.declared)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::NotDefined {
                        name: token.value.clone(),
                    },
                    token.position,
                    token.len(),
                )
            })
    }

    pub fn pending(&self, name: &str) -> Option<&PendingReference> {
        self.pending.get(name)
    }

    /// Records a use of a name that is not visible yet. Visible names are
    /// left alone; an existing record only moves to a shallower level.
    pub fn mark_forward_reference(&mut self, token: &Token) {
        if self.lookup(&token.value).is_some() {
            return;
        }

        let reference = PendingReference {
            level: self.level,
            token: token.clone(),
        };

        match self.pending.get_mut(&token.value) {
            Some(pending) if pending.level > self.level => *pending = reference,
            Some(_) => {}
            None => {
                debug!(
                    "'{}' referenced before definition (level {})",
                    token.value, self.level
                );
                self.pending.insert(token.value.clone(), reference);
            }
        }
    }

    /// Binds a symbol in the innermost function frame, or globally when no
    /// function is active.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), Error> {
        let name = symbol.name().to_string();

        if self.in_conditional() {
            return Err(Error::new(
                ErrorImpl::ConditionalDefinition,
                symbol.name.position,
                symbol.name.len(),
            ));
        }

        if let Some(pending) = self.pending.get(&name) {
            if self.level <= pending.level {
                if !symbol.is_function() {
                    return Err(Error::new(
                        ErrorImpl::RequiredToBeFunction { name: name.clone() },
                        pending.token.position,
                        pending.token.len(),
                    )
                    .with_note(
                        format!(
                            "'{}' defined here (below the reference) as normal variable",
                            name
                        ),
                        symbol.name.position,
                        symbol.name.len(),
                    ));
                }

                debug!("forward reference to '{}' resolved", name);
                self.pending.remove(&name);
            }
        }

        if let Some(prior) = self.lookup(&name) {
            return Err(Error::new(
                ErrorImpl::AlreadyDefined { name: name.clone() },
                symbol.name.position,
                symbol.name.len(),
            )
            .with_note(
                format!("'{}' defined here", name),
                prior.name.position,
                prior.name.len(),
            ));
        }

        debug!("defining '{}' at level {}", name, self.level);

        let innermost = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| frame.locals.as_mut());

        match innermost {
            Some(locals) => locals.insert(name, symbol),
            None => self.globals.insert(name, symbol),
        };

        Ok(())
    }

    /// Removes a binding from the innermost function frame that holds it,
    /// else from the globals.
    pub fn delete(&mut self, name: &str) -> Option<Symbol> {
        for frame in self.stack.iter_mut().rev() {
            if let Some(symbol) = frame.locals.as_mut().and_then(|locals| locals.remove(name)) {
                return Some(symbol);
            }
        }

        self.globals.remove(name)
    }

    /// Fails if any forward reference never found its definition. The
    /// earliest use becomes the error, later ones are attached as notes.
    pub fn end_of_file(&self) -> Result<(), Error> {
        let mut unresolved: Vec<&PendingReference> = self.pending.values().collect();
        unresolved.sort_by_key(|pending| pending.token.position.offset);

        let Some((first, rest)) = unresolved.split_first() else {
            return Ok(());
        };

        let mut error = Error::new(
            ErrorImpl::NotDefined {
                name: first.token.value.clone(),
            },
            first.token.position,
            first.token.len(),
        );

        for pending in rest {
            error = error.with_note(
                format!("'{}' is not defined", pending.token.value),
                pending.token.position,
                pending.token.len(),
            );
        }

        Err(error)
    }
}
