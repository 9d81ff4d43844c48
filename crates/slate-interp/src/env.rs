//! The scope and environment model.
//!
//! A scope holds three disjoint maps: declared types, mutable bindings, and
//! constant bindings. The two value maps are looked up as one namespace,
//! constants first. The environment is one global scope plus a stack of
//! local scopes; a procedure call pushes a copy of the global scope and
//! pops it on every exit path.

use indexmap::IndexMap;

use slate_ast::ty::TypeTag;
use slate_ast::Span;

use crate::interp::RuntimeError;
use crate::value::Value;

/// A single scope: a namespace of type declarations, mutable bindings, and
/// constant bindings.
///
/// Cloning a scope is the `copy()` operation of the model: a shallow
/// independent copy of all three maps.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    type_defs: IndexMap<String, TypeTag>,
    defs: IndexMap<String, Value>,
    constant_defs: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared type for an identifier.
    pub fn add_type_def(&mut self, ident: &str, tag: TypeTag) {
        self.type_defs.insert(ident.to_string(), tag);
    }

    pub fn get_type_def(&self, ident: &str) -> Option<TypeTag> {
        self.type_defs.get(ident).copied()
    }

    /// Bind an identifier to a value.
    ///
    /// With `type_check` enabled, a previously declared type validates the
    /// value and an undeclared identifier gets its type inferred from the
    /// value and registered — the first assignment pins the type. A name
    /// already bound as a constant can never be bound again, in either map.
    pub fn add_def(
        &mut self,
        ident: &str,
        val: Value,
        constant: bool,
        type_check: bool,
        span: Span,
    ) -> Result<(), RuntimeError> {
        if type_check {
            match self.get_type_def(ident) {
                Some(tag) => crate::ty::validate(&val, tag, span)?,
                None => {
                    if let Some(tag) = val.tag() {
                        self.add_type_def(ident, tag);
                    }
                }
            }
        }

        if self.constant_defs.contains_key(ident) {
            return Err(RuntimeError::IdentifierAlreadyDefined {
                name: ident.to_string(),
                span,
            });
        }
        if constant {
            self.constant_defs.insert(ident.to_string(), val);
        } else {
            self.defs.insert(ident.to_string(), val);
        }
        Ok(())
    }

    /// Look up an identifier, constants first.
    pub fn get_def(&self, ident: &str) -> Option<&Value> {
        self.constant_defs.get(ident).or_else(|| self.defs.get(ident))
    }

    pub fn is_defined(&self, ident: &str) -> bool {
        self.get_def(ident).is_some()
    }

    /// Write straight into the mutable bindings, bypassing type checking
    /// and the constant guard. Used for the FOR loop variable.
    pub fn set_raw(&mut self, ident: &str, val: Value) {
        self.defs.insert(ident.to_string(), val);
    }

    /// Drop a mutable binding. Constants are never removed.
    pub fn remove_def(&mut self, ident: &str) {
        self.defs.shift_remove(ident);
    }
}

/// The environment: one global scope plus the transient local-scope stack.
#[derive(Debug, Default)]
pub struct Environment {
    global: Scope,
    locals: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scope bindings currently resolve against: the innermost local
    /// scope, or the global scope outside any call.
    pub fn current(&self) -> &Scope {
        self.locals.last().unwrap_or(&self.global)
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.locals.last_mut().unwrap_or(&mut self.global)
    }

    /// Enter a procedure call: the new local scope is a snapshot of the
    /// global scope as it stands right now, not a chain to the caller.
    pub fn push_local(&mut self) {
        self.locals.push(self.global.clone());
    }

    /// Leave a procedure call, restoring the previous scope.
    pub fn pop_local(&mut self) {
        self.locals.pop();
    }

    pub fn get_def(&self, ident: &str) -> Option<&Value> {
        self.current().get_def(ident)
    }
}
