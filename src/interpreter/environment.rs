use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    error::{RuntimeError, SemanticError},
    interpreter::{
        lexer::{Position, Token},
        value::{core::Value, types::Type},
    },
};

/// A variable slot: its current value and whether the value is produced by a
/// background task.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value:    Value,
    pub is_async: bool,
}

/// Failure of an environment operation, converted into the error type of the
/// phase that performed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    Undefined {
        name: String,
        at:   Position,
    },
    Conflict {
        name:     String,
        existing: Type,
        found:    Type,
        at:       Position,
    },
}

impl From<EnvError> for SemanticError {
    fn from(e: EnvError) -> Self {
        match e {
            EnvError::Undefined { name, at } => Self::UnknownIdentifier { name, at },
            EnvError::Conflict { name,
                                 existing,
                                 found,
                                 at, } => Self::ConflictingDeclaration { name,
                                                                         existing,
                                                                         found,
                                                                         at },
        }
    }
}

impl From<EnvError> for RuntimeError {
    fn from(e: EnvError) -> Self {
        match e {
            EnvError::Undefined { name, at } => Self::UnknownIdentifier { name, at },
            EnvError::Conflict { name,
                                 existing,
                                 found,
                                 at, } => Self::ConflictingBinding { name,
                                                                     existing,
                                                                     found,
                                                                     at },
        }
    }
}

#[derive(Default)]
struct Frame {
    bindings: HashMap<String, Binding>,
    parent:   Option<Env>,
}

/// An activation record: a scope frame linked to its parent.
///
/// `Env` is a shared handle; cloning it does not copy the frame. Closures keep
/// frames alive after the block that created them has finished.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    /// Creates an outermost frame.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates an empty frame whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame { bindings: HashMap::new(),
                                          parent:   Some(self.clone()), })))
    }

    /// Copies the bindings of this frame into a new frame that shares the same
    /// parent. Later assignments to the copied names in either frame are not
    /// seen by the other one; both still see changes made further up the chain.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        let frame = self.0.borrow();
        Self(Rc::new(RefCell::new(Frame { bindings: frame.bindings.clone(),
                                          parent:   frame.parent.clone(), })))
    }

    /// Looks `name` up from this frame outwards.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let frame = env.0.borrow();
            if let Some(binding) = frame.bindings.get(name) {
                return Some(binding.clone());
            }
            current = frame.parent.clone();
        }
        None
    }

    /// Looks up the identifier `token`.
    ///
    /// # Errors
    /// Returns [`EnvError::Undefined`] if no enclosing frame binds it.
    pub fn apply(&self, token: &Token) -> Result<Binding, EnvError> {
        self.lookup(&token.text)
            .ok_or_else(|| EnvError::Undefined { name: token.text.clone(),
                                                 at:   token.position(), })
    }

    /// Binds the identifier `token` to `value`.
    ///
    /// A declaration always binds in this frame, shadowing outer bindings; it
    /// only fails when this frame already holds the name with another type.
    /// An assignment overwrites the nearest existing binding, or binds in this
    /// frame when there is none.
    ///
    /// # Errors
    /// Returns [`EnvError::Conflict`] when the existing binding has a different
    /// type than `value`.
    pub fn bind(&self,
                token: &Token,
                value: Value,
                declaration: bool,
                is_async: bool)
                -> Result<(), EnvError> {
        let name = &token.text;
        let conflict = |existing: &Type, found: &Type| EnvError::Conflict { name:     name.clone(),
                                                                            existing: existing.clone(),
                                                                            found:    found.clone(),
                                                                            at:       token.position(), };

        if !declaration {
            let mut current = Some(self.clone());
            while let Some(env) = current {
                let mut frame = env.0.borrow_mut();
                if let Some(binding) = frame.bindings.get_mut(name) {
                    if binding.value.ty() != value.ty() {
                        return Err(conflict(binding.value.ty(), value.ty()));
                    }
                    *binding = Binding { value, is_async };
                    return Ok(());
                }
                current = frame.parent.clone();
            }
        }

        let mut frame = self.0.borrow_mut();
        if let Some(existing) = frame.bindings.get(name)
           && existing.value.ty() != value.ty()
        {
            return Err(conflict(existing.value.ty(), value.ty()));
        }
        frame.bindings.insert(name.clone(), Binding { value, is_async });
        Ok(())
    }

    /// Returns `true` if this frame itself binds `name`.
    #[must_use]
    pub fn binds_locally(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<_> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Env")
         .field("bindings", &names)
         .field("has_parent", &frame.parent.is_some())
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::TokenKind;

    fn ide(name: &str) -> Token {
        Token { kind:   TokenKind::Identifier,
                text:   name.to_string(),
                offset: 0,
                line:   1,
                column: 1,
                length: name.len(), }
    }

    fn int_of(env: &Env, name: &str) -> String {
        env.lookup(name).unwrap().value.to_string()
    }

    #[test]
    fn declaration_shadows_outer_binding() {
        let outer = Env::root();
        outer.bind(&ide("x"), Value::int(1), true, false).unwrap();
        let inner = outer.child();
        inner.bind(&ide("x"), Value::bool(true), true, false).unwrap();
        assert_eq!(int_of(&inner, "x"), "true");
        assert_eq!(int_of(&outer, "x"), "1");
    }

    #[test]
    fn same_scope_redeclaration_needs_same_type() {
        let env = Env::root();
        env.bind(&ide("x"), Value::int(1), true, false).unwrap();
        env.bind(&ide("x"), Value::int(2), true, false).unwrap();
        assert_eq!(int_of(&env, "x"), "2");
        let err = env.bind(&ide("x"), Value::bool(false), true, false).unwrap_err();
        assert!(matches!(err, EnvError::Conflict { .. }));
    }

    #[test]
    fn assignment_rewrites_nearest_binding() {
        let outer = Env::root();
        outer.bind(&ide("x"), Value::int(1), true, false).unwrap();
        let inner = outer.child();
        inner.bind(&ide("x"), Value::int(5), false, false).unwrap();
        assert!(!inner.binds_locally("x"));
        assert_eq!(int_of(&outer, "x"), "5");

        inner.bind(&ide("fresh"), Value::int(7), false, false).unwrap();
        assert!(inner.binds_locally("fresh"));
    }

    #[test]
    fn snapshot_copies_frame_but_shares_parent() {
        let outer = Env::root();
        outer.bind(&ide("g"), Value::int(1), true, false).unwrap();
        let frame = outer.child();
        frame.bind(&ide("x"), Value::int(1), true, false).unwrap();

        let copy = frame.snapshot();
        frame.bind(&ide("x"), Value::int(2), false, false).unwrap();
        outer.bind(&ide("g"), Value::int(3), false, false).unwrap();

        assert_eq!(int_of(&copy, "x"), "1");
        assert_eq!(int_of(&copy, "g"), "3");
    }

    #[test]
    fn missing_identifier_is_undefined() {
        let env = Env::root().child();
        assert!(matches!(env.apply(&ide("nope")), Err(EnvError::Undefined { .. })));
    }
}
