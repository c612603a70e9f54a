use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    ast::Program,
    error::SemanticError,
    interpreter::{
        environment::Env,
        value::{types::Type, url::UrlValue},
    },
};

/// Result type used by the checker.
pub type CheckResult<T> = Result<T, SemanticError>;

/// Facts the checker learns about a program that code generation needs.
///
/// Every entry is keyed by the byte offset of the token it describes, so the
/// syntax tree itself stays untouched and can be checked any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Variable references that read a value produced by `async` or `dasync`.
    pub async_reads: HashSet<usize>,
    /// Type of the target variable of each `readln`, `async` and `dasync`
    /// statement, keyed by the statement keyword.
    pub targets:     HashMap<usize, Type>,
    /// The remote address of each `dasync` statement, when it is a constant.
    pub remote_urls: HashMap<usize, UrlValue>,
}

/// Scope and type checker.
///
/// The checker walks the tree once, in program order, with its own chain of
/// scopes holding the type of every name. It stops at the first error.
pub struct Checker {
    pub(super) scope:       Env,
    pub(super) annotations: Annotations,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    #[must_use]
    pub fn new() -> Self {
        Self { scope:       Env::root(),
               annotations: Annotations::default(), }
    }

    /// Checks a whole program.
    ///
    /// # Parameters
    /// - `program`: The parsed program.
    ///
    /// # Returns
    /// The [`Annotations`] collected on the way.
    ///
    /// # Errors
    /// Returns the first [`SemanticError`] found.
    pub fn check_program(mut self, program: &Program) -> CheckResult<Annotations> {
        self.check_block(&program.root)?;
        debug!(async_reads = self.annotations.async_reads.len(),
               targets = self.annotations.targets.len(),
               "checked program");
        Ok(self.annotations)
    }

    /// Runs `f` with `scope` as the current scope, restoring the previous one
    /// afterwards whether `f` succeeds or not.
    pub(super) fn with_scope<T>(&mut self,
                                scope: Env,
                                f: impl FnOnce(&mut Self) -> CheckResult<T>)
                                -> CheckResult<T> {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }
}

/// Checks `program` with a fresh [`Checker`].
///
/// # Errors
/// Returns the first [`SemanticError`] found.
pub fn check(program: &Program) -> CheckResult<Annotations> {
    Checker::new().check_program(program)
}
