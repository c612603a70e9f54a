use tracing::trace;

use crate::{
    ast::{Call, FunctionDef},
    error::SemanticError,
    interpreter::{
        checker::core::{CheckResult, Checker},
        value::{core::Value, types::Type},
    },
};

impl Checker {
    /// Checks a function definition and returns its type.
    ///
    /// A named function is bound in the current scope before its body is
    /// checked, so it may call itself. Parameters are bound in the frame of
    /// the body.
    ///
    /// # Errors
    /// - `UnexpectedReturnValue` if a function without return type returns.
    /// - `MissingReturn` if a function with a return type never returns.
    /// - `ReturnTypeMismatch` if the returned type differs from the declared
    ///   one; function types are compared structurally.
    /// - Any error found in the body.
    pub fn check_function(&mut self, def: &FunctionDef) -> CheckResult<Type> {
        let ty = def.ty();
        if !def.anonymous {
            self.scope.bind(&def.name, Value::uninit(ty.clone()), true, false)?;
        }

        let frame = self.scope.child();
        for param in &def.params {
            frame.bind(&param.name, Value::uninit(param.ty.into()), true, false)?;
        }

        trace!(function = %def.name.text, "checking function body");
        let observed = self.with_scope(frame, |checker| checker.check_statements(&def.body))?;
        check_returns(def, observed)?;
        Ok(ty)
    }

    /// Checks a call site and returns the return type of the callee, `None`
    /// for functions that return nothing.
    ///
    /// Arguments are checked before the callee is resolved.
    ///
    /// # Errors
    /// - `NotCallable` if the callee is not a function.
    /// - `ArityMismatch` if the number of arguments differs from the number of
    ///   parameters.
    /// - `ArgumentMismatch` for the first argument of the wrong type.
    pub fn check_call(&mut self, call: &Call) -> CheckResult<Option<Type>> {
        let arguments = call.arguments
                            .iter()
                            .map(|argument| self.check_expression(argument))
                            .collect::<CheckResult<Vec<_>>>()?;

        let callee = self.scope.apply(&call.callee)?;
        let name = &call.callee.text;
        let at = call.callee.position();
        let Type::Function { params, returns } = callee.value.ty() else {
            return Err(SemanticError::NotCallable { name: name.clone(),
                                                    found: callee.value.ty().clone(),
                                                    at });
        };

        if params.len() != arguments.len() {
            return Err(SemanticError::ArityMismatch { name: name.clone(),
                                                      expected: params.len(),
                                                      found: arguments.len(),
                                                      at });
        }
        for (index, (param, argument)) in params.iter().zip(&arguments).enumerate() {
            let expected = Type::Scalar(*param);
            if argument.ty() != &expected {
                return Err(SemanticError::ArgumentMismatch { name: name.clone(),
                                                             index: index + 1,
                                                             expected,
                                                             found: argument.ty().clone(),
                                                             at });
            }
        }

        Ok(returns.as_deref().cloned())
    }
}

/// Compares the type a function body returns with the declared return type.
fn check_returns(def: &FunctionDef, observed: Option<Type>) -> CheckResult<()> {
    let function = def.name.text.clone();
    let at = def.name.position();
    match (&def.returns, observed) {
        (None, None) => Ok(()),
        (None, Some(found)) => Err(SemanticError::UnexpectedReturnValue { function, found, at }),
        (Some(expected), None) => Err(SemanticError::MissingReturn { function,
                                                                     expected: expected.clone(),
                                                                     at }),
        (Some(expected), Some(found)) if *expected != found => {
            Err(SemanticError::ReturnTypeMismatch { function,
                                                    expected: expected.clone(),
                                                    found,
                                                    at })
        },
        (Some(_), Some(_)) => Ok(()),
    }
}
