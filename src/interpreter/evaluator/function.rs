use tracing::trace;

use crate::{
    ast::Call,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, MAX_CALL_DEPTH},
        lexer::Token,
        value::core::{Payload, Value},
    },
};

impl Context<'_> {
    /// Evaluates a call.
    ///
    /// Arguments are evaluated left to right in the caller's scope before the
    /// callee is resolved.
    ///
    /// # Returns
    /// The returned value, or `None` if the function finished without
    /// `return`.
    ///
    /// # Errors
    /// See [`Context::invoke`].
    pub fn eval_call(&mut self, call: &Call) -> EvalResult<Option<Value>> {
        let arguments = call.arguments
                            .iter()
                            .map(|argument| self.eval(argument))
                            .collect::<EvalResult<Vec<_>>>()?;
        let callee = self.scope.apply(&call.callee)?;
        self.invoke(&call.callee, &callee.value, arguments)
    }

    /// Calls a function value with already evaluated arguments.
    ///
    /// The body runs in a fresh frame whose parent is the environment the
    /// function captured, so names resolve lexically. Parameters are bound in
    /// that frame in order.
    ///
    /// # Errors
    /// - `Uninitialized` if `callee` is a function variable without value.
    /// - `NotCallable` if `callee` is not a function.
    /// - `ArgumentCountMismatch` if the arity differs.
    /// - `StackOverflow` past [`MAX_CALL_DEPTH`] nested calls.
    /// - Any error raised by the body.
    pub fn invoke(&mut self,
                  token: &Token,
                  callee: &Value,
                  arguments: Vec<Value>)
                  -> EvalResult<Option<Value>> {
        let closure = match callee.payload() {
            Some(Payload::Function(closure)) => closure.clone(),
            None if callee.ty().is_function() => {
                return Err(RuntimeError::Uninitialized { name: token.text.clone(),
                                                         at:   token.position(), });
            },
            _ => {
                return Err(RuntimeError::NotCallable { name: token.text.clone(),
                                                       at:   token.position(), });
            },
        };

        let def = &closure.def;
        if def.params.len() != arguments.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     token.text.clone(),
                                                             expected: def.params.len(),
                                                             found:    arguments.len(),
                                                             at:       token.position(), });
        }
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::StackOverflow { name: token.text.clone(),
                                                     at:   token.position(), });
        }

        let frame = closure.env.child();
        for (param, argument) in def.params.iter().zip(arguments) {
            frame.bind(&param.name, argument, true, false)?;
        }

        trace!(function = %token.text, depth = self.depth, "call");
        let saved = std::mem::replace(&mut self.scope, frame);
        self.depth += 1;
        let result = self.exec_statements(&def.body);
        self.depth -= 1;
        self.scope = saved;
        result
    }
}
