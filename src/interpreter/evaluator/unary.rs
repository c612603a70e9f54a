use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Token,
        value::core::{Payload, Value},
    },
};

impl Context<'_> {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Neg`: integer negation; negating `i32::MIN` overflows.
    /// - `Not`: boolean negation.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `token`: Operator token for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use fwap::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, lexer::tokenize, value::core::Value},
    /// };
    ///
    /// let minus = &tokenize("-").unwrap()[0];
    /// let v = Context::eval_unary(UnaryOperator::Neg, &Value::int(5), minus).unwrap();
    /// assert_eq!(v.to_string(), "-5");
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, token: &Token) -> EvalResult<Value> {
        match (op, value.payload()) {
            (UnaryOperator::Neg, Some(Payload::Int(n))) => {
                n.checked_neg()
                 .map(Value::int)
                 .ok_or(RuntimeError::Overflow { at: token.position() })
            },
            (UnaryOperator::Not, Some(Payload::Bool(b))) => Ok(Value::bool(!b)),
            _ => Err(RuntimeError::TypeError { details: format!("'{op}' cannot be applied to {}",
                                                                value.ty()),
                                               at:      token.position(), }),
        }
    }
}
