use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Token,
        value::core::{Payload, Value},
    },
};

impl Context<'_> {
    /// Evaluates a binary operation on two already evaluated operands.
    ///
    /// Supported combinations:
    /// - `int`: `+ - * /` with overflow and division-by-zero checks, and the
    ///   relational operators.
    /// - `char`: the relational operators.
    /// - `bool`: `|| && == !=`.
    /// - `string`: `+` (concatenation).
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`, `right`: The operands.
    /// - `token`: The operator token for error reporting.
    ///
    /// # Errors
    /// - `DivisionByZero` when dividing by `0`.
    /// - `Overflow` when an integer result does not fit in 32 bits.
    /// - `TypeError` for combinations the checker rejects.
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       token: &Token)
                       -> EvalResult<Value> {
        use BinaryOperator::{Add, And, Div, Equal, Mul, NotEqual, Or, Sub};

        let at = token.position();
        match (left.payload(), right.payload()) {
            (Some(Payload::Int(a)), Some(Payload::Int(b))) => match op {
                Add => a.checked_add(*b).map(Value::int).ok_or(RuntimeError::Overflow { at }),
                Sub => a.checked_sub(*b).map(Value::int).ok_or(RuntimeError::Overflow { at }),
                Mul => a.checked_mul(*b).map(Value::int).ok_or(RuntimeError::Overflow { at }),
                Div => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { at });
                    }
                    a.checked_div(*b).map(Value::int).ok_or(RuntimeError::Overflow { at })
                },
                _ if op.is_relational() => Ok(Value::bool(compare(op, a.cmp(b)))),
                _ => Err(unsupported(op, left, token)),
            },
            (Some(Payload::Char(a)), Some(Payload::Char(b))) if op.is_relational() => {
                Ok(Value::bool(compare(op, a.cmp(b))))
            },
            (Some(Payload::Bool(a)), Some(Payload::Bool(b))) => match op {
                Or => Ok(Value::bool(*a || *b)),
                And => Ok(Value::bool(*a && *b)),
                Equal => Ok(Value::bool(a == b)),
                NotEqual => Ok(Value::bool(a != b)),
                _ => Err(unsupported(op, left, token)),
            },
            (Some(Payload::Str(a)), Some(Payload::Str(b))) if op == Add => {
                Ok(Value::string(&format!("{a}{b}")))
            },
            _ => Err(unsupported(op, left, token)),
        }
    }
}

/// Interprets an ordering through a relational operator.
fn compare(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

fn unsupported(op: BinaryOperator, operand: &Value, token: &Token) -> RuntimeError {
    RuntimeError::TypeError { details: format!("'{op}' cannot be applied to {}", operand.ty()),
                              at:      token.position(), }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::TokenKind;

    fn op_token() -> Token {
        Token { kind:   TokenKind::Plus,
                text:   "+".to_string(),
                offset: 0,
                line:   1,
                column: 1,
                length: 1, }
    }

    fn eval(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        Context::eval_binary(op, left, right, &op_token())
    }

    #[test]
    fn integer_arithmetic_is_checked() {
        assert_eq!(eval(BinaryOperator::Mul, &Value::int(6), &Value::int(7)).unwrap().to_string(),
                   "42");
        assert_eq!(eval(BinaryOperator::Div, &Value::int(-7), &Value::int(2)).unwrap().to_string(),
                   "-3");
        assert!(matches!(eval(BinaryOperator::Div, &Value::int(1), &Value::int(0)),
                         Err(RuntimeError::DivisionByZero { .. })));
        assert!(matches!(eval(BinaryOperator::Add, &Value::int(i32::MAX), &Value::int(1)),
                         Err(RuntimeError::Overflow { .. })));
        assert!(matches!(eval(BinaryOperator::Div, &Value::int(i32::MIN), &Value::int(-1)),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn comparisons_and_logic() {
        let yes = |v: EvalResult<Value>| v.unwrap().to_string() == "true";
        assert!(yes(eval(BinaryOperator::LessEqual, &Value::int(3), &Value::int(3))));
        assert!(yes(eval(BinaryOperator::Greater, &Value::char('b'), &Value::char('a'))));
        assert!(yes(eval(BinaryOperator::NotEqual, &Value::bool(true), &Value::bool(false))));
        assert!(!yes(eval(BinaryOperator::And, &Value::bool(true), &Value::bool(false))));
    }

    #[test]
    fn strings_concatenate() {
        let joined = eval(BinaryOperator::Add, &Value::string("ab"), &Value::string("cd")).unwrap();
        assert_eq!(joined.to_string(), "abcd");
        assert!(eval(BinaryOperator::Sub, &Value::string("a"), &Value::string("b")).is_err());
    }
}
