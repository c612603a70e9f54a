use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::SemanticError,
    interpreter::{
        checker::core::{CheckResult, Checker},
        lexer::Token,
        value::{
            core::Value,
            types::{Scalar, Type},
        },
    },
};

impl Checker {
    /// Checks an expression and returns a value describing it.
    ///
    /// The returned value always has the type of the expression. It carries a
    /// payload only when the value is known before run time: literals, and
    /// variables last assigned a literal.
    ///
    /// # Errors
    /// Returns a [`SemanticError`] for unknown names, operator misuse and
    /// invalid calls.
    pub fn check_expression(&mut self, expr: &Expr) -> CheckResult<Value> {
        match expr {
            Expr::Constant { value, .. } => Ok(Value::from_literal(value)),
            Expr::Variable { token } => self.check_variable(token),
            Expr::Unary { op, operand, token } => {
                let operand = self.check_expression(operand)?;
                let ty = unary_result(*op, operand.ty()).ok_or_else(|| {
                             SemanticError::UnsupportedUnaryOperation { op:      *op,
                                                                        operand: operand.ty().clone(),
                                                                        at:      token.position(), }
                         })?;
                Ok(Value::uninit(ty))
            },
            Expr::Binary { left, op, right, token } => {
                let left = self.check_expression(left)?;
                let right = self.check_expression(right)?;
                if left.ty() != right.ty() {
                    return Err(SemanticError::OperandMismatch { op:    *op,
                                                                left:  left.ty().clone(),
                                                                right: right.ty().clone(),
                                                                at:    token.position(), });
                }
                let ty = binary_result(*op, left.ty()).ok_or_else(|| {
                             SemanticError::UnsupportedOperation { op:      *op,
                                                                   operand: left.ty().clone(),
                                                                   at:      token.position(), }
                         })?;
                Ok(Value::uninit(ty))
            },
            Expr::Call(call) => {
                let returns = self.check_call(call)?;
                returns.map(Value::uninit)
                       .ok_or_else(|| SemanticError::NoValue { name: call.callee.text.clone(),
                                                               at:   call.callee.position(), })
            },
        }
    }

    /// Resolves a variable and records the read if a background task assigns
    /// it.
    fn check_variable(&mut self, token: &Token) -> CheckResult<Value> {
        let binding = self.scope.apply(token)?;
        if binding.is_async {
            self.annotations.async_reads.insert(token.offset);
        }
        Ok(binding.value)
    }
}

/// Result type of a unary operator applied to `operand`, if supported.
fn unary_result(op: UnaryOperator, operand: &Type) -> Option<Type> {
    match (op, operand.as_scalar()?) {
        (UnaryOperator::Neg, Scalar::Int) => Some(Type::INT),
        (UnaryOperator::Not, Scalar::Bool) => Some(Type::BOOL),
        _ => None,
    }
}

/// Result type of a binary operator whose operands both have type `operand`.
///
/// | operand | operators                | result   |
/// |---------|--------------------------|----------|
/// | int     | `+ - * /`                | `int`    |
/// | int     | relational               | `bool`   |
/// | bool    | `\|\| && == !=`          | `bool`   |
/// | char    | relational               | `bool`   |
/// | string  | `+`                      | `string` |
fn binary_result(op: BinaryOperator, operand: &Type) -> Option<Type> {
    match operand.as_scalar()? {
        Scalar::Int if op.is_arithmetic() => Some(Type::INT),
        Scalar::Int | Scalar::Char if op.is_relational() => Some(Type::BOOL),
        Scalar::Bool
            if matches!(op,
                        BinaryOperator::Or
                        | BinaryOperator::And
                        | BinaryOperator::Equal
                        | BinaryOperator::NotEqual) =>
        {
            Some(Type::BOOL)
        },
        Scalar::String if op == BinaryOperator::Add => Some(Type::STRING),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_table() {
        assert_eq!(binary_result(BinaryOperator::Div, &Type::INT), Some(Type::INT));
        assert_eq!(binary_result(BinaryOperator::LessEqual, &Type::INT), Some(Type::BOOL));
        assert_eq!(binary_result(BinaryOperator::And, &Type::INT), None);
        assert_eq!(binary_result(BinaryOperator::NotEqual, &Type::BOOL), Some(Type::BOOL));
        assert_eq!(binary_result(BinaryOperator::Less, &Type::BOOL), None);
        assert_eq!(binary_result(BinaryOperator::Greater, &Type::CHAR), Some(Type::BOOL));
        assert_eq!(binary_result(BinaryOperator::Add, &Type::CHAR), None);
        assert_eq!(binary_result(BinaryOperator::Add, &Type::STRING), Some(Type::STRING));
        assert_eq!(binary_result(BinaryOperator::Equal, &Type::STRING), None);
        assert_eq!(binary_result(BinaryOperator::Equal, &Type::URL), None);
        assert_eq!(binary_result(BinaryOperator::Equal, &Type::function(vec![], None)), None);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(unary_result(UnaryOperator::Neg, &Type::INT), Some(Type::INT));
        assert_eq!(unary_result(UnaryOperator::Not, &Type::BOOL), Some(Type::BOOL));
        assert_eq!(unary_result(UnaryOperator::Neg, &Type::BOOL), None);
        assert_eq!(unary_result(UnaryOperator::Not, &Type::STRING), None);
    }
}
