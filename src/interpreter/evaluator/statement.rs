use crate::{
    ast::{Assign, Block, BlockKind, Expr, ReturnValue, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Token,
        value::{
            core::{Payload, Value},
            types::{Scalar, Type},
            url::UrlValue,
        },
    },
};

impl Context<'_> {
    /// Executes a block in a new frame; the program block runs in the
    /// current one.
    ///
    /// # Returns
    /// `Some(value)` if a `return` was executed inside the block.
    pub fn exec_block(&mut self, block: &Block) -> EvalResult<Option<Value>> {
        if block.kind == BlockKind::Program {
            return self.exec_statements(block);
        }
        let frame = self.scope.child();
        let saved = std::mem::replace(&mut self.scope, frame);
        let result = self.exec_statements(block);
        self.scope = saved;
        result
    }

    /// Executes the statements of a block in the current frame, stopping at
    /// the first `return`.
    pub(super) fn exec_statements(&mut self, block: &Block) -> EvalResult<Option<Value>> {
        for statement in &block.statements {
            if let Some(returned) = self.exec_statement(statement)? {
                return Ok(Some(returned));
            }
        }
        Ok(None)
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// `Some(value)` when the statement, or a statement nested in it,
    /// executed a `return`.
    ///
    /// # Errors
    /// - `UnsupportedConcurrency` for `async` and `dasync`, which only exist in
    ///   generated code.
    /// - `InvalidInput` and `InvalidUrl` when a line read by `readln` does not
    ///   convert to the target type.
    /// - Any error raised while evaluating expressions or calls.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Option<Value>> {
        match statement {
            Statement::Declaration { name, ty, init } => {
                let value = match init {
                    Some(init) => self.eval(init)?,
                    None => Value::uninit(ty.clone()),
                };
                self.scope.bind(name, value, true, false)?;
                Ok(None)
            },
            Statement::Assignment(assign) => {
                self.exec_assign(assign)?;
                Ok(None)
            },
            Statement::Block(block) => self.exec_block(block),
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval_condition(condition)? {
                    self.exec_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(None)
                }
            },
            Statement::While { condition, body, .. } => {
                while self.eval_condition(condition)? {
                    if let Some(returned) = self.exec_block(body)? {
                        return Ok(Some(returned));
                    }
                }
                Ok(None)
            },
            Statement::For { init,
                             condition,
                             step,
                             body,
                             .. } => {
                self.exec_assign(init)?;
                while self.eval_condition(condition)? {
                    if let Some(returned) = self.exec_block(body)? {
                        return Ok(Some(returned));
                    }
                    self.exec_assign(step)?;
                }
                Ok(None)
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    ReturnValue::Expr(expr) => self.eval(expr)?,
                    ReturnValue::Function(def) => Value::closure(def.clone(), self.scope.snapshot()),
                };
                Ok(Some(value))
            },
            Statement::Print { values, .. } => {
                for value in values {
                    let value = self.eval(value)?;
                    self.console.print(&value.to_string());
                }
                self.console.print("\n");
                Ok(None)
            },
            Statement::Read { target, token } => {
                let ty = self.scope.apply(target)?.value.ty().clone();
                let line = self.console
                                .read_line()
                                .map_err(|e| RuntimeError::InputUnavailable { details: e.to_string(),
                                                                              at:      token.position(), })?;
                let value = convert_input(&line, &ty, token)?;
                self.scope.bind(target, value, false, false)?;
                Ok(None)
            },
            Statement::Async { token, .. } => {
                Err(RuntimeError::UnsupportedConcurrency { construct: "async",
                                                           at:        token.position(), })
            },
            Statement::DAsync { token, .. } => {
                Err(RuntimeError::UnsupportedConcurrency { construct: "dasync",
                                                           at:        token.position(), })
            },
            Statement::Function(def) => {
                let closure = Value::closure(def.clone(), self.scope.clone());
                self.scope.bind(&def.name, closure, true, false)?;
                Ok(None)
            },
            Statement::Call(call) => {
                self.eval_call(call)?;
                Ok(None)
            },
        }
    }

    fn exec_assign(&mut self, assign: &Assign) -> EvalResult<()> {
        let value = self.eval(&assign.value)?;
        self.scope.bind(&assign.target, value, false, false)?;
        Ok(())
    }

    fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        let value = self.eval(condition)?;
        match value.payload() {
            Some(Payload::Bool(b)) => Ok(*b),
            _ => Err(RuntimeError::TypeError { details: format!("condition has type {}", value.ty()),
                                               at:      condition.token().position(), }),
        }
    }
}

/// Converts a line of input into a value of type `ty`.
///
/// Surrounding whitespace is ignored for numbers, booleans and urls. Booleans
/// accept `true` and `false` in any letter case. A char needs exactly one
/// character.
///
/// # Errors
/// - `InvalidInput` if the text does not denote a value of the type.
/// - `InvalidUrl` if a url is expected and the text is not one.
pub fn convert_input(line: &str, ty: &Type, token: &Token) -> EvalResult<Value> {
    let at = token.position();
    let invalid = || RuntimeError::InvalidInput { text:     line.to_string(),
                                                  expected: ty.clone(),
                                                  at };
    let trimmed = line.trim();
    match ty.as_scalar() {
        Some(Scalar::Int) => trimmed.parse::<i32>().map(Value::int).map_err(|_| invalid()),
        Some(Scalar::Bool) => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::bool(false))
            } else {
                Err(invalid())
            }
        },
        Some(Scalar::Char) => {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::char(c)),
                _ => Err(invalid()),
            }
        },
        Some(Scalar::String) => Ok(Value::string(line)),
        Some(Scalar::Url) => trimmed.parse::<UrlValue>()
                                    .map(Value::url)
                                    .map_err(|_| RuntimeError::InvalidUrl { text: line.to_string(),
                                                                            at }),
        None => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::TokenKind;

    fn readln() -> Token {
        Token { kind:   TokenKind::Readln,
                text:   "readln".to_string(),
                offset: 0,
                line:   1,
                column: 1,
                length: 6, }
    }

    #[test]
    fn input_converts_to_target_type() {
        let token = readln();
        assert_eq!(convert_input(" 12 ", &Type::INT, &token).unwrap().to_string(), "12");
        assert_eq!(convert_input("True", &Type::BOOL, &token).unwrap().to_string(), "true");
        assert_eq!(convert_input("z", &Type::CHAR, &token).unwrap().to_string(), "z");
        assert_eq!(convert_input(" a b ", &Type::STRING, &token).unwrap().to_string(), " a b ");
        assert_eq!(convert_input("tcp://h:1/o", &Type::URL, &token).unwrap().to_string(),
                   "tcp://h:1/o");
    }

    #[test]
    fn bad_input_is_typed_error() {
        let token = readln();
        assert!(matches!(convert_input("twelve", &Type::INT, &token),
                         Err(RuntimeError::InvalidInput { .. })));
        assert!(matches!(convert_input("ab", &Type::CHAR, &token),
                         Err(RuntimeError::InvalidInput { .. })));
        assert!(matches!(convert_input("yes", &Type::BOOL, &token),
                         Err(RuntimeError::InvalidInput { .. })));
        assert!(matches!(convert_input("http://x", &Type::URL, &token),
                         Err(RuntimeError::InvalidUrl { .. })));
    }
}
