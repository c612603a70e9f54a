use tracing::trace;

use crate::{
    ast::{Assign, Block, BlockKind, Expr, ReturnValue, Statement},
    error::SemanticError,
    interpreter::{
        checker::core::{CheckResult, Checker},
        lexer::Token,
        value::{core::Value, types::Type},
    },
};

impl Checker {
    /// Checks a block in a new scope; the program block uses the root scope.
    ///
    /// # Returns
    /// The type returned by the block, or `None` if it does not return.
    pub fn check_block(&mut self, block: &Block) -> CheckResult<Option<Type>> {
        if block.kind == BlockKind::Program {
            return self.check_statements(block);
        }
        let frame = self.scope.child();
        self.with_scope(frame, |checker| checker.check_statements(block))
    }

    /// Checks the statements of a block in the current scope, stopping after
    /// the first statement that returns.
    pub(super) fn check_statements(&mut self, block: &Block) -> CheckResult<Option<Type>> {
        for statement in &block.statements {
            if let Some(returned) = self.check_statement(statement)? {
                return Ok(Some(returned));
            }
        }
        Ok(None)
    }

    /// Checks a single statement.
    ///
    /// # Returns
    /// `Some(type)` if the statement returns a value of that type on the
    /// checked path, `None` otherwise.
    ///
    /// # Errors
    /// Returns the first [`SemanticError`] found in the statement.
    pub fn check_statement(&mut self, statement: &Statement) -> CheckResult<Option<Type>> {
        match statement {
            Statement::Declaration { name, ty, init } => {
                let value = match init {
                    Some(init) => {
                        let value = self.check_expression(init)?;
                        expect_type(name, ty, value.ty())?;
                        value
                    },
                    None => Value::uninit(ty.clone()),
                };
                self.scope.bind(name, value, true, false)?;
                Ok(None)
            },
            Statement::Assignment(assign) => {
                self.check_assign(assign)?;
                Ok(None)
            },
            Statement::Block(block) => self.check_block(block),
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            token, } => {
                self.check_condition(condition, "if", token)?;
                let then_returns = self.check_block(then_branch)?;
                if let Some(else_branch) = else_branch {
                    let else_returns = self.check_block(else_branch)?;
                    if then_returns != else_returns {
                        return Err(SemanticError::BranchMismatch { at: token.position() });
                    }
                }
                Ok(then_returns)
            },
            Statement::While { condition, body, token } => {
                self.check_condition(condition, "while", token)?;
                self.check_block(body)
            },
            Statement::For { init,
                             condition,
                             step,
                             body,
                             token, } => {
                self.check_assign(init)?;
                self.check_assign(step)?;
                self.check_condition(condition, "for", token)?;
                self.check_block(body)
            },
            Statement::Return { value, .. } => match value {
                ReturnValue::Expr(expr) => Ok(Some(self.check_expression(expr)?.ty().clone())),
                ReturnValue::Function(def) => self.check_function(def).map(Some),
            },
            Statement::Print { values, .. } => {
                for value in values {
                    self.check_expression(value)?;
                }
                Ok(None)
            },
            Statement::Read { target, token } => {
                let ty = self.scope.apply(target)?.value.ty().clone();
                if ty.is_function() {
                    return Err(SemanticError::UnreadableType { name:  target.text.clone(),
                                                               found: ty,
                                                               at:    target.position(), });
                }
                self.annotations.targets.insert(token.offset, ty);
                Ok(None)
            },
            Statement::Async { target, expr, token } => {
                let ty = self.scope.apply(target)?.value.ty().clone();
                let value = self.check_expression(expr)?;
                expect_type(target, &ty, value.ty())?;
                self.mark_async(target, token, ty)?;
                Ok(None)
            },
            Statement::DAsync { target,
                                url,
                                call,
                                token, } => {
                let ty = self.scope.apply(target)?.value.ty().clone();

                let address = self.check_expression(&Expr::Variable { token: url.clone() })?;
                if address.ty() != &Type::URL {
                    return Err(SemanticError::ExpectedUrl { name:  url.text.clone(),
                                                            found: address.ty().clone(),
                                                            at:    url.position(), });
                }
                if let Some(constant) = address.as_url() {
                    self.annotations.remote_urls.insert(token.offset, constant.clone());
                }

                let returns = self.check_call(call)?.ok_or_else(|| {
                                                        SemanticError::NoValue { name: call.callee.text.clone(),
                                                                                 at:   call.callee.position(), }
                                                    })?;
                expect_type(target, &ty, &returns)?;
                self.mark_async(target, token, ty)?;
                Ok(None)
            },
            Statement::Function(def) => {
                self.check_function(def)?;
                Ok(None)
            },
            Statement::Call(call) => {
                self.check_call(call)?;
                Ok(None)
            },
        }
    }

    /// Checks `target = value`, rebinding the target with the checked value.
    fn check_assign(&mut self, assign: &Assign) -> CheckResult<()> {
        let value = self.check_expression(&assign.value)?;
        let ty = self.scope.apply(&assign.target)?.value.ty().clone();
        expect_type(&assign.target, &ty, value.ty())?;
        self.scope.bind(&assign.target, value, false, false)?;
        Ok(())
    }

    fn check_condition(&mut self,
                       condition: &Expr,
                       construct: &'static str,
                       token: &Token)
                       -> CheckResult<()> {
        let value = self.check_expression(condition)?;
        if value.ty() != &Type::BOOL {
            return Err(SemanticError::ConditionNotBoolean { construct,
                                                            found: value.ty().clone(),
                                                            at: token.position() });
        }
        Ok(())
    }

    /// Records the target type of a background assignment and marks the
    /// target so later reads wait for the task.
    fn mark_async(&mut self, target: &Token, token: &Token, ty: Type) -> CheckResult<()> {
        trace!(variable = %target.text, "assigned in background");
        self.annotations.targets.insert(token.offset, ty.clone());
        self.scope.bind(target, Value::uninit(ty), false, true)?;
        Ok(())
    }
}

fn expect_type(name: &Token, expected: &Type, found: &Type) -> CheckResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch { name:     name.text.clone(),
                                          expected: expected.clone(),
                                          found:    found.clone(),
                                          at:       name.position(), })
    }
}
