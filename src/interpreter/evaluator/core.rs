use tracing::debug;

use crate::{
    ast::{Expr, Program},
    error::RuntimeError,
    interpreter::{
        environment::Env,
        evaluator::console::Console,
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Deepest allowed nesting of function calls.
pub const MAX_CALL_DEPTH: usize = 2048;

/// Stack reserved for the thread a program runs on. Sized so that
/// [`MAX_CALL_DEPTH`] nested calls fit in unoptimized builds.
pub const EVAL_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the current scope, the console
/// the program reads from and prints to, and the depth of nested calls.
///
/// ## Usage
///
/// A `Context` runs one program. The program scope it starts with survives
/// the whole run; blocks and calls push and pop frames on top of it.
pub struct Context<'c> {
    pub(super) scope:   Env,
    pub(super) console: &'c mut dyn Console,
    pub(super) depth:   usize,
}

impl<'c> Context<'c> {
    /// Creates a context with an empty program scope.
    #[must_use]
    pub fn new(console: &'c mut dyn Console) -> Self {
        Self { scope: Env::root(),
               console,
               depth: 0 }
    }

    /// Runs a checked program.
    ///
    /// The program-level declarations are executed first, then `Main` is
    /// looked up and called.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised.
    pub fn run_program(&mut self, program: &Program) -> EvalResult<()> {
        self.exec_statements(&program.root)?;
        debug!("program declarations done, calling Main");
        let main = self.scope.apply(&program.main)?;
        self.invoke(&program.main, &main.value, Vec::new())?;
        Ok(())
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// Both operands of a binary operator are always evaluated, left first.
    ///
    /// # Errors
    /// - `Uninitialized` when reading a variable that holds no value yet.
    /// - `DivisionByZero` and `Overflow` from integer arithmetic.
    /// - `MissingReturnValue` when a call used as a value does not return.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Constant { value, .. } => Ok(Value::from_literal(value)),
            Expr::Variable { token } => {
                let binding = self.scope.apply(token)?;
                if !binding.value.is_initialized() {
                    return Err(RuntimeError::Uninitialized { name: token.text.clone(),
                                                             at:   token.position(), });
                }
                Ok(binding.value)
            },
            Expr::Unary { op, operand, token } => {
                let value = self.eval(operand)?;
                Self::eval_unary(*op, &value, token)
            },
            Expr::Binary { left, op, right, token } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_binary(*op, &left, &right, token)
            },
            Expr::Call(call) => self.eval_call(call)?.ok_or_else(|| {
                                                          RuntimeError::MissingReturnValue { name: call.callee.text.clone(),
                                                                                             at:   call.callee.position(), }
                                                      }),
        }
    }
}
