/// Checker state and entry point.
///
/// Defines the `Checker`, its scope handling and the `Annotations` it hands
/// to the code generator.
pub mod core;

/// Expression checking.
///
/// Resolves variables, types operators and marks reads of variables that are
/// assigned by background tasks.
pub mod expression;

/// Statement checking.
///
/// Blocks, declarations, assignments, control flow and the `readln`, `async`
/// and `dasync` statements.
pub mod statement;

/// Function definitions and call sites.
pub mod function;
