/// Binary operator evaluation logic.
///
/// Handles integer arithmetic with overflow checks, comparisons, boolean
/// logic and string concatenation.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, the program entry point and expression
/// evaluation.
pub mod core;

/// Statement execution.
///
/// Blocks, declarations, assignments, control flow, printing and reading
/// input.
pub mod statement;

/// Function evaluation.
///
/// Handles calls of user-defined functions and closures, argument binding and
/// return value propagation.
pub mod function;

/// The console abstraction programs print to and read from.
pub mod console;
