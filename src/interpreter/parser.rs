/// Parser entry points.
///
/// Defines `ParseResult`, the program rule and the expression entry point.
pub mod core;

/// Unary operators and primary expressions.
///
/// Handles `!` and `-`, literals, variables, calls and parenthesized
/// expressions.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the left-associative precedence levels from `||` down to `*`
/// and `/`.
pub mod binary;

/// Block and declaration parsing.
///
/// Parses braces-delimited blocks, variable declarations in both forms and
/// function definitions, named or anonymous.
pub mod block;

/// Statement parsing.
///
/// Covers calls, assignments and their compound forms, `readln`, `async`,
/// `dasync`, control flow, `return` and `println`.
pub mod statement;

/// Type parsing.
///
/// Scalar keywords and recursive `fun(...)` function types.
pub mod types;

/// Utility functions for the parser.
///
/// Token expectations, lookahead and comma-separated lists.
pub mod utils;
