/// The checker validates scopes and types before anything runs.
///
/// It walks the tree once with its own chain of scopes, rejects ill-typed
/// programs with a `SemanticError` and records the facts code generation
/// needs, such as which variable reads must wait for a background task.
pub mod checker;
/// The code generator translates checked programs to C#.
///
/// # Responsibilities
/// - Lowers every statement and expression to tab-indented C# text.
/// - Turns `async` into tasks and `dasync` into remote calls plus a separate
///   server unit.
/// - Hands server units to an optional external compiler.
pub mod codegen;
/// Scope chains shared by the checker and the evaluator.
///
/// Each frame maps names to typed values and points to its parent frame.
pub mod environment;
/// The evaluator executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs arithmetic and logical operations, manages variable state, and
/// produces console output. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, closures and control flow.
/// - Reports runtime errors such as division by zero or invalid input.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric, char, string and url literals, identifiers, comments
///   and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of the program. This
/// enables later phases to check, execute and translate user code.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates correct grammar and syntax, reporting errors with location info.
/// - Desugars compound assignments such as `+=` and `++`.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the types of the language, remote addresses and the
/// typed values stored in scopes by both the checker and the evaluator.
///
/// # Responsibilities
/// - Defines the `Type` algebra and its structural equality.
/// - Defines the `Value` struct, whose payload may be missing for variables
///   that were declared but never assigned.
/// - Parses and displays `tcp://host:port/object` addresses.
pub mod value;
