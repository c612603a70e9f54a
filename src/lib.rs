//! # fwap
//!
//! fwap is a small imperative teaching language written in Rust.
//! Programs are scanned, parsed and type checked, then either interpreted or
//! translated to C#. `async` and `dasync` assignments only exist in the
//! generated code, where they become tasks and remote-object calls.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::thread;

use tracing::{debug, warn};

use crate::{
    ast::Program,
    error::Error,
    interpreter::{
        checker::core::{Annotations, check},
        codegen::{
            core::{GeneratedProgram, Generator},
            toolchain::{Toolchain, UnitKind},
        },
        evaluator::{
            console::{BufferedConsole, Console},
            core::{Context, EVAL_STACK_SIZE},
        },
        lexer::{Token, TokenKind},
        parser::core::parse_program,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of a program as a tree. The AST is
/// built by the parser and traversed by the checker, the evaluator and the
/// code generator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches the originating tokens to AST nodes for error reporting.
/// - Renders a program as an indented outline.
pub mod ast;
/// Command-line settings: colors and log filtering.
pub mod config;
/// Terminal rendering of errors with the offending source line.
pub mod diagnostic;
/// Provides unified error types for every phase.
///
/// This module defines all errors that can be raised while scanning, parsing,
/// checking, evaluating or generating code. It standardizes error reporting
/// and carries detailed information about failures, including error kinds,
/// descriptions, and source positions for user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, checker,
///   evaluator and generator).
/// - Attaches line and column numbers for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, checking, evaluation, code
/// generation and value representations to provide a complete toolchain for
/// the language.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, checker, evaluator,
///   generator and value types.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// Scans `source` into tokens, comments included, ending with `EOF`.
///
/// # Example
/// ```
/// let tokens = fwap::tokenize("var x int = 5; // five").unwrap();
/// assert_eq!(tokens.last().unwrap().text, "EOF");
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    Ok(interpreter::lexer::tokenize(source)?)
}

/// Parses a program without checking it.
///
/// Comments are dropped before parsing.
///
/// # Errors
/// Returns a lexical or parse error.
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens: Vec<Token> = tokenize(source)?.into_iter()
                                              .filter(|t| t.kind != TokenKind::Comment)
                                              .collect();
    let mut iter = tokens.iter().peekable();
    Ok(parse_program(&mut iter)?)
}

/// Parses and checks a program.
///
/// # Returns
/// The program and the facts the checker recorded for code generation.
pub fn check_source(source: &str) -> Result<(Program, Annotations), Error> {
    let program = parse(source)?;
    let annotations = check(&program)?;
    Ok((program, annotations))
}

/// Checks and runs a program on `console`.
///
/// The program runs on a thread of its own with an [`EVAL_STACK_SIZE`] stack,
/// so deep recursion is stopped by the call depth limit rather than by the
/// caller's stack size.
///
/// # Errors
/// Returns the first error of any phase; nothing runs unless the program
/// checks. Fails with [`Error::Io`] if the thread cannot be started.
pub fn interpret(source: &str, console: &mut dyn Console) -> Result<(), Error> {
    thread::scope(|scope| {
        let handle = thread::Builder::new().name("fwap-eval".to_string())
                                           .stack_size(EVAL_STACK_SIZE)
                                           .spawn_scoped(scope, || interpret_here(source, console))?;
        handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

fn interpret_here(source: &str, console: &mut dyn Console) -> Result<(), Error> {
    let (program, _) = check_source(source)?;
    debug!("running program");
    Context::new(console).run_program(&program)?;
    Ok(())
}

/// Checks and runs a program, feeding `input` to `readln`.
///
/// # Returns
/// The console transcript: everything printed, plus each line read.
///
/// # Examples
/// ```
/// use fwap::run;
///
/// let out = run("func Main() { println(3 + 4); }", Vec::<String>::new()).unwrap();
/// assert_eq!(out, "7\n");
///
/// let source = "func Main() { var n int; n = readln(); println(n * 2); }";
/// assert_eq!(run(source, ["21"]).unwrap(), "21\n42\n");
///
/// // Dividing by zero is only detected at run time.
/// let source = "func Main() { var y int = 0; println(1 / y); }";
/// assert!(run(source, Vec::<String>::new()).is_err());
/// ```
pub fn run<S: Into<String>>(source: &str, input: impl IntoIterator<Item = S>) -> Result<String, Error> {
    let mut console = BufferedConsole::with_input(input);
    interpret(source, &mut console)?;
    Ok(console.into_output())
}

/// Checks a program and translates it to C#.
///
/// With a toolchain, every server unit is built as a library and as an
/// executable while generating, then the primary unit is built as an
/// executable referencing them. Build failures are reported in
/// [`GeneratedProgram::diagnostics`] instead of failing the compilation.
///
/// # Parameters
/// - `source`: The program text.
/// - `name`: Name of the primary unit.
/// - `toolchain`: An optional external compiler.
pub fn compile(source: &str,
               name: &str,
               mut toolchain: Option<&mut dyn Toolchain>)
               -> Result<GeneratedProgram, Error> {
    let (program, annotations) = check_source(source)?;
    let generator = Generator::new(&program,
                                   &annotations,
                                   toolchain.as_mut().map(|t| &mut **t as &mut dyn Toolchain));
    let mut generated = generator.generate(name)?;
    if let Some(toolchain) = toolchain
       && let Err(message) =
           toolchain.build(&generated.primary, UnitKind::Executable, &generated.references)
    {
        warn!(unit = name, "build failed");
        generated.diagnostics
                 .push(format!("{name} ({:?}): {message}", UnitKind::Executable));
    }
    Ok(generated)
}
