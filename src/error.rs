use crate::interpreter::lexer::Position;

/// Lexical errors.
///
/// Raised by the scanner when no token pattern matches the input, or when a
/// string literal or block comment runs to the end of the source.
pub mod lexical_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// tokens. Every parse error carries the offending token.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during interpretation and code
/// generation: division by zero, failed input conversions, uninitialized
/// variables and constructs that only exist in generated code.
pub mod runtime_error;
/// Semantic errors.
///
/// Scope and type failures detected by the checker before a program is run or
/// generated.
pub mod semantic_error;

pub use lexical_error::LexicalError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use semantic_error::SemanticError;

/// Any error produced by one of the phases.
///
/// The wrapped error is rendered unchanged; use [`Error::position`] to locate
/// it in the source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// The interpreter thread could not be started.
    #[error("Cannot start the interpreter: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the source position of the error, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexical(e) => Some(e.position()),
            Self::Parse(e) => Some(e.position()),
            Self::Semantic(e) => Some(e.position()),
            Self::Runtime(e) => Some(e.position()),
            Self::Io(_) => None,
        }
    }

    /// A short name of the phase that failed, used as a diagnostic heading.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::Lexical(_) => "lexical error",
            Self::Parse(_) => "parse error",
            Self::Semantic(_) => "semantic error",
            Self::Runtime(_) => "runtime error",
            Self::Io(_) => "i/o error",
        }
    }
}
