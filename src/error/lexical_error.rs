use crate::interpreter::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while scanning.
pub enum LexicalError {
    /// No token pattern matches the input at this position.
    UndefinedToken {
        /// The text that could not be matched.
        text: String,
        /// Where scanning stopped.
        at:   Position,
    },
    /// A string literal or block comment was never closed.
    UnexpectedEndOfInput {
        /// The unterminated text.
        text: String,
        /// Where the unterminated token starts.
        at:   Position,
    },
}

impl LexicalError {
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UndefinedToken { at, .. } | Self::UnexpectedEndOfInput { at, .. } => *at,
        }
    }
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedToken { text, at } => {
                write!(f, "Error on {at}: Undefined token '{text}'.")
            },
            Self::UnexpectedEndOfInput { text, at } => {
                let head: String = text.chars().take(12).collect();
                write!(f, "Error on {at}: Unexpected end of input inside '{head}'.")
            },
        }
    }
}

impl std::error::Error for LexicalError {}
