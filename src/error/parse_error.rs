use crate::interpreter::lexer::{Position, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during parsing.
pub enum ParseError {
    /// Found a token other than the one the grammar requires here.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    Token,
    },
    /// A type keyword was expected but not found.
    ExpectedType {
        /// The token encountered.
        found: Token,
    },
    /// `fun` was used where only a scalar type is allowed.
    ScalarTypeRequired {
        /// The offending `fun` token.
        found: Token,
    },
    /// An identifier-led statement did not continue with an assignment form.
    InvalidStatement {
        /// The token after the identifier.
        found: Token,
    },
    /// An integer literal does not fit in 32 bits.
    LiteralTooLarge {
        /// The literal token.
        token: Token,
    },
    /// A URL literal has a port outside `0..=65535`.
    InvalidUrl {
        /// The literal token.
        token: Token,
    },
    /// The token stream ended without an end-of-file token.
    UnexpectedEndOfInput {
        /// Position of the last token seen.
        at: Position,
    },
    /// Tokens remain after the entry point function.
    UnexpectedTrailingTokens {
        /// The first extra token.
        found: Token,
    },
}

impl ParseError {
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { found, .. }
            | Self::ExpectedType { found }
            | Self::ScalarTypeRequired { found }
            | Self::InvalidStatement { found }
            | Self::UnexpectedTrailingTokens { found } => found.position(),
            Self::LiteralTooLarge { token } | Self::InvalidUrl { token } => token.position(),
            Self::UnexpectedEndOfInput { at } => *at,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found } => write!(f,
                                                                "Error on {}: Expected {expected}, found '{}' ({}).",
                                                                found.position(),
                                                                found.text,
                                                                found.kind),
            Self::ExpectedType { found } => {
                write!(f, "Error on {}: '{}' is not a type.", found.position(), found.text)
            },
            Self::ScalarTypeRequired { found } => write!(f,
                                                         "Error on {}: A function type cannot be used here; expected int, bool, char, string or url.",
                                                         found.position()),
            Self::InvalidStatement { found } => write!(f,
                                                       "Error on {}: Invalid statement, unexpected '{}'.",
                                                       found.position(),
                                                       found.text),
            Self::LiteralTooLarge { token } => write!(f,
                                                      "Error on {}: Literal {} is too large.",
                                                      token.position(),
                                                      token.text),
            Self::InvalidUrl { token } => {
                write!(f, "Error on {}: Invalid url '{}'.", token.position(), token.text)
            },
            Self::UnexpectedEndOfInput { at } => write!(f, "Error on {at}: Unexpected end of input."),
            Self::UnexpectedTrailingTokens { found } => write!(f,
                                                               "Error on {}: Extra tokens after the Main function: '{}'.",
                                                               found.position(),
                                                               found.text),
        }
    }
}

impl std::error::Error for ParseError {}
