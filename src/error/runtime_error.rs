use crate::interpreter::{lexer::Position, value::types::Type};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during interpretation and code
/// generation.
pub enum RuntimeError {
    /// Tried to use an unbound identifier.
    UnknownIdentifier {
        /// The identifier.
        name: String,
        /// The source position of the reference.
        at:   Position,
    },
    /// Tried to overwrite a binding with a value of another type.
    ConflictingBinding {
        /// The identifier.
        name:     String,
        /// The type it already has.
        existing: Type,
        /// The type of the new value.
        found:    Type,
        /// The source position of the binding.
        at:       Position,
    },
    /// Read a variable that was declared without a value and never assigned.
    Uninitialized {
        /// The variable.
        name: String,
        /// The source position of the read.
        at:   Position,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The `/` token.
        at: Position,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// The operator token.
        at: Position,
    },
    /// A value had an unexpected type.
    TypeError {
        /// Details about the mismatch.
        details: String,
        /// The source position.
        at:      Position,
    },
    /// Input text could not be converted to the target type.
    InvalidInput {
        /// The text that was read.
        text:     String,
        /// The type it should have been converted to.
        expected: Type,
        /// The `readln` token.
        at:       Position,
    },
    /// Input text read into a url variable is not a url.
    InvalidUrl {
        /// The text that was read.
        text: String,
        /// The `readln` token.
        at:   Position,
    },
    /// The console failed while `readln` waited for a line.
    InputUnavailable {
        /// The underlying I/O error.
        details: String,
        /// The `readln` token.
        at:      Position,
    },
    /// `async` and `dasync` only exist in generated code.
    UnsupportedConcurrency {
        /// `async` or `dasync`.
        construct: &'static str,
        /// The construct's token.
        at:        Position,
    },
    /// Called something that is not a function.
    NotCallable {
        /// The called name.
        name: String,
        /// The call token.
        at:   Position,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCountMismatch {
        /// The called function.
        name:     String,
        /// Number of parameters.
        expected: usize,
        /// Number of arguments.
        found:    usize,
        /// The call token.
        at:       Position,
    },
    /// A call used as a value finished without returning.
    MissingReturnValue {
        /// The called function.
        name: String,
        /// The call token.
        at:   Position,
    },
    /// Calls nested too deeply.
    StackOverflow {
        /// The call that exceeded the limit.
        name: String,
        /// The call token.
        at:   Position,
    },
    /// The function called through `dasync` is not declared at program level.
    RemoteFunctionNotFound {
        /// The called function.
        name: String,
        /// The call token.
        at:   Position,
    },
    /// The address of a `dasync` is not a url literal known before run time.
    UnknownRemoteAddress {
        /// The address variable.
        name: String,
        /// The address token.
        at:   Position,
    },
    /// Code generation met a statement the checker did not annotate.
    MissingAnnotation {
        /// The statement keyword.
        construct: &'static str,
        /// The statement token.
        at:        Position,
    },
}

impl RuntimeError {
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownIdentifier { at, .. }
            | Self::ConflictingBinding { at, .. }
            | Self::Uninitialized { at, .. }
            | Self::DivisionByZero { at }
            | Self::Overflow { at }
            | Self::TypeError { at, .. }
            | Self::InvalidInput { at, .. }
            | Self::InvalidUrl { at, .. }
            | Self::InputUnavailable { at, .. }
            | Self::UnsupportedConcurrency { at, .. }
            | Self::NotCallable { at, .. }
            | Self::ArgumentCountMismatch { at, .. }
            | Self::MissingReturnValue { at, .. }
            | Self::StackOverflow { at, .. }
            | Self::RemoteFunctionNotFound { at, .. }
            | Self::UnknownRemoteAddress { at, .. }
            | Self::MissingAnnotation { at, .. } => *at,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, at } => {
                write!(f, "Error on {at}: Cannot find '{name}' in the environment.")
            },
            Self::ConflictingBinding { name,
                                       existing,
                                       found,
                                       at, } => write!(f,
                                                       "Error on {at}: '{name}' has type {existing} and cannot hold a value of type {found}."),
            Self::Uninitialized { name, at } => {
                write!(f, "Error on {at}: Variable '{name}' has not been initialized.")
            },
            Self::DivisionByZero { at } => write!(f, "Error on {at}: Division by zero."),
            Self::Overflow { at } => write!(f,
                                            "Error on {at}: Integer overflow while trying to compute result."),
            Self::TypeError { details, at } => write!(f, "Error on {at}: Type error: {details}."),
            Self::InvalidInput { text, expected, at } => write!(f,
                                                                "Error on {at}: Cannot convert the text \"{text}\" into a value of type {expected}."),
            Self::InvalidUrl { text, at } => write!(f,
                                                    "Error on {at}: \"{text}\" is not a url of the form tcp://host:port/object."),
            Self::InputUnavailable { details, at } => {
                write!(f, "Error on {at}: Cannot read a line of input: {details}.")
            },
            Self::UnsupportedConcurrency { construct, at } => write!(f,
                                                                     "Error on {at}: Cannot interpret a program containing '{construct}'; compile it instead."),
            Self::NotCallable { name, at } => {
                write!(f, "Error on {at}: '{name}' is not a function.")
            },
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          at, } => write!(f,
                                                          "Error on {at}: '{name}' expects {expected} arguments, found {found}."),
            Self::MissingReturnValue { name, at } => write!(f,
                                                            "Error on {at}: Function '{name}' finished without returning a value."),
            Self::StackOverflow { name, at } => write!(f,
                                                       "Error on {at}: Calls nested too deeply while calling '{name}'."),
            Self::RemoteFunctionNotFound { name, at } => write!(f,
                                                                "Error on {at}: '{name}' must be a function declared at program level to be called remotely."),
            Self::UnknownRemoteAddress { name, at } => write!(f,
                                                              "Error on {at}: The address '{name}' must hold a url literal to generate the remote server."),
            Self::MissingAnnotation { construct, at } => write!(f,
                                                                "Error on {at}: The '{construct}' statement has not been checked."),
        }
    }
}

impl std::error::Error for RuntimeError {}
