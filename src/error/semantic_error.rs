use crate::{
    ast::{BinaryOperator, UnaryOperator},
    interpreter::{lexer::Position, value::types::Type},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all scope and type errors found by the checker.
pub enum SemanticError {
    /// An identifier is not bound in any enclosing scope.
    UnknownIdentifier {
        /// The identifier.
        name: String,
        /// The source position of the reference.
        at:   Position,
    },
    /// A name is bound again in the same scope with another type.
    ConflictingDeclaration {
        /// The identifier.
        name:     String,
        /// The type it already has.
        existing: Type,
        /// The type of the new binding.
        found:    Type,
        /// The source position of the new binding.
        at:       Position,
    },
    /// The two operands of a binary operator have different types.
    OperandMismatch {
        /// The operator.
        op:    BinaryOperator,
        /// Type of the left operand.
        left:  Type,
        /// Type of the right operand.
        right: Type,
        /// The operator token.
        at:    Position,
    },
    /// A binary operator is not defined for its operand type.
    UnsupportedOperation {
        /// The operator.
        op:      BinaryOperator,
        /// The operand type.
        operand: Type,
        /// The operator token.
        at:      Position,
    },
    /// A unary operator is not defined for its operand type.
    UnsupportedUnaryOperation {
        /// The operator.
        op:      UnaryOperator,
        /// The operand type.
        operand: Type,
        /// The operator token.
        at:      Position,
    },
    /// An initializer or assigned value has the wrong type.
    TypeMismatch {
        /// The variable.
        name:     String,
        /// The declared type of the variable.
        expected: Type,
        /// The type of the value.
        found:    Type,
        /// The source position of the variable.
        at:       Position,
    },
    /// A condition is not boolean.
    ConditionNotBoolean {
        /// `if`, `while` or `for`.
        construct: &'static str,
        /// The type of the condition.
        found:     Type,
        /// The source position of the statement.
        at:        Position,
    },
    /// The branches of an `if` disagree on whether, or what, they return.
    BranchMismatch {
        /// The `if` token.
        at: Position,
    },
    /// A function without return type returns a value.
    UnexpectedReturnValue {
        /// The function.
        function: String,
        /// Type of the returned value.
        found:    Type,
        /// The function name token.
        at:       Position,
    },
    /// A function with a return type never returns.
    MissingReturn {
        /// The function.
        function: String,
        /// The declared return type.
        expected: Type,
        /// The function name token.
        at:       Position,
    },
    /// A function returns a value of another type than it declares.
    ReturnTypeMismatch {
        /// The function.
        function: String,
        /// The declared return type.
        expected: Type,
        /// Type of the returned value.
        found:    Type,
        /// The function name token.
        at:       Position,
    },
    /// A call names something that is not a function.
    NotCallable {
        /// The called name.
        name:  String,
        /// Its type.
        found: Type,
        /// The call token.
        at:    Position,
    },
    /// A call passes the wrong number of arguments.
    ArityMismatch {
        /// The called function.
        name:     String,
        /// Number of parameters.
        expected: usize,
        /// Number of arguments.
        found:    usize,
        /// The call token.
        at:       Position,
    },
    /// An argument does not have the type of its parameter.
    ArgumentMismatch {
        /// The called function.
        name:     String,
        /// One-based position of the argument.
        index:    usize,
        /// The parameter type.
        expected: Type,
        /// The argument type.
        found:    Type,
        /// The call token.
        at:       Position,
    },
    /// A function without return type is called where a value is needed.
    NoValue {
        /// The called function.
        name: String,
        /// The call token.
        at:   Position,
    },
    /// The address operand of `dasync` is not a url.
    ExpectedUrl {
        /// The operand.
        name:  String,
        /// Its type.
        found: Type,
        /// The operand token.
        at:    Position,
    },
    /// `readln` cannot produce a value of this type.
    UnreadableType {
        /// The target variable.
        name:  String,
        /// Its type.
        found: Type,
        /// The target token.
        at:    Position,
    },
}

impl SemanticError {
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownIdentifier { at, .. }
            | Self::ConflictingDeclaration { at, .. }
            | Self::OperandMismatch { at, .. }
            | Self::UnsupportedOperation { at, .. }
            | Self::UnsupportedUnaryOperation { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::ConditionNotBoolean { at, .. }
            | Self::BranchMismatch { at }
            | Self::UnexpectedReturnValue { at, .. }
            | Self::MissingReturn { at, .. }
            | Self::ReturnTypeMismatch { at, .. }
            | Self::NotCallable { at, .. }
            | Self::ArityMismatch { at, .. }
            | Self::ArgumentMismatch { at, .. }
            | Self::NoValue { at, .. }
            | Self::ExpectedUrl { at, .. }
            | Self::UnreadableType { at, .. } => *at,
        }
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, at } => {
                write!(f, "Error on {at}: Cannot find '{name}' in this scope.")
            },
            Self::ConflictingDeclaration { name,
                                           existing,
                                           found,
                                           at, } => write!(f,
                                                           "Error on {at}: '{name}' is already declared with type {existing}, cannot declare it as {found}."),
            Self::OperandMismatch { op, left, right, at } => write!(f,
                                                                    "Error on {at}: Operation between different types is not supported: {left} {op} {right}."),
            Self::UnsupportedOperation { op, operand, at } => write!(f,
                                                                     "Error on {at}: Operator '{op}' is not supported for type {operand}."),
            Self::UnsupportedUnaryOperation { op, operand, at } => write!(f,
                                                                          "Error on {at}: Unary operator '{op}' is not supported for type {operand}."),
            Self::TypeMismatch { name,
                                 expected,
                                 found,
                                 at, } => write!(f,
                                                 "Error on {at}: The variable '{name}' has type {expected}, so it cannot take a value of type {found}."),
            Self::ConditionNotBoolean { construct, found, at } => write!(f,
                                                                         "Error on {at}: The {construct} condition must be bool, found {found}."),
            Self::BranchMismatch { at } => write!(f,
                                                  "Error on {at}: Both branches of the if must return the same type."),
            Self::UnexpectedReturnValue { function, found, at } => write!(f,
                                                                          "Error on {at}: Function '{function}' returns a value of type {found} but declares no return type."),
            Self::MissingReturn { function, expected, at } => write!(f,
                                                                     "Error on {at}: Function '{function}' does not return the expected type {expected}."),
            Self::ReturnTypeMismatch { function,
                                       expected,
                                       found,
                                       at, } => write!(f,
                                                       "Error on {at}: Function '{function}' returns {found}, which does not match the declared type {expected}."),
            Self::NotCallable { name, found, at } => write!(f,
                                                            "Error on {at}: '{name}' has type {found} and cannot be called."),
            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  at, } => write!(f,
                                                  "Error on {at}: Call of '{name}' has {found} arguments, expected {expected}."),
            Self::ArgumentMismatch { name,
                                     index,
                                     expected,
                                     found,
                                     at, } => write!(f,
                                                     "Error on {at}: Argument {index} of call '{name}' has to be of type {expected}, found {found}."),
            Self::NoValue { name, at } => write!(f,
                                                 "Error on {at}: Function '{name}' does not return a value and cannot be used in an expression."),
            Self::ExpectedUrl { name, found, at } => write!(f,
                                                            "Error on {at}: The address '{name}' must have type url, found {found}."),
            Self::UnreadableType { name, found, at } => write!(f,
                                                               "Error on {at}: Cannot read a value of type {found} into '{name}'."),
        }
    }
}

impl std::error::Error for SemanticError {}
