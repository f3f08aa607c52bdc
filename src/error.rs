//! Error taxonomy shared by every evaluation path.

use thiserror::Error;

use crate::interner::Symbol;

/// Everything that can abort an evaluation.
///
/// A head symbol that is neither a form nor a bound variable is reported as
/// `UndefinedSymbol`: forms and variables share one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LispError {
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(Symbol),

    #[error("Symbol {0} is already defined")]
    AlreadyDefined(Symbol),

    #[error("Malformed call, too many arguments: {0}")]
    TooManyArguments(String),

    #[error("Malformed call, too few arguments: {0}")]
    TooFewArguments(String),

    #[error("wrong number of arguments, expected {expected} got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    TypeMismatch(String),

    #[error("Cannot take head of an empty list: {0}")]
    EmptyList(String),

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Integer overflow: {0}")]
    IntegerOverflow(String),

    #[error("Maximum evaluation depth of {limit} exceeded")]
    StackExhausted { limit: usize },

    #[error("Syntax error: {0}")]
    Syntax(String),
}

pub type Result<T> = std::result::Result<T, LispError>;
