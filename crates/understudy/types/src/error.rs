use thiserror::Error;

/// Marshaling errors raised by the argument store.
///
/// These indicate a programming error in behavior or stand-in code and are
/// returned immediately. They are never turned into a failure outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("{member} expects {expected} arguments but {actual} were supplied")]
    Cardinality {
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("no parameter named `{0}`")]
    UnknownName(String),

    #[error("argument index {index} out of range for {len} parameters")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("duplicate parameter name `{0}`")]
    DuplicateName(String),

    #[error("argument `{name}` is null but {expected} is not nullable")]
    NullValue { name: String, expected: String },

    #[error("argument `{name}` holds {actual}, which is not a {expected}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// Raised when a call reaches a strict terminal step with no behavior
/// having produced a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{member} is not implemented")]
pub struct NotImplemented {
    pub member: String,
}

impl NotImplemented {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
        }
    }
}
