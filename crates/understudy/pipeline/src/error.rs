use thiserror::Error;
use understudy_types::{ArgumentError, Failure};

/// Errors from mutating or configuring a behavior pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("behavior index {index} out of range for pipeline of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid stand-in configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// What a caller of a stand-in member can observe going wrong.
#[derive(Error, Debug)]
pub enum CallError {
    /// The call itself failed; carries the original error unchanged.
    #[error(transparent)]
    Failed(Failure),

    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("{member} produced no return value")]
    MissingReturnValue { member: String },

    #[error("{member} returned {actual}, not {expected}")]
    ReturnType {
        member: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CallError {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            CallError::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A failure wrapping an [`ArgumentError`] (raised by an adapter reading its
/// arguments) becomes [`CallError::Argument`]; anything else is a call
/// failure.
impl From<Failure> for CallError {
    fn from(failure: Failure) -> Self {
        match failure.downcast_ref::<ArgumentError>() {
            Some(error) => CallError::Argument(error.clone()),
            None => CallError::Failed(failure),
        }
    }
}
