use std::fmt;
use std::sync::Arc;

use crate::arguments::Arguments;
use crate::value::Value;

/// A captured call failure, carried through the pipeline as data.
///
/// Wraps the original error without altering it, so the boundary can hand
/// the caller exactly what the real implementation or behavior raised.
#[derive(Clone)]
pub struct Failure {
    error: Arc<anyhow::Error>,
}

impl Failure {
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            error: Arc::new(anyhow::Error::new(error)),
        }
    }

    /// A failure carrying only a message.
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self {
            error: Arc::new(anyhow::Error::msg(message)),
        }
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    pub fn is<E>(&self) -> bool
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.is::<E>()
    }

    /// Whether both failures carry the same captured error.
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Self {
            error: Arc::new(error),
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.error, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.error, f)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// The result of executing an invocation.
///
/// Exactly one of value or failure is present. The outputs store is always
/// present and holds the final ref, out and ref-return values (empty when
/// the member has none).
#[derive(Clone, Debug)]
pub struct Outcome {
    result: Result<Option<Value>, Failure>,
    outputs: Arguments,
}

impl Outcome {
    pub fn from_value(value: Option<Value>, outputs: Arguments) -> Self {
        Self {
            result: Ok(value),
            outputs,
        }
    }

    pub fn from_failure(failure: Failure, outputs: Arguments) -> Self {
        Self {
            result: Err(failure),
            outputs,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// The produced value; `None` for a null value or a failure.
    pub fn value(&self) -> Option<&Value> {
        self.result.as_ref().ok().and_then(Option::as_ref)
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.result.as_ref().err()
    }

    pub fn result(&self) -> &Result<Option<Value>, Failure> {
        &self.result
    }

    pub fn outputs(&self) -> &Arguments {
        &self.outputs
    }

    pub fn into_parts(self) -> (Result<Option<Value>, Failure>, Arguments) {
        (self.result, self.outputs)
    }

    pub fn into_result(self) -> Result<Option<Value>, Failure> {
        self.result
    }
}
