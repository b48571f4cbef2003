use std::sync::Arc;

use tracing::{debug, warn};
use understudy_types::{ArgumentError, Failure, Invocation, Outcome};

use crate::behavior::{Behavior, Next};
use crate::target::CallTarget;

/// Run `invocation` against `target`, capturing the result or error.
///
/// Ref and out values written by the target end up in the outcome's
/// outputs. An [`ArgumentError`] from the target is kept intact in the
/// failure so the stand-in boundary can report it as one.
pub(crate) fn forward(target: &dyn CallTarget, invocation: &mut Invocation) -> Outcome {
    let method = Arc::clone(invocation.method());
    match target.call(&method, invocation.arguments_mut()) {
        Ok(value) => invocation.value_outcome(value),
        Err(error) => {
            if error.downcast_ref::<ArgumentError>().is_some() {
                warn!(member = %method.qualified_name(), %error, "target rejected its arguments");
            } else {
                debug!(member = %method.qualified_name(), %error, "forwarded call failed");
            }
            invocation.failure_outcome(Failure::from(error))
        }
    }
}

/// Forwards members the target knows to it; lets everything else fall
/// through to the rest of the chain.
pub struct ForwardingBehavior {
    target: Arc<dyn CallTarget>,
}

impl ForwardingBehavior {
    pub fn new(target: Arc<dyn CallTarget>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Arc<dyn CallTarget> {
        &self.target
    }
}

impl Behavior for ForwardingBehavior {
    fn name(&self) -> &str {
        "forwarding"
    }

    fn applies_to(&self, invocation: &Invocation) -> bool {
        self.target.responds_to(invocation.method())
    }

    fn execute(&self, invocation: &mut Invocation, _next: Next<'_>) -> Outcome {
        forward(self.target.as_ref(), invocation)
    }
}

impl std::fmt::Debug for ForwardingBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingBehavior").finish_non_exhaustive()
    }
}
