use std::fmt;
use std::sync::Arc;

use crate::arguments::Arguments;
use crate::descriptor::MethodDescriptor;
use crate::error::ArgumentError;
use crate::ids::Target;
use crate::outcome::{Failure, Outcome};
use crate::value::Value;

/// One intercepted call: target identity, member descriptor and arguments.
///
/// Target and member never change after construction. The argument store
/// may be rewritten in place so a behavior can stage new values for the
/// rest of the chain; a behavior that needs a different call altogether
/// builds a new invocation with [`Invocation::with_arguments`].
#[derive(Clone, Debug)]
pub struct Invocation {
    target: Target,
    method: Arc<MethodDescriptor>,
    arguments: Arguments,
}

impl Invocation {
    /// Bind `values` positionally to the member's declared parameters.
    pub fn new(
        target: Target,
        method: Arc<MethodDescriptor>,
        values: Vec<Option<Value>>,
    ) -> Result<Self, ArgumentError> {
        let member = method.qualified_name();
        let arguments = Arguments::new(member, method.parameters().clone(), values)?;
        Ok(Self {
            target,
            method,
            arguments,
        })
    }

    /// A new invocation of the same target and member with other arguments.
    pub fn with_arguments(&self, arguments: Arguments) -> Result<Invocation, ArgumentError> {
        Invocation::new(
            self.target.clone(),
            Arc::clone(&self.method),
            arguments.into_values(),
        )
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    /// A successful outcome whose outputs are this invocation's current
    /// ref, out and ref-return values.
    pub fn value_outcome(&self, value: Option<Value>) -> Outcome {
        Outcome::from_value(value, self.arguments.outputs())
    }

    /// A successful outcome with an explicitly supplied outputs store.
    pub fn value_outcome_with_outputs(&self, value: Option<Value>, outputs: Arguments) -> Outcome {
        Outcome::from_value(value, outputs)
    }

    /// A failed outcome. Outputs report the bindings as they currently stand.
    pub fn failure_outcome(&self, failure: impl Into<Failure>) -> Outcome {
        Outcome::from_failure(failure.into(), self.arguments.outputs())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.target, self.method.name())?;
        for (i, (param, value)) in self.arguments.bindings().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{}: {}", param.name, v.type_name())?,
                None => write!(f, "{}: null", param.name)?,
            }
        }
        f.write_str(")")
    }
}
