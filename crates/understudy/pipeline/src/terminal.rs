use std::sync::Arc;

use tracing::debug;
use understudy_types::{Failure, Invocation, NotImplemented, Outcome};

use crate::behavior::TerminalStep;
use crate::behaviors::forwarding::forward;
use crate::target::CallTarget;

/// Terminal step of a strict stand-in: every call that reaches it fails with
/// [`NotImplemented`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NotImplementedStep;

impl TerminalStep for NotImplementedStep {
    fn invoke(&self, invocation: &mut Invocation) -> Outcome {
        let member = invocation.method().qualified_name();
        debug!(%member, "no behavior handled call");
        invocation.failure_outcome(Failure::new(NotImplemented::new(member)))
    }
}

/// Terminal step of a partial stand-in: calls the real object, or fails
/// with [`NotImplemented`] for members it does not have.
pub struct ForwardStep {
    target: Arc<dyn CallTarget>,
}

impl ForwardStep {
    pub fn new(target: Arc<dyn CallTarget>) -> Self {
        Self { target }
    }
}

impl TerminalStep for ForwardStep {
    fn invoke(&self, invocation: &mut Invocation) -> Outcome {
        if self.target.responds_to(invocation.method()) {
            forward(self.target.as_ref(), invocation)
        } else {
            NotImplementedStep.invoke(invocation)
        }
    }
}

impl std::fmt::Debug for ForwardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardStep").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::MethodTable;
    use understudy_types::{args, MethodDescriptor, Target, TypeInfo, Value};

    fn invocation(member: &str) -> Invocation {
        let method = MethodDescriptor::builder(member)
            .declaring_type("Calculator")
            .returns(TypeInfo::of::<i32>())
            .build()
            .unwrap();
        Invocation::new(Target::new("Calculator"), method, args![]).unwrap()
    }

    #[test]
    fn strict_terminal_names_the_member() {
        let outcome = NotImplementedStep.invoke(&mut invocation("add"));
        let failure = outcome.failure().unwrap();
        let error = failure.downcast_ref::<NotImplemented>().unwrap();
        assert_eq!(error.member, "Calculator.add");
    }

    #[test]
    fn forward_step_calls_known_members_only() {
        let step = ForwardStep::new(Arc::new(
            MethodTable::new(()).method("answer", |_, _| Ok(Some(Value::new(42)))),
        ));

        let outcome = step.invoke(&mut invocation("answer"));
        assert_eq!(outcome.value().unwrap().downcast::<i32>(), Some(42));

        let outcome = step.invoke(&mut invocation("question"));
        assert!(outcome.failure().unwrap().is::<NotImplemented>());
    }
}
