use std::sync::Arc;

use tracing::trace;
use understudy_types::{Invocation, Outcome};

/// A predicated interceptor in the dispatch chain.
///
/// Behaviors are consulted in list order. One whose [`Behavior::applies_to`]
/// returns false is skipped without being executed. One that applies either
/// decides the outcome itself or delegates to the remainder of the chain
/// through `next`, optionally inspecting or rewriting the result on the way
/// back.
pub trait Behavior: Send + Sync {
    /// Display label used for introspection and logging.
    fn name(&self) -> &str {
        "behavior"
    }

    /// Whether this behavior takes part in dispatching `invocation`.
    fn applies_to(&self, _invocation: &Invocation) -> bool {
        true
    }

    /// Produce an outcome, calling `next` at most once.
    fn execute(&self, invocation: &mut Invocation, next: Next<'_>) -> Outcome;
}

/// The innermost continuation, reached when no behavior short-circuits.
///
/// Supplied per call, so one pipeline can back both a strict stand-in and a
/// partial one wrapping a real object.
pub trait TerminalStep {
    fn invoke(&self, invocation: &mut Invocation) -> Outcome;
}

impl<F> TerminalStep for F
where
    F: Fn(&mut Invocation) -> Outcome,
{
    fn invoke(&self, invocation: &mut Invocation) -> Outcome {
        self(invocation)
    }
}

/// The remainder of the chain after the behavior currently executing.
///
/// Consumed by [`Next::run`], so a behavior can delegate at most once.
pub struct Next<'a> {
    remaining: &'a [Arc<dyn Behavior>],
    terminal: &'a dyn TerminalStep,
}

impl<'a> Next<'a> {
    pub(crate) fn new(remaining: &'a [Arc<dyn Behavior>], terminal: &'a dyn TerminalStep) -> Self {
        Self {
            remaining,
            terminal,
        }
    }

    /// Behaviors still ahead in the chain, applicable or not.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Dispatch `invocation` to the first applicable behavior after the
    /// current one, or to the terminal step if none applies.
    pub fn run(self, invocation: &mut Invocation) -> Outcome {
        let mut rest = self.remaining;
        while let Some((behavior, tail)) = rest.split_first() {
            if behavior.applies_to(invocation) {
                trace!(
                    behavior = behavior.name(),
                    member = invocation.method().name(),
                    "behavior applies"
                );
                return behavior.execute(invocation, Next::new(tail, self.terminal));
            }
            trace!(
                behavior = behavior.name(),
                member = invocation.method().name(),
                "behavior skipped"
            );
            rest = tail;
        }
        trace!(member = invocation.method().name(), "reached terminal step");
        self.terminal.invoke(invocation)
    }
}
