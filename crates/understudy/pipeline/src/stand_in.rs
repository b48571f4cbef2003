use std::any::Any;
use std::sync::Arc;

use tracing::debug;
use understudy_types::{Invocation, MethodDescriptor, Outcome, Target, Value};

use crate::behavior::{Behavior, TerminalStep};
use crate::behaviors::{DefaultValueBehavior, IdentityEqualityBehavior, RecordingBehavior};
use crate::config::StandInConfig;
use crate::error::{CallError, PipelineError};
use crate::pipeline::BehaviorPipeline;
use crate::target::CallTarget;
use crate::terminal::{ForwardStep, NotImplementedStep};

type SharedTerminal = Arc<dyn TerminalStep + Send + Sync>;

/// The runtime half of a stand-in object.
///
/// A hand-written or generated stand-in for some contract holds one of these
/// and routes every member through [`StandIn::invoke`]. Owns the target
/// identity, the behavior pipeline and the terminal step that ends the
/// chain.
pub struct StandIn {
    target: Target,
    pipeline: BehaviorPipeline,
    terminal: SharedTerminal,
    recorder: Option<Arc<RecordingBehavior>>,
}

impl StandIn {
    /// A stand-in whose unhandled calls fail with `NotImplemented`.
    pub fn strict(type_name: &str) -> Self {
        Self::with_config(type_name, StandInConfig::default())
    }

    /// A stand-in whose unhandled calls go to `real` when it has the member.
    pub fn partial(type_name: &str, real: Arc<dyn CallTarget>) -> Self {
        Self::partial_with_config(type_name, real, StandInConfig::default())
    }

    pub fn with_config(type_name: &str, config: StandInConfig) -> Self {
        Self::with_terminal(type_name, config, Arc::new(NotImplementedStep))
    }

    pub fn partial_with_config(
        type_name: &str,
        real: Arc<dyn CallTarget>,
        config: StandInConfig,
    ) -> Self {
        Self::with_terminal(type_name, config, Arc::new(ForwardStep::new(real)))
    }

    /// A stand-in ending in a caller-supplied terminal step.
    pub fn with_terminal(type_name: &str, config: StandInConfig, terminal: SharedTerminal) -> Self {
        let pipeline = BehaviorPipeline::new();
        let recorder = config.record_calls.then(|| Arc::new(RecordingBehavior::new()));
        if let Some(recorder) = &recorder {
            pipeline.add(recorder.clone());
        }
        if config.identity_equality {
            pipeline.add(Arc::new(IdentityEqualityBehavior::new()));
        }
        if config.default_values {
            pipeline.add(Arc::new(DefaultValueBehavior::new()));
        }

        let target = Target::new(type_name);
        debug!(%target, behaviors = ?pipeline.names(), "stand-in created");
        Self {
            target,
            pipeline,
            terminal,
            recorder,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn pipeline(&self) -> &BehaviorPipeline {
        &self.pipeline
    }

    /// The recorder seeded by [`StandInConfig::record_calls`], if any.
    pub fn recorder(&self) -> Option<&Arc<RecordingBehavior>> {
        self.recorder.as_ref()
    }

    pub fn add_behavior(&self, behavior: Arc<dyn Behavior>) {
        self.pipeline.add(behavior);
    }

    pub fn insert_behavior(
        &self,
        index: usize,
        behavior: Arc<dyn Behavior>,
    ) -> Result<(), PipelineError> {
        self.pipeline.insert(index, behavior)
    }

    /// Run an already built invocation and return the raw outcome.
    ///
    /// Failures stay in the outcome, along with whatever outputs were
    /// produced before them.
    pub fn dispatch(&self, invocation: &mut Invocation) -> Outcome {
        self.pipeline.execute(invocation, self.terminal.as_ref())
    }

    /// Call `method` with `values` and return the outcome, or its failure as
    /// `Err`.
    ///
    /// Argument errors stay argument errors even when raised by a forwarded
    /// real object.
    pub fn invoke(
        &self,
        method: &Arc<MethodDescriptor>,
        values: Vec<Option<Value>>,
    ) -> Result<Outcome, CallError> {
        let mut invocation = Invocation::new(self.target.clone(), Arc::clone(method), values)?;
        let outcome = self.dispatch(&mut invocation);
        if let Some(failure) = outcome.failure() {
            return Err(CallError::from(failure.clone()));
        }
        Ok(outcome)
    }

    /// Call a member that returns a `T`.
    pub fn call<T: Any + Clone>(
        &self,
        method: &Arc<MethodDescriptor>,
        values: Vec<Option<Value>>,
    ) -> Result<T, CallError> {
        let outcome = self.invoke(method, values)?;
        let value = outcome.value().ok_or_else(|| CallError::MissingReturnValue {
            member: method.qualified_name(),
        })?;
        value.downcast::<T>().ok_or_else(|| CallError::ReturnType {
            member: method.qualified_name(),
            expected: std::any::type_name::<T>(),
            actual: value.type_name(),
        })
    }

    /// Call a member for its effect, discarding any return value.
    pub fn call_unit(
        &self,
        method: &Arc<MethodDescriptor>,
        values: Vec<Option<Value>>,
    ) -> Result<(), CallError> {
        self.invoke(method, values).map(|_| ())
    }
}

impl std::fmt::Debug for StandIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandIn")
            .field("target", &self.target)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

/// Implemented by stand-in objects to expose their interception state.
pub trait Intercepted {
    fn stand_in(&self) -> &StandIn;

    /// The behavior list, for adding, removing or inspecting behaviors.
    fn behaviors(&self) -> &BehaviorPipeline {
        self.stand_in().pipeline()
    }
}

impl Intercepted for StandIn {
    fn stand_in(&self) -> &StandIn {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::AnonymousBehavior;
    use crate::target::MethodTable;
    use understudy_types::{args, ArgumentError, NotImplemented, TypeInfo};

    fn add() -> Arc<MethodDescriptor> {
        MethodDescriptor::builder("add")
            .declaring_type("Calculator")
            .input("x", TypeInfo::of::<i32>())
            .input("y", TypeInfo::of::<i32>())
            .returns(TypeInfo::of::<i32>())
            .build()
            .unwrap()
    }

    #[test]
    fn config_seeds_behaviors_in_order() {
        let stand_in = StandIn::with_config("Calculator", StandInConfig::loose().with_recording());
        assert_eq!(
            stand_in.behaviors().names(),
            vec!["recording", "identity-equality", "default-value"]
        );
        assert!(stand_in.recorder().is_some());

        assert!(StandIn::with_config(
            "Calculator",
            StandInConfig {
                identity_equality: false,
                ..StandInConfig::default()
            }
        )
        .pipeline()
        .is_empty());
    }

    #[test]
    fn strict_stand_in_raises_not_implemented() {
        let stand_in = StandIn::strict("Calculator");
        let err = stand_in.call::<i32>(&add(), args![2, 3]).unwrap_err();
        let failure = err.failure().unwrap();
        assert_eq!(
            failure.downcast_ref::<NotImplemented>(),
            Some(&NotImplemented::new("Calculator.add"))
        );
    }

    #[test]
    fn wrong_argument_count_is_not_a_failure() {
        let stand_in = StandIn::with_config("Calculator", StandInConfig::loose());
        let err = stand_in.invoke(&add(), args![2]).unwrap_err();
        assert!(matches!(
            err,
            CallError::Argument(ArgumentError::Cardinality {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn typed_call_checks_return_type() {
        let stand_in = StandIn::strict("Calculator");
        stand_in.add_behavior(Arc::new(AnonymousBehavior::new(|inv, _next| {
            inv.value_outcome(Some(Value::new("five")))
        })));
        let err = stand_in.call::<i32>(&add(), args![2, 3]).unwrap_err();
        assert!(matches!(err, CallError::ReturnType { .. }));

        stand_in.pipeline().clear();
        stand_in.add_behavior(Arc::new(AnonymousBehavior::new(|inv, _next| inv.value_outcome(None))));
        let err = stand_in.call::<i32>(&add(), args![2, 3]).unwrap_err();
        assert!(matches!(err, CallError::MissingReturnValue { .. }));
    }

    #[test]
    fn partial_stand_in_reaches_the_real_object() {
        let real = MethodTable::new(()).method("add", |_, args| {
            let x: i32 = args.get_typed("x")?;
            let y: i32 = args.get_typed("y")?;
            Ok(Some(Value::new(x + y)))
        });
        let stand_in = StandIn::partial("Calculator", Arc::new(real));
        assert_eq!(stand_in.call::<i32>(&add(), args![2, 3]).unwrap(), 5);

        let subtract = MethodDescriptor::builder("subtract")
            .declaring_type("Calculator")
            .returns(TypeInfo::of::<i32>())
            .build()
            .unwrap();
        let err = stand_in.call::<i32>(&subtract, args![]).unwrap_err();
        assert!(err.failure().unwrap().is::<NotImplemented>());
    }

    #[test]
    fn argument_error_inside_real_object_is_not_a_call_failure() {
        let real = MethodTable::new(()).method("add", |_, args| {
            let x: i32 = args.get_typed("x")?;
            let y: i32 = args.get_typed("y")?;
            Ok(Some(Value::new(x + y)))
        });
        let stand_in = StandIn::partial("Calculator", Arc::new(real));

        let err = stand_in
            .invoke(&add(), args!["oops".to_string(), 3])
            .unwrap_err();
        assert!(err.failure().is_none());
        match err {
            CallError::Argument(ArgumentError::TypeMismatch { name, .. }) => assert_eq!(name, "x"),
            other => panic!("expected a type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn to_string_goes_through_identity_equality() {
        let stand_in = StandIn::strict("Calculator");
        let to_string = MethodDescriptor::to_string_member("Calculator");
        assert_eq!(stand_in.call::<String>(&to_string, args![]).unwrap(), "Calculator");
    }
}
