use understudy_types::{Invocation, Outcome};

use crate::behavior::{Behavior, Next};

type Predicate = Box<dyn Fn(&Invocation) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&mut Invocation, Next<'_>) -> Outcome + Send + Sync>;

/// A behavior assembled from caller-supplied closures.
///
/// ```
/// use understudy_pipeline::behaviors::AnonymousBehavior;
/// use understudy_types::Value;
///
/// let add = AnonymousBehavior::new(|invocation, _next| {
///     let x = invocation.arguments().get_or_default::<i32>("x").unwrap_or_default();
///     let y = invocation.arguments().get_or_default::<i32>("y").unwrap_or_default();
///     invocation.value_outcome(Some(Value::new(x + y)))
/// })
/// .for_member("add")
/// .named("add");
/// ```
pub struct AnonymousBehavior {
    name: String,
    predicate: Predicate,
    handler: Handler,
}

impl AnonymousBehavior {
    /// A behavior applying to every invocation.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Invocation, Next<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: "anonymous".into(),
            predicate: Box::new(|_| true),
            handler: Box::new(handler),
        }
    }

    /// Restrict the behavior to invocations matching `predicate`.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    /// Restrict the behavior to members with this name.
    pub fn for_member(self, member: impl Into<String>) -> Self {
        let member = member.into();
        self.when(move |invocation| invocation.method().name() == member)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Behavior for AnonymousBehavior {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, invocation: &Invocation) -> bool {
        (self.predicate)(invocation)
    }

    fn execute(&self, invocation: &mut Invocation, next: Next<'_>) -> Outcome {
        (self.handler)(invocation, next)
    }
}

impl std::fmt::Debug for AnonymousBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymousBehavior")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
