//! Real implementations that calls can be forwarded to.

use std::collections::HashMap;
use std::sync::Arc;

use understudy_types::{Arguments, MethodDescriptor, Value};

/// A real object able to answer some members of a contract.
pub trait CallTarget: Send + Sync {
    /// Whether this target has a member matching `method`.
    fn responds_to(&self, method: &MethodDescriptor) -> bool;

    /// Invoke the matching member with the current argument values.
    ///
    /// The implementation writes ref and out results back into `arguments`.
    /// An `Err` is the real member's failure and is reported to the caller
    /// unchanged.
    fn call(
        &self,
        method: &MethodDescriptor,
        arguments: &mut Arguments,
    ) -> anyhow::Result<Option<Value>>;
}

type Handler<T> = Arc<dyn Fn(&T, &mut Arguments) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// A [`CallTarget`] over a concrete instance, with one handler per member
/// name.
///
/// ```
/// use understudy_pipeline::MethodTable;
/// use understudy_types::Value;
///
/// struct Adder;
///
/// impl Adder {
///     fn add(&self, x: i32, y: i32) -> i32 {
///         x + y
///     }
/// }
///
/// let table = MethodTable::new(Adder).method("add", |adder, args| {
///     let sum = adder.add(args.get_typed("x")?, args.get_typed("y")?);
///     Ok(Some(Value::new(sum)))
/// });
/// assert!(table.has_member("add"));
/// ```
pub struct MethodTable<T> {
    instance: Arc<T>,
    handlers: HashMap<String, Handler<T>>,
}

impl<T: Send + Sync + 'static> MethodTable<T> {
    pub fn new(instance: T) -> Self {
        Self::shared(Arc::new(instance))
    }

    /// A table over an instance the caller keeps a handle to.
    pub fn shared(instance: Arc<T>) -> Self {
        Self {
            instance,
            handlers: HashMap::new(),
        }
    }

    /// Route calls to the member named `name` through `handler`.
    pub fn method<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&T, &mut Arguments) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn instance(&self) -> &Arc<T> {
        &self.instance
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl<T: Send + Sync + 'static> CallTarget for MethodTable<T> {
    fn responds_to(&self, method: &MethodDescriptor) -> bool {
        self.has_member(method.name())
    }

    fn call(
        &self,
        method: &MethodDescriptor,
        arguments: &mut Arguments,
    ) -> anyhow::Result<Option<Value>> {
        let handler = self.handlers.get(method.name()).ok_or_else(|| {
            anyhow::anyhow!(
                "{} has no member {}",
                std::any::type_name::<T>(),
                method.name()
            )
        })?;
        handler(&self.instance, arguments)
    }
}
