use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;
use understudy_types::{Invocation, Outcome, TypeInfo, Value};

use crate::behavior::{Behavior, Next};

type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Supplies zero values for declared types.
///
/// A factory registered for a type takes precedence over the type's own
/// zero value. Types with neither (opaque or nullable ones) default to null.
#[derive(Default)]
pub struct DefaultValueProvider {
    factories: RwLock<HashMap<TypeId, Factory>>,
}

impl DefaultValueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `factory` to produce the default for every `T`.
    pub fn register<T, F>(&self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factories
            .write()
            .insert(TypeId::of::<T>(), Arc::new(move || Value::new(factory())));
    }

    pub fn deregister<T: Any>(&self) -> bool {
        self.factories.write().remove(&TypeId::of::<T>()).is_some()
    }

    /// The default for `ty`, or `None` for null.
    pub fn default_for(&self, ty: &TypeInfo) -> Option<Value> {
        let factory = self.factories.read().get(&ty.id()).cloned();
        match factory {
            Some(make) => Some(make()),
            None => ty.zero_value(),
        }
    }
}

impl std::fmt::Debug for DefaultValueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultValueProvider")
            .field("registered", &self.factories.read().len())
            .finish()
    }
}

/// Answers any call with zero values, without consulting the rest of the
/// chain.
///
/// The return value and every ref, out and ref-return binding are set to
/// the declared type's default. Usually placed last so that it only decides
/// calls no other behavior handled.
#[derive(Debug, Default)]
pub struct DefaultValueBehavior {
    provider: Arc<DefaultValueProvider>,
}

impl DefaultValueBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(provider: Arc<DefaultValueProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<DefaultValueProvider> {
        &self.provider
    }
}

impl Behavior for DefaultValueBehavior {
    fn name(&self) -> &str {
        "default-value"
    }

    fn execute(&self, invocation: &mut Invocation, _next: Next<'_>) -> Outcome {
        let defaults: Vec<(usize, Option<Value>)> = invocation
            .arguments()
            .bindings()
            .enumerate()
            .filter(|(_, (param, _))| param.direction.is_output())
            .map(|(position, (param, _))| (position, self.provider.default_for(&param.ty)))
            .collect();

        for (position, value) in defaults {
            if let Err(error) = invocation.arguments_mut().set(position, value) {
                warn!(%error, "could not write default output value");
            }
        }

        let value = invocation
            .method()
            .return_type()
            .and_then(|ty| self.provider.default_for(ty));
        invocation.value_outcome(value)
    }
}
