use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use understudy_types::{
    Invocation, InstanceId, Outcome, Target, Value, EQUALS, HASH_CODE, TO_STRING,
};

use crate::behavior::{Behavior, Next};

/// Identity semantics for `equals`, `hash_code` and `to_string`.
///
/// Two stand-ins are equal only if they are the same instance. The `other`
/// argument of `equals` may hold a [`Target`] or an [`InstanceId`]; null and
/// anything else compare unequal. Insert it after any behavior meant to
/// override these members.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityEqualityBehavior;

impl IdentityEqualityBehavior {
    pub fn new() -> Self {
        Self
    }

    fn equals(target: &Target, other: Option<&Value>) -> bool {
        match other {
            Some(v) => match (v.downcast_ref::<Target>(), v.downcast_ref::<InstanceId>()) {
                (Some(t), _) => t.id() == target.id(),
                (None, Some(id)) => *id == target.id(),
                (None, None) => false,
            },
            None => false,
        }
    }

    fn hash(target: &Target) -> u64 {
        let mut hasher = DefaultHasher::new();
        target.id().hash(&mut hasher);
        hasher.finish()
    }
}

impl Behavior for IdentityEqualityBehavior {
    fn name(&self) -> &str {
        "identity-equality"
    }

    fn applies_to(&self, invocation: &Invocation) -> bool {
        let method = invocation.method();
        match method.name() {
            EQUALS => method.parameters().len() == 1,
            HASH_CODE | TO_STRING => method.parameters().is_empty(),
            _ => false,
        }
    }

    fn execute(&self, invocation: &mut Invocation, _next: Next<'_>) -> Outcome {
        let target = invocation.target();
        let value = match invocation.method().name() {
            EQUALS => {
                let other = invocation.arguments().get(0usize).ok().flatten();
                Value::new(Self::equals(target, other))
            }
            HASH_CODE => Value::new(Self::hash(target)),
            _ => Value::new(target.type_name().to_string()),
        };
        invocation.value_outcome(Some(value))
    }
}
