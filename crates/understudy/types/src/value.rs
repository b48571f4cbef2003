//! Type-erased values, static type descriptors and ref-return cells.
//!
//! Arguments and return values cross the pipeline as [`Value`]s. A null is
//! modelled as `Option<Value>::None`, never as a special `Value`.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A shared, type-erased value.
///
/// Cloning is cheap: clones share the same allocation, which is what makes
/// recorded invocations and output projections inexpensive.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the underlying value out if it is a `T`.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// Whether both values share the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

fn default_of<T: Default + Any + Send + Sync>() -> Value {
    Value::new(T::default())
}

/// Static description of a parameter or return type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    nullable: bool,
    zero: Option<fn() -> Value>,
}

impl TypeInfo {
    /// A non-nullable type whose zero value is `T::default()`.
    pub fn of<T: Default + Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            nullable: false,
            zero: Some(default_of::<T>),
        }
    }

    /// A non-nullable type with no known zero value.
    pub fn opaque<T: Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            nullable: false,
            zero: None,
        }
    }

    /// A type whose bindings may legitimately hold null. Its zero value is null.
    pub fn nullable<T: Any + Send + Sync>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            nullable: true,
            zero: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The type's own zero value, or `None` for null.
    pub fn zero_value(&self) -> Option<Value> {
        if self.nullable {
            return None;
        }
        self.zero.map(|make| make())
    }

    /// Whether `value` may be stored in a binding of this type.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        match value {
            Some(v) => v.type_id() == self.id,
            None => self.nullable,
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.nullable == other.nullable
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.name)
        } else {
            f.write_str(self.name)
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An owned read/write cell standing in for a by-reference return.
///
/// Clones are handles to the same storage; a write through one is visible
/// through all of them.
pub struct Slot<T> {
    cell: Arc<Mutex<T>>,
}

impl<T> Slot<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(value)),
        }
    }

    pub fn set(&self, value: T) {
        *self.cell.lock() = value;
    }

    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.cell.lock(), value)
    }

    /// Run `f` with exclusive access to the stored value.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.lock())
    }

    pub fn ptr_eq(&self, other: &Slot<T>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.cell.lock().clone()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&*self.cell.lock()).finish()
    }
}
