//! The argument store: a call's parameter values, indexed by position and name.

use std::any::Any;
use std::sync::Arc;

use crate::descriptor::{ParameterInfo, Parameters};
use crate::error::ArgumentError;
use crate::value::Value;

/// Something that identifies a binding: a position or a parameter name.
pub trait ArgumentIndex {
    fn position_in(&self, parameters: &Parameters) -> Result<usize, ArgumentError>;
}

impl ArgumentIndex for usize {
    fn position_in(&self, parameters: &Parameters) -> Result<usize, ArgumentError> {
        if *self < parameters.len() {
            Ok(*self)
        } else {
            Err(ArgumentError::IndexOutOfRange {
                index: *self,
                len: parameters.len(),
            })
        }
    }
}

impl ArgumentIndex for str {
    fn position_in(&self, parameters: &Parameters) -> Result<usize, ArgumentError> {
        parameters
            .position_of(self)
            .ok_or_else(|| ArgumentError::UnknownName(self.to_string()))
    }
}

impl ArgumentIndex for String {
    fn position_in(&self, parameters: &Parameters) -> Result<usize, ArgumentError> {
        self.as_str().position_in(parameters)
    }
}

impl<I: ArgumentIndex + ?Sized> ArgumentIndex for &I {
    fn position_in(&self, parameters: &Parameters) -> Result<usize, ArgumentError> {
        (**self).position_in(parameters)
    }
}

/// Holds the values bound to a member's declared parameters.
///
/// The number of bindings is fixed at construction. Values may be replaced
/// in place with [`Arguments::set`]; nothing else mutates the store.
#[derive(Clone, Debug)]
pub struct Arguments {
    parameters: Arc<Parameters>,
    values: Vec<Option<Value>>,
}

impl Arguments {
    /// Bind `values` to the parameters of `member` by position.
    pub fn new(
        member: impl Into<String>,
        parameters: Arc<Parameters>,
        values: Vec<Option<Value>>,
    ) -> Result<Self, ArgumentError> {
        if values.len() != parameters.len() {
            return Err(ArgumentError::Cardinality {
                member: member.into(),
                expected: parameters.len(),
                actual: values.len(),
            });
        }
        Ok(Self { parameters, values })
    }

    pub fn empty() -> Self {
        Self {
            parameters: Arc::new(Parameters::empty()),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.parameters
    }

    pub fn parameter(&self, index: impl ArgumentIndex) -> Result<&ParameterInfo, ArgumentError> {
        let position = index.position_in(&self.parameters)?;
        self.parameters
            .get(position)
            .ok_or(ArgumentError::IndexOutOfRange {
                index: position,
                len: self.parameters.len(),
            })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.position_of(name)
    }

    pub fn name_of(&self, position: usize) -> Option<&str> {
        self.parameters.get(position).map(|p| p.name.as_str())
    }

    /// The raw value of a binding. `Ok(None)` means the binding holds null.
    pub fn get(&self, index: impl ArgumentIndex) -> Result<Option<&Value>, ArgumentError> {
        let position = index.position_in(&self.parameters)?;
        Ok(self.values[position].as_ref())
    }

    /// Replace a binding's value in place.
    ///
    /// A non-null value must be of the binding's declared type. Null is
    /// always accepted, as it is at construction.
    pub fn set(
        &mut self,
        index: impl ArgumentIndex,
        value: Option<Value>,
    ) -> Result<(), ArgumentError> {
        let position = index.position_in(&self.parameters)?;
        if let (Some(v), Some(param)) = (&value, self.parameters.get(position)) {
            if !param.ty.accepts(Some(v)) {
                return Err(ArgumentError::TypeMismatch {
                    name: param.name.clone(),
                    expected: param.ty.name().to_string(),
                    actual: v.type_name().to_string(),
                });
            }
        }
        self.values[position] = value;
        Ok(())
    }

    /// Store `value` in a binding.
    pub fn set_value<T: Any + Send + Sync>(
        &mut self,
        index: impl ArgumentIndex,
        value: T,
    ) -> Result<(), ArgumentError> {
        self.set(index, Some(Value::new(value)))
    }

    /// A binding's value as a `T`.
    ///
    /// Fails with [`ArgumentError::NullValue`] when the binding holds null and
    /// with [`ArgumentError::TypeMismatch`] when it holds some other type.
    pub fn get_typed<T: Any + Clone>(&self, index: impl ArgumentIndex) -> Result<T, ArgumentError> {
        let position = index.position_in(&self.parameters)?;
        match self.typed_at::<T>(position)? {
            Some(value) => Ok(value),
            None => Err(ArgumentError::NullValue {
                name: self.binding_name(position),
                expected: std::any::type_name::<T>().to_string(),
            }),
        }
    }

    /// Nullable access: a null binding reads as `None`.
    pub fn get_nullable<T: Any + Clone>(
        &self,
        index: impl ArgumentIndex,
    ) -> Result<Option<T>, ArgumentError> {
        let position = index.position_in(&self.parameters)?;
        self.typed_at::<T>(position)
    }

    /// Like [`Arguments::get_typed`] but a null binding reads as `T::default()`.
    pub fn get_or_default<T: Any + Clone + Default>(
        &self,
        index: impl ArgumentIndex,
    ) -> Result<T, ArgumentError> {
        Ok(self.get_nullable::<T>(index)?.unwrap_or_default())
    }

    /// Raw values in position order. Call again to restart.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.values.iter().map(Option::as_ref)
    }

    /// `(parameter, value)` pairs in position order.
    pub fn bindings(&self) -> impl Iterator<Item = (&ParameterInfo, Option<&Value>)> + '_ {
        self.parameters.iter().zip(self.values.iter().map(Option::as_ref))
    }

    /// A new store holding only the ref, out and ref-return bindings, with
    /// their current values, re-indexed from zero in declaration order.
    pub fn outputs(&self) -> Arguments {
        let values = self
            .bindings()
            .filter(|(p, _)| p.direction.is_output())
            .map(|(_, v)| v.cloned())
            .collect();
        Arguments {
            parameters: Arc::new(self.parameters.outputs()),
            values,
        }
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.values
    }

    fn typed_at<T: Any + Clone>(&self, position: usize) -> Result<Option<T>, ArgumentError> {
        match &self.values[position] {
            None => Ok(None),
            Some(value) => match value.downcast::<T>() {
                Some(typed) => Ok(Some(typed)),
                None => Err(ArgumentError::TypeMismatch {
                    name: self.binding_name(position),
                    expected: std::any::type_name::<T>().to_string(),
                    actual: value.type_name().to_string(),
                }),
            },
        }
    }

    fn binding_name(&self, position: usize) -> String {
        self.name_of(position).unwrap_or_default().to_string()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = Option<&'a Value>;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, Option<Value>>,
        fn(&'a Option<Value>) -> Option<&'a Value>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.values
            .iter()
            .map(Option::as_ref as fn(&'a Option<Value>) -> Option<&'a Value>)
    }
}

/// Build a `Vec<Option<Value>>` of non-null arguments.
///
/// ```
/// use understudy_types::args;
///
/// let values = args![2, "m1".to_string()];
/// assert_eq!(values.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<::std::option::Option<$crate::Value>>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$(::std::option::Option::Some($crate::Value::new($value))),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MethodDescriptor;
    use crate::value::TypeInfo;

    fn add_args(x: Option<Value>, y: Option<Value>) -> Arguments {
        let method = MethodDescriptor::builder("add")
            .input("x", TypeInfo::of::<i32>())
            .input("y", TypeInfo::nullable::<String>())
            .build()
            .unwrap();
        Arguments::new("add", method.parameters().clone(), vec![x, y]).unwrap()
    }

    #[test]
    fn cardinality_mismatch_rejected() {
        let method = MethodDescriptor::builder("add")
            .input("x", TypeInfo::of::<i32>())
            .build()
            .unwrap();
        let err = Arguments::new(method.qualified_name(), method.parameters().clone(), args![1, 2])
            .unwrap_err();
        assert_eq!(
            err,
            ArgumentError::Cardinality {
                member: "add".into(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn lookup_by_name_and_position_agree() {
        let args = add_args(Some(Value::new(2)), Some(Value::new(String::from("y"))));
        assert_eq!(args.get_typed::<i32>("x").unwrap(), 2);
        assert_eq!(args.get_typed::<i32>(0usize).unwrap(), 2);
        assert_eq!(args.index_of("y"), Some(1));
        assert_eq!(args.name_of(1), Some("y"));
    }

    #[test]
    fn unknown_name_and_bad_index_fail() {
        let args = add_args(None, None);
        assert_eq!(
            args.get("nope").unwrap_err(),
            ArgumentError::UnknownName("nope".into())
        );
        assert_eq!(
            args.get(5usize).unwrap_err(),
            ArgumentError::IndexOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn typed_get_on_wrong_type_is_a_mismatch() {
        let args = add_args(Some(Value::new(String::from("two"))), None);
        let err = args.get_typed::<i32>("x").unwrap_err();
        assert!(matches!(err, ArgumentError::TypeMismatch { ref name, .. } if name == "x"));
    }

    #[test]
    fn typed_get_on_null_is_a_null_error() {
        let args = add_args(None, None);
        assert!(matches!(
            args.get_typed::<i32>("x").unwrap_err(),
            ArgumentError::NullValue { .. }
        ));
        assert_eq!(args.get_or_default::<i32>("x").unwrap(), 0);
        assert_eq!(args.get_nullable::<String>("y").unwrap(), None);
    }

    #[test]
    fn get_or_default_still_checks_type() {
        let args = add_args(Some(Value::new(1.5f64)), None);
        assert!(matches!(
            args.get_or_default::<i32>("x").unwrap_err(),
            ArgumentError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn set_updates_in_place() {
        let mut args = add_args(Some(Value::new(1)), None);
        args.set_value("x", 7).unwrap();
        args.set("y", Some(Value::new(String::from("s")))).unwrap();
        assert_eq!(args.get_typed::<i32>("x").unwrap(), 7);
        assert_eq!(args.get_typed::<String>(1usize).unwrap(), "s");
        assert!(args.set("z", None).is_err());
    }

    #[test]
    fn set_rejects_a_value_of_another_type() {
        let mut args = add_args(Some(Value::new(1)), None);
        let err = args.set_value("x", String::from("seven")).unwrap_err();
        assert!(matches!(err, ArgumentError::TypeMismatch { ref name, .. } if name == "x"));
        assert_eq!(args.get_typed::<i32>("x").unwrap(), 1);

        args.set("x", None).unwrap();
        assert!(args.get("x").unwrap().is_none());
    }

    #[test]
    fn iteration_is_restartable_and_ordered() {
        let args = add_args(Some(Value::new(4)), None);
        let first: Vec<_> = args.iter().map(|v| v.is_some()).collect();
        let second: Vec<_> = (&args).into_iter().map(|v| v.is_some()).collect();
        assert_eq!(first, vec![true, false]);
        assert_eq!(first, second);
    }

    #[test]
    fn outputs_keep_only_ref_and_out_bindings() {
        let method = MethodDescriptor::builder("try_add")
            .by_ref("x", TypeInfo::of::<i32>())
            .input("scale", TypeInfo::of::<i32>())
            .out("z", TypeInfo::of::<i32>())
            .build()
            .unwrap();
        let values = vec![Some(Value::new(5)), Some(Value::new(2)), None];
        let mut args = Arguments::new("try_add", method.parameters().clone(), values).unwrap();
        args.set_value("z", 10).unwrap();

        let outputs = args.outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs.get_typed::<i32>("x").unwrap(), 5);
        assert_eq!(outputs.get_typed::<i32>(1usize).unwrap(), 10);
        assert!(outputs.get("scale").is_err());
    }
}
