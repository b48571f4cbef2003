//! Member descriptors: the static shape of an intercepted member.
//!
//! Descriptors are built once per intercepted type (by hand or by a
//! generation step) and shared behind an `Arc` by every invocation of that
//! member.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;
use crate::value::TypeInfo;

/// Well-known object member: identity equality.
pub const EQUALS: &str = "equals";
/// Well-known object member: identity hash.
pub const HASH_CODE: &str = "hash_code";
/// Well-known object member: display string.
pub const TO_STRING: &str = "to_string";

/// How a parameter's value flows across the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterDirection {
    /// Input only.
    In,
    /// Read by the callee and written back to the caller.
    Ref,
    /// Written by the callee only.
    Out,
    /// A reference returned through the parameter list.
    RefReturn,
}

impl ParameterDirection {
    /// Whether the binding's final value is reported in an outcome's outputs.
    pub fn is_output(&self) -> bool {
        !matches!(self, ParameterDirection::In)
    }
}

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: TypeInfo,
    pub direction: ParameterDirection,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, ty: TypeInfo, direction: ParameterDirection) -> Self {
        Self {
            name: name.into(),
            ty,
            direction,
        }
    }

    pub fn input(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self::new(name, ty, ParameterDirection::In)
    }

    pub fn by_ref(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self::new(name, ty, ParameterDirection::Ref)
    }

    pub fn out(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self::new(name, ty, ParameterDirection::Out)
    }

    pub fn ref_return(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self::new(name, ty, ParameterDirection::RefReturn)
    }
}

/// An ordered parameter list indexed both by position and by name.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    items: Vec<ParameterInfo>,
    by_name: HashMap<String, usize>,
}

impl Parameters {
    /// Build the list, rejecting duplicate names.
    pub fn new(items: Vec<ParameterInfo>) -> Result<Self, ArgumentError> {
        let mut by_name = HashMap::with_capacity(items.len());
        for (position, param) in items.iter().enumerate() {
            if by_name.insert(param.name.clone(), position).is_some() {
                return Err(ArgumentError::DuplicateName(param.name.clone()));
            }
        }
        Ok(Self { items, by_name })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ParameterInfo> {
        self.items.get(position)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterInfo> {
        self.items.iter()
    }

    /// The subset of parameters reported as outputs, in declaration order.
    pub fn outputs(&self) -> Parameters {
        let items: Vec<_> = self
            .items
            .iter()
            .filter(|p| p.direction.is_output())
            .cloned()
            .collect();
        let by_name = items
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Parameters { items, by_name }
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a ParameterInfo;
    type IntoIter = std::slice::Iter<'a, ParameterInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// What kind of member a descriptor models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Method,
    PropertyGet,
    PropertySet,
    EventAdd,
    EventRemove,
}

/// Static description of an intercepted member.
#[derive(Debug)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: String,
    kind: MemberKind,
    parameters: Arc<Parameters>,
    return_type: Option<TypeInfo>,
    generic_arguments: Vec<TypeInfo>,
}

impl MethodDescriptor {
    pub fn builder(name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder {
            name: name.into(),
            declaring_type: String::new(),
            kind: MemberKind::Method,
            parameters: Vec::new(),
            return_type: None,
            generic_arguments: Vec::new(),
        }
    }

    /// Property getter, named `get_<property>`.
    pub fn getter(
        declaring_type: impl Into<String>,
        property: &str,
        ty: TypeInfo,
    ) -> Arc<MethodDescriptor> {
        Arc::new(MethodDescriptor {
            name: format!("get_{property}"),
            declaring_type: declaring_type.into(),
            kind: MemberKind::PropertyGet,
            parameters: Arc::new(Parameters::empty()),
            return_type: Some(ty),
            generic_arguments: Vec::new(),
        })
    }

    /// Property setter, named `set_<property>`, taking the new value as `value`.
    pub fn setter(
        declaring_type: impl Into<String>,
        property: &str,
        ty: TypeInfo,
    ) -> Arc<MethodDescriptor> {
        Self::single_argument(
            declaring_type,
            format!("set_{property}"),
            MemberKind::PropertySet,
            ParameterInfo::input("value", ty),
            None,
        )
    }

    /// Event subscription, named `add_<event>`, taking the handler.
    pub fn event_adder(
        declaring_type: impl Into<String>,
        event: &str,
        handler: TypeInfo,
    ) -> Arc<MethodDescriptor> {
        Self::single_argument(
            declaring_type,
            format!("add_{event}"),
            MemberKind::EventAdd,
            ParameterInfo::input("handler", handler),
            None,
        )
    }

    /// Event unsubscription, named `remove_<event>`, taking the handler.
    pub fn event_remover(
        declaring_type: impl Into<String>,
        event: &str,
        handler: TypeInfo,
    ) -> Arc<MethodDescriptor> {
        Self::single_argument(
            declaring_type,
            format!("remove_{event}"),
            MemberKind::EventRemove,
            ParameterInfo::input("handler", handler),
            None,
        )
    }

    /// `equals(other) -> bool`. The argument is nullable.
    pub fn equals<T: std::any::Any + Send + Sync>(
        declaring_type: impl Into<String>,
    ) -> Arc<MethodDescriptor> {
        Self::single_argument(
            declaring_type,
            EQUALS.to_string(),
            MemberKind::Method,
            ParameterInfo::input("other", TypeInfo::nullable::<T>()),
            Some(TypeInfo::of::<bool>()),
        )
    }

    /// `hash_code() -> u64`.
    pub fn hash_code(declaring_type: impl Into<String>) -> Arc<MethodDescriptor> {
        Arc::new(MethodDescriptor {
            name: HASH_CODE.to_string(),
            declaring_type: declaring_type.into(),
            kind: MemberKind::Method,
            parameters: Arc::new(Parameters::empty()),
            return_type: Some(TypeInfo::of::<u64>()),
            generic_arguments: Vec::new(),
        })
    }

    /// `to_string() -> String`.
    pub fn to_string_member(declaring_type: impl Into<String>) -> Arc<MethodDescriptor> {
        Arc::new(MethodDescriptor {
            name: TO_STRING.to_string(),
            declaring_type: declaring_type.into(),
            kind: MemberKind::Method,
            parameters: Arc::new(Parameters::empty()),
            return_type: Some(TypeInfo::of::<String>()),
            generic_arguments: Vec::new(),
        })
    }

    fn single_argument(
        declaring_type: impl Into<String>,
        name: String,
        kind: MemberKind,
        param: ParameterInfo,
        return_type: Option<TypeInfo>,
    ) -> Arc<MethodDescriptor> {
        let mut by_name = HashMap::with_capacity(1);
        by_name.insert(param.name.clone(), 0);
        Arc::new(MethodDescriptor {
            name,
            declaring_type: declaring_type.into(),
            kind,
            parameters: Arc::new(Parameters {
                items: vec![param],
                by_name,
            }),
            return_type,
            generic_arguments: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.parameters
    }

    /// `None` for members returning nothing.
    pub fn return_type(&self) -> Option<&TypeInfo> {
        self.return_type.as_ref()
    }

    pub fn generic_arguments(&self) -> &[TypeInfo] {
        &self.generic_arguments
    }

    pub fn has_outputs(&self) -> bool {
        self.parameters.iter().any(|p| p.direction.is_output())
    }

    /// `Declaring.name` or just `name` when the declaring type is unset.
    pub fn qualified_name(&self) -> String {
        if self.declaring_type.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.declaring_type, self.name)
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())?;
        if !self.generic_arguments.is_empty() {
            let generics: Vec<_> = self.generic_arguments.iter().map(|t| t.name()).collect();
            write!(f, "<{}>", generics.join(", "))?;
        }
        f.write_str("(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let marker = match p.direction {
                ParameterDirection::In => "",
                ParameterDirection::Ref => "ref ",
                ParameterDirection::Out => "out ",
                ParameterDirection::RefReturn => "ref return ",
            };
            write!(f, "{marker}{}: {}", p.name, p.ty)?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// Builder for [`MethodDescriptor`].
pub struct MethodDescriptorBuilder {
    name: String,
    declaring_type: String,
    kind: MemberKind,
    parameters: Vec<ParameterInfo>,
    return_type: Option<TypeInfo>,
    generic_arguments: Vec<TypeInfo>,
}

impl MethodDescriptorBuilder {
    pub fn declaring_type(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = declaring_type.into();
        self
    }

    pub fn kind(mut self, kind: MemberKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn param(mut self, param: ParameterInfo) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn input(self, name: impl Into<String>, ty: TypeInfo) -> Self {
        self.param(ParameterInfo::input(name, ty))
    }

    pub fn by_ref(self, name: impl Into<String>, ty: TypeInfo) -> Self {
        self.param(ParameterInfo::by_ref(name, ty))
    }

    pub fn out(self, name: impl Into<String>, ty: TypeInfo) -> Self {
        self.param(ParameterInfo::out(name, ty))
    }

    pub fn ref_return(self, name: impl Into<String>, ty: TypeInfo) -> Self {
        self.param(ParameterInfo::ref_return(name, ty))
    }

    pub fn returns(mut self, ty: TypeInfo) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn generic_argument(mut self, ty: TypeInfo) -> Self {
        self.generic_arguments.push(ty);
        self
    }

    /// Finish the descriptor. Fails if two parameters share a name.
    pub fn build(self) -> Result<Arc<MethodDescriptor>, ArgumentError> {
        Ok(Arc::new(MethodDescriptor {
            name: self.name,
            declaring_type: self.declaring_type,
            kind: self.kind,
            parameters: Arc::new(Parameters::new(self.parameters)?),
            return_type: self.return_type,
            generic_arguments: self.generic_arguments,
        }))
    }
}
