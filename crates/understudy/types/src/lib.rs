//! Core value types for the Understudy interception pipeline.
//!
//! This crate describes a call and its result; it holds no dispatch logic.
//!
//! - [`Value`], [`TypeInfo`], [`Slot`]: the type-erased value model
//! - [`MethodDescriptor`]: static shape of an intercepted member
//! - [`Arguments`]: the argument store, indexed by position and by name
//! - [`Invocation`]: one intercepted call
//! - [`Outcome`], [`Failure`]: a call's result, errors carried as data
//!
//! Marshaling problems ([`ArgumentError`]) are returned immediately as
//! `Err`; they are never folded into an [`Outcome`].

pub mod arguments;
pub mod descriptor;
pub mod error;
pub mod ids;
pub mod invocation;
pub mod outcome;
pub mod value;

pub use arguments::{ArgumentIndex, Arguments};
pub use descriptor::{
    MemberKind, MethodDescriptor, MethodDescriptorBuilder, ParameterDirection, ParameterInfo,
    Parameters, EQUALS, HASH_CODE, TO_STRING,
};
pub use error::{ArgumentError, NotImplemented};
pub use ids::{InstanceId, Target};
pub use invocation::Invocation;
pub use outcome::{Failure, Outcome};
pub use value::{Slot, TypeInfo, Value};
