//! Host input model.
//!
//! A read-only description of the types under analysis, as produced by the
//! host compiler's binder. Nothing in here makes decisions; see
//! [`crate::analysis`] for that.

mod descriptor;
mod ids;
mod members;

pub use descriptor::{TypeDescriptor, TypeGraph};
pub use ids::{Family, TypeId, TypeRef};
pub use members::{
    Accessibility, AnnotatedKind, AnnotatedMember, ExistingMember, MemberKind, Modifiers,
    NameListAnnotation, NotifyAnnotation, ParamType,
};
