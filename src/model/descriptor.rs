//! Type descriptors and the read-only graph that holds them.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::ids::{TypeId, TypeRef};
use super::members::{Accessibility, AnnotatedMember, ExistingMember};
use crate::base::Location;

/// One type as the host sees it.
///
/// Types that are not partial (framework or library types) are still
/// described so that base-chain lookups can see their members, but they
/// never receive a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub id: TypeId,
    /// Direct base type, if any besides the root object type.
    pub base: Option<TypeRef>,
    /// Interfaces this type lists directly (fully qualified names).
    pub interfaces: Vec<SmolStr>,
    pub accessibility: Accessibility,
    pub is_partial: bool,
    pub is_sealed: bool,
    pub annotated: Vec<AnnotatedMember>,
    pub members: Vec<ExistingMember>,
    /// Location of the type's identifier.
    pub location: Location,
}

impl TypeDescriptor {
    /// A public partial type with no base, no interfaces and no members.
    pub fn partial(id: TypeId, location: Location) -> Self {
        Self {
            id,
            base: None,
            interfaces: Vec::new(),
            accessibility: Accessibility::Public,
            is_partial: true,
            is_sealed: false,
            annotated: Vec::new(),
            members: Vec::new(),
            location,
        }
    }

    /// A type the generator will not extend.
    pub fn external(id: TypeId, location: Location) -> Self {
        Self {
            is_partial: false,
            ..Self::partial(id, location)
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn implementing(mut self, interface: impl Into<SmolStr>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn with_member(mut self, member: ExistingMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_annotated(mut self, member: AnnotatedMember) -> Self {
        self.annotated.push(member);
        self
    }

    /// Whether anything on this type asks for generation.
    pub fn has_annotations(&self) -> bool {
        !self.annotated.is_empty()
    }
}

/// The read-only snapshot of all types handed over by the host.
///
/// Insertion order is preserved so that every traversal is deterministic.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: IndexMap<TypeId, TypeDescriptor>,
}

impl TypeGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, replacing any previous descriptor with the same identity.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.id.clone(), descriptor);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn get(&self, id: &TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        self.types.contains_key(id)
    }

    /// Iterate over all types in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.types.values()
    }

    /// Types that receive a plan.
    pub fn partial_types(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.types.values().filter(|t| t.is_partial)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
