//! Symbol facts: simple queries over the host model.
//!
//! Nothing here decides anything. The resolver and the dependency graph
//! builder ask these questions and make the decisions themselves.

use rustc_hash::FxHashSet;

use super::well_known::well_known;
use crate::error::{AnalysisError, Result};
use crate::model::{ExistingMember, Family, MemberKind, TypeDescriptor, TypeGraph, TypeId};

// ============================================================================
// GRAPH QUERIES
// ============================================================================

impl TypeGraph {
    /// Look up a type, failing if the host never described it.
    pub fn descriptor(&self, id: &TypeId) -> Result<&TypeDescriptor> {
        self.get(id).ok_or_else(|| AnalysisError::UnknownType(id.clone()))
    }

    /// Ancestors of `ty`, root first, not including `ty` itself.
    ///
    /// The chain ends at the first base the graph does not describe. Coming
    /// back to a visited type is reported as an error rather than looping.
    pub fn base_chain<'a>(&'a self, ty: &'a TypeDescriptor) -> Result<Vec<&'a TypeDescriptor>> {
        let mut visited: FxHashSet<&TypeId> = FxHashSet::default();
        visited.insert(&ty.id);

        let mut chain = Vec::new();
        let mut current = ty;
        while let Some(base) = &current.base {
            let Some(next) = self.get(&base.id) else {
                break;
            };
            if !visited.insert(&next.id) {
                return Err(AnalysisError::CyclicBaseChain(ty.id.clone()));
            }
            chain.push(next);
            current = next;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Number of described ancestors.
    pub fn depth(&self, ty: &TypeDescriptor) -> Result<usize> {
        self.base_chain(ty).map(|chain| chain.len())
    }
}

// ============================================================================
// PER-TYPE QUERIES
// ============================================================================

impl TypeDescriptor {
    /// Whether this type itself lists the family's interface.
    pub fn implements(&self, family: Family) -> bool {
        let interface = &well_known().family(family).interface;
        self.interfaces.iter().any(|i| i == interface)
    }

    /// Methods declared on this type with exactly this name.
    pub fn declared_methods<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ExistingMember> + 'a {
        self.members
            .iter()
            .filter(move |m| m.is_method() && !m.is_explicit() && m.name == name)
    }

    /// The family's event declared as a normal (callable) member.
    pub fn declared_event(&self, family: Family) -> Option<&ExistingMember> {
        let event = &well_known().family(family).event;
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Event && !m.is_explicit() && &m.name == event)
    }

    /// The family's event implemented explicitly through the interface.
    pub fn explicit_event(&self, family: Family) -> Option<&ExistingMember> {
        let symbols = well_known().family(family);
        self.members.iter().find(|m| {
            m.kind == MemberKind::Event
                && m.name == symbols.event
                && m.explicit_interface.as_deref().is_some_and(|i| {
                    i == symbols.interface || symbols.interface.ends_with(&format!(".{i}"))
                })
        })
    }

    /// Properties declared on this type with this short name.
    ///
    /// Explicit interface implementations come first: a dependency naming
    /// `Foo` prefers `I1.Foo` over an unrelated `Foo`.
    pub fn declared_properties<'a>(&'a self, name: &str) -> Vec<&'a ExistingMember> {
        let mut found: Vec<&ExistingMember> = self
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Property && m.name == name)
            .collect();
        found.sort_by_key(|m| !m.is_explicit());
        found
    }

    /// Any member (of any kind) declared on this type with this name.
    pub fn declares_member_named(&self, name: &str) -> Option<&ExistingMember> {
        self.members.iter().find(|m| !m.is_explicit() && m.name == name)
    }
}

/// Whether `family` is implemented anywhere in `chain` or by `ty`.
pub fn chain_implements(chain: &[&TypeDescriptor], ty: &TypeDescriptor, family: Family) -> bool {
    ty.implements(family) || chain.iter().any(|t| t.implements(family))
}
