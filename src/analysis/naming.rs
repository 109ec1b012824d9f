//! Property names for annotated members, and the checks that decide whether
//! a generated property can be emitted under its name.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::diagnostics::Diagnostic;
use super::policy::Outcome;
use crate::config::NamingOptions;
use crate::model::{AnnotatedKind, AnnotatedMember, TypeDescriptor};

/// An annotated member together with the property it stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedMember<'a> {
    pub member: &'a AnnotatedMember,
    /// Declaration index among the type's annotated members.
    pub index: usize,
    /// Name of the property: generated, hand-written or inferred.
    pub property: SmolStr,
    /// The generator emits this property.
    pub generated: bool,
}

/// Whether `name` can be used as an identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Name every annotated member of `ty` and drop generated properties whose
/// name cannot be used.
///
/// Returned members keep declaration order.
pub fn name_members<'a>(
    ty: &'a TypeDescriptor,
    naming: &NamingOptions,
) -> (Vec<NamedMember<'a>>, Vec<Diagnostic>) {
    let mut named = Vec::with_capacity(ty.annotated.len());
    let mut diagnostics = Vec::new();
    let mut generated_names: FxHashSet<SmolStr> = FxHashSet::default();

    for (index, member) in ty.annotated.iter().enumerate() {
        let (property, generated) = match (member.kind, &member.notify) {
            (AnnotatedKind::Property, _) => (member.name.clone(), false),
            (AnnotatedKind::Field, None) => (naming.property_name(&member.name), false),
            (AnnotatedKind::Field, Some(notify)) => {
                let property = notify
                    .name
                    .clone()
                    .unwrap_or_else(|| naming.property_name(&member.name));

                let rejected = if !is_identifier(&property) {
                    Some(Outcome::PropertyNameInvalid {
                        annotation: notify.location,
                    })
                } else if property == member.name {
                    Some(Outcome::PropertyNameSameAsField {
                        field: member.location,
                    })
                } else if generated_names.contains(&property)
                    || ty.declares_member_named(&property).is_some()
                {
                    Some(Outcome::PropertyNameCollision {
                        field: member.location,
                    })
                } else {
                    None
                };

                if let Some(outcome) = rejected {
                    tracing::debug!(
                        field = %member.name,
                        %property,
                        ?outcome,
                        "property not emitted"
                    );
                    diagnostics.push(outcome.diagnostic());
                    continue;
                }

                generated_names.insert(property.clone());
                (property, true)
            }
        };

        named.push(NamedMember {
            member,
            index,
            property,
            generated,
        });
    }

    (named, diagnostics)
}
