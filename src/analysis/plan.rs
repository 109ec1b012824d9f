//! Generation plans: the engine's output, one per partial type.
//!
//! Plans are plain values. The emission layer reads them; nothing mutates a
//! plan after it has been published.

use smol_str::SmolStr;

use super::diagnostics::Diagnostic;
use super::matcher::Shape;
use crate::base::Location;
use crate::model::{Accessibility, ExistingMember, Family, TypeId};

/// A method the generated code calls or overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodRef {
    pub name: SmolStr,
    pub shape: Shape,
    pub declaring_type: TypeId,
    pub accessibility: Accessibility,
    /// Whether a derived type may override it.
    pub is_overridable: bool,
    pub location: Location,
}

impl MethodRef {
    pub(crate) fn from_member(member: &ExistingMember, shape: Shape) -> Self {
        Self {
            name: member.name.clone(),
            shape,
            declaring_type: member.declaring_type.clone(),
            accessibility: member.accessibility,
            is_overridable: member.modifiers.is_overridable(),
            location: member.location,
        }
    }
}

/// Why an existing event cannot be raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum IncompatibleReason {
    /// The event exists but nothing that raises it was found.
    EventWithoutRaiseMethod,
    /// Methods with a recognised name exist, with unrecognised parameters.
    BadSignature,
    /// Methods with a recognised name exist but cannot be reached.
    Inaccessible,
}

/// How one notification family is raised for one type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum RaiseMechanism {
    /// The type does not take part in this family.
    NotRequested,
    /// Nothing usable exists; generate the raise method, and the event and
    /// interface where flagged.
    NotFoundSynthesizeNew {
        method: MethodRef,
        synthesize_event: bool,
        add_interface: bool,
    },
    /// The user wrote the raise method on this very type.
    FoundOnThisType(MethodRef),
    /// A base type raises the event. When `degraded` the method cannot be
    /// overridden, so notifications routed through it are lost.
    FoundOnBaseRequiresOverride { method: MethodRef, degraded: bool },
    /// The event exists but cannot be raised from generated code.
    FoundButIncompatible(IncompatibleReason),
    /// The user overrides the raise method the generator would own.
    SuppressedByUser(MethodRef),
}

impl RaiseMechanism {
    /// Method the generated property setters call.
    pub fn raise_method(&self) -> Option<&MethodRef> {
        match self {
            RaiseMechanism::NotFoundSynthesizeNew { method, .. }
            | RaiseMechanism::FoundOnThisType(method)
            | RaiseMechanism::FoundOnBaseRequiresOverride { method, .. } => Some(method),
            RaiseMechanism::NotRequested
            | RaiseMechanism::FoundButIncompatible(_)
            | RaiseMechanism::SuppressedByUser(_) => None,
        }
    }

    /// Whether generated setters emit notify calls for this family.
    pub fn can_notify(&self) -> bool {
        self.raise_method().is_some()
    }

    /// Whether the generator defines or overrides the raise method, and so
    /// can route extra notifications through it.
    pub fn generator_owns_method(&self) -> bool {
        matches!(
            self,
            RaiseMechanism::NotFoundSynthesizeNew { .. }
                | RaiseMechanism::FoundOnBaseRequiresOverride { degraded: false, .. }
        )
    }
}

/// What happens to the raise method in generated code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum MethodEmission {
    /// Nothing is emitted; the existing method is called as is.
    #[default]
    None,
    /// A new method is defined (virtual unless the type is sealed).
    Define { is_virtual: bool },
    /// An override of the base method is emitted.
    Override,
}

/// A call to a user-written hook method.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct HookCall {
    pub name: SmolStr,
    pub shape: Shape,
    /// Old and new values are available to pass. When false and the shape
    /// wants them, the emitter passes defaults.
    pub supply_old_new: bool,
}

/// Extra notifications raised from inside the raise method when a property
/// the generator does not own changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Forward {
    pub source: SmolStr,
    /// Dependents to raise, in closure order, without `source` itself.
    pub notified: Vec<SmolStr>,
}

/// Everything decided for one family on one type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct FamilyPlan {
    pub family: Family,
    pub mechanism: RaiseMechanism,
    pub emission: MethodEmission,
    pub forwards: Vec<Forward>,
    pub on_any_hook: Option<HookCall>,
}

impl FamilyPlan {
    pub(crate) fn not_requested(family: Family) -> Self {
        Self {
            family,
            mechanism: RaiseMechanism::NotRequested,
            emission: MethodEmission::None,
            forwards: Vec::new(),
            on_any_hook: None,
        }
    }

    /// Whether anything for this family is generated at all.
    pub fn emits_anything(&self) -> bool {
        self.emission != MethodEmission::None
            || matches!(
                self.mechanism,
                RaiseMechanism::NotFoundSynthesizeNew { synthesize_event: true, .. }
                    | RaiseMechanism::NotFoundSynthesizeNew { add_interface: true, .. }
            )
    }
}

/// One property to emit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyPlan {
    pub name: SmolStr,
    pub field: SmolStr,
    pub ty: SmolStr,
    /// Reflexive-transitive set of properties to notify, first-seen order.
    pub notified: Vec<SmolStr>,
    /// Notify calls for the changed family. Empty when it cannot notify.
    pub changed_calls: Vec<SmolStr>,
    /// Notify calls for the changing family. Empty when it cannot notify.
    pub changing_calls: Vec<SmolStr>,
    pub changed_hook: Option<HookCall>,
    pub changing_hook: Option<HookCall>,
    /// Setting this property also sets the type's "is changed" flag.
    pub sets_is_changed: bool,
    pub location: Location,
}

/// The finalized plan for one partial type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationPlan {
    pub type_id: TypeId,
    pub properties: Vec<PropertyPlan>,
    pub changed: FamilyPlan,
    pub changing: FamilyPlan,
    /// Name of the "is changed" property, if the type has one.
    pub is_changed: Option<SmolStr>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationPlan {
    /// A plan that generates nothing and reports nothing.
    pub(crate) fn empty(type_id: TypeId) -> Self {
        Self {
            type_id,
            properties: Vec::new(),
            changed: FamilyPlan::not_requested(Family::Changed),
            changing: FamilyPlan::not_requested(Family::Changing),
            is_changed: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn family(&self, family: Family) -> &FamilyPlan {
        match family {
            Family::Changed => &self.changed,
            Family::Changing => &self.changing,
        }
    }

    /// Number of members the emitter will generate.
    pub fn generated_member_count(&self) -> usize {
        let family_members = [&self.changed, &self.changing]
            .iter()
            .map(|f| {
                let event = matches!(
                    f.mechanism,
                    RaiseMechanism::NotFoundSynthesizeNew { synthesize_event: true, .. }
                );
                usize::from(event) + usize::from(f.emission != MethodEmission::None)
            })
            .sum::<usize>();
        self.properties.len() + family_members
    }

    pub fn property(&self, name: &str) -> Option<&PropertyPlan> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Serialize for an out-of-process emitter.
    #[cfg(feature = "interchange")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(overridable: bool) -> MethodRef {
        MethodRef {
            name: "OnPropertyChanged".into(),
            shape: Shape::Name,
            declaring_type: TypeId::new("Base"),
            accessibility: Accessibility::Protected,
            is_overridable: overridable,
            location: Location::default(),
        }
    }

    #[test]
    fn test_owned_mechanisms() {
        assert!(
            RaiseMechanism::FoundOnBaseRequiresOverride { method: method(true), degraded: false }
                .generator_owns_method()
        );
        assert!(
            !RaiseMechanism::FoundOnBaseRequiresOverride { method: method(false), degraded: true }
                .generator_owns_method()
        );
        assert!(!RaiseMechanism::FoundOnThisType(method(false)).generator_owns_method());
    }

    #[test]
    fn test_incompatible_cannot_notify() {
        let incompatible = RaiseMechanism::FoundButIncompatible(IncompatibleReason::BadSignature);
        assert!(!incompatible.can_notify());
        assert!(!RaiseMechanism::SuppressedByUser(method(true)).can_notify());
        assert!(RaiseMechanism::FoundOnThisType(method(false)).can_notify());
    }

    #[test]
    fn test_empty_plan_generates_nothing() {
        let plan = GenerationPlan::empty(TypeId::new("Vm"));
        assert_eq!(plan.generated_member_count(), 0);
        assert!(plan.diagnostics.is_empty());
        assert!(!plan.changed.emits_anything());
    }
}
