//! User hook methods: `OnAnyPropertyChanged` and the per-property
//! `On{Property}Changed` / `On{Property}Changing`.

use smol_str::SmolStr;

use super::diagnostics::Diagnostic;
use super::matcher::{MatchResult, Matcher, Shape};
use super::plan::{HookCall, RaiseMechanism};
use super::policy::Outcome;
use super::well_known::well_known;
use crate::base::Location;
use crate::model::{AnnotatedMember, ExistingMember, Family, TypeDescriptor};

/// The any-property hook as declared on a type, before the raise mechanism
/// is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyHook {
    /// Not declared, or declared as an override (the base calls it).
    Absent,
    Found { shape: Shape, location: Location },
    BadSignature { location: Location },
}

impl AnyHook {
    /// Look up `OnAnyPropertyChanged` on `ty`.
    pub fn find(ty: &TypeDescriptor) -> AnyHook {
        let name = &well_known().on_any_property_changed;
        let candidates: Vec<&ExistingMember> = ty.declared_methods(name).collect();
        if candidates.is_empty() || candidates.iter().any(|m| m.modifiers.is_override) {
            return AnyHook::Absent;
        }

        let matcher = Matcher::new(Shape::ANY_PROPERTY_HOOK, Family::Changed, &ty.id);
        match matcher.find(candidates.iter().copied(), std::slice::from_ref(name)) {
            MatchResult::Unique(member, shape) => AnyHook::Found {
                shape,
                location: member.location,
            },
            MatchResult::NoneFound => AnyHook::Absent,
            MatchResult::AmbiguousBadSignature(members)
            | MatchResult::InaccessibleOnly(members) => AnyHook::BadSignature {
                location: members.first().map_or(ty.location, |m| m.location),
            },
        }
    }

    /// Whether a synthesized raise method should carry old and new values.
    pub fn wants_old_new(&self) -> bool {
        matches!(self, AnyHook::Found { shape, .. } if shape.has_old_and_new())
    }

    /// Decide whether the hook is called, given the changed family's
    /// mechanism.
    pub fn settle(&self, mechanism: &RaiseMechanism) -> (Option<HookCall>, Vec<Diagnostic>) {
        let (shape, location) = match *self {
            AnyHook::Absent => return (None, Vec::new()),
            AnyHook::BadSignature { location } => {
                return (None, vec![Outcome::AnyHookBadSignature { hook: location }.diagnostic()]);
            }
            AnyHook::Found { shape, location } => (shape, location),
        };

        let name = well_known().on_any_property_changed.clone();
        match mechanism {
            RaiseMechanism::NotRequested | RaiseMechanism::FoundButIncompatible(_) => {
                (None, Vec::new())
            }
            RaiseMechanism::FoundOnThisType(_)
            | RaiseMechanism::SuppressedByUser(_)
            | RaiseMechanism::FoundOnBaseRequiresOverride { degraded: true, .. } => {
                (None, vec![Outcome::AnyHookNotCalled { hook: location }.diagnostic()])
            }
            RaiseMechanism::NotFoundSynthesizeNew { method, .. } => {
                let call = HookCall {
                    name,
                    shape,
                    supply_old_new: method.shape.has_old_and_new(),
                };
                (Some(call), Vec::new())
            }
            RaiseMechanism::FoundOnBaseRequiresOverride { method, degraded: false } => {
                let base_has_values = method.shape.has_old_and_new();
                let call = HookCall {
                    name,
                    shape,
                    supply_old_new: base_has_values,
                };
                let diagnostics = if shape.has_old_and_new() && !base_has_values {
                    vec![Outcome::AnyHookMissingOldAndNew { hook: location }.diagnostic()]
                } else {
                    Vec::new()
                };
                (Some(call), diagnostics)
            }
        }
    }
}

/// Resolve the per-property hook of `family` for a generated property.
pub fn property_hook(
    ty: &TypeDescriptor,
    member: &AnnotatedMember,
    property: &str,
    family: Family,
) -> (Option<HookCall>, Option<Diagnostic>) {
    let name = member
        .hook_name(family)
        .cloned()
        .unwrap_or_else(|| SmolStr::from(format!("On{property}{}", family.hook_suffix())));

    let matcher = Matcher::new(Shape::PROPERTY_HOOK, family, &ty.id).with_value_type(&member.ty);
    match matcher.find(&ty.members, std::slice::from_ref(&name)) {
        MatchResult::Unique(_, shape) => {
            let call = HookCall {
                name,
                shape,
                supply_old_new: shape.has_old_and_new(),
            };
            (Some(call), None)
        }
        MatchResult::NoneFound => (None, None),
        MatchResult::AmbiguousBadSignature(members) | MatchResult::InaccessibleOnly(members) => {
            let hook = members.first().map_or(member.location, |m| m.location);
            tracing::debug!(%name, %family, "hook has unrecognised signature");
            (None, Some(Outcome::PropertyHookBadSignature { family, hook }.diagnostic()))
        }
    }
}
