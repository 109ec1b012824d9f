//! Diagnostic policy: the one place where resolution outcomes turn into
//! diagnostic kinds.
//!
//! Sub-resolutions report an [`Outcome`] and never pick a kind themselves, so
//! one outcome always maps to exactly one kind.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use crate::base::Location;
use crate::model::Family;

/// A non-trivial resolution outcome that the user should hear about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Raise-method candidates exist but none is usable. Anchored at the type.
    RaiseMethodUnusable { family: Family, ty: Location },
    /// The family's event exists with nothing to raise it. Anchored at the type.
    EventWithoutRaiseMethod { family: Family, ty: Location },
    /// The user overrides the raise method. Anchored at the override.
    RaiseMethodOverridden { family: Family, method: Location },
    /// The base raise method cannot be overridden. Anchored at the base method.
    RaiseMethodNonVirtual { family: Family, method: Location },
    /// A `DependsOn` notification will never be raised.
    DependencyNotRaised { annotation: Location },
    DependsOnWithoutNotify { annotation: Location },
    DependsOnSelf { annotation: Location },
    /// Anchored at the earliest declared edge of the cycle.
    DependencyCycle { edge: Location },
    PropertyNameInvalid { annotation: Location },
    PropertyNameSameAsField { field: Location },
    PropertyNameCollision { field: Location },
    PropertyHookBadSignature { family: Family, hook: Location },
    AnyHookBadSignature { hook: Location },
    AnyHookMissingOldAndNew { hook: Location },
    AnyHookNotCalled { hook: Location },
    DuplicateIsChanged { member: Location },
    IsChangedNotBool { member: Location },
}

impl Outcome {
    /// The diagnostic this outcome is reported as.
    pub fn diagnostic(self) -> Diagnostic {
        use DiagnosticKind as K;

        let (kind, location, family) = match self {
            Outcome::RaiseMethodUnusable { family, ty } => {
                let kind = match family {
                    Family::Changed => K::ChangedRaiseMethodUnusable,
                    Family::Changing => K::ChangingRaiseMethodUnusable,
                };
                (kind, ty, Some(family))
            }
            Outcome::EventWithoutRaiseMethod { family, ty } => {
                let kind = match family {
                    Family::Changed => K::ChangedEventWithoutRaiseMethod,
                    Family::Changing => K::ChangingEventWithoutRaiseMethod,
                };
                (kind, ty, Some(family))
            }
            Outcome::RaiseMethodOverridden { family, method } => {
                (K::RaiseMethodOverriddenByUser, method, Some(family))
            }
            Outcome::RaiseMethodNonVirtual { family, method } => {
                (K::RaiseMethodNonVirtual, method, Some(family))
            }
            Outcome::DependencyNotRaised { annotation } => {
                (K::DependencyNotRaised, annotation, Some(Family::Changed))
            }
            Outcome::DependsOnWithoutNotify { annotation } => {
                (K::DependsOnWithoutNotify, annotation, None)
            }
            Outcome::DependsOnSelf { annotation } => (K::DependsOnSelf, annotation, None),
            Outcome::DependencyCycle { edge } => (K::DependencyCycle, edge, None),
            Outcome::PropertyNameInvalid { annotation } => {
                (K::PropertyNameInvalid, annotation, None)
            }
            Outcome::PropertyNameSameAsField { field } => (K::PropertyNameSameAsField, field, None),
            Outcome::PropertyNameCollision { field } => (K::PropertyNameCollision, field, None),
            Outcome::PropertyHookBadSignature { family, hook } => {
                (K::PropertyHookBadSignature, hook, Some(family))
            }
            Outcome::AnyHookBadSignature { hook } => {
                (K::AnyHookBadSignature, hook, Some(Family::Changed))
            }
            Outcome::AnyHookMissingOldAndNew { hook } => {
                (K::AnyHookMissingOldAndNew, hook, Some(Family::Changed))
            }
            Outcome::AnyHookNotCalled { hook } => {
                (K::AnyHookNotCalled, hook, Some(Family::Changed))
            }
            Outcome::DuplicateIsChanged { member } => (K::DuplicateIsChanged, member, None),
            Outcome::IsChangedNotBool { member } => (K::IsChangedNotBool, member, None),
        };

        let diagnostic = Diagnostic::new(kind, location);
        match family {
            Some(family) => diagnostic.with_family(family),
            None => diagnostic,
        }
    }
}

impl From<Outcome> for Diagnostic {
    fn from(outcome: Outcome) -> Self {
        outcome.diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_selects_kind() {
        let ty = Location::at(0, 10, 20);
        let changed = Outcome::RaiseMethodUnusable { family: Family::Changed, ty }.diagnostic();
        let changing = Outcome::RaiseMethodUnusable { family: Family::Changing, ty }.diagnostic();

        assert_eq!(changed.code(), "INPC006");
        assert_eq!(changing.code(), "INPC029");
        assert_eq!(changing.family, Some(Family::Changing));
    }

    #[test]
    fn test_event_without_method_codes() {
        let ty = Location::at(0, 0, 1);
        assert_eq!(
            Outcome::EventWithoutRaiseMethod { family: Family::Changed, ty }.diagnostic().code(),
            "INPC007"
        );
        assert_eq!(
            Outcome::EventWithoutRaiseMethod { family: Family::Changing, ty }.diagnostic().code(),
            "INPC0028"
        );
    }

    #[test]
    fn test_anchor_is_kept() {
        let annotation = Location::at(2, 30, 45);
        let diagnostic: Diagnostic = Outcome::DependsOnWithoutNotify { annotation }.into();
        assert_eq!(diagnostic.location, annotation);
        assert_eq!(diagnostic.family, None);
    }
}
