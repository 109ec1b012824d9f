//! Raise-mechanism resolution.
//!
//! For one type and one family, decide how generated setters raise the
//! family's event: call a method that already exists, override one on a
//! base, or synthesize a new one. The base chain is searched root first, so
//! the most basic usable method wins.

use smol_str::SmolStr;

use super::diagnostics::Diagnostic;
use super::facts::chain_implements;
use super::matcher::{MatchResult, Matcher, Shape};
use super::plan::{IncompatibleReason, MethodRef, RaiseMechanism};
use super::policy::Outcome;
use super::store::PlanStore;
use super::well_known::{sibling_raise_name, well_known};
use crate::model::{Accessibility, Family, TypeDescriptor};

/// The mechanism chosen for one family, with what was reported on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub mechanism: RaiseMechanism,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    fn quiet(mechanism: RaiseMechanism) -> Self {
        Self {
            mechanism,
            diagnostics: Vec::new(),
        }
    }

    fn reported(mechanism: RaiseMechanism, outcome: Outcome) -> Self {
        Self {
            mechanism,
            diagnostics: vec![outcome.diagnostic()],
        }
    }
}

/// Resolves raise mechanisms for one type.
///
/// Ancestors that are themselves generated are consulted through their
/// published plans, which must be in `store` already.
pub struct RaiseResolver<'a> {
    ty: &'a TypeDescriptor,
    chain: &'a [&'a TypeDescriptor],
    store: &'a PlanStore,
}

impl<'a> RaiseResolver<'a> {
    /// `chain` is the type's ancestors, root first.
    pub fn new(
        ty: &'a TypeDescriptor,
        chain: &'a [&'a TypeDescriptor],
        store: &'a PlanStore,
    ) -> Self {
        Self { ty, chain, store }
    }

    /// Whether the family's interface is implemented by the type, an
    /// ancestor, or code generated for an ancestor.
    pub fn interface_implemented(&self, family: Family) -> bool {
        chain_implements(self.chain, self.ty, family)
            || self.chain.iter().any(|ancestor| {
                self.store.get(&ancestor.id).is_some_and(|plan| {
                    matches!(
                        plan.family(family).mechanism,
                        RaiseMechanism::NotFoundSynthesizeNew { add_interface: true, .. }
                    )
                })
            })
    }

    /// Whether the type takes part in the family at all.
    pub fn is_requested(&self, family: Family) -> bool {
        if !self.ty.has_annotations() {
            return false;
        }
        match family {
            Family::Changed => true,
            Family::Changing => self.interface_implemented(Family::Changing),
        }
    }

    /// Resolve one family.
    ///
    /// `sibling` is the other family's raise method, if already resolved.
    /// The "changed" search and a synthesized "changed" method follow its
    /// naming convention.
    /// `wants_old_new` asks a synthesized method to carry old and new values.
    pub fn resolve(
        &self,
        family: Family,
        sibling: Option<&MethodRef>,
        wants_old_new: bool,
    ) -> Resolution {
        let resolution = self.resolve_inner(family, sibling, wants_old_new);
        tracing::debug!(
            ty = %self.ty.id,
            %family,
            mechanism = ?resolution.mechanism,
            diagnostics = resolution.diagnostics.len(),
            "resolved raise mechanism"
        );
        resolution
    }

    fn resolve_inner(
        &self,
        family: Family,
        sibling: Option<&MethodRef>,
        wants_old_new: bool,
    ) -> Resolution {
        if !self.is_requested(family) {
            return Resolution::quiet(RaiseMechanism::NotRequested);
        }

        let names = &self.raise_names(family, sibling);
        let matcher = Matcher::new(Shape::raise_method(family), family, &self.ty.id);

        // Nothing implements the interface: only a usable base method counts,
        // and nothing the user wrote is reported.
        if !self.interface_implemented(family) {
            for ancestor in self.chain {
                if let MatchResult::Unique(member, shape) = matcher.find(&ancestor.members, names) {
                    let method = MethodRef::from_member(member, shape);
                    return self.found_on_base(family, &matcher, method);
                }
            }
            return Resolution::quiet(self.synthesize(family, sibling, wants_old_new, true, true));
        }

        let mut event_seen = false;

        for ancestor in self.chain {
            match matcher.find(&ancestor.members, names) {
                MatchResult::Unique(member, shape) => {
                    let method = MethodRef::from_member(member, shape);
                    return self.found_on_base(family, &matcher, method);
                }
                MatchResult::NoneFound => {}
                failure => return self.unusable(family, &failure),
            }
            if let Some(method) = self.published_method(ancestor, family) {
                return self.found_on_base(family, &matcher, method);
            }
            event_seen |= ancestor.declared_event(family).is_some()
                || ancestor.explicit_event(family).is_some();
        }

        match matcher.find(&self.ty.members, names) {
            MatchResult::Unique(member, shape) => Resolution::quiet(RaiseMechanism::FoundOnThisType(
                MethodRef::from_member(member, shape),
            )),
            MatchResult::NoneFound => {
                if event_seen || self.ty.explicit_event(family).is_some() {
                    let reason = IncompatibleReason::EventWithoutRaiseMethod;
                    Resolution::reported(
                        RaiseMechanism::FoundButIncompatible(reason),
                        Outcome::EventWithoutRaiseMethod {
                            family,
                            ty: self.ty.location,
                        },
                    )
                } else {
                    let synthesize_event = self.ty.declared_event(family).is_none();
                    let mechanism =
                        self.synthesize(family, sibling, wants_old_new, synthesize_event, false);
                    Resolution::quiet(mechanism)
                }
            }
            failure => self.unusable(family, &failure),
        }
    }

    /// Names searched for the family's raise method, highest priority first.
    ///
    /// A "changed" method following the convention of the "changing" method
    /// already resolved is looked for before the canonical names.
    fn raise_names(&self, family: Family, sibling: Option<&MethodRef>) -> Vec<SmolStr> {
        let canonical = &well_known().family(family).raise_methods;
        let derived = match family {
            Family::Changed => sibling.and_then(|s| sibling_raise_name(&s.name, family)),
            Family::Changing => None,
        };
        match derived {
            Some(derived) => std::iter::once(derived.clone())
                .chain(canonical.iter().filter(|n| **n != derived).cloned())
                .collect(),
            None => canonical.clone(),
        }
    }

    /// The raise method code generated for `ancestor` defines.
    fn published_method(&self, ancestor: &TypeDescriptor, family: Family) -> Option<MethodRef> {
        let plan = self.store.get(&ancestor.id)?;
        match &plan.family(family).mechanism {
            RaiseMechanism::NotFoundSynthesizeNew { method, .. } => Some(method.clone()),
            _ => None,
        }
    }

    fn found_on_base(
        &self,
        family: Family,
        matcher: &Matcher<'_>,
        method: MethodRef,
    ) -> Resolution {
        let user_override = self
            .ty
            .declared_methods(&method.name)
            .find(|m| m.modifiers.is_override);
        if let Some(user) = user_override {
            let shape = matcher.shape_of(user).unwrap_or(method.shape);
            return Resolution::reported(
                RaiseMechanism::SuppressedByUser(MethodRef::from_member(user, shape)),
                Outcome::RaiseMethodOverridden {
                    family,
                    method: user.location,
                },
            );
        }

        if method.is_overridable {
            return Resolution::quiet(RaiseMechanism::FoundOnBaseRequiresOverride {
                method,
                degraded: false,
            });
        }

        let outcome = Outcome::RaiseMethodNonVirtual {
            family,
            method: method.location,
        };
        Resolution::reported(
            RaiseMechanism::FoundOnBaseRequiresOverride { method, degraded: true },
            outcome,
        )
    }

    fn unusable(&self, family: Family, failure: &MatchResult<'_>) -> Resolution {
        let reason = match failure {
            MatchResult::InaccessibleOnly(_) => IncompatibleReason::Inaccessible,
            _ => IncompatibleReason::BadSignature,
        };
        Resolution::reported(
            RaiseMechanism::FoundButIncompatible(reason),
            Outcome::RaiseMethodUnusable {
                family,
                ty: self.ty.location,
            },
        )
    }

    fn synthesize(
        &self,
        family: Family,
        sibling: Option<&MethodRef>,
        wants_old_new: bool,
        synthesize_event: bool,
        add_interface: bool,
    ) -> RaiseMechanism {
        let canonical = &well_known().family(family).raise_methods[0];
        let name: SmolStr = match family {
            Family::Changed => sibling
                .and_then(|s| sibling_raise_name(&s.name, family))
                .unwrap_or_else(|| canonical.clone()),
            Family::Changing => canonical.clone(),
        };
        let shape = if wants_old_new {
            Shape::EventArgsOldNew
        } else {
            Shape::EventArgs
        };
        let accessibility = if self.ty.is_sealed {
            Accessibility::Private
        } else {
            Accessibility::Protected
        };

        RaiseMechanism::NotFoundSynthesizeNew {
            method: MethodRef {
                name,
                shape,
                declaring_type: self.ty.id.clone(),
                accessibility,
                is_overridable: !self.ty.is_sealed,
                location: self.ty.location,
            },
            synthesize_event,
            add_interface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Location;
    use crate::model::{AnnotatedMember, ExistingMember, Modifiers, ParamType, TypeGraph, TypeId};

    const INPC: &str = "System.ComponentModel.INotifyPropertyChanged";

    fn annotated(name: &str) -> TypeDescriptor {
        TypeDescriptor::partial(TypeId::new(name), Location::at(0, 0, 2))
            .with_annotated(AnnotatedMember::notify_field(
                "_foo",
                "string",
                Location::at(0, 10, 14),
            ))
    }

    fn resolve(graph: &TypeGraph, name: &str, family: Family) -> Resolution {
        let store = PlanStore::new();
        let ty = graph.descriptor(&TypeId::new(name)).unwrap();
        let chain = graph.base_chain(ty).unwrap();
        RaiseResolver::new(ty, &chain, &store).resolve(family, None, false)
    }

    #[test]
    fn test_unannotated_type_not_requested() {
        let vm = TypeDescriptor::partial(TypeId::new("Vm"), Location::default());
        let graph = TypeGraph::new().with(vm);
        let resolution = resolve(&graph, "Vm", Family::Changed);
        assert_eq!(resolution.mechanism, RaiseMechanism::NotRequested);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_synthesizes_everything_without_interface() {
        let graph = TypeGraph::new().with(annotated("Vm"));
        let resolution = resolve(&graph, "Vm", Family::Changed);

        match resolution.mechanism {
            RaiseMechanism::NotFoundSynthesizeNew {
                method,
                synthesize_event,
                add_interface,
            } => {
                assert_eq!(method.name, "OnPropertyChanged");
                assert_eq!(method.shape, Shape::EventArgs);
                assert!(method.is_overridable);
                assert!(synthesize_event);
                assert!(add_interface);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_changing_not_requested_without_interface() {
        let graph = TypeGraph::new().with(annotated("Vm"));
        assert_eq!(resolve(&graph, "Vm", Family::Changing).mechanism, RaiseMechanism::NotRequested);
    }

    #[test]
    fn test_own_method_found() {
        let id = TypeId::new("Vm");
        let graph = TypeGraph::new().with(
            annotated("Vm")
                .implementing(INPC)
                .with_member(ExistingMember::event(
                    id.clone(),
                    "PropertyChanged",
                    Location::default(),
                ))
                .with_member(ExistingMember::method(
                    id,
                    "NotifyPropertyChanged",
                    [ParamType::String],
                    Location::default(),
                )),
        );

        let resolution = resolve(&graph, "Vm", Family::Changed);
        assert!(matches!(
            resolution.mechanism,
            RaiseMechanism::FoundOnThisType(ref m) if m.name == "NotifyPropertyChanged"
        ));
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_non_virtual_base_is_degraded() {
        let base = TypeId::new("Base");
        let method_loc = Location::at(0, 40, 57);
        let graph = TypeGraph::new()
            .with(
                TypeDescriptor::external(base.clone(), Location::default())
                    .implementing(INPC)
                    .with_member(ExistingMember::event(
                        base.clone(),
                        "PropertyChanged",
                        Location::default(),
                    ))
                    .with_member(
                        ExistingMember::method(
                            base,
                            "OnPropertyChanged",
                            [ParamType::String],
                            method_loc,
                        )
                        .with_accessibility(Accessibility::Protected),
                    ),
            )
            .with(annotated("Derived").with_base(TypeId::new("Base")));

        let resolution = resolve(&graph, "Derived", Family::Changed);
        assert!(matches!(
            resolution.mechanism,
            RaiseMechanism::FoundOnBaseRequiresOverride { degraded: true, .. }
        ));
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].code(), "INPC022");
        assert_eq!(resolution.diagnostics[0].location, method_loc);
    }

    #[test]
    fn test_user_override_suppresses() {
        let base = TypeId::new("Base");
        let derived = TypeId::new("Derived");
        let override_loc = Location::at(1, 5, 22);
        let graph = TypeGraph::new()
            .with(
                TypeDescriptor::external(base.clone(), Location::default())
                    .implementing(INPC)
                    .with_member(
                        ExistingMember::method(
                            base,
                            "OnPropertyChanged",
                            [ParamType::String],
                            Location::default(),
                        )
                        .with_accessibility(Accessibility::Protected)
                        .with_modifiers(Modifiers::VIRTUAL),
                    ),
            )
            .with(
                annotated("Derived").with_base(TypeId::new("Base")).with_member(
                    ExistingMember::method(
                        derived,
                        "OnPropertyChanged",
                        [ParamType::String],
                        override_loc,
                    )
                    .with_accessibility(Accessibility::Protected)
                    .with_modifiers(Modifiers::OVERRIDE),
                ),
            );

        let resolution = resolve(&graph, "Derived", Family::Changed);
        assert!(matches!(resolution.mechanism, RaiseMechanism::SuppressedByUser(_)));
        assert_eq!(resolution.diagnostics[0].code(), "INPC021");
        assert_eq!(resolution.diagnostics[0].location, override_loc);
    }

    #[test]
    fn test_changed_name_follows_changing_sibling() {
        let graph = TypeGraph::new().with(annotated("Vm"));
        let store = PlanStore::new();
        let ty = graph.descriptor(&TypeId::new("Vm")).unwrap();
        let chain = graph.base_chain(ty).unwrap();
        let sibling = MethodRef {
            name: "NotifyOfPropertyChanging".into(),
            shape: Shape::Name,
            declaring_type: ty.id.clone(),
            accessibility: Accessibility::Protected,
            is_overridable: true,
            location: Location::default(),
        };

        let resolution =
            RaiseResolver::new(ty, &chain, &store).resolve(Family::Changed, Some(&sibling), true);
        let method = resolution.mechanism.raise_method().cloned().unwrap();
        assert_eq!(method.name, "NotifyOfPropertyChanged");
        assert_eq!(method.shape, Shape::EventArgsOldNew);
    }

    #[test]
    fn test_changed_lookup_prefers_sibling_convention() {
        let id = TypeId::new("Vm");
        let raise = |name: &str| {
            ExistingMember::method(id.clone(), name, [ParamType::String], Location::default())
        };
        let graph = TypeGraph::new().with(
            annotated("Vm")
                .implementing(INPC)
                .with_member(raise("OnPropertyChanged"))
                .with_member(raise("RaisePropertyChanged")),
        );
        let store = PlanStore::new();
        let ty = graph.descriptor(&id).unwrap();
        let sibling = MethodRef::from_member(&raise("RaisePropertyChanging"), Shape::Name);

        let resolver = RaiseResolver::new(ty, &[], &store);
        let with_sibling = resolver.resolve(Family::Changed, Some(&sibling), false);
        assert!(matches!(
            with_sibling.mechanism,
            RaiseMechanism::FoundOnThisType(ref m) if m.name == "RaisePropertyChanged"
        ));

        let without = resolver.resolve(Family::Changed, None, false);
        assert!(matches!(
            without.mechanism,
            RaiseMechanism::FoundOnThisType(ref m) if m.name == "OnPropertyChanged"
        ));
    }
}
