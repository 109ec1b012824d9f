//! Type plan assembly: runs every sub-resolution for one type and merges
//! the results into its [`GenerationPlan`].

use smol_str::SmolStr;

use super::deps::{DependencyGraph, EdgeKind};
use super::diagnostics::DiagnosticCollector;
use super::hooks::{AnyHook, property_hook};
use super::naming::{NamedMember, name_members};
use super::plan::{
    FamilyPlan, Forward, GenerationPlan, HookCall, MethodEmission, PropertyPlan, RaiseMechanism,
};
use super::policy::Outcome;
use super::raise::RaiseResolver;
use super::store::PlanStore;
use super::well_known::well_known;
use crate::config::AnalysisOptions;
use crate::model::{Family, TypeDescriptor};

/// Build the plan for `ty`.
///
/// `chain` is the type's ancestors, root first. Plans of generated
/// ancestors must already be published in `store`.
pub fn assemble(
    ty: &TypeDescriptor,
    chain: &[&TypeDescriptor],
    store: &PlanStore,
    options: &AnalysisOptions,
) -> GenerationPlan {
    if !ty.is_partial || !ty.has_annotations() {
        return GenerationPlan::empty(ty.id.clone());
    }

    let mut diagnostics = DiagnosticCollector::new();

    let (named, naming_diagnostics) = name_members(ty, &options.naming);
    diagnostics.extend(naming_diagnostics);
    let is_changed = resolve_is_changed(&named, &mut diagnostics);

    // Changing first: a synthesized "changed" method borrows its name.
    let resolver = RaiseResolver::new(ty, chain, store);
    let any_hook = AnyHook::find(ty);
    let changing = resolver.resolve(Family::Changing, None, false);
    let changed = resolver.resolve(
        Family::Changed,
        changing.mechanism.raise_method(),
        any_hook.wants_old_new(),
    );
    diagnostics.extend(changing.diagnostics);
    diagnostics.extend(changed.diagnostics);

    let (graph, graph_diagnostics) = DependencyGraph::build(ty, chain, &named);
    diagnostics.extend(graph_diagnostics);

    let (on_any_hook, hook_diagnostics) = any_hook.settle(&changed.mechanism);
    diagnostics.extend(hook_diagnostics);

    if matches!(
        changed.mechanism,
        RaiseMechanism::FoundOnThisType(_)
            | RaiseMechanism::FoundOnBaseRequiresOverride { degraded: true, .. }
    ) {
        for edge in graph.edges() {
            let needs_raise_method = edge.kind == EdgeKind::DependsOn
                && graph.origin(&edge.source).is_some_and(|o| !o.is_generated());
            if needs_raise_method {
                diagnostics.add(
                    Outcome::DependencyNotRaised {
                        annotation: edge.annotation,
                    }
                    .diagnostic(),
                );
            }
        }
    }

    let changing = family_plan(Family::Changing, changing.mechanism, &graph, None);
    let changed = family_plan(Family::Changed, changed.mechanism, &graph, on_any_hook);

    let mut properties = Vec::new();
    for entry in named.iter().filter(|n| n.generated) {
        let notified = graph.closure(&entry.property);
        let calls = |family: &FamilyPlan| {
            if family.mechanism.can_notify() {
                notified.clone()
            } else {
                Vec::new()
            }
        };

        let (changed_hook, bad_changed) =
            property_hook(ty, entry.member, &entry.property, Family::Changed);
        diagnostics.extend(bad_changed);
        let changing_hook = if changing.mechanism == RaiseMechanism::NotRequested {
            None
        } else {
            let (hook, bad) = property_hook(ty, entry.member, &entry.property, Family::Changing);
            diagnostics.extend(bad);
            hook
        };

        properties.push(PropertyPlan {
            name: entry.property.clone(),
            field: entry.member.name.clone(),
            ty: entry.member.ty.clone(),
            changed_calls: calls(&changed),
            changing_calls: calls(&changing),
            notified,
            changed_hook,
            changing_hook,
            sets_is_changed: is_changed.as_ref().is_some_and(|name| *name != entry.property),
            location: entry.member.location,
        });
    }

    GenerationPlan {
        type_id: ty.id.clone(),
        properties,
        changed,
        changing,
        is_changed,
        diagnostics: diagnostics.finish(),
    }
}

fn family_plan(
    family: Family,
    mechanism: RaiseMechanism,
    graph: &DependencyGraph,
    on_any_hook: Option<HookCall>,
) -> FamilyPlan {
    // Notifications for properties the generator does not own can only be
    // raised from a raise method it defines or overrides.
    let forwards: Vec<Forward> = if mechanism.generator_owns_method() {
        graph
            .nodes()
            .filter(|(_, origin)| !origin.is_generated())
            .filter_map(|(source, _)| {
                let notified: Vec<SmolStr> = graph.closure(source).into_iter().skip(1).collect();
                (!notified.is_empty()).then(|| Forward {
                    source: source.clone(),
                    notified,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let emission = match &mechanism {
        RaiseMechanism::NotFoundSynthesizeNew { method, .. } => MethodEmission::Define {
            is_virtual: method.is_overridable,
        },
        RaiseMechanism::FoundOnBaseRequiresOverride { degraded: false, .. }
            if !forwards.is_empty() || on_any_hook.is_some() =>
        {
            MethodEmission::Override
        }
        _ => MethodEmission::None,
    };

    FamilyPlan {
        family,
        mechanism,
        emission,
        forwards,
        on_any_hook,
    }
}

/// Pick the "is changed" property, reporting extra or non-bool markers.
fn resolve_is_changed(
    named: &[NamedMember<'_>],
    diagnostics: &mut DiagnosticCollector,
) -> Option<SmolStr> {
    let mut chosen: Option<SmolStr> = None;

    for entry in named {
        let Some(location) = entry.member.is_changed else {
            continue;
        };
        if !well_known().is_bool(&entry.member.ty) {
            diagnostics.add(Outcome::IsChangedNotBool { member: location }.diagnostic());
        } else if chosen.is_some() {
            diagnostics.add(Outcome::DuplicateIsChanged { member: location }.diagnostic());
        } else {
            chosen = Some(entry.property.clone());
        }
    }

    chosen
}
