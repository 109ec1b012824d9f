//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::sync::Arc;

use inpc::base::Location;
use inpc::model::{Accessibility, ExistingMember, Family, Modifiers, ParamType, TypeGraph, TypeId};
use inpc::{AnalysisOptions, Analyzer, GenerationPlan};

pub const INPC: &str = "System.ComponentModel.INotifyPropertyChanged";
pub const INPC_CHANGING: &str = "System.ComponentModel.INotifyPropertyChanging";

/// A location in file 0.
pub fn loc(start: u32, end: u32) -> Location {
    Location::at(0, start, end)
}

pub fn id(name: &str) -> TypeId {
    TypeId::new(name)
}

pub fn analyze(graph: &TypeGraph) -> Vec<Arc<GenerationPlan>> {
    Analyzer::new(AnalysisOptions::default())
        .analyze_all(graph)
        .expect("analysis succeeds")
}

pub fn plan_of<'a>(plans: &'a [Arc<GenerationPlan>], name: &str) -> &'a GenerationPlan {
    plans
        .iter()
        .find(|p| p.type_id.name == name)
        .unwrap_or_else(|| panic!("no plan for {name}"))
}

pub fn codes(plan: &GenerationPlan) -> Vec<&'static str> {
    plan.diagnostics.iter().map(|d| d.code()).collect()
}

pub fn event(owner: &str, family: Family) -> ExistingMember {
    let name = match family {
        Family::Changed => "PropertyChanged",
        Family::Changing => "PropertyChanging",
    };
    ExistingMember::event(id(owner), name, Location::default())
}

/// A method on `owner` with the given accessibility and modifiers.
pub fn method(
    owner: &str,
    name: &str,
    params: impl IntoIterator<Item = ParamType>,
    accessibility: Accessibility,
    modifiers: Modifiers,
    location: Location,
) -> ExistingMember {
    ExistingMember::method(id(owner), name, params, location)
        .with_accessibility(accessibility)
        .with_modifiers(modifiers)
}

/// `protected virtual void name(params)`
pub fn protected_virtual(
    owner: &str,
    name: &str,
    params: impl IntoIterator<Item = ParamType>,
) -> ExistingMember {
    method(owner, name, params, Accessibility::Protected, Modifiers::VIRTUAL, Location::default())
}

pub fn names(plan: &GenerationPlan, property: &str, family: Family) -> Vec<String> {
    let property = plan
        .property(property)
        .unwrap_or_else(|| panic!("no property {property}"));
    let calls = match family {
        Family::Changed => &property.changed_calls,
        Family::Changing => &property.changing_calls,
    };
    calls.iter().map(|s| s.to_string()).collect()
}
