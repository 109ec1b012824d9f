//! The resolution engine.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! store     → PlanStore + Analyzer (waves of types, rayon)
//!   ↓
//! assemble  → one GenerationPlan per partial type
//!   ↓
//! raise / deps / hooks / naming → sub-resolutions
//!   ↓
//! matcher   → member signature matching
//!   ↓
//! facts     → queries over the host model
//! ```
//!
//! Every sub-resolution reports through [`policy::Outcome`], which owns the
//! mapping to diagnostic kinds.

mod assemble;
mod deps;
mod diagnostics;
mod facts;
mod hooks;
mod matcher;
mod naming;
mod plan;
mod policy;
mod raise;
mod store;
mod well_known;

pub use assemble::assemble;
pub use deps::{DependencyEdge, DependencyGraph, EdgeKind, NodeOrigin};
pub use diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind, Severity};
pub use facts::chain_implements;
pub use hooks::{AnyHook, property_hook};
pub use matcher::{MatchResult, Matcher, Shape};
pub use naming::{NamedMember, is_identifier, name_members};
pub use plan::{
    FamilyPlan, Forward, GenerationPlan, HookCall, IncompatibleReason, MethodEmission, MethodRef,
    PropertyPlan, RaiseMechanism,
};
pub use policy::Outcome;
pub use raise::{RaiseResolver, Resolution};
pub use store::{Analyzer, PlanStore};
pub use well_known::{FamilySymbols, WellKnown, sibling_raise_name, well_known};
