//! # inpc-base
//!
//! Resolution engine for change-notification code generation.
//!
//! Given a read-only description of partial types (their annotated fields,
//! existing members and base chains), the engine decides for every type how
//! property changes are raised, which properties notify which, and what to
//! tell the user about code it cannot safely extend. Parsing the source and
//! emitting the generated code are left to the host.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis → raise mechanisms, dependency graph, plans, diagnostics
//!   ↓
//! model    → host input: TypeGraph, TypeDescriptor, members
//!   ↓
//! base     → Primitives (FileId, Location, TextRange)
//! ```
//!
//! ## Example
//!
//! ```
//! use inpc::base::Location;
//! use inpc::model::{AnnotatedMember, TypeDescriptor, TypeGraph, TypeId};
//! use inpc::{AnalysisOptions, Analyzer};
//!
//! let graph = TypeGraph::new().with(
//!     TypeDescriptor::partial(TypeId::new("SomeViewModel"), Location::at(0, 21, 34))
//!         .with_annotated(AnnotatedMember::notify_field(
//!             "_foo",
//!             "string",
//!             Location::at(0, 60, 64),
//!         )),
//! );
//!
//! let plans = Analyzer::new(AnalysisOptions::default()).analyze_all(&graph).unwrap();
//! assert_eq!(plans[0].properties[0].name, "Foo");
//! assert!(plans[0].diagnostics.is_empty());
//! ```

/// Foundation types: FileId, Location
pub mod base;

/// Host input model
pub mod model;

/// The resolution engine
pub mod analysis;

pub mod config;
pub mod error;

pub use analysis::{
    Analyzer, Diagnostic, DiagnosticKind, GenerationPlan, PlanStore, RaiseMechanism, Severity,
};
pub use config::{AnalysisOptions, Capitalization, NamingOptions};
pub use error::{AnalysisError, ConfigError, Result};
