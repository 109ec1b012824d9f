//! Errors that abort analysis.
//!
//! Malformed-but-parseable input never ends up here; it is reported as a
//! [`Diagnostic`](crate::analysis::Diagnostic) on the plan instead. These
//! variants cover inputs that a sound type system cannot produce.

use thiserror::Error;

use crate::model::TypeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Walking base types came back to a type already visited.
    #[error("base type chain of `{0}` is cyclic")]
    CyclicBaseChain(TypeId),

    /// A plan was requested for a type the graph does not contain.
    #[error("type `{0}` is not part of the type graph")]
    UnknownType(TypeId),
}

/// A bad value in the host-supplied analyzer options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value `{value}` for option `{key}`: expected {expected}")]
pub struct ConfigError {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
