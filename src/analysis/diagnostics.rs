//! Diagnostics: what the engine reports about the input.
//!
//! The engine picks a kind and an anchor. Wording is left to the host, which
//! keys its message catalogue on [`DiagnosticKind::code`].

use rustc_hash::FxHashSet;

use crate::base::Location;
use crate::model::Family;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
///
/// Nothing the engine reports is fatal: the plan is always complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Info,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }
}

/// Every situation the engine can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    PropertyNameInvalid,
    PropertyNameSameAsField,
    PropertyNameCollision,
    ChangedRaiseMethodUnusable,
    ChangedEventWithoutRaiseMethod,
    PropertyHookBadSignature,
    DependsOnWithoutNotify,
    DuplicateIsChanged,
    IsChangedNotBool,
    RaiseMethodOverriddenByUser,
    RaiseMethodNonVirtual,
    DependencyNotRaised,
    AnyHookBadSignature,
    AnyHookMissingOldAndNew,
    AnyHookNotCalled,
    ChangingEventWithoutRaiseMethod,
    ChangingRaiseMethodUnusable,
    DependencyCycle,
    DependsOnSelf,
}

impl DiagnosticKind {
    /// Stable identifier. Matched byte-for-byte by external tooling.
    pub const fn code(self) -> &'static str {
        match self {
            DiagnosticKind::PropertyNameInvalid => "INPC002",
            DiagnosticKind::PropertyNameSameAsField => "INPC003",
            DiagnosticKind::PropertyNameCollision => "INPC004",
            DiagnosticKind::ChangedRaiseMethodUnusable => "INPC006",
            DiagnosticKind::ChangedEventWithoutRaiseMethod => "INPC007",
            DiagnosticKind::PropertyHookBadSignature => "INPC009",
            DiagnosticKind::DependsOnWithoutNotify => "INPC011",
            DiagnosticKind::DuplicateIsChanged => "INPC016",
            DiagnosticKind::IsChangedNotBool => "INPC017",
            DiagnosticKind::RaiseMethodOverriddenByUser => "INPC021",
            DiagnosticKind::RaiseMethodNonVirtual => "INPC022",
            DiagnosticKind::DependencyNotRaised => "INPC023",
            DiagnosticKind::AnyHookBadSignature => "INPC024",
            DiagnosticKind::AnyHookMissingOldAndNew => "INPC025",
            DiagnosticKind::AnyHookNotCalled => "INPC026",
            DiagnosticKind::ChangingEventWithoutRaiseMethod => "INPC0028",
            DiagnosticKind::ChangingRaiseMethodUnusable => "INPC029",
            DiagnosticKind::DependencyCycle => "INPC030",
            DiagnosticKind::DependsOnSelf => "INPC031",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            DiagnosticKind::DependsOnSelf => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

/// One reported situation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Where the host should point.
    pub location: Location,
    /// Notification family the diagnostic is about, if it is about one.
    pub family: Option<Family>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            location,
            family: None,
        }
    }

    pub(crate) fn with_family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }

    /// Stable identifier of this diagnostic's kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics from the sub-resolutions of one type.
///
/// Two independent sub-resolutions can hit the same member and report the
/// same kind at the same place; only the first of those is kept.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(DiagnosticKind, Location)>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic unless an identical (kind, location) pair is present.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if self.seen.insert((diagnostic.kind, diagnostic.location)) {
            self.diagnostics.push(diagnostic);
        } else {
            tracing::trace!(
                code = diagnostic.code(),
                location = ?diagnostic.location,
                "dropping duplicate diagnostic"
            );
        }
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add(diagnostic);
        }
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the collector, returning diagnostics ordered by location.
    ///
    /// The sort is stable, so diagnostics at the same place keep the order
    /// in which the sub-resolutions reported them.
    pub fn finish(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.kind.cmp(&b.kind))
        });
        diagnostics
    }
}
