//! Member signature matching.
//!
//! Given candidate members, a list of names in priority order and the
//! parameter shapes that are acceptable, pick the member to use or explain
//! why none can be used.
//!
//! The first name that has *any* candidate decides the outcome. A badly
//! shaped `OnPropertyChanged` therefore hides a well shaped
//! `RaisePropertyChanged` further down the list.

use smol_str::SmolStr;

use crate::model::{ExistingMember, Family, ParamType, TypeId};

/// A recognised parameter list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// `()`
    Parameterless,
    /// `(string propertyName)`
    Name,
    /// `(string propertyName, object oldValue)`
    NameOld,
    /// `(string propertyName, object oldValue, object newValue)`
    NameOldNew,
    /// `(XEventArgs args)`
    EventArgs,
    /// `(XEventArgs args, object oldValue)`
    EventArgsOld,
    /// `(XEventArgs args, object oldValue, object newValue)`
    EventArgsOldNew,
    /// `(T oldValue, T newValue)`
    OldNew,
}

impl Shape {
    /// Shapes accepted for a "changed" raise method, in priority order.
    pub const RAISE_CHANGED: &'static [Shape] = &[
        Shape::Name,
        Shape::NameOldNew,
        Shape::EventArgs,
        Shape::EventArgsOldNew,
    ];

    /// Shapes accepted for a "changing" raise method. Only the old value
    /// exists before the change.
    pub const RAISE_CHANGING: &'static [Shape] = &[
        Shape::Name,
        Shape::NameOld,
        Shape::EventArgs,
        Shape::EventArgsOld,
    ];

    /// Shapes accepted for the any-property hook.
    pub const ANY_PROPERTY_HOOK: &'static [Shape] = &[Shape::Name, Shape::NameOldNew];

    /// Shapes accepted for a per-property hook.
    pub const PROPERTY_HOOK: &'static [Shape] = &[Shape::Parameterless, Shape::OldNew];

    pub fn raise_method(family: Family) -> &'static [Shape] {
        match family {
            Family::Changed => Shape::RAISE_CHANGED,
            Family::Changing => Shape::RAISE_CHANGING,
        }
    }

    /// Whether callers pass old and new values.
    pub fn has_old_and_new(self) -> bool {
        matches!(self, Shape::NameOldNew | Shape::EventArgsOldNew | Shape::OldNew)
    }

    /// Whether callers pass the old value.
    pub fn has_old_value(self) -> bool {
        self.has_old_and_new() || matches!(self, Shape::NameOld | Shape::EventArgsOld)
    }

    fn matches(self, params: &[ParamType], family: Family, value_type: Option<&str>) -> bool {
        let is_value = |p: &ParamType| match value_type {
            Some(ty) => p.accepts_value_of(ty),
            None => *p == ParamType::Object,
        };
        let is_args = |p: &ParamType| *p == ParamType::EventArgs(family);

        match (self, params) {
            (Shape::Parameterless, []) => true,
            (Shape::Name, [name]) => *name == ParamType::String,
            (Shape::NameOld, [name, old]) => *name == ParamType::String && is_value(old),
            (Shape::NameOldNew, [name, old, new]) => {
                *name == ParamType::String && is_value(old) && is_value(new)
            }
            (Shape::EventArgs, [args]) => is_args(args),
            (Shape::EventArgsOld, [args, old]) => is_args(args) && is_value(old),
            (Shape::EventArgsOldNew, [args, old, new]) => {
                is_args(args) && is_value(old) && is_value(new)
            }
            (Shape::OldNew, [old, new]) => is_value(old) && is_value(new),
            _ => false,
        }
    }
}

/// Outcome of a member search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// One usable member.
    Unique(&'a ExistingMember, Shape),
    /// No candidate carries any of the names.
    NoneFound,
    /// Candidates with the first matching name exist, but some have shapes
    /// that are not recognised.
    AmbiguousBadSignature(Vec<&'a ExistingMember>),
    /// Candidates with the first matching name are well shaped but cannot be
    /// reached from the type being generated.
    InaccessibleOnly(Vec<&'a ExistingMember>),
}

impl MatchResult<'_> {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            MatchResult::AmbiguousBadSignature(_) | MatchResult::InaccessibleOnly(_)
        )
    }
}

/// Matches members against shape templates on behalf of one generated type.
#[derive(Clone, Debug)]
pub struct Matcher<'s> {
    shapes: &'s [Shape],
    family: Family,
    /// Type the generated code lives in. Private members are only usable
    /// when declared here.
    generating: &'s TypeId,
    /// Type of the old/new values, for per-property hooks.
    value_type: Option<&'s str>,
}

impl<'s> Matcher<'s> {
    pub fn new(shapes: &'s [Shape], family: Family, generating: &'s TypeId) -> Self {
        Self {
            shapes,
            family,
            generating,
            value_type: None,
        }
    }

    /// Accept old/new parameters typed as `ty` as well as `object`.
    pub fn with_value_type(mut self, ty: &'s str) -> Self {
        self.value_type = Some(ty);
        self
    }

    /// The first accepted shape this member has, if any.
    pub fn shape_of(&self, member: &ExistingMember) -> Option<Shape> {
        if !member.is_method() || member.modifiers.is_static {
            return None;
        }
        self.shapes
            .iter()
            .copied()
            .find(|s| s.matches(&member.params, self.family, self.value_type))
    }

    fn is_accessible(&self, member: &ExistingMember) -> bool {
        &member.declaring_type == self.generating || member.accessibility.visible_to_derived()
    }

    /// Search `candidates` for the names in priority order.
    pub fn find<'a, I>(&self, candidates: I, names: &[SmolStr]) -> MatchResult<'a>
    where
        I: IntoIterator<Item = &'a ExistingMember>,
        I::IntoIter: Clone,
    {
        let candidates = candidates.into_iter();

        for name in names {
            let named: Vec<&'a ExistingMember> = candidates
                .clone()
                .filter(|m| m.is_method() && !m.is_explicit() && &m.name == name)
                .collect();
            if named.is_empty() {
                continue;
            }

            let mut best: Option<(&'a ExistingMember, Shape, usize)> = None;
            let mut all_shaped = true;
            for &member in &named {
                let Some(shape) = self.shape_of(member) else {
                    all_shaped = false;
                    continue;
                };
                if !self.is_accessible(member) {
                    continue;
                }
                let rank = self.shapes.iter().position(|s| *s == shape).unwrap_or(usize::MAX);
                if best.is_none_or(|(_, _, r)| rank < r) {
                    best = Some((member, shape, rank));
                }
            }

            tracing::trace!(
                %name,
                candidates = named.len(),
                found = best.is_some(),
                "matched raise candidates"
            );

            return match best {
                Some((member, shape, _)) => MatchResult::Unique(member, shape),
                None if all_shaped => MatchResult::InaccessibleOnly(named),
                None => MatchResult::AmbiguousBadSignature(named),
            };
        }

        MatchResult::NoneFound
    }
}
