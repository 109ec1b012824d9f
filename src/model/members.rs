//! Members as reported by the host: existing source members and members
//! carrying generation annotations.

use smol_str::SmolStr;

use super::ids::{Family, TypeId};
use crate::base::Location;

/// Declared accessibility of a member or type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum Accessibility {
    Public,
    ProtectedInternal,
    Protected,
    Internal,
    PrivateProtected,
    #[default]
    Private,
}

impl Accessibility {
    /// Whether a member with this accessibility, declared on a base type,
    /// can be called or overridden from a derived type.
    pub fn visible_to_derived(self) -> bool {
        !matches!(self, Accessibility::Private)
    }
}

/// What sort of member an [`ExistingMember`] is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberKind {
    Method,
    Event,
    Property,
    Field,
}

/// Coarse classification of a parameter type, enough to recognise shapes.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParamType {
    /// `string`
    String,
    /// `object`
    Object,
    /// The event-args type of a notification family.
    EventArgs(Family),
    /// Anything else, by the host's display name.
    Named(SmolStr),
}

impl ParamType {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        ParamType::Named(name.into())
    }

    /// Whether this parameter can carry a value of type `ty`.
    pub(crate) fn accepts_value_of(&self, ty: &str) -> bool {
        match self {
            ParamType::Object => true,
            ParamType::String => matches!(ty, "string" | "System.String"),
            ParamType::Named(name) => name == ty,
            ParamType::EventArgs(_) => false,
        }
    }
}

/// Virtual-dispatch modifiers of a member.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct Modifiers {
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    pub is_static: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        is_virtual: false,
        is_abstract: false,
        is_override: false,
        is_sealed: false,
        is_static: false,
    };

    pub const VIRTUAL: Modifiers = Modifiers {
        is_virtual: true,
        ..Modifiers::NONE
    };

    pub const OVERRIDE: Modifiers = Modifiers {
        is_override: true,
        ..Modifiers::NONE
    };

    /// A derived type may override a member with these modifiers.
    pub fn is_overridable(self) -> bool {
        let dispatches = self.is_virtual || self.is_abstract || self.is_override;
        dispatches && !self.is_sealed && !self.is_static
    }
}

/// A method, event, property or field declared in source on some type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistingMember {
    /// Short member name. For explicit interface implementations this is the
    /// name without the interface qualifier.
    pub name: SmolStr,
    pub kind: MemberKind,
    /// Parameter types, for methods.
    pub params: Vec<ParamType>,
    /// Value type, for properties and fields.
    pub ty: Option<SmolStr>,
    pub accessibility: Accessibility,
    pub modifiers: Modifiers,
    /// Interface this member explicitly implements, if any.
    pub explicit_interface: Option<SmolStr>,
    pub declaring_type: TypeId,
    pub location: Location,
}

impl ExistingMember {
    /// A method with the given parameters, private and non-virtual.
    pub fn method(
        declaring_type: TypeId,
        name: impl Into<SmolStr>,
        params: impl IntoIterator<Item = ParamType>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            params: params.into_iter().collect(),
            ty: None,
            accessibility: Accessibility::Private,
            modifiers: Modifiers::NONE,
            explicit_interface: None,
            declaring_type,
            location,
        }
    }

    /// A public event.
    pub fn event(declaring_type: TypeId, name: impl Into<SmolStr>, location: Location) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Event,
            params: Vec::new(),
            ty: None,
            accessibility: Accessibility::Public,
            modifiers: Modifiers::NONE,
            explicit_interface: None,
            declaring_type,
            location,
        }
    }

    /// A public property.
    pub fn property(
        declaring_type: TypeId,
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            params: Vec::new(),
            ty: Some(ty.into()),
            accessibility: Accessibility::Public,
            modifiers: Modifiers::NONE,
            explicit_interface: None,
            declaring_type,
            location,
        }
    }

    /// A private field.
    pub fn field(
        declaring_type: TypeId,
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            params: Vec::new(),
            ty: Some(ty.into()),
            accessibility: Accessibility::Private,
            modifiers: Modifiers::NONE,
            explicit_interface: None,
            declaring_type,
            location,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_explicit_interface(mut self, interface: impl Into<SmolStr>) -> Self {
        self.explicit_interface = Some(interface.into());
        self
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// Explicit interface implementations cannot be called by simple name.
    pub fn is_explicit(&self) -> bool {
        self.explicit_interface.is_some()
    }
}

/// Whether an annotated member is a backing field or a hand-written property.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AnnotatedKind {
    Field,
    Property,
}

/// The notify annotation on a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyAnnotation {
    /// Explicit property name, bypassing name inference.
    pub name: Option<SmolStr>,
    pub location: Location,
}

/// A name-list annotation (`DependsOn`, `AlsoNotify`).
///
/// Names are kept raw: they may be missing, empty, duplicated or refer to
/// the member itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameListAnnotation {
    pub names: Vec<Option<SmolStr>>,
    pub location: Location,
}

impl NameListAnnotation {
    pub fn new<I, S>(names: I, location: Location) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            names: names.into_iter().map(|n| Some(n.into())).collect(),
            location,
        }
    }

    /// Names that are present and non-empty, in declaration order.
    pub fn usable_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.names
            .iter()
            .flatten()
            .filter(|name| !name.trim().is_empty())
    }
}

/// A field or property carrying generation annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedMember {
    /// Declared name: the field name, or the property's short name.
    pub name: SmolStr,
    pub kind: AnnotatedKind,
    /// Declared value type.
    pub ty: SmolStr,
    pub notify: Option<NotifyAnnotation>,
    pub depends_on: Vec<NameListAnnotation>,
    pub also_notify: Vec<NameListAnnotation>,
    /// Marks the member as the type's "is changed" flag.
    pub is_changed: Option<Location>,
    /// Explicit hook method names overriding `On{Property}Changed` /
    /// `On{Property}Changing`.
    pub changed_hook: Option<SmolStr>,
    pub changing_hook: Option<SmolStr>,
    /// Interface qualifier for explicitly implemented properties.
    pub explicit_interface: Option<SmolStr>,
    pub location: Location,
}

impl AnnotatedMember {
    /// A field with the notify annotation.
    pub fn notify_field(
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        location: Location,
    ) -> Self {
        Self {
            notify: Some(NotifyAnnotation { name: None, location }),
            ..Self::plain(name, AnnotatedKind::Field, ty, location)
        }
    }

    /// A field without the notify annotation (other annotations may follow).
    pub fn field(name: impl Into<SmolStr>, ty: impl Into<SmolStr>, location: Location) -> Self {
        Self::plain(name, AnnotatedKind::Field, ty, location)
    }

    /// A hand-written property.
    pub fn property(name: impl Into<SmolStr>, ty: impl Into<SmolStr>, location: Location) -> Self {
        Self::plain(name, AnnotatedKind::Property, ty, location)
    }

    fn plain(
        name: impl Into<SmolStr>,
        kind: AnnotatedKind,
        ty: impl Into<SmolStr>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty: ty.into(),
            notify: None,
            depends_on: Vec::new(),
            also_notify: Vec::new(),
            is_changed: None,
            changed_hook: None,
            changing_hook: None,
            explicit_interface: None,
            location,
        }
    }

    pub fn with_notify_name(mut self, name: impl Into<SmolStr>) -> Self {
        let location = self.notify.as_ref().map_or(self.location, |n| n.location);
        self.notify = Some(NotifyAnnotation {
            name: Some(name.into()),
            location,
        });
        self
    }

    pub fn depends_on<I, S>(mut self, names: I, location: Location) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.depends_on.push(NameListAnnotation::new(names, location));
        self
    }

    /// Add a `DependsOn` annotation whose names may be missing.
    pub fn depends_on_raw(mut self, names: Vec<Option<SmolStr>>, location: Location) -> Self {
        self.depends_on.push(NameListAnnotation { names, location });
        self
    }

    pub fn also_notify<I, S>(mut self, names: I, location: Location) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.also_notify.push(NameListAnnotation::new(names, location));
        self
    }

    pub fn marked_is_changed(mut self, location: Location) -> Self {
        self.is_changed = Some(location);
        self
    }

    pub fn with_explicit_interface(mut self, interface: impl Into<SmolStr>) -> Self {
        self.explicit_interface = Some(interface.into());
        self
    }

    pub fn with_hook(mut self, family: Family, name: impl Into<SmolStr>) -> Self {
        match family {
            Family::Changed => self.changed_hook = Some(name.into()),
            Family::Changing => self.changing_hook = Some(name.into()),
        }
        self
    }

    pub fn has_notify(&self) -> bool {
        self.notify.is_some()
    }

    /// A notify field becomes a generated property.
    pub fn is_generated(&self) -> bool {
        self.kind == AnnotatedKind::Field && self.has_notify()
    }

    pub fn hook_name(&self, family: Family) -> Option<&SmolStr> {
        match family {
            Family::Changed => self.changed_hook.as_ref(),
            Family::Changing => self.changing_hook.as_ref(),
        }
    }
}
