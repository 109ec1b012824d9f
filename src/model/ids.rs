//! Type identities and notification families.

use std::fmt;

use smol_str::SmolStr;

/// Identity of a (possibly generic) type definition.
///
/// Two constructed types of the same definition (`A<int>`, `A<string>`)
/// share one `TypeId`: the name plus the generic arity.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeId {
    /// Fully qualified metadata name without the arity suffix.
    pub name: SmolStr,
    /// Number of generic type parameters.
    pub arity: u32,
}

impl TypeId {
    /// Identity of a non-generic type.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
        }
    }

    /// Identity of a generic type definition.
    pub fn generic(name: impl Into<SmolStr>, arity: u32) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({self})")
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arity == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "{}`{}", self.name, self.arity)
        }
    }
}

/// A reference to a constructed type, as written in a base-type list.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeRef {
    pub id: TypeId,
    /// Type arguments as the host printed them. Empty for non-generic types.
    pub args: Vec<SmolStr>,
}

impl TypeRef {
    pub fn new(id: TypeId) -> Self {
        Self { id, args: Vec::new() }
    }

    pub fn with_args(id: TypeId, args: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        Self {
            id,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TypeId> for TypeRef {
    fn from(id: TypeId) -> Self {
        Self::new(id)
    }
}

/// The two notification families a type can take part in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// Raised after a property value changed.
    Changed,
    /// Raised before a property value changes.
    Changing,
}

impl Family {
    /// Resolution order. "Changing" goes first because the "changed" raise
    /// method name may be derived from it.
    pub const RESOLUTION_ORDER: [Family; 2] = [Family::Changing, Family::Changed];

    /// Suffix used for per-property hook names (`On{Name}Changed`).
    pub fn hook_suffix(self) -> &'static str {
        match self {
            Family::Changed => "Changed",
            Family::Changing => "Changing",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::Changed => "changed",
            Family::Changing => "changing",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_display() {
        assert_eq!(TypeId::new("Foo").to_string(), "Foo");
        assert_eq!(TypeId::generic("A", 1).to_string(), "A`1");
    }

    #[test]
    fn test_constructed_types_share_identity() {
        let a = TypeRef::with_args(TypeId::generic("A", 1), ["string"]);
        let b = TypeRef::with_args(TypeId::generic("A", 1), ["int"]);

        assert_ne!(a, b);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_resolution_order_changing_first() {
        assert_eq!(Family::RESOLUTION_ORDER[0], Family::Changing);
    }
}
