//! Registry keys: an exact type token or a type-name string.

use std::any::TypeId;
use std::fmt;

/// Identifies the entity type a presenter or serializer is registered for.
///
/// `Type` matches an exact runtime type. `Name` matches the runtime type
/// name instead, which lets a presenter be declared for a type the
/// registrant cannot (or does not want to) name in Rust, or for a
/// [`crate::Record`] by its declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Type { id: TypeId, name: &'static str },
    Name(String),
}

impl TypeKey {
    /// Key for the exact type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key for any value whose runtime type name is `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type { name, .. } => name,
            Self::Name(name) => name,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { name, .. } => write!(f, "{name}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
