//! Shared handles to entity and foreign-type instances.

use crate::value::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Exposes an entity's attributes by name.
///
/// This is what a delegated exposure calls: `expose("sku")` on a presenter
/// resolves to `subject.attribute("sku")` at render time. Returning `None`
/// means the entity has no such attribute, which fails the presentation.
pub trait Attributes: Any + Send + Sync + fmt::Debug {
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Name used for name-based registry lookups. Defaults to the Rust type path.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether this instance carries no internal state.
    /// Zero-sized types are stateless by default.
    fn is_stateless(&self) -> bool {
        std::mem::size_of_val(self) == 0
    }
}

type AttributeFn = fn(&(dyn Any + Send + Sync), &str) -> Option<Value>;
type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

fn attribute_of<T: Attributes>(inner: &(dyn Any + Send + Sync), name: &str) -> Option<Value> {
    inner.downcast_ref::<T>().and_then(|entity| entity.attribute(name))
}

fn debug_of<T: Any + fmt::Debug>(
    inner: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match inner.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<unknown>"),
    }
}

/// A cheaply cloneable, shared handle to any Rust value.
///
/// Carries the runtime type token and name the registry resolves against.
/// Cloning an `Object` never clones the value behind it, so two clones
/// compare equal by identity.
#[derive(Clone)]
pub struct Object {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: Arc<str>,
    stateless: bool,
    attributes: Option<AttributeFn>,
    debug: DebugFn,
}

impl Object {
    /// Wraps an entity whose attributes can be delegated to.
    pub fn new<T: Attributes>(entity: T) -> Self {
        let type_name: Arc<str> = Arc::from(entity.type_name());
        let stateless = entity.is_stateless();
        Self {
            inner: Arc::new(entity),
            type_id: TypeId::of::<T>(),
            type_name,
            stateless,
            attributes: Some(attribute_of::<T>),
            debug: debug_of::<T>,
        }
    }

    /// Wraps a foreign value that has no attributes, typically one handled by
    /// a serializer (addresses, timestamps, ids).
    pub fn opaque<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: Arc::from(std::any::type_name::<T>()),
            stateless: std::mem::size_of::<T>() == 0,
            attributes: None,
            debug: debug_of::<T>,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn is_stateless(&self) -> bool {
        self.stateless
    }

    /// Whether the wrapped value implements [`Attributes`].
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    /// Looks up an attribute on the wrapped entity.
    /// Always `None` for opaque objects.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .and_then(|attribute| attribute(self.inner.as_ref(), name))
    }

    /// Borrows the wrapped value as its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_ref().downcast_ref::<T>()
    }

    /// Identity comparison: true when both handles share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(self.inner.as_ref(), f)
    }
}
