//! The presenter registry: maps entity types to presenters and serializers,
//! and resolves which one applies to a value.

use crate::config::RegistryConfig;
use crate::definition::{PresenterBuilder, PresenterDefinition};
use crate::error::{DeclarationResult, PresentResult, PresentationError};
use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use vitrine_model::{PresentOptions, TypeKey, Value, ValueMap};

/// A fallback conversion for values that have no presenter.
pub type SerializeFn =
    Arc<dyn Fn(&Value, &Presentation<'_>) -> anyhow::Result<Value> + Send + Sync>;

/// Entries keyed both by exact type token and by type name.
#[derive(Clone)]
struct TypeMap<V> {
    by_type: HashMap<TypeId, V>,
    by_name: HashMap<String, V>,
}

impl<V> Default for TypeMap<V> {
    fn default() -> Self {
        Self {
            by_type: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<V> TypeMap<V> {
    fn insert(&mut self, key: TypeKey, value: V) -> Option<V> {
        match key {
            TypeKey::Type { id, .. } => self.by_type.insert(id, value),
            TypeKey::Name(name) => self.by_name.insert(name, value),
        }
    }

    fn get(&self, key: &TypeKey) -> Option<&V> {
        match key {
            TypeKey::Type { id, .. } => self.by_type.get(id),
            TypeKey::Name(name) => self.by_name.get(name),
        }
    }

    /// Exact type first, then type name.
    fn find(&self, value: &Value) -> Option<&V> {
        self.by_type
            .get(&value.type_id())
            .or_else(|| self.by_name.get(value.type_name()))
    }
}

/// Context handed to serializers, for presenting nested values.
pub struct Presentation<'a> {
    registry: &'a PresenterRegistry,
    options: &'a PresentOptions,
    depth: usize,
}

impl<'a> Presentation<'a> {
    /// Options of the value being serialized.
    #[must_use]
    pub fn options(&self) -> &'a PresentOptions {
        self.options
    }

    /// Presents a nested value one level deeper. Nested work must come through
    /// here so the depth limit keeps counting.
    pub fn present(&self, value: &Value, options: &PresentOptions) -> PresentResult<Value> {
        self.registry.present_at(value, options, self.depth + 1)
    }
}

/// Maps entity types to presenter definitions and fallback serializers.
///
/// Registration takes `&mut self`; presentation only reads. Share a fully
/// registered registry across threads behind an `Arc`. `Clone` copies both
/// maps (definitions and serializers themselves are shared), so a clone can
/// take further registrations without affecting the original.
#[derive(Clone)]
pub struct PresenterRegistry {
    presenters: TypeMap<Arc<PresenterDefinition>>,
    serializers: TypeMap<SerializeFn>,
    config: RegistryConfig,
}

impl Default for PresenterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenterRegistry {
    /// Creates a registry with the default container serializers and config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self {
            presenters: TypeMap::default(),
            serializers: TypeMap::default(),
            config,
        };
        registry.register_serializer(TypeKey::of::<Vec<Value>>(), serialize_list);
        registry.register_serializer(TypeKey::of::<ValueMap>(), serialize_map);
        registry
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ================================================================
    // Registration
    // ================================================================

    /// Declares the presenter for `key` by evaluating `declare` against a
    /// fresh definition. Replaces any presenter already registered for `key`.
    pub fn register<F>(&mut self, key: impl Into<TypeKey>, declare: F) -> DeclarationResult<()>
    where
        F: FnOnce(&mut PresenterBuilder) -> DeclarationResult<()>,
    {
        let definition = PresenterDefinition::build(declare)?;
        self.register_definition(key, definition);
        Ok(())
    }

    /// Declares the presenter for values of type `T`.
    pub fn presenter_for<T: Any>(
        &mut self,
        declare: impl FnOnce(&mut PresenterBuilder) -> DeclarationResult<()>,
    ) -> DeclarationResult<()> {
        self.register(TypeKey::of::<T>(), declare)
    }

    /// Stores an already built definition under `key`.
    pub fn register_definition(&mut self, key: impl Into<TypeKey>, definition: PresenterDefinition) {
        let key = key.into();
        debug!(key = %key, exposures = definition.len(), "Registering presenter");
        if self.presenters.insert(key.clone(), Arc::new(definition)).is_some() {
            debug!(key = %key, "Replaced existing presenter");
        }
    }

    /// Stores a fallback serializer for `key`, replacing any existing one.
    pub fn register_serializer<F>(&mut self, key: impl Into<TypeKey>, serializer: F)
    where
        F: Fn(&Value, &Presentation<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let key = key.into();
        debug!(key = %key, "Registering serializer");
        self.serializers.insert(key, Arc::new(serializer));
    }

    /// Serializes objects of type `T` with a plain reducer.
    pub fn serializer_for<T: Any>(&mut self, reducer: impl Fn(&T) -> Value + Send + Sync + 'static) {
        self.register_serializer(TypeKey::of::<T>(), move |value: &Value, _: &Presentation<'_>| {
            value
                .as_object()
                .and_then(|object| object.downcast_ref::<T>())
                .map(&reducer)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "serializer for {} received a {}",
                        std::any::type_name::<T>(),
                        value.type_name()
                    )
                })
        });
    }

    #[must_use]
    pub fn presenter_for_key(&self, key: &TypeKey) -> Option<&PresenterDefinition> {
        self.presenters.get(key).map(Arc::as_ref)
    }

    #[must_use]
    pub fn has_serializer(&self, key: &TypeKey) -> bool {
        self.serializers.get(key).is_some()
    }

    // ================================================================
    // Presentation
    // ================================================================

    /// Returns the representation of `value`.
    ///
    /// First match wins: a presenter for the exact type, a presenter for the
    /// type name, a serializer for the exact type, a serializer for the type
    /// name. Otherwise a stateless value is returned unchanged and anything
    /// else fails with [`PresentationError::NoPresenter`].
    pub fn present(&self, value: &Value, options: &PresentOptions) -> PresentResult<Value> {
        self.present_at(value, options, 0)
    }

    /// Presents every member of `collection` with `in_collection` set,
    /// preserving order and cardinality.
    pub fn present_collection<I>(&self, collection: I, options: &PresentOptions) -> PresentResult<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        let options = options.clone().mark_in_collection();
        collection
            .into_iter()
            .map(|member| self.present(member.borrow(), &options))
            .collect()
    }

    pub(crate) fn present_at(
        &self,
        value: &Value,
        options: &PresentOptions,
        depth: usize,
    ) -> PresentResult<Value> {
        if depth > self.config.max_depth {
            warn!(limit = self.config.max_depth, type_name = value.type_name(), "Presentation depth exceeded");
            return Err(PresentationError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        if let Some(definition) = self.presenters.find(value) {
            return definition.bind_at(value, options, depth).apply(self);
        }

        if let Some(serializer) = self.serializers.find(value) {
            let presentation = Presentation {
                registry: self,
                options,
                depth,
            };
            return serializer(value, &presentation).map_err(PresentationError::from_callback);
        }

        if self.passes_through(value) {
            return Ok(value.clone());
        }

        Err(PresentationError::NoPresenter {
            object: format!("{value:?}"),
        })
    }

    fn passes_through(&self, value: &Value) -> bool {
        match value {
            Value::Object(object) => self.config.passthrough_stateless && object.is_stateless(),
            other => other.is_stateless(),
        }
    }
}

impl fmt::Debug for PresenterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterRegistry")
            .field("presenters", &(self.presenters.by_type.len() + self.presenters.by_name.len()))
            .field("serializers", &(self.serializers.by_type.len() + self.serializers.by_name.len()))
            .field("config", &self.config)
            .finish()
    }
}

/// Default serializer for lists: presents every member as a collection member.
fn serialize_list(value: &Value, presentation: &Presentation<'_>) -> anyhow::Result<Value> {
    let Value::List(members) = value else {
        anyhow::bail!("list serializer received a {}", value.type_name());
    };
    let options = presentation.options().clone().mark_in_collection();
    let presented = members
        .iter()
        .map(|member| presentation.present(member, &options))
        .collect::<PresentResult<Vec<_>>>()?;
    Ok(Value::List(presented))
}

/// Default serializer for maps: presents every key and every value as
/// collection members.
fn serialize_map(value: &Value, presentation: &Presentation<'_>) -> anyhow::Result<Value> {
    let Value::Map(entries) = value else {
        anyhow::bail!("map serializer received a {}", value.type_name());
    };
    let options = presentation.options().clone().mark_in_collection();
    let mut presented = ValueMap::with_capacity(entries.len());
    for (key, member) in entries.iter() {
        let key = presentation.present(key, &options)?;
        let member = presentation.present(member, &options)?;
        presented.insert(key, member);
    }
    Ok(Value::Map(presented))
}
