//! Presenter definitions and the declaration API used to build them.

use crate::error::{DeclarationError, DeclarationResult};
use crate::exposure::{Exposure, ExposureOptions, ExposureSource, ValueFn};
use crate::presenter::Presenter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use vitrine_model::{PresentOptions, Value};

/// The sealed, immutable set of exposures declared for one entity type.
///
/// Built with [`PresenterDefinition::build`] (or through
/// [`crate::PresenterRegistry::register`]); never instantiated directly.
/// Bind it to a subject with [`bind`](Self::bind) to get a [`Presenter`].
#[derive(Clone, Default)]
pub struct PresenterDefinition {
    exposures: Vec<Exposure>,
    methods: HashMap<String, ValueFn>,
}

impl PresenterDefinition {
    /// Evaluates `declare` against a fresh builder and seals the result.
    pub fn build<F>(declare: F) -> DeclarationResult<Self>
    where
        F: FnOnce(&mut PresenterBuilder) -> DeclarationResult<()>,
    {
        let mut builder = PresenterBuilder::default();
        declare(&mut builder)?;
        Ok(builder.finish())
    }

    /// Exposures in declaration order.
    pub fn exposures(&self) -> impl Iterator<Item = &Exposure> {
        self.exposures.iter()
    }

    #[must_use]
    pub fn exposure(&self, name: &str) -> Option<&Exposure> {
        self.exposures.iter().find(|exposure| exposure.name() == name)
    }

    pub(crate) fn method(&self, name: &str) -> Option<&ValueFn> {
        self.methods.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exposures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exposures.is_empty()
    }

    /// Creates a presenter for `subject` under `options`.
    #[must_use]
    pub fn bind<'a>(&'a self, subject: &'a Value, options: &'a PresentOptions) -> Presenter<'a> {
        self.bind_at(subject, options, 0)
    }

    pub(crate) fn bind_at<'a>(
        &'a self,
        subject: &'a Value,
        options: &'a PresentOptions,
        depth: usize,
    ) -> Presenter<'a> {
        Presenter::new(self, subject, options, depth)
    }
}

impl fmt::Debug for PresenterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterDefinition")
            .field("exposures", &self.exposures)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Declaration context for a presenter: the block passed to
/// [`crate::PresenterRegistry::register`] receives one of these.
///
/// A value source is fixed when an exposure is declared, with this precedence:
/// an explicit callback, then a presenter method of the same name, then
/// delegation to the subject's attribute of the same name. Declaring a
/// presenter method after a delegated exposure rebinds that exposure to it.
#[derive(Default)]
pub struct PresenterBuilder {
    definition: PresenterDefinition,
}

impl PresenterBuilder {
    /// Exposes the subject attribute (or presenter method) called `name`.
    pub fn expose(&mut self, name: impl Into<String>) -> DeclarationResult<&mut Self> {
        self.declare(name.into(), ExposureOptions::new(), None)
    }

    /// Exposes `name` with an alias and/or conditions.
    pub fn expose_with(
        &mut self,
        name: impl Into<String>,
        options: ExposureOptions,
    ) -> DeclarationResult<&mut Self> {
        self.declare(name.into(), options, None)
    }

    /// Exposes `name` with its value computed by `value_fn`.
    pub fn expose_fn<F>(
        &mut self,
        name: impl Into<String>,
        options: ExposureOptions,
        value_fn: F,
    ) -> DeclarationResult<&mut Self>
    where
        F: Fn(&Presenter<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.declare(name.into(), options, Some(Arc::new(value_fn)))
    }

    /// Exposes `name` only when the subject is not itself a collection member
    /// (defaults `unless: in_collection`; an explicit `unless` wins).
    pub fn expose_collection(
        &mut self,
        name: impl Into<String>,
        options: ExposureOptions,
    ) -> DeclarationResult<&mut Self> {
        self.declare(name.into(), options.for_collection(), None)
    }

    /// Collection exposure whose value is computed by `value_fn`.
    pub fn expose_collection_fn<F>(
        &mut self,
        name: impl Into<String>,
        options: ExposureOptions,
        value_fn: F,
    ) -> DeclarationResult<&mut Self>
    where
        F: Fn(&Presenter<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.declare(name.into(), options.for_collection(), Some(Arc::new(value_fn)))
    }

    /// Declares a presenter method: custom logic an exposure of the same name
    /// uses instead of delegating to the subject.
    pub fn method<F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
    where
        F: Fn(&Presenter<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        if let Some(exposure) = self
            .definition
            .exposures
            .iter_mut()
            .find(|exposure| exposure.name() == name && exposure.source().is_delegation())
        {
            debug!(exposure = %name, "Exposing via a new presenter method");
            exposure.set_source(ExposureSource::PresenterMethod(name.clone()));
        }
        self.definition.methods.insert(name, Arc::new(method));
        self
    }

    fn declare(
        &mut self,
        name: String,
        options: ExposureOptions,
        callback: Option<ValueFn>,
    ) -> DeclarationResult<&mut Self> {
        self.check_collisions(&name, &options)?;

        let previous = self
            .definition
            .exposures
            .iter()
            .position(|exposure| exposure.name() == name);

        let source = match callback {
            Some(callback) => ExposureSource::Callback(callback),
            None => match previous.map(|index| self.definition.exposures[index].source()) {
                Some(source @ ExposureSource::Callback(_)) => source.clone(),
                _ if self.definition.methods.contains_key(&name) => {
                    ExposureSource::PresenterMethod(name.clone())
                }
                _ => {
                    debug!(exposure = %name, "Generating a default delegation exposure");
                    ExposureSource::Delegation(name.clone())
                }
            },
        };

        debug!(exposure = %name, options = ?options, "Setting up exposure");
        let exposure = Exposure::new(name, source, options);
        match previous {
            Some(index) => self.definition.exposures[index] = exposure,
            None => self.definition.exposures.push(exposure),
        }
        Ok(self)
    }

    /// Output keys must stay unique. Re-declaring a name replaces it, so the
    /// exposure being redeclared never collides with itself.
    fn check_collisions(&self, name: &str, options: &ExposureOptions) -> DeclarationResult<()> {
        let others = self
            .definition
            .exposures
            .iter()
            .filter(|exposure| exposure.name() != name);

        for other in others {
            match options.alias_key() {
                Some(alias) if other.name() == alias || other.key() == alias => {
                    return Err(DeclarationError::AliasCollision {
                        alias: alias.to_string(),
                    });
                }
                None if other.key() == name => {
                    return Err(DeclarationError::KeyCollision {
                        name: name.to_string(),
                        alias_of: other.name().to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn finish(self) -> PresenterDefinition {
        self.definition
    }
}
