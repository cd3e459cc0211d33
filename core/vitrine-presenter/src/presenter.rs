//! Presenter instances: a definition bound to one subject for one render.

use crate::definition::PresenterDefinition;
use crate::error::{PresentResult, PresentationError};
use crate::exposure::{Exposure, ExposureSource};
use crate::registry::PresenterRegistry;
use std::any::Any;
use std::fmt;
use tracing::debug;
use vitrine_model::{PresentOptions, Value, ValueMap};

/// A facade over one subject, producing its representation.
///
/// Borrowed, read-only and short-lived: the subject and options are fixed for
/// the presenter's lifetime and `apply` can be called any number of times.
pub struct Presenter<'a> {
    definition: &'a PresenterDefinition,
    subject: &'a Value,
    options: &'a PresentOptions,
    depth: usize,
}

impl<'a> Presenter<'a> {
    pub(crate) fn new(
        definition: &'a PresenterDefinition,
        subject: &'a Value,
        options: &'a PresentOptions,
        depth: usize,
    ) -> Self {
        Self {
            definition,
            subject,
            options,
            depth,
        }
    }

    /// The object this presenter is a facade for.
    #[must_use]
    pub fn subject(&self) -> &'a Value {
        self.subject
    }

    /// The subject as its concrete Rust type, if it is an object of type `T`.
    #[must_use]
    pub fn subject_as<T: Any>(&self) -> Option<&'a T> {
        self.subject.as_object().and_then(|object| object.downcast_ref::<T>())
    }

    /// The render-time options.
    #[must_use]
    pub fn options(&self) -> &'a PresentOptions {
        self.options
    }

    /// Reads an attribute of the subject, as a delegated exposure would.
    pub fn attribute(&self, name: &str) -> PresentResult<Value> {
        self.subject
            .as_object()
            .and_then(|object| object.attribute(name))
            .ok_or_else(|| PresentationError::MissingAttribute {
                name: name.to_string(),
                type_name: self.subject.type_name().to_string(),
            })
    }

    /// True if the exposure is unknown or its conditions leave it out.
    #[must_use]
    pub fn skip_exposure(&self, name: &str) -> bool {
        self.definition
            .exposure(name)
            .is_none_or(|exposure| exposure.is_skipped(self.options))
    }

    /// Builds the representation: every exposure that is not skipped, in
    /// declaration order, with its value presented through `registry`.
    pub fn apply(&self, registry: &PresenterRegistry) -> PresentResult<Value> {
        let mut representation = ValueMap::with_capacity(self.definition.len());

        for exposure in self.definition.exposures() {
            if self.skip_exposure(exposure.name()) {
                continue;
            }
            debug!(exposure = exposure.name(), key = exposure.key(), "Presenting");
            let raw = self.raw_value(exposure)?;
            let value = registry.present_at(&raw, &exposure.render_options(), self.depth + 1)?;
            representation.insert(exposure.key(), value);
        }

        Ok(Value::Map(representation))
    }

    fn raw_value(&self, exposure: &Exposure) -> PresentResult<Value> {
        match exposure.source() {
            ExposureSource::Callback(callback) => {
                callback(self).map_err(PresentationError::from_callback)
            }
            ExposureSource::PresenterMethod(name) => match self.definition.method(name) {
                Some(method) => method(self).map_err(PresentationError::from_callback),
                None => self.attribute(name),
            },
            ExposureSource::Delegation(name) => self.attribute(name),
        }
    }
}

impl fmt::Debug for Presenter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Presenter for {:?}", self.subject)
    }
}
