//! Declarative presenters for vitrine.
//!
//! A presenter declares which fields of an entity appear in its external
//! representation. Fields are "exposures": each one is named, may be aliased,
//! may be conditional on a render-time option, and takes its value from a
//! callback, a presenter method or the entity's own attribute.
//!
//! The [`PresenterRegistry`] maps entity types to presenters and to fallback
//! serializers, and presents any [`Value`]:
//! 1. a presenter registered for the value's exact type, then for its type name
//! 2. a serializer registered for the exact type, then for the type name
//! 3. stateless values (scalars, zero-sized objects) pass through unchanged
//!
//! Exposed values are presented recursively through the same registry, so
//! nested entities, lists and maps come out fully presented.
//!
//! ```
//! use vitrine_presenter::{ExposureOptions, PresenterRegistry};
//! use vitrine_model::{PresentOptions, Record, Value};
//!
//! let mut registry = PresenterRegistry::new();
//! registry
//!     .register("Widget", |p| {
//!         p.expose("name")?;
//!         p.expose_with("cost", ExposureOptions::new().only_if("internal"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let widget = Record::new("Widget").with("name", "gear").with("cost", 12).into_value();
//! let public = registry.present(&widget, &PresentOptions::new()).unwrap();
//! assert_eq!(public.get("name"), Some(&Value::from("gear")));
//! assert_eq!(public.get("cost"), None);
//! ```

mod config;
mod definition;
mod error;
mod exposure;
mod presenter;
mod registry;

pub use config::{DEFAULT_MAX_DEPTH, RegistryConfig};
pub use definition::{PresenterBuilder, PresenterDefinition};
pub use error::{
    ConfigError, DeclarationError, DeclarationResult, PresentResult, PresentationError,
};
pub use exposure::{Exposure, ExposureOptions, ExposureSource, ValueFn};
pub use presenter::Presenter;
pub use registry::{Presentation, PresenterRegistry, SerializeFn};

pub use vitrine_model::{IN_COLLECTION, Object, PresentOptions, TypeKey, Value, ValueMap};
