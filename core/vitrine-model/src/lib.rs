//! Dynamic value model for vitrine.
//!
//! Presenters run over values whose shape is only known at runtime. This
//! crate defines the types every other vitrine crate speaks:
//! - [`Value`]: a scalar, a container, or a shared [`Object`] handle
//! - [`Object`]: any Rust value, tagged with its runtime type token and name
//! - [`Attributes`]: lets an entity expose named attributes to delegated exposures
//! - [`Record`]: a named attribute bag, for entities without a dedicated Rust type
//! - [`PresentOptions`]: the render-time option bag, including the reserved
//!   `in_collection` flag
//! - [`TypeKey`]: a type token or a type-name string, used as a registry key

mod convert;
mod object;
mod options;
mod record;
mod type_key;
mod value;

pub use convert::ToValue;
pub use object::{Attributes, Object};
pub use options::{IN_COLLECTION, PresentOptions};
pub use record::Record;
pub use type_key::TypeKey;
pub use value::{Symbol, Value, ValueMap};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur converting values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
