//! Error types for presenter declaration and presentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for declaring presenters.
pub type DeclarationResult<T> = Result<T, DeclarationError>;

/// Result type for presenting values.
pub type PresentResult<T> = Result<T, PresentationError>;

/// Raised while a presenter is being declared. Always a programming mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// An alias names an output key another exposure already uses.
    #[error("alias {alias:?} collides with another exposure")]
    AliasCollision { alias: String },

    /// An exposure's own name is already taken as another exposure's alias.
    #[error("exposure {name:?} collides with the alias of exposure {alias_of:?}")]
    KeyCollision { name: String, alias_of: String },
}

/// Raised while presenting a value.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// No presenter, serializer or passthrough rule applies to a stateful value.
    #[error("no presenter found for {object}")]
    NoPresenter { object: String },

    /// A delegated exposure names an attribute the subject does not have.
    #[error("can't expose {name} -- no such attribute exists")]
    MissingAttribute { name: String, type_name: String },

    /// Recursion went deeper than the configured limit; usually a cyclic object graph.
    #[error("presentation exceeded the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// An exposure callback, presenter method or serializer failed.
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

impl PresentationError {
    /// Recovers a `PresentationError` that travelled through a callback's
    /// `anyhow::Error`, wrapping anything else unmodified.
    pub(crate) fn from_callback(err: anyhow::Error) -> Self {
        match err.downcast::<PresentationError>() {
            Ok(err) => err,
            Err(err) => Self::Callback(err),
        }
    }
}

/// Errors loading a [`crate::RegistryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
