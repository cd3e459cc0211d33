//! axum integration for vitrine presenters.
//!
//! An application holds one [`PresenterScope`]; sub-applications derive
//! their own with [`PresenterScope::child`], which copies the parent's
//! registrations so later ones stay local to the child. Handlers call
//! [`PresenterScope::present`] or [`PresenterScope::present_collection`]
//! and return the resulting [`Presented`] (or [`WebError`]) directly.

pub mod demo;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use vitrine_model::{PresentOptions, Value};
use vitrine_presenter::{DeclarationResult, PresentationError, PresenterRegistry};

/// Errors raised while answering a request.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Presentation(#[from] PresentationError),

    #[error("failed to encode representation: {0}")]
    Encoding(#[from] vitrine_model::Error),

    #[error("{0} not found")]
    NotFound(String),
}

/// Error body sent for any failure to present a response.
pub const PRESENTATION_FAILED: &str = "failed to present response";

/// JSON body of an error response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // Presentation errors can quote the subject; only the log sees them.
        let (status, error) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Presentation(_) | Self::Encoding(_) => {
                warn!(error = %self, "Failed to present response");
                (StatusCode::INTERNAL_SERVER_ERROR, PRESENTATION_FAILED.to_string())
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// A presented representation, ready to be sent as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Presented(serde_json::Value);

impl Presented {
    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

impl IntoResponse for Presented {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// One application scope's presenter registry.
///
/// Cheap to clone: clones share the same registry. Use [`child`](Self::child)
/// for an independent copy.
#[derive(Clone, Debug, Default)]
pub struct PresenterScope {
    registry: Arc<PresenterRegistry>,
}

impl PresenterScope {
    pub fn new(registry: PresenterRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &PresenterRegistry {
        &self.registry
    }

    /// Derives a scope that starts from this scope's registrations.
    /// Registrations made by `extend` never reach the parent.
    pub fn child<F>(&self, extend: F) -> DeclarationResult<Self>
    where
        F: FnOnce(&mut PresenterRegistry) -> DeclarationResult<()>,
    {
        let mut registry = PresenterRegistry::clone(&self.registry);
        extend(&mut registry)?;
        Ok(Self::new(registry))
    }

    pub fn present(&self, value: &Value, options: &PresentOptions) -> Result<Presented, WebError> {
        debug!(type_name = value.type_name(), "Presenting response");
        let representation = self.registry.present(value, options)?;
        Ok(Presented(representation.to_json()?))
    }

    pub fn present_collection<I>(
        &self,
        collection: I,
        options: &PresentOptions,
    ) -> Result<Presented, WebError>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        let members = self.registry.present_collection(collection, options)?;
        debug!(members = members.len(), "Presenting collection response");
        Ok(Presented(Value::List(members).to_json()?))
    }
}
