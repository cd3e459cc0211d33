//! Exposures: the declared output fields of a presenter.

use crate::presenter::Presenter;
use std::fmt;
use std::sync::Arc;
use vitrine_model::{IN_COLLECTION, PresentOptions, Value};

/// A custom value function: an exposure callback or a presenter method.
///
/// Receives the presenter instance, so it can read the subject and the
/// render-time options.
pub type ValueFn = Arc<dyn Fn(&Presenter<'_>) -> anyhow::Result<Value> + Send + Sync>;

/// Where an exposure's raw value comes from. Resolved once, at declaration.
#[derive(Clone)]
pub enum ExposureSource {
    /// An explicit callback given with the exposure.
    Callback(ValueFn),
    /// A presenter method of the same name declared on the definition.
    PresenterMethod(String),
    /// The subject's attribute of the same name.
    Delegation(String),
}

impl ExposureSource {
    #[must_use]
    pub fn is_delegation(&self) -> bool {
        matches!(self, Self::Delegation(_))
    }
}

impl fmt::Debug for ExposureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback"),
            Self::PresenterMethod(name) => f.debug_tuple("PresenterMethod").field(name).finish(),
            Self::Delegation(name) => f.debug_tuple("Delegation").field(name).finish(),
        }
    }
}

/// Declaration options for an exposure.
///
/// `if` and `unless` conditions are evaluated independently: the exposure is
/// skipped when either one triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureOptions {
    alias: Option<String>,
    if_option: Option<String>,
    unless_option: Option<String>,
}

impl ExposureOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Output key to use instead of the exposure name (`as:`).
    #[must_use]
    pub fn alias(mut self, key: impl Into<String>) -> Self {
        self.alias = Some(key.into());
        self
    }

    /// Only expose when the named render-time option is truthy (`if:`).
    #[must_use]
    pub fn only_if(mut self, option: impl Into<String>) -> Self {
        self.if_option = Some(option.into());
        self
    }

    /// Skip the exposure when the named render-time option is truthy (`unless:`).
    #[must_use]
    pub fn unless(mut self, option: impl Into<String>) -> Self {
        self.unless_option = Some(option.into());
        self
    }

    #[must_use]
    pub fn alias_key(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub fn if_option(&self) -> Option<&str> {
        self.if_option.as_deref()
    }

    #[must_use]
    pub fn unless_option(&self) -> Option<&str> {
        self.unless_option.as_deref()
    }

    /// Collection exposures default to `unless: in_collection`; an explicit
    /// `unless` wins.
    pub(crate) fn for_collection(mut self) -> Self {
        if self.unless_option.is_none() {
            self.unless_option = Some(IN_COLLECTION.to_string());
        }
        self
    }
}

/// One declared output field.
#[derive(Debug, Clone)]
pub struct Exposure {
    name: String,
    source: ExposureSource,
    options: ExposureOptions,
}

impl Exposure {
    pub(crate) fn new(name: String, source: ExposureSource, options: ExposureOptions) -> Self {
        Self { name, source, options }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source(&self) -> &ExposureSource {
        &self.source
    }

    pub(crate) fn set_source(&mut self, source: ExposureSource) {
        self.source = source;
    }

    #[must_use]
    pub fn options(&self) -> &ExposureOptions {
        &self.options
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.options.alias_key()
    }

    /// The output key: the alias if there is one, else the name.
    #[must_use]
    pub fn key(&self) -> &str {
        self.alias().unwrap_or(&self.name)
    }

    /// Whether the exposure should be left out under `options`.
    #[must_use]
    pub fn is_skipped(&self, options: &PresentOptions) -> bool {
        let unmet_if = self
            .options
            .if_option()
            .is_some_and(|option| !options.is_set(option));
        let met_unless = self
            .options
            .unless_option()
            .is_some_and(|option| options.is_set(option));
        unmet_if || met_unless
    }

    /// Options handed to the nested presentation of this exposure's value:
    /// the exposure's own declaration options, as symbols.
    #[must_use]
    pub fn render_options(&self) -> PresentOptions {
        let mut options = PresentOptions::new();
        if let Some(option) = self.options.if_option() {
            options.insert("if", Value::symbol(option));
        }
        if let Some(option) = self.options.unless_option() {
            options.insert("unless", Value::symbol(option));
        }
        if let Some(alias) = self.options.alias_key() {
            options.insert("as", Value::symbol(alias));
        }
        options
    }
}
