//! Render-time presentation options.

use crate::value::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Name of the reserved option set while presenting collection members.
pub const IN_COLLECTION: &str = "in_collection";

static TRUE: Value = Value::Bool(true);
static FALSE: Value = Value::Bool(false);

/// An open, string-keyed bag of render-time options.
///
/// `in_collection` is reserved: it lives in its own field, is set only by the
/// registry while presenting collection members, and once set is never
/// cleared. Attempts to insert it as an ordinary key are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentOptions {
    values: BTreeMap<String, Value>,
    in_collection: bool,
}

impl PresentOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an option, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if key == IN_COLLECTION {
            warn!("Ignoring attempt to set reserved option `{}` directly", IN_COLLECTION);
            return None;
        }
        self.values.insert(key, value.into())
    }

    /// Returns an option's value. `in_collection` always reads as a boolean.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == IN_COLLECTION {
            return Some(if self.in_collection { &TRUE } else { &FALSE });
        }
        self.values.get(key)
    }

    /// Whether the option is present and truthy.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_truthy)
    }

    /// Whether the current object is being presented as a collection member.
    #[must_use]
    pub fn in_collection(&self) -> bool {
        self.in_collection
    }

    /// Marks these options as belonging to a collection member.
    /// Only the presenter registry should call this.
    #[doc(hidden)]
    #[must_use]
    pub fn mark_in_collection(mut self) -> Self {
        self.in_collection = true;
        self
    }

    /// Iterates the ordinary (non-reserved) options.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.in_collection
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PresentOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_falsy_options_are_unset() {
        let options = PresentOptions::new()
            .with("financial", false)
            .with("nothing", Value::Null)
            .with("count", 0);

        assert!(!options.is_set("financial"));
        assert!(!options.is_set("nothing"));
        assert!(!options.is_set("missing"));
        assert!(options.is_set("count"));
    }

    #[test]
    fn reserved_key_cannot_be_set_directly() {
        let options = PresentOptions::new().with(IN_COLLECTION, true);
        assert!(!options.in_collection());
        assert!(!options.is_set(IN_COLLECTION));
        assert_eq!(options.len(), 0);
    }

    #[test]
    fn in_collection_reads_as_an_option() {
        let options = PresentOptions::new().mark_in_collection();
        assert!(options.is_set(IN_COLLECTION));
        assert_eq!(options.get(IN_COLLECTION), Some(&Value::Bool(true)));
    }

    #[test]
    fn in_collection_survives_later_options() {
        let options = PresentOptions::new()
            .mark_in_collection()
            .with("internal", true);
        assert!(options.in_collection());
        assert!(options.is_set("internal"));
    }
}
