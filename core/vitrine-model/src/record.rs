use crate::object::Attributes;
use crate::value::Value;
use std::collections::BTreeMap;

/// A named bag of attributes.
///
/// Stands in for entities that have no dedicated Rust type. Its
/// [`Attributes::type_name`] is the name it was created with, so presenters
/// registered by name (`"Acme::Widget"`) pick it up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Wraps the record into a presentable [`Value::Object`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl Attributes for Record {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_stateless(&self) -> bool {
        self.fields.is_empty()
    }
}
