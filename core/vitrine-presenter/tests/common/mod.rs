//! Shared fixtures for the presenter integration tests.

#![allow(dead_code)]

use vitrine_model::{Attributes, ToValue, Value};
use vitrine_presenter::{ExposureOptions, PresenterRegistry};

#[derive(Debug, Clone)]
pub struct Part {
    pub serial: String,
    pub weight: u32,
}

impl Attributes for Part {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "serial" => Some(self.serial.to_value()),
            "weight" => Some(self.weight.to_value()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub id: i64,
    pub name: String,
    pub cost: Option<u32>,
    pub parts: Vec<Part>,
}

impl Attributes for Widget {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.to_value()),
            "name" => Some(self.name.to_value()),
            "cost" => Some(self.cost.to_value()),
            "parts" => Some(self.parts.iter().cloned().map(Value::object).collect()),
            _ => None,
        }
    }
}

/// A zero-sized entity: stateless, so it passes through without a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit;

impl Attributes for Unit {
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// A foreign value with no attributes, handled by serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    pub addr: [u8; 4],
    pub prefix: u8,
}

impl Cidr {
    pub fn render(&self) -> String {
        let [a, b, c, d] = self.addr;
        format!("{a}.{b}.{c}.{d}/{}", self.prefix)
    }

    /// The network address: host bits masked off.
    pub fn network(&self) -> String {
        let mask = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
        let network = u32::from_be_bytes(self.addr) & mask;
        std::net::Ipv4Addr::from(network).to_string()
    }
}

pub fn part(serial: &str, weight: u32) -> Part {
    Part {
        serial: serial.to_string(),
        weight,
    }
}

pub fn widget() -> Widget {
    Widget {
        id: 7,
        name: "gearbox".to_string(),
        cost: Some(120),
        parts: vec![part("G-1", 3), part("G-2", 5)],
    }
}

pub fn cidr() -> Cidr {
    Cidr {
        addr: [10, 0, 0, 0],
        prefix: 8,
    }
}

/// Builds a string-keyed map value from literal pairs.
pub fn map<V: Into<Value>>(pairs: impl IntoIterator<Item = (&'static str, V)>) -> Value {
    Value::Map(pairs.into_iter().collect())
}

/// A registry with presenters for [`Widget`] and [`Part`].
///
/// `Widget` hides `cost` unless `internal` is set; `Part` hides `serial` when
/// presented as a collection member.
pub fn catalog_registry() -> PresenterRegistry {
    let mut registry = PresenterRegistry::new();
    registry
        .presenter_for::<Widget>(|p| {
            p.expose("id")?.expose("name")?;
            p.expose_with("cost", ExposureOptions::new().only_if("internal"))?;
            p.expose("parts")?;
            Ok(())
        })
        .unwrap();
    registry
        .presenter_for::<Part>(|p| {
            p.expose_collection("serial", ExposureOptions::new())?;
            p.expose("weight")?;
            Ok(())
        })
        .unwrap();
    registry
}
