//! In-memory widget catalog served by the `vitrine-demo` binary.

use crate::{PresenterScope, Presented, WebError};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use vitrine_model::{Attributes, PresentOptions, ToValue, Value};
use vitrine_presenter::{DeclarationResult, ExposureOptions, PresenterRegistry, RegistryConfig};

#[derive(Debug, Clone)]
pub struct Part {
    pub serial: String,
    pub weight_grams: u32,
}

impl Attributes for Part {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "serial" => Some(self.serial.to_value()),
            "weight_grams" => Some(self.weight_grams.to_value()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub id: u32,
    pub name: String,
    pub unit_cost: Option<u32>,
    pub lead_time: Duration,
    pub parts: Vec<Part>,
}

impl Attributes for Widget {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.to_value()),
            "name" => Some(self.name.to_value()),
            "unit_cost" => Some(self.unit_cost.to_value()),
            "lead_time" => Some(Value::opaque(self.lead_time)),
            "parts" => Some(self.parts.iter().cloned().map(Value::object).collect()),
            _ => None,
        }
    }
}

/// Registers presenters for the catalog types.
///
/// Listings elide `parts`; `unit_cost` only appears with `internal` set.
pub fn register_presenters(registry: &mut PresenterRegistry) -> DeclarationResult<()> {
    registry.presenter_for::<Widget>(|p| {
        p.expose("id")?.expose("name")?;
        p.expose_with("unit_cost", ExposureOptions::new().alias("cost").only_if("internal"))?;
        p.expose("lead_time")?;
        p.expose_collection("parts", ExposureOptions::new())?;
        p.method("part_count", |presenter| {
            let parts = presenter.attribute("parts")?;
            Ok(parts.as_list().map_or(0, <[Value]>::len).to_value())
        });
        p.expose("part_count")?;
        Ok(())
    })?;
    registry.presenter_for::<Part>(|p| {
        p.expose("serial")?;
        p.expose_with("weight_grams", ExposureOptions::new().alias("weight"))?;
        Ok(())
    })?;
    registry.serializer_for::<Duration>(|duration| duration.as_secs().to_value());
    Ok(())
}

pub fn sample_widgets() -> Vec<Widget> {
    vec![
        Widget {
            id: 1,
            name: "gearbox".to_string(),
            unit_cost: Some(1200),
            lead_time: Duration::from_secs(86_400),
            parts: vec![
                Part {
                    serial: "GB-100".to_string(),
                    weight_grams: 340,
                },
                Part {
                    serial: "GB-101".to_string(),
                    weight_grams: 95,
                },
            ],
        },
        Widget {
            id: 2,
            name: "flywheel".to_string(),
            unit_cost: None,
            lead_time: Duration::from_secs(3 * 86_400),
            parts: Vec::new(),
        },
    ]
}

/// Shared state for the catalog routes.
pub struct Catalog {
    pub scope: PresenterScope,
    pub widgets: Vec<Value>,
}

impl Catalog {
    pub fn new(config: RegistryConfig, widgets: Vec<Widget>) -> DeclarationResult<Self> {
        let mut registry = PresenterRegistry::with_config(config);
        register_presenters(&mut registry)?;
        Ok(Self {
            scope: PresenterScope::new(registry),
            widgets: widgets.into_iter().map(Value::object).collect(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub internal: bool,
}

impl ViewQuery {
    fn options(&self) -> PresentOptions {
        PresentOptions::new().with("internal", self.internal)
    }
}

async fn list_widgets(
    State(catalog): State<Arc<Catalog>>,
    Query(query): Query<ViewQuery>,
) -> Result<Presented, WebError> {
    catalog
        .scope
        .present_collection(&catalog.widgets, &query.options())
}

async fn show_widget(
    State(catalog): State<Arc<Catalog>>,
    Path(index): Path<usize>,
    Query(query): Query<ViewQuery>,
) -> Result<Presented, WebError> {
    let widget = catalog
        .widgets
        .get(index)
        .ok_or_else(|| WebError::NotFound(format!("widget {index}")))?;
    catalog.scope.present(widget, &query.options())
}

/// Build the HTTP API router over the given catalog.
pub fn build_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/v1/widgets", get(list_widgets))
        .route("/api/v1/widgets/{index}", get(show_widget))
        .with_state(catalog)
}
