mod common;

use common::{Cidr, Unit, Widget, catalog_registry, cidr, map, part, widget};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vitrine_model::{Object, PresentOptions, Record, TypeKey, Value, ValueMap};
use vitrine_presenter::{
    DeclarationError, ExposureOptions, PresentationError, PresenterRegistry, RegistryConfig,
};

// ── Registration ─────────────────────────────────────────────────

#[test]
fn registering_twice_keeps_the_latest_presenter() {
    let mut registry = PresenterRegistry::new();
    registry
        .presenter_for::<Widget>(|p| {
            p.expose("id")?;
            Ok(())
        })
        .unwrap();
    registry
        .presenter_for::<Widget>(|p| {
            p.expose("name")?;
            Ok(())
        })
        .unwrap();

    let presented = registry
        .present(&Value::object(widget()), &PresentOptions::new())
        .unwrap();
    assert_eq!(presented, map([("name", "gearbox")]));
}

#[test]
fn registering_with_colliding_alias_fails_and_registers_nothing() {
    let mut registry = PresenterRegistry::new();
    let err = registry
        .presenter_for::<Widget>(|p| {
            p.expose("id")?;
            p.expose_with("name", ExposureOptions::new().alias("id"))?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err, DeclarationError::AliasCollision { alias: "id".into() });
    assert!(registry.presenter_for_key(&TypeKey::of::<Widget>()).is_none());
}

#[test]
fn inspection_reports_registered_keys() {
    let mut registry = catalog_registry();
    registry.serializer_for::<Cidr>(|c| Value::from(c.render()));

    assert!(registry.presenter_for_key(&TypeKey::of::<Widget>()).is_some());
    assert!(registry.presenter_for_key(&TypeKey::named("Widget")).is_none());
    assert_eq!(
        registry
            .presenter_for_key(&TypeKey::of::<Widget>())
            .map(|definition| definition.len()),
        Some(4)
    );
    assert!(registry.has_serializer(&TypeKey::of::<Cidr>()));
    assert!(registry.has_serializer(&TypeKey::of::<Vec<Value>>()));
    assert!(registry.has_serializer(&TypeKey::of::<ValueMap>()));
    assert!(!registry.has_serializer(&TypeKey::of::<Widget>()));
}

#[test]
fn cloned_registry_takes_registrations_independently() {
    let original = PresenterRegistry::new();
    let mut extended = original.clone();
    extended.serializer_for::<Cidr>(|c| Value::from(c.render()));

    let value = Value::opaque(cidr());
    assert!(extended.present(&value, &PresentOptions::new()).is_ok());
    assert!(original.present(&value, &PresentOptions::new()).is_err());
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn presents_a_registered_entity_with_nested_members() {
    let registry = catalog_registry();
    let presented = registry
        .present(&Value::object(widget()), &PresentOptions::new())
        .unwrap();

    let parts = Value::List(vec![map([("weight", 3)]), map([("weight", 5)])]);
    let mut expected = ValueMap::new();
    expected.insert("id", 7);
    expected.insert("name", "gearbox");
    expected.insert("parts", parts);
    assert_eq!(presented, Value::Map(expected));
}

#[test]
fn caller_options_unlock_conditional_exposures() {
    let registry = catalog_registry();
    let options = PresentOptions::new().with("internal", true);
    let presented = registry.present(&Value::object(widget()), &options).unwrap();

    assert_eq!(presented.get("cost"), Some(&Value::Int(120)));
}

#[test]
fn exposes_false_and_null_values() {
    let registry = catalog_registry();
    let mut free = widget();
    free.cost = None;
    let options = PresentOptions::new().with("internal", true);

    let presented = registry.present(&Value::object(free), &options).unwrap();
    assert_eq!(presented.get("cost"), Some(&Value::Null));
}

#[test]
fn exact_type_presenter_beats_name_presenter() {
    let mut registry = PresenterRegistry::new();
    registry
        .register(std::any::type_name::<Widget>(), |p| {
            p.expose_fn("via", ExposureOptions::new(), |_| Ok(Value::from("name")))?;
            Ok(())
        })
        .unwrap();

    let value = Value::object(widget());
    let presented = registry.present(&value, &PresentOptions::new()).unwrap();
    assert_eq!(presented, map([("via", "name")]));

    registry
        .presenter_for::<Widget>(|p| {
            p.expose_fn("via", ExposureOptions::new(), |_| Ok(Value::from("type")))?;
            Ok(())
        })
        .unwrap();
    let presented = registry.present(&value, &PresentOptions::new()).unwrap();
    assert_eq!(presented, map([("via", "type")]));
}

#[test]
fn presenter_beats_serializer() {
    let mut registry = PresenterRegistry::new();
    registry.serializer_for::<Widget>(|w| Value::from(w.id));
    registry
        .presenter_for::<Widget>(|p| {
            p.expose("name")?;
            Ok(())
        })
        .unwrap();

    let presented = registry
        .present(&Value::object(widget()), &PresentOptions::new())
        .unwrap();
    assert_eq!(presented, map([("name", "gearbox")]));
}

#[test]
fn serializers_resolve_by_type_then_by_name() {
    let mut registry = PresenterRegistry::new();
    registry.register_serializer(std::any::type_name::<Cidr>(), |value, _| {
        let cidr = value
            .as_object()
            .and_then(Object::downcast_ref::<Cidr>)
            .ok_or_else(|| anyhow::anyhow!("not a cidr"))?;
        Ok(Value::from(cidr.network()))
    });

    let value = Value::opaque(Cidr {
        addr: [127, 0, 0, 1],
        prefix: 24,
    });
    assert_eq!(
        registry.present(&value, &PresentOptions::new()).unwrap(),
        Value::from("127.0.0.0")
    );

    registry.serializer_for::<Cidr>(|c| Value::from(c.render()));
    assert_eq!(
        registry.present(&value, &PresentOptions::new()).unwrap(),
        Value::from("127.0.0.1/24")
    );
}

#[test]
fn network_serializer_masks_host_bits() {
    let mut registry = PresenterRegistry::new();
    registry.serializer_for::<Cidr>(|c| Value::from(c.network()));

    let present = |addr, prefix| {
        registry
            .present(&Value::opaque(Cidr { addr, prefix }), &PresentOptions::new())
            .unwrap()
    };
    assert_eq!(present([127, 0, 0, 1], 24), Value::from("127.0.0.0"));
    assert_eq!(present([192, 168, 77, 200], 20), Value::from("192.168.64.0"));
    assert_eq!(present([10, 1, 2, 3], 32), Value::from("10.1.2.3"));
    assert_eq!(present([10, 1, 2, 3], 0), Value::from("0.0.0.0"));
}

#[test]
fn records_resolve_by_declared_name() {
    let mut registry = PresenterRegistry::new();
    registry
        .register("Acme::Invoice", |p| {
            p.expose_with("number", ExposureOptions::new().alias("invoice_number"))?;
            Ok(())
        })
        .unwrap();

    let invoice = Record::new("Acme::Invoice")
        .with("number", "INV-12")
        .with("secret", "hunter2")
        .into_value();
    let presented = registry.present(&invoice, &PresentOptions::new()).unwrap();
    assert_eq!(presented, map([("invoice_number", "INV-12")]));
}

// ── Passthrough ──────────────────────────────────────────────────

#[test]
fn scalars_pass_through_unchanged() {
    let registry = PresenterRegistry::new();
    let options = PresentOptions::new();

    for value in [
        Value::Null,
        Value::Bool(false),
        Value::Int(42),
        Value::Float(2.5),
        Value::from("plain text"),
        Value::symbol("status"),
    ] {
        assert_eq!(registry.present(&value, &options).unwrap(), value);
    }
}

#[test]
fn stateless_objects_pass_through_by_identity() {
    let registry = PresenterRegistry::new();
    let value = Value::object(Unit);

    let presented = registry.present(&value, &PresentOptions::new()).unwrap();
    let (Some(before), Some(after)) = (value.as_object(), presented.as_object()) else {
        panic!("expected the object back, got {presented:?}");
    };
    assert!(before.ptr_eq(after));
}

#[test]
fn stateless_passthrough_can_be_disabled() {
    let config = RegistryConfig {
        passthrough_stateless: false,
        ..RegistryConfig::default()
    };
    let registry = PresenterRegistry::with_config(config);

    let err = registry
        .present(&Value::object(Unit), &PresentOptions::new())
        .unwrap_err();
    assert!(matches!(err, PresentationError::NoPresenter { .. }));
    assert_eq!(
        registry.present(&Value::Int(1), &PresentOptions::new()).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn stateful_object_without_presenter_fails() {
    let registry = PresenterRegistry::new();
    let err = registry
        .present(&Value::opaque(cidr()), &PresentOptions::new())
        .unwrap_err();

    assert!(matches!(err, PresentationError::NoPresenter { .. }));
    assert!(err.to_string().starts_with("no presenter found for Cidr"));
}

#[test]
fn unpresentable_nested_value_fails_the_whole_presentation() {
    let mut registry = PresenterRegistry::new();
    registry
        .presenter_for::<Widget>(|p| {
            p.expose("parts")?;
            Ok(())
        })
        .unwrap();

    let err = registry
        .present(&Value::object(widget()), &PresentOptions::new())
        .unwrap_err();
    assert!(matches!(err, PresentationError::NoPresenter { .. }));
}

// ── Collections ──────────────────────────────────────────────────

#[test]
fn present_collection_marks_members() {
    let registry = catalog_registry();
    let parts = vec![Value::object(part("A", 1)), Value::object(part("B", 2))];

    let presented = registry
        .present_collection(&parts, &PresentOptions::new())
        .unwrap();
    assert_eq!(presented, vec![map([("weight", 1)]), map([("weight", 2)])]);

    let single = registry.present(&parts[0], &PresentOptions::new()).unwrap();
    assert_eq!(single.get("serial"), Some(&Value::from("A")));
}

#[test]
fn present_collection_keeps_caller_options() {
    let registry = catalog_registry();
    let widgets = vec![Value::object(widget())];
    let options = PresentOptions::new().with("internal", true);

    let presented = registry.present_collection(widgets, &options).unwrap();
    assert_eq!(presented[0].get("cost"), Some(&Value::Int(120)));
}

#[test]
fn top_level_list_is_presented_as_a_collection() {
    let registry = catalog_registry();
    let parts = Value::List(vec![Value::object(part("A", 1))]);

    let presented = registry.present(&parts, &PresentOptions::new()).unwrap();
    assert_eq!(presented, Value::List(vec![map([("weight", 1)])]));
}

#[test]
fn heterogeneous_collections_resolve_per_member() {
    let mut registry = catalog_registry();
    registry.serializer_for::<Cidr>(|c| Value::from(c.render()));

    let members = vec![
        Value::object(part("A", 1)),
        Value::from("loose"),
        Value::Int(3),
        Value::opaque(cidr()),
    ];
    let presented = registry
        .present_collection(&members, &PresentOptions::new())
        .unwrap();

    assert_eq!(
        presented,
        vec![
            map([("weight", 1)]),
            Value::from("loose"),
            Value::Int(3),
            Value::from("10.0.0.0/8"),
        ]
    );
}

#[test]
fn map_keys_and_values_are_both_presented() {
    let mut registry = PresenterRegistry::new();
    registry.serializer_for::<Cidr>(|c| Value::from(c.render()));

    let mut routes = ValueMap::new();
    routes.insert(Value::opaque(cidr()), Value::opaque(Cidr { addr: [10, 0, 0, 1], prefix: 32 }));
    routes.insert("default", Value::Null);

    let presented = registry
        .present(&Value::Map(routes), &PresentOptions::new())
        .unwrap();

    let mut expected = ValueMap::new();
    expected.insert("10.0.0.0/8", "10.0.0.1/32");
    expected.insert("default", Value::Null);
    assert_eq!(presented, Value::Map(expected));
}

#[test]
fn empty_collection_presents_to_empty_list() {
    let registry = PresenterRegistry::new();
    let presented = registry
        .present_collection(Vec::<Value>::new(), &PresentOptions::new())
        .unwrap();
    assert!(presented.is_empty());
}

// ── Serializers ──────────────────────────────────────────────────

#[derive(Debug)]
struct Envelope(Value);

#[test]
fn serializers_can_present_nested_values() {
    let mut registry = catalog_registry();
    registry.register_serializer(TypeKey::of::<Envelope>(), |value, presentation| {
        let Some(Envelope(inner)) = value.as_object().and_then(Object::downcast_ref::<Envelope>)
        else {
            anyhow::bail!("not an envelope");
        };
        let body = presentation.present(inner, presentation.options())?;
        Ok(map([("body", body)]))
    });

    let envelope = Value::opaque(Envelope(Value::object(part("A", 1))));
    let presented = registry.present(&envelope, &PresentOptions::new()).unwrap();

    let expected = map([("body", map([("serial", Value::from("A")), ("weight", Value::Int(1))]))]);
    assert_eq!(presented, expected);
}

#[test]
fn serializer_errors_surface_as_callback_errors() {
    let mut registry = PresenterRegistry::new();
    registry.register_serializer(TypeKey::of::<Cidr>(), |_, _| anyhow::bail!("unroutable"));

    let err = registry
        .present(&Value::opaque(cidr()), &PresentOptions::new())
        .unwrap_err();
    assert!(matches!(err, PresentationError::Callback(_)));
    assert_eq!(err.to_string(), "unroutable");
}

// ── Depth limit ──────────────────────────────────────────────────

#[test]
fn cyclic_presentation_stops_at_the_depth_limit() {
    let config = RegistryConfig {
        max_depth: 8,
        ..RegistryConfig::default()
    };
    let mut registry = PresenterRegistry::with_config(config);
    registry
        .presenter_for::<Widget>(|p| {
            p.expose_fn("itself", ExposureOptions::new(), |presenter| {
                Ok(presenter.subject().clone())
            })?;
            Ok(())
        })
        .unwrap();

    let err = registry
        .present(&Value::object(widget()), &PresentOptions::new())
        .unwrap_err();
    assert!(matches!(err, PresentationError::DepthExceeded { limit: 8 }));
}

#[test]
fn self_presenting_serializer_stops_at_the_depth_limit() {
    let config = RegistryConfig {
        max_depth: 4,
        ..RegistryConfig::default()
    };
    let mut registry = PresenterRegistry::with_config(config);
    registry.register_serializer(TypeKey::of::<Cidr>(), |value, presentation| {
        Ok(presentation.present(value, presentation.options())?)
    });

    let err = registry
        .present(&Value::opaque(cidr()), &PresentOptions::new())
        .unwrap_err();
    assert!(matches!(err, PresentationError::DepthExceeded { limit: 4 }));
}

#[test]
fn nesting_within_the_limit_succeeds() {
    let config = RegistryConfig {
        max_depth: 2,
        ..RegistryConfig::default()
    };
    let registry = PresenterRegistry::with_config(config);

    let nested = Value::List(vec![Value::List(vec![Value::Int(1)])]);
    assert_eq!(registry.present(&nested, &PresentOptions::new()).unwrap(), nested);

    let deeper = Value::List(vec![nested]);
    assert!(matches!(
        registry.present(&deeper, &PresentOptions::new()),
        Err(PresentationError::DepthExceeded { limit: 2 })
    ));
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn collections_keep_order_and_cardinality(weights in proptest::collection::vec(0u32..1000, 0..32)) {
        let registry = catalog_registry();
        let parts: Vec<Value> = weights
            .iter()
            .enumerate()
            .map(|(i, weight)| Value::object(part(&format!("P-{i}"), *weight)))
            .collect();

        let presented = registry.present_collection(&parts, &PresentOptions::new()).unwrap();
        prop_assert_eq!(presented.len(), weights.len());
        for (member, weight) in presented.iter().zip(&weights) {
            prop_assert_eq!(member, &map([("weight", *weight)]));
        }
    }

    #[test]
    fn scalars_always_pass_through(n in any::<i64>(), s in ".*") {
        let registry = PresenterRegistry::new();
        let options = PresentOptions::new();
        prop_assert_eq!(registry.present(&Value::Int(n), &options).unwrap(), Value::Int(n));
        prop_assert_eq!(
            registry.present(&Value::from(s.clone()), &options).unwrap(),
            Value::from(s)
        );
    }
}
