//! Facade construction, lazy-load orchestration, and extension scenarios.

mod common;

use common::{PartialAdapter, TestBackend};
use omnimap::{
    Backend, ConfigOverrides, GlobalMap, InitState, LatLng, MapCanvas, MapError, MapRuntime,
    MemoryImageSurface, StaticImageAdapter, StaticMapOptions,
};
use std::cell::RefCell;
use std::rc::Rc;

fn lazy_overrides() -> ConfigOverrides {
    ConfigOverrides::new().with_key("test-api-key")
}

fn eager_overrides() -> ConfigOverrides {
    ConfigOverrides::new().with_lazyload(false)
}

#[test]
fn eager_setup_is_synchronous() {
    let mut runtime = MapRuntime::new();
    let (backend, fakes) = TestBackend::new();
    let ready = Rc::new(RefCell::new(false));
    let flag = ready.clone();

    let map = GlobalMap::create(&mut runtime, "eager", backend, eager_overrides(), move |r| {
        r.unwrap();
        *flag.borrow_mut() = true;
    })
    .unwrap();

    assert!(*ready.borrow());
    assert_eq!(map.borrow().state(), InitState::AdapterReady);
    assert_eq!(fakes.canvas.bound_selector().as_deref(), Some("#map"));
    // No script was requested.
    assert_eq!(fakes.loader.injection_count(), 0);
}

#[test]
fn lazy_load_without_key_is_a_configuration_error() {
    let mut runtime = MapRuntime::new();
    let (backend, _fakes) = TestBackend::new();
    let err = GlobalMap::create(&mut runtime, "keyless", backend, ConfigOverrides::new(), |_| {})
        .unwrap_err();
    assert!(matches!(err, MapError::Configuration(_)));
    assert!(runtime.get("keyless").is_none());
}

#[test]
fn lazy_load_fifo_runs_setups_in_construction_order() {
    let mut runtime = MapRuntime::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut fakes = Vec::new();
    for name in ["first", "second", "third"] {
        let (backend, handles) = TestBackend::new();
        let order = order.clone();
        GlobalMap::create(&mut runtime, name, backend, lazy_overrides(), move |r| {
            r.unwrap();
            order.borrow_mut().push(name);
        })
        .unwrap();
        fakes.push(handles);
    }

    // Exactly one script load is in flight, initiated by the first facade.
    assert!(runtime.script_loading());
    assert_eq!(runtime.pending_count(), 2);
    assert_eq!(fakes[0].loader.injection_count(), 1);
    assert_eq!(fakes[1].loader.injection_count(), 0);
    assert_eq!(fakes[2].loader.injection_count(), 0);
    assert!(order.borrow().is_empty());

    runtime.script_load_complete().unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    assert!(runtime.script_loaded());
    assert!(!runtime.script_loading());
    assert_eq!(runtime.pending_count(), 0);
    for name in ["first", "second", "third"] {
        let map = runtime.get(name).unwrap();
        assert_eq!(map.borrow().state(), InitState::AdapterReady);
    }
}

#[test]
fn facade_created_after_load_completes_skips_the_queue() {
    let mut runtime = MapRuntime::new();
    let (backend, _) = TestBackend::new();
    GlobalMap::create(&mut runtime, "initiator", backend, lazy_overrides(), |_| {}).unwrap();
    runtime.script_load_complete().unwrap();

    let (backend, fakes) = TestBackend::new();
    let map =
        GlobalMap::create(&mut runtime, "late", backend, lazy_overrides(), |r| r.unwrap()).unwrap();
    assert_eq!(map.borrow().state(), InitState::AdapterReady);
    // The script was already loaded; no second injection happened.
    assert_eq!(fakes.loader.injection_count(), 0);
}

#[test]
fn script_request_carries_key_locale_and_client() {
    let mut runtime = MapRuntime::new();
    let (backend, fakes) = TestBackend::new();
    GlobalMap::create(
        &mut runtime,
        "branded",
        backend,
        lazy_overrides()
            .with_locale("es")
            .with_client("gme-acme", "storefinder"),
        |_| {},
    )
    .unwrap();

    let injected = fakes.loader.injected();
    assert_eq!(injected.len(), 1);
    assert!(injected[0].contains("key=test-api-key"));
    assert!(injected[0].contains("language=es"));
    assert!(injected[0].contains("client=gme-acme"));
    assert!(injected[0].contains("channel=storefinder"));
}

#[test]
fn script_load_failure_reaches_every_queued_callback() {
    let mut runtime = MapRuntime::new();
    let failures = Rc::new(RefCell::new(Vec::new()));

    for name in ["one", "two"] {
        let (backend, _) = TestBackend::new();
        let failures = failures.clone();
        GlobalMap::create(&mut runtime, name, backend, lazy_overrides(), move |r| {
            match r {
                Err(MapError::ScriptLoad(_)) => failures.borrow_mut().push(name),
                other => panic!("expected a script-load failure, got {other:?}"),
            }
        })
        .unwrap();
    }

    runtime.script_load_fail("network unreachable");

    assert_eq!(*failures.borrow(), vec!["one", "two"]);
    assert!(!runtime.script_loading());
    for name in ["one", "two"] {
        let map = runtime.get(name).unwrap();
        assert_eq!(map.borrow().state(), InitState::LoadFailed);
    }

    // The failure is not terminal for the runtime: a later facade may
    // initiate a fresh load.
    let (backend, fakes) = TestBackend::new();
    GlobalMap::create(&mut runtime, "retry", backend, lazy_overrides(), |_| {}).unwrap();
    assert_eq!(fakes.loader.injection_count(), 1);
}

#[test]
fn contract_violation_aborts_construction_without_registry_entry() {
    let mut runtime = MapRuntime::new();
    let backend = Backend::Dynamic(Box::new(PartialAdapter::missing("best_fit")));
    let err =
        GlobalMap::create(&mut runtime, "partial", backend, eager_overrides(), |_| {}).unwrap_err();
    match err {
        MapError::ContractViolation { contract, operation } => {
            assert_eq!(contract, "DynamicMapContract");
            assert_eq!(operation, "best_fit");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(runtime.get("partial").is_none());
}

#[test]
fn static_backend_with_lazyload_is_rejected() {
    let mut runtime = MapRuntime::new();
    let backend = Backend::Static(Box::new(StaticImageAdapter::new(
        Box::new(MemoryImageSurface::new()),
        StaticMapOptions::new(),
    )));
    let err = GlobalMap::create(&mut runtime, "static", backend, lazy_overrides(), |_| {})
        .unwrap_err();
    assert!(matches!(err, MapError::Configuration(_)));
}

#[test]
fn dynamic_operation_on_static_backend_names_the_operation() {
    let mut runtime = MapRuntime::new();
    let backend = Backend::Static(Box::new(StaticImageAdapter::new(
        Box::new(MemoryImageSurface::new()),
        StaticMapOptions::new(),
    )));
    let map =
        GlobalMap::create(&mut runtime, "static", backend, eager_overrides(), |_| {}).unwrap();

    let err = map.borrow_mut().best_fit().unwrap_err();
    match err {
        MapError::ContractViolation { contract, operation } => {
            assert_eq!(contract, "DynamicMapContract");
            assert_eq!(operation, "best_fit");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn operations_before_setup_complete_are_rejected() {
    let mut runtime = MapRuntime::new();
    let (backend, _) = TestBackend::new();
    let map = GlobalMap::create(&mut runtime, "pending", backend, lazy_overrides(), |_| {})
        .unwrap();
    assert_eq!(map.borrow().state(), InitState::ScriptPending);
    let err = map.borrow_mut().get_center().unwrap_err();
    assert!(matches!(err, MapError::NotInitialized("get_center")));
}

#[test]
fn registry_last_write_wins() {
    let mut runtime = MapRuntime::new();
    let (backend, _) = TestBackend::new();
    let first =
        GlobalMap::create(&mut runtime, "shared", backend, eager_overrides(), |_| {}).unwrap();
    let (backend, _) = TestBackend::new();
    let second =
        GlobalMap::create(&mut runtime, "shared", backend, eager_overrides(), |_| {}).unwrap();

    let registered = runtime.get("shared").unwrap();
    assert!(Rc::ptr_eq(&registered, &second));
    assert!(!Rc::ptr_eq(&registered, &first));
}

#[test]
fn registered_operations_reach_existing_and_future_facades() {
    let mut runtime = MapRuntime::new();
    let (backend, _) = TestBackend::new();
    let before =
        GlobalMap::create(&mut runtime, "before", backend, eager_overrides(), |_| {}).unwrap();

    runtime.register_operation("describe", |map, _args| {
        Ok(serde_json::json!({ "instance": map.instance_key() }))
    });

    let (backend, _) = TestBackend::new();
    let after =
        GlobalMap::create(&mut runtime, "after", backend, eager_overrides(), |_| {}).unwrap();

    let result = before
        .borrow_mut()
        .invoke("describe", serde_json::Value::Null)
        .unwrap();
    assert_eq!(result["instance"], "before");
    let result = after
        .borrow_mut()
        .invoke("describe", serde_json::Value::Null)
        .unwrap();
    assert_eq!(result["instance"], "after");

    let err = after
        .borrow_mut()
        .invoke("missing", serde_json::Value::Null)
        .unwrap_err();
    assert!(matches!(err, MapError::UnknownOperation(_)));
}

#[test]
fn config_defaults_flow_into_setup() {
    let mut runtime = MapRuntime::new();
    let (backend, fakes) = TestBackend::new();
    GlobalMap::create(
        &mut runtime,
        "defaults",
        backend,
        ConfigOverrides::new()
            .with_lazyload(false)
            .with_container_selector("#custom"),
        |_| {},
    )
    .unwrap();

    assert_eq!(fakes.canvas.bound_selector().as_deref(), Some("#custom"));
    // Built-in defaults for everything left unset.
    assert_eq!(fakes.canvas.zoom(), 7.0);
    let center = fakes.canvas.center();
    assert_eq!(center, LatLng::new(37.4419, -122.1419));
}
