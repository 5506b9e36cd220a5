//! The client-facing map facade.
//!
//! Applications hold a `GlobalMap` and nothing else: construction verifies
//! the backend against its capability contract, resolves script loading,
//! runs adapter setup, and from then on every public operation forwards 1:1
//! to the identically-named backend operation. The facade performs no map
//! logic of its own; that is what lets a second backend be substituted
//! with zero facade changes.

use crate::adapter::{
    DynamicMapAdapter, EventTarget, IconImage, Line, LineOptions, MarkerConfig, MarkerId,
    NativeEvent, Polygon, PolygonOptions, ScriptRequest, SetupRequest, StaticMapAdapter,
};
use crate::core::config::{ConfigOverrides, MapConfig};
use crate::core::contract::{self, dynamic_contract, static_contract, Capabilities,
    CapabilityContract};
use crate::core::geo::LatLng;
use crate::core::runtime::{ExtensionTable, MapRuntime, SharedMap};
use crate::events::EventHandler;
use crate::{MapError, Result};
use log::info;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Initialization lifecycle of a facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Unconfigured,
    /// Waiting on the provider SDK script.
    ScriptPending,
    /// Script available, adapter setup not yet complete.
    ScriptLoaded,
    /// Setup complete; the facade is usable.
    AdapterReady,
    /// The script load failed; the facade never becomes usable.
    LoadFailed,
}

/// Invoked exactly once when initialization finishes: `Ok(())` after setup
/// completes, `Err` if the script load fails.
pub type ReadyCallback = Box<dyn FnOnce(Result<()>)>;

/// The backend a facade delegates to.
pub enum Backend {
    Dynamic(Box<dyn DynamicMapAdapter>),
    Static(Box<dyn StaticMapAdapter>),
}

impl Backend {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Backend::Dynamic(_))
    }

    /// The contract this backend is verified against.
    pub fn contract(&self) -> &'static CapabilityContract {
        match self {
            Backend::Dynamic(_) => dynamic_contract(),
            Backend::Static(_) => static_contract(),
        }
    }
}

impl Capabilities for Backend {
    fn operations(&self) -> Vec<&'static str> {
        match self {
            Backend::Dynamic(adapter) => adapter.operations(),
            Backend::Static(adapter) => adapter.operations(),
        }
    }
}

pub struct GlobalMap {
    instance_key: String,
    backend: Backend,
    config: MapConfig,
    state: InitState,
    on_ready: Option<ReadyCallback>,
    extensions: ExtensionTable,
}

impl std::fmt::Debug for GlobalMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalMap")
            .field("instance_key", &self.instance_key)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("on_ready", &self.on_ready.is_some())
            .finish_non_exhaustive()
    }
}

/// Runs a facade's setup and delivers its completion callback after every
/// borrow is released, so the callback is free to use the shared handle.
/// The callback fires exactly once either way.
pub(crate) fn run_setup(shared: &SharedMap) -> Result<()> {
    let result = shared.borrow_mut().complete_setup();
    let callback = shared.borrow_mut().take_on_ready();
    if let Some(callback) = callback {
        match &result {
            Ok(()) => callback(Ok(())),
            Err(err) => callback(Err(err.clone())),
        }
    }
    result
}

impl GlobalMap {
    /// Constructs a facade, registers it under `instance` in the runtime
    /// (last write wins), and begins initialization. On contract or
    /// configuration failure nothing is committed: no registry entry, no
    /// adapter call.
    pub fn create(
        runtime: &mut MapRuntime,
        instance: impl Into<String>,
        backend: Backend,
        overrides: ConfigOverrides,
        on_ready: impl FnOnce(Result<()>) + 'static,
    ) -> Result<SharedMap> {
        let instance_key = instance.into();
        contract::verify(&backend, &[backend.contract()])?;

        let config = MapConfig::default().merged(overrides);
        if config.lazyload {
            if !backend.is_dynamic() {
                return Err(MapError::Configuration(format!(
                    "static backends load no script - disable lazyload for `{instance_key}`"
                )));
            }
            if !config.key.as_deref().is_some_and(|key| !key.is_empty()) {
                return Err(MapError::Configuration(
                    "a valid key must be used to load the script dynamically - \
                     disable lazyload or add a valid key"
                        .to_string(),
                ));
            }
        }

        let shared = Rc::new(RefCell::new(GlobalMap {
            instance_key: instance_key.clone(),
            backend,
            config,
            state: InitState::Unconfigured,
            on_ready: Some(Box::new(on_ready)),
            extensions: runtime.extensions_handle(),
        }));
        runtime.register_map(instance_key.clone(), shared.clone());
        info!("registered map facade `{instance_key}`");

        let lazyload = shared.borrow().config.lazyload;
        if !lazyload {
            // Eager setup goes straight to AdapterReady.
            if let Err(err) = run_setup(&shared) {
                runtime.unregister_map(&instance_key);
                return Err(err);
            }
        } else if runtime.script_loaded() {
            shared.borrow_mut().state = InitState::ScriptLoaded;
            if let Err(err) = run_setup(&shared) {
                runtime.unregister_map(&instance_key);
                return Err(err);
            }
        } else if !runtime.script_loading() {
            runtime.begin_script_load(&instance_key);
            let result = {
                let mut facade = shared.borrow_mut();
                facade.state = InitState::ScriptPending;
                facade.begin_script_load()
            };
            if let Err(err) = result {
                runtime.abort_script_load();
                runtime.unregister_map(&instance_key);
                return Err(err);
            }
        } else {
            shared.borrow_mut().state = InitState::ScriptPending;
            runtime.enqueue_setup(instance_key);
        }
        Ok(shared)
    }

    pub fn instance_key(&self) -> &str {
        &self.instance_key
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The backend implementation, for provider-specific escape hatches.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    /// Dispatches a registered extension operation by name.
    pub fn invoke(&mut self, operation: &str, args: Value) -> Result<Value> {
        let registered = self.extensions.borrow().get(operation).cloned();
        match registered {
            Some(op) => op(self, args),
            None => Err(MapError::UnknownOperation(operation.to_string())),
        }
    }

    fn setup_request(&self) -> SetupRequest {
        SetupRequest {
            container_selector: self.config.container_selector.clone(),
            zoom: self.config.default_zoom,
            center: self.config.center,
            declutter: self.config.declutter_enabled,
            controls: self.config.map_controls,
        }
    }

    fn begin_script_load(&mut self) -> Result<()> {
        let request = ScriptRequest {
            key: self.config.key.clone().unwrap_or_default(),
            locale: self.config.locale.clone(),
            client_id: self.config.client_id.clone(),
            channel_id: self.config.channel_id.clone(),
        };
        match &mut self.backend {
            Backend::Dynamic(adapter) => adapter.load_script(&request),
            Backend::Static(_) => Err(MapError::Configuration(
                "static backends load no script".to_string(),
            )),
        }
    }

    pub(crate) fn mark_script_loaded(&mut self) {
        self.state = InitState::ScriptLoaded;
    }

    /// Moves the facade to its terminal failed state and surrenders the
    /// completion callback so the caller can deliver the failure outside
    /// the borrow.
    pub(crate) fn fail_load(&mut self) -> Option<ReadyCallback> {
        self.state = InitState::LoadFailed;
        self.on_ready.take()
    }

    pub(crate) fn take_on_ready(&mut self) -> Option<ReadyCallback> {
        self.on_ready.take()
    }

    /// Runs adapter setup and control rendering.
    fn complete_setup(&mut self) -> Result<()> {
        let request = self.setup_request();
        let result = match &mut self.backend {
            Backend::Dynamic(adapter) => adapter
                .setup(&request)
                .and_then(|_| adapter.render_controls()),
            Backend::Static(adapter) => adapter
                .setup(&request)
                .and_then(|_| adapter.render_controls()),
        };
        if result.is_ok() {
            self.state = InitState::AdapterReady;
            info!("map facade `{}` is ready", self.instance_key);
        }
        result
    }

    fn dynamic(&mut self, operation: &'static str) -> Result<&mut Box<dyn DynamicMapAdapter>> {
        if self.state != InitState::AdapterReady {
            return Err(MapError::NotInitialized(operation));
        }
        match &mut self.backend {
            Backend::Dynamic(adapter) => Ok(adapter),
            Backend::Static(_) => Err(MapError::ContractViolation {
                contract: dynamic_contract().name().to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    fn dynamic_ref(&self, operation: &'static str) -> Result<&dyn DynamicMapAdapter> {
        if self.state != InitState::AdapterReady {
            return Err(MapError::NotInitialized(operation));
        }
        match &self.backend {
            Backend::Dynamic(adapter) => Ok(adapter.as_ref()),
            Backend::Static(_) => Err(MapError::ContractViolation {
                contract: dynamic_contract().name().to_string(),
                operation: operation.to_string(),
            }),
        }
    }

    // Pure delegation from here down: arguments forwarded unchanged,
    // results returned unchanged.

    /// Adds a new marker to the map and returns its handle.
    pub fn add_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        self.dynamic("add_marker")?.add_marker(config)
    }

    /// Adds a new HTML marker to the map and returns its handle.
    pub fn add_html_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        self.dynamic("add_html_marker")?.add_html_marker(config)
    }

    /// Centers the map on the given coordinates.
    pub fn center(&mut self, position: LatLng) -> Result<()> {
        self.dynamic("center")?.center(position);
        Ok(())
    }

    /// Centers the map on the given coordinates with a panning effect.
    pub fn pan_to(&mut self, position: LatLng) -> Result<()> {
        self.dynamic("pan_to")?.pan_to(position);
        Ok(())
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        self.dynamic("remove_marker")?.remove_marker(id)
    }

    /// Adds a named group of markers in one batch.
    pub fn add_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.dynamic("add_marker_collection")?
            .add_marker_collection(markers, name)
    }

    pub fn add_html_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.dynamic("add_html_marker_collection")?
            .add_html_marker_collection(markers, name)
    }

    pub fn remove_marker_collection(&mut self, name: &str) -> Result<()> {
        self.dynamic("remove_marker_collection")?
            .remove_marker_collection(name)
    }

    pub fn get_marker_collection(&self, name: &str) -> Result<Option<Vec<MarkerId>>> {
        Ok(self
            .dynamic_ref("get_marker_collection")?
            .get_marker_collection(name))
    }

    /// Adjusts the viewport to the best zoom for displaying all markers.
    pub fn best_fit(&mut self) -> Result<()> {
        self.dynamic("best_fit")?.best_fit();
        Ok(())
    }

    pub fn add_polygon(
        &mut self,
        name: &str,
        path: Vec<LatLng>,
        options: PolygonOptions,
    ) -> Result<()> {
        self.dynamic("add_polygon")?.add_polygon(name, path, options)
    }

    pub fn get_polygon(&self, name: &str) -> Result<Option<Polygon>> {
        Ok(self.dynamic_ref("get_polygon")?.get_polygon(name).cloned())
    }

    pub fn remove_polygon(&mut self, name: &str) -> Result<()> {
        self.dynamic("remove_polygon")?.remove_polygon(name);
        Ok(())
    }

    pub fn add_line(&mut self, name: &str, path: Vec<LatLng>, options: LineOptions) -> Result<()> {
        self.dynamic("add_line")?.add_line(name, path, options)
    }

    pub fn get_line(&self, name: &str) -> Result<Option<Line>> {
        Ok(self.dynamic_ref("get_line")?.get_line(name).cloned())
    }

    pub fn remove_line(&mut self, name: &str) -> Result<()> {
        self.dynamic("remove_line")?.remove_line(name);
        Ok(())
    }

    pub fn add_listener(
        &mut self,
        target: EventTarget,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        self.dynamic("add_listener")?.add_listener(target, event, handler)
    }

    pub fn add_map_listener(&mut self, event: &str, handler: EventHandler) -> Result<()> {
        self.dynamic("add_map_listener")?.add_map_listener(event, handler)
    }

    pub fn remove_listener(&mut self, target: EventTarget, event: &str) -> Result<()> {
        self.dynamic("remove_listener")?.remove_listener(target, event)
    }

    pub fn remove_map_listener(&mut self, event: &str) -> Result<()> {
        self.dynamic("remove_map_listener")?.remove_map_listener(event)
    }

    /// Coordinates of the map's center.
    pub fn get_center(&self) -> Result<LatLng> {
        Ok(self.dynamic_ref("get_center")?.get_center())
    }

    pub fn change_marker_icon(&mut self, id: MarkerId, icon: &IconImage) -> Result<()> {
        self.dynamic("change_marker_icon")?.change_marker_icon(id, icon)
    }

    /// Sets the zoom to street level.
    pub fn street_zoom_level(&mut self) -> Result<()> {
        self.dynamic("street_zoom_level")?.street_zoom_level();
        Ok(())
    }

    pub fn redraw(&mut self) -> Result<()> {
        self.dynamic("redraw")?.redraw();
        Ok(())
    }

    /// Feeds a provider-native event into the backend's normalization.
    pub fn dispatch_native(&mut self, event: NativeEvent) -> Result<()> {
        self.dynamic("dispatch_native")?.dispatch_native(event)
    }
}
