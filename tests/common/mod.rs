//! Shared helpers for the integration suites.
#![allow(dead_code)]

use omnimap::adapter::{
    DynamicMapAdapter, EventTarget, IconImage, Line, LineOptions, MarkerConfig, MarkerId,
    MemoryCanvas, MemoryScriptLoader, NativeEvent, Polygon, PolygonOptions, ScriptRequest,
    SetupRequest,
};
use omnimap::core::contract::DYNAMIC_OPERATIONS;
use omnimap::events::EventHandler;
use omnimap::{Backend, CanvasMapAdapter, LatLng, Result};

/// A dynamic backend over recording fakes, with the fake handles kept out
/// for assertions.
pub struct TestBackend {
    pub canvas: MemoryCanvas,
    pub loader: MemoryScriptLoader,
}

impl TestBackend {
    pub fn new() -> (Backend, Self) {
        let canvas = MemoryCanvas::new();
        let loader = MemoryScriptLoader::new();
        let adapter = CanvasMapAdapter::new(Box::new(canvas.clone()), Box::new(loader.clone()));
        (
            Backend::Dynamic(Box::new(adapter)),
            Self { canvas, loader },
        )
    }
}

/// An otherwise conforming adapter that stops advertising one operation.
/// Exercises the construction-time contract check end to end.
pub struct PartialAdapter {
    inner: CanvasMapAdapter,
    missing: &'static str,
}

impl PartialAdapter {
    pub fn missing(operation: &'static str) -> Self {
        Self {
            inner: CanvasMapAdapter::new(
                Box::new(MemoryCanvas::new()),
                Box::new(MemoryScriptLoader::new()),
            ),
            missing: operation,
        }
    }
}

impl DynamicMapAdapter for PartialAdapter {
    fn operations(&self) -> Vec<&'static str> {
        DYNAMIC_OPERATIONS
            .iter()
            .copied()
            .filter(|op| *op != self.missing)
            .collect()
    }

    fn load_script(&mut self, request: &ScriptRequest) -> Result<()> {
        self.inner.load_script(request)
    }

    fn setup(&mut self, request: &SetupRequest) -> Result<()> {
        self.inner.setup(request)
    }

    fn render_controls(&mut self) -> Result<()> {
        self.inner.render_controls()
    }

    fn add_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        self.inner.add_marker(config)
    }

    fn add_html_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        self.inner.add_html_marker(config)
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        self.inner.remove_marker(id)
    }

    fn add_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.inner.add_marker_collection(markers, name)
    }

    fn add_html_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.inner.add_html_marker_collection(markers, name)
    }

    fn remove_marker_collection(&mut self, name: &str) -> Result<()> {
        self.inner.remove_marker_collection(name)
    }

    fn get_marker_collection(&self, name: &str) -> Option<Vec<MarkerId>> {
        self.inner.get_marker_collection(name)
    }

    fn center(&mut self, position: LatLng) {
        self.inner.center(position)
    }

    fn pan_to(&mut self, position: LatLng) {
        self.inner.pan_to(position)
    }

    fn get_center(&self) -> LatLng {
        self.inner.get_center()
    }

    fn best_fit(&mut self) {
        self.inner.best_fit()
    }

    fn street_zoom_level(&mut self) {
        self.inner.street_zoom_level()
    }

    fn redraw(&mut self) {
        self.inner.redraw()
    }

    fn add_polygon(
        &mut self,
        name: &str,
        path: Vec<LatLng>,
        options: PolygonOptions,
    ) -> Result<()> {
        self.inner.add_polygon(name, path, options)
    }

    fn get_polygon(&self, name: &str) -> Option<&Polygon> {
        self.inner.get_polygon(name)
    }

    fn remove_polygon(&mut self, name: &str) {
        self.inner.remove_polygon(name)
    }

    fn add_line(&mut self, name: &str, path: Vec<LatLng>, options: LineOptions) -> Result<()> {
        self.inner.add_line(name, path, options)
    }

    fn get_line(&self, name: &str) -> Option<&Line> {
        self.inner.get_line(name)
    }

    fn remove_line(&mut self, name: &str) {
        self.inner.remove_line(name)
    }

    fn add_listener(
        &mut self,
        target: EventTarget,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        self.inner.add_listener(target, event, handler)
    }

    fn remove_listener(&mut self, target: EventTarget, event: &str) -> Result<()> {
        self.inner.remove_listener(target, event)
    }

    fn add_map_listener(&mut self, event: &str, handler: EventHandler) -> Result<()> {
        self.inner.add_map_listener(event, handler)
    }

    fn remove_map_listener(&mut self, event: &str) -> Result<()> {
        self.inner.remove_map_listener(event)
    }

    fn change_marker_icon(&mut self, id: MarkerId, icon: &IconImage) -> Result<()> {
        self.inner.change_marker_icon(id, icon)
    }

    fn dispatch_native(&mut self, event: NativeEvent) -> Result<()> {
        self.inner.dispatch_native(event)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
