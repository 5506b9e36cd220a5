//! In-memory boundary implementations.
//!
//! These back the adapters with no UI at all: every operation is recorded in
//! order and the little state a map surface has (center, zoom, open windows,
//! overlay nodes) is tracked so it can be asserted on. Useful for headless
//! hosts, demos, and the crate's own tests. Handles are cheaply cloneable
//! and share state, so a caller can keep one for inspection after boxing
//! another into an adapter.

use crate::adapter::{
    marker::{IconImage, MarkerId, WindowConfig},
    shapes::{LineOptions, PolygonOptions, ShapeEmphasis},
    ImageSurface, MapCanvas, ScriptLoader, WindowKind,
};
use crate::core::config::ControlsConfig;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::prelude::HashMap;
use crate::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    Bind {
        selector: String,
        center: LatLng,
        zoom: f64,
    },
    RenderControls,
    SetCenter(LatLng),
    PanTo(LatLng),
    SetZoom(f64),
    FitBounds(LatLngBounds),
    TriggerResize,
    PlaceMarker {
        id: MarkerId,
        position: LatLng,
        icon_url: Option<String>,
    },
    RemoveMarker(MarkerId),
    SetMarkerIcon {
        id: MarkerId,
        url: String,
    },
    PlaceOverlay {
        id: MarkerId,
        at: Point,
    },
    MoveOverlay {
        id: MarkerId,
        at: Point,
    },
    RemoveOverlay(MarkerId),
    OpenWindow {
        kind: WindowKind,
        marker: MarkerId,
        content: String,
    },
    CloseWindow {
        kind: WindowKind,
        marker: MarkerId,
    },
    DrawPolygon(String),
    DrawLine(String),
    SetShapeEmphasis {
        name: String,
        emphasis: ShapeEmphasis,
    },
    EraseShape(String),
    OpenShapeTitle {
        name: String,
        title: String,
    },
    CloseShapeTitle(String),
    PlaceCluster {
        center: LatLng,
        count: usize,
    },
    ClearClusters,
}

#[derive(Default)]
struct CanvasState {
    calls: Vec<CanvasCall>,
    bound_selector: Option<String>,
    center: LatLng,
    zoom: f64,
    open_windows: HashMap<WindowKind, MarkerId>,
    overlay_nodes: HashMap<MarkerId, Point>,
    clusters: Vec<(LatLng, usize)>,
}

/// A recording, stateful `MapCanvas` with no rendering.
#[derive(Clone, Default)]
pub struct MemoryCanvas {
    state: Rc<RefCell<CanvasState>>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CanvasCall> {
        self.state.borrow().calls.clone()
    }

    pub fn bound_selector(&self) -> Option<String> {
        self.state.borrow().bound_selector.clone()
    }

    pub fn current_window(&self, kind: WindowKind) -> Option<MarkerId> {
        self.state.borrow().open_windows.get(&kind).copied()
    }

    pub fn overlay_count(&self) -> usize {
        self.state.borrow().overlay_nodes.len()
    }

    pub fn clusters(&self) -> Vec<(LatLng, usize)> {
        self.state.borrow().clusters.clone()
    }

    fn record(&self, call: CanvasCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl MapCanvas for MemoryCanvas {
    fn bind(
        &mut self,
        container_selector: &str,
        center: LatLng,
        zoom: f64,
        _controls: &ControlsConfig,
    ) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            state.bound_selector = Some(container_selector.to_string());
            state.center = center;
            state.zoom = zoom;
        }
        self.record(CanvasCall::Bind {
            selector: container_selector.to_string(),
            center,
            zoom,
        });
        Ok(())
    }

    fn render_controls(&mut self, _controls: &ControlsConfig) {
        self.record(CanvasCall::RenderControls);
    }

    fn center(&self) -> LatLng {
        self.state.borrow().center
    }

    fn zoom(&self) -> f64 {
        self.state.borrow().zoom
    }

    fn set_center(&mut self, center: LatLng) {
        self.state.borrow_mut().center = center;
        self.record(CanvasCall::SetCenter(center));
    }

    fn pan_to(&mut self, center: LatLng) {
        self.state.borrow_mut().center = center;
        self.record(CanvasCall::PanTo(center));
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.state.borrow_mut().zoom = zoom;
        self.record(CanvasCall::SetZoom(zoom));
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.state.borrow_mut().center = bounds.center();
        self.record(CanvasCall::FitBounds(bounds.clone()));
    }

    fn trigger_resize(&mut self) {
        self.record(CanvasCall::TriggerResize);
    }

    fn project(&self, position: LatLng) -> Point {
        position.to_world_pixel(self.zoom())
    }

    fn place_marker(&mut self, id: MarkerId, position: LatLng, icon: Option<&IconImage>) {
        self.record(CanvasCall::PlaceMarker {
            id,
            position,
            icon_url: icon.map(|icon| icon.url.clone()),
        });
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.record(CanvasCall::RemoveMarker(id));
    }

    fn set_marker_icon(&mut self, id: MarkerId, icon: &IconImage) {
        self.record(CanvasCall::SetMarkerIcon {
            id,
            url: icon.url.clone(),
        });
    }

    fn place_overlay_node(&mut self, id: MarkerId, _html: &str, at: Point) {
        self.state.borrow_mut().overlay_nodes.insert(id, at);
        self.record(CanvasCall::PlaceOverlay { id, at });
    }

    fn move_overlay_node(&mut self, id: MarkerId, at: Point) {
        self.state.borrow_mut().overlay_nodes.insert(id, at);
        self.record(CanvasCall::MoveOverlay { id, at });
    }

    fn remove_overlay_node(&mut self, id: MarkerId) {
        self.state.borrow_mut().overlay_nodes.remove(&id);
        self.record(CanvasCall::RemoveOverlay(id));
    }

    fn open_window(
        &mut self,
        kind: WindowKind,
        marker: MarkerId,
        content: &str,
        _window: &WindowConfig,
    ) {
        self.state.borrow_mut().open_windows.insert(kind, marker);
        self.record(CanvasCall::OpenWindow {
            kind,
            marker,
            content: content.to_string(),
        });
    }

    fn close_window(&mut self, kind: WindowKind, marker: MarkerId) {
        let mut state = self.state.borrow_mut();
        if state.open_windows.get(&kind) == Some(&marker) {
            state.open_windows.remove(&kind);
        }
        state.calls.push(CanvasCall::CloseWindow { kind, marker });
    }

    fn draw_polygon(&mut self, name: &str, _path: &[LatLng], _options: &PolygonOptions) {
        self.record(CanvasCall::DrawPolygon(name.to_string()));
    }

    fn draw_line(&mut self, name: &str, _path: &[LatLng], _options: &LineOptions) {
        self.record(CanvasCall::DrawLine(name.to_string()));
    }

    fn set_shape_emphasis(&mut self, name: &str, emphasis: ShapeEmphasis) {
        self.record(CanvasCall::SetShapeEmphasis {
            name: name.to_string(),
            emphasis,
        });
    }

    fn erase_shape(&mut self, name: &str) {
        self.record(CanvasCall::EraseShape(name.to_string()));
    }

    fn open_shape_title(&mut self, name: &str, title: &str, _at: LatLng) {
        self.record(CanvasCall::OpenShapeTitle {
            name: name.to_string(),
            title: title.to_string(),
        });
    }

    fn close_shape_title(&mut self, name: &str) {
        self.record(CanvasCall::CloseShapeTitle(name.to_string()));
    }

    fn place_cluster(&mut self, center: LatLng, count: usize) {
        self.state.borrow_mut().clusters.push((center, count));
        self.record(CanvasCall::PlaceCluster { center, count });
    }

    fn clear_clusters(&mut self) {
        self.state.borrow_mut().clusters.clear();
        self.record(CanvasCall::ClearClusters);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// A `ScriptLoader` that records requested URLs instead of injecting.
#[derive(Clone, Default)]
pub struct MemoryScriptLoader {
    injected: Rc<RefCell<Vec<String>>>,
}

impl MemoryScriptLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn injected(&self) -> Vec<String> {
        self.injected.borrow().clone()
    }

    pub fn injection_count(&self) -> usize {
        self.injected.borrow().len()
    }
}

impl ScriptLoader for MemoryScriptLoader {
    fn inject(&mut self, url: &str) -> Result<()> {
        self.injected.borrow_mut().push(url.to_string());
        Ok(())
    }
}

/// An `ImageSurface` that records the bound URL instead of touching a DOM.
#[derive(Clone, Default)]
pub struct MemoryImageSurface {
    bound: Rc<RefCell<Option<(String, String)>>>,
}

impl MemoryImageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `(selector, url)` pair last bound, if any.
    pub fn bound(&self) -> Option<(String, String)> {
        self.bound.borrow().clone()
    }
}

impl ImageSurface for MemoryImageSurface {
    fn bind_image(&mut self, container_selector: &str, url: &str) -> Result<()> {
        *self.bound.borrow_mut() = Some((container_selector.to_string(), url.to_string()));
        Ok(())
    }
}
