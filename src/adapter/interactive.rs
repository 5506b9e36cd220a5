//! The interactive, SDK-backed adapter.
//!
//! `CanvasMapAdapter` owns every piece of backend state the facade delegates
//! into: the marker table and its collection views, polygon/line registries,
//! the optional clusterer, and the single-open-window invariants. All
//! provider rendering goes through the [`MapCanvas`] boundary; all native
//! input comes back in through [`dispatch_native`](CanvasMapAdapter::dispatch_native),
//! where it is normalized into the named events of [`crate::events`].

use crate::adapter::{
    cluster::Clusterer,
    marker::{window_content, IconImage, Marker, MarkerConfig, MarkerId, MarkerKind},
    shapes::{Line, LineOptions, Polygon, PolygonOptions, ShapeEmphasis},
    DynamicMapAdapter, EventTarget, MapCanvas, NativeEvent, ScriptLoader, ScriptRequest,
    SetupRequest, WindowKind,
};
use crate::core::config::ControlsConfig;
use crate::core::constants::{SDK_SCRIPT_BASE, STREET_ZOOM};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::events::{names, EventHandler, EventHub, EventPayload};
use crate::prelude::HashMap;
use crate::{MapError, Result};
use log::{debug, info, warn};

pub struct CanvasMapAdapter {
    canvas: Box<dyn MapCanvas>,
    loader: Box<dyn ScriptLoader>,
    controls: ControlsConfig,
    map_events: EventHub,
    markers: HashMap<MarkerId, Marker>,
    all_markers: Vec<MarkerId>,
    collections: HashMap<String, Vec<MarkerId>>,
    polygons: HashMap<String, Polygon>,
    lines: HashMap<String, Line>,
    clusterer: Option<Clusterer>,
    current_info_window: Option<MarkerId>,
    current_rollover: Option<MarkerId>,
    selected: Option<MarkerId>,
    next_id: u64,
}

impl CanvasMapAdapter {
    pub fn new(canvas: Box<dyn MapCanvas>, loader: Box<dyn ScriptLoader>) -> Self {
        Self {
            canvas,
            loader,
            controls: ControlsConfig::default(),
            map_events: EventHub::new(),
            markers: HashMap::default(),
            all_markers: Vec::new(),
            collections: HashMap::default(),
            polygons: HashMap::default(),
            lines: HashMap::default(),
            clusterer: None,
            current_info_window: None,
            current_rollover: None,
            selected: None,
            next_id: 1,
        }
    }

    pub fn canvas(&self) -> &dyn MapCanvas {
        self.canvas.as_ref()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn all_markers(&self) -> &[MarkerId] {
        &self.all_markers
    }

    pub fn current_info_window(&self) -> Option<MarkerId> {
        self.current_info_window
    }

    pub fn current_rollover(&self) -> Option<MarkerId> {
        self.current_rollover
    }

    pub fn selected(&self) -> Option<MarkerId> {
        self.selected
    }

    fn create_marker(&mut self, config: MarkerConfig, is_icon: bool) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;

        let info_content = window_content(config.title.as_deref(), config.content.as_deref());
        let rollover_content = window_content(config.title.as_deref(), None);
        let kind = if is_icon {
            MarkerKind::Icon(config.icon)
        } else {
            MarkerKind::Html(config.html.unwrap_or_default())
        };

        let mut events = EventHub::new();
        events.declare(&[
            names::MARKER_CLICK,
            names::MARKER_DBLCLICK,
            names::INFO_WINDOW_CLOSED,
            names::MARKER_MOUSEOVER,
        ]);
        for (name, handler) in config.listeners {
            events.add_listener(&name, handler);
        }

        self.markers.insert(
            id,
            Marker {
                id,
                position: config.position,
                kind,
                info_content,
                rollover_content,
                window: config.window,
                disable_open_on_click: config.disable_open_on_click,
                events,
            },
        );
        self.all_markers.push(id);
        id
    }

    /// Binds one marker directly to the canvas. Only used outside declutter
    /// mode; clustered markers are never bound individually.
    fn bind_to_canvas(&mut self, id: MarkerId) {
        let Some(marker) = self.markers.get(&id) else {
            return;
        };
        let position = marker.position;
        match &marker.kind {
            MarkerKind::Icon(icon) => {
                let icon = icon.as_ref().map(|config| config.default.clone());
                self.canvas.place_marker(id, position, icon.as_ref());
            }
            MarkerKind::Html(html) => {
                let html = html.clone();
                let at = self.canvas.project(position);
                self.canvas.place_overlay_node(id, &html, at);
            }
        }
    }

    fn attach_marker(&mut self, id: MarkerId) {
        if let Some(clusterer) = self.clusterer.as_mut() {
            let position = self.markers[&id].position;
            clusterer.add(id, position);
        } else {
            self.bind_to_canvas(id);
            return;
        }
        self.refresh_clusters();
    }

    fn refresh_clusters(&mut self) {
        let Some(clusterer) = &self.clusterer else {
            return;
        };
        let cells = clusterer.clusters(self.canvas.zoom());
        self.canvas.clear_clusters();
        for cell in cells {
            self.canvas.place_cluster(cell.center, cell.members.len());
        }
    }

    fn rebuild_clusterer(&mut self) {
        let entries: Vec<(MarkerId, LatLng)> = self
            .all_markers
            .iter()
            .filter_map(|id| self.markers.get(id).map(|m| (*id, m.position)))
            .collect();
        if let Some(clusterer) = self.clusterer.as_mut() {
            clusterer.rebuild(entries);
        }
        self.refresh_clusters();
    }

    fn add_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
        is_icon: bool,
    ) -> Result<Vec<MarkerId>> {
        let mut ids = Vec::with_capacity(markers.len());
        for config in markers {
            let id = self.create_marker(config, is_icon);
            if self.clusterer.is_none() {
                self.bind_to_canvas(id);
            }
            ids.push(id);
        }
        if self.clusterer.is_some() {
            let entries: Vec<(MarkerId, LatLng)> = ids
                .iter()
                .filter_map(|id| self.markers.get(id).map(|m| (*id, m.position)))
                .collect();
            if let Some(clusterer) = self.clusterer.as_mut() {
                clusterer.add_batch(entries);
            }
            self.refresh_clusters();
        }
        debug!("loaded marker collection `{name}` with {} markers", ids.len());
        // Prior members of an overwritten collection stay on the map; only
        // the grouping is replaced.
        self.collections.insert(name.to_string(), ids.clone());
        self.map_events
            .trigger(names::MARKERS_LOADED, &EventPayload::default());
        Ok(ids)
    }

    /// Unbinds one marker from the canvas and every view that references it.
    /// Does not touch the clusterer; callers rebuild it once per batch.
    fn detach_marker(&mut self, id: MarkerId) -> bool {
        let Some(marker) = self.markers.remove(&id) else {
            return false;
        };
        if self.current_info_window == Some(id) {
            self.canvas.close_window(WindowKind::Info, id);
            self.current_info_window = None;
        }
        if self.current_rollover == Some(id) {
            self.canvas.close_window(WindowKind::Rollover, id);
            self.current_rollover = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.clusterer.is_none() {
            match marker.kind {
                MarkerKind::Icon(_) => self.canvas.remove_marker(id),
                MarkerKind::Html(_) => self.canvas.remove_overlay_node(id),
            }
        }
        self.all_markers.retain(|m| *m != id);
        for members in self.collections.values_mut() {
            members.retain(|m| *m != id);
        }
        true
    }

    fn open_info_window(&mut self, id: MarkerId) {
        if let Some(open) = self.current_info_window.take() {
            self.canvas.close_window(WindowKind::Info, open);
        }
        let Some(marker) = self.markers.get(&id) else {
            return;
        };
        if let Some(content) = marker.info_content.clone() {
            let window = marker.window.clone();
            self.canvas
                .open_window(WindowKind::Info, id, &content, &window);
            self.current_info_window = Some(id);
        }
    }

    fn handle_marker_click(&mut self, id: MarkerId) {
        let Some(marker) = self.markers.get(&id) else {
            warn!("click on unknown marker {id}");
            return;
        };
        let position = marker.position;
        let is_icon = !marker.is_html();
        if !marker.disable_open_on_click {
            if self.current_rollover == Some(id) {
                self.canvas.close_window(WindowKind::Rollover, id);
                self.current_rollover = None;
            }
            self.open_info_window(id);
            if is_icon {
                if let Some(prev) = self.selected {
                    let icon = self
                        .markers
                        .get(&prev)
                        .and_then(Marker::icon_config)
                        .map(|config| config.default.clone());
                    if let Some(icon) = icon {
                        self.canvas.set_marker_icon(prev, &icon);
                    }
                }
                let selected_icon = self
                    .markers
                    .get(&id)
                    .and_then(Marker::icon_config)
                    .and_then(|config| config.selected.clone());
                if let Some(icon) = selected_icon {
                    self.canvas.set_marker_icon(id, &icon);
                }
                self.selected = Some(id);
            }
        }
        if let Some(marker) = self.markers.get(&id) {
            marker
                .events
                .trigger(names::MARKER_CLICK, &EventPayload::for_marker(id, position));
        }
    }

    fn handle_marker_mouseover(&mut self, id: MarkerId) {
        let Some(marker) = self.markers.get(&id) else {
            warn!("hover on unknown marker {id}");
            return;
        };
        let position = marker.position;
        if self.selected != Some(id) {
            if let Some(content) = marker.rollover_content.clone() {
                let window = marker.window.clone();
                if let Some(open) = self.current_rollover.take() {
                    self.canvas.close_window(WindowKind::Rollover, open);
                }
                self.canvas
                    .open_window(WindowKind::Rollover, id, &content, &window);
                self.current_rollover = Some(id);
            }
        }
        if let Some(marker) = self.markers.get(&id) {
            marker.events.trigger(
                names::MARKER_MOUSEOVER,
                &EventPayload::for_marker(id, position),
            );
        }
    }

    fn handle_info_window_closed(&mut self, id: MarkerId) {
        if let Some(prev) = self.selected.take() {
            let icon = self
                .markers
                .get(&prev)
                .and_then(Marker::icon_config)
                .map(|config| config.default.clone());
            if let Some(icon) = icon {
                self.canvas.set_marker_icon(prev, &icon);
            }
        }
        if self.current_info_window == Some(id) {
            self.current_info_window = None;
        }
        if let Some(marker) = self.markers.get(&id) {
            let payload = EventPayload::for_marker(id, marker.position);
            marker.events.trigger(names::INFO_WINDOW_CLOSED, &payload);
        }
    }

    fn handle_shape_mouseover(&mut self, name: &str, position: LatLng) {
        let title = self
            .polygons
            .get(name)
            .and_then(|polygon| polygon.options.title.clone());
        if let Some(title) = title {
            if let Some(polygon) = self.polygons.get_mut(name) {
                polygon.emphasized = true;
            }
            self.canvas
                .set_shape_emphasis(name, ShapeEmphasis::emphasized());
            self.canvas.open_shape_title(name, &title, position);
        }
    }

    fn handle_shape_mouseout(&mut self, name: &str) {
        let emphasized = self
            .polygons
            .get(name)
            .map(|polygon| polygon.emphasized)
            .unwrap_or(false);
        if emphasized {
            if let Some(polygon) = self.polygons.get_mut(name) {
                polygon.emphasized = false;
            }
            self.canvas.set_shape_emphasis(name, ShapeEmphasis::base());
            self.canvas.close_shape_title(name);
        }
    }
}

impl DynamicMapAdapter for CanvasMapAdapter {
    fn load_script(&mut self, request: &ScriptRequest) -> Result<()> {
        let client = request
            .client_id
            .as_ref()
            .map(|id| format!("&client={id}"))
            .unwrap_or_default();
        let channel = request
            .channel_id
            .as_ref()
            .map(|id| format!("&channel={id}"))
            .unwrap_or_default();
        let url = format!(
            "{SDK_SCRIPT_BASE}?v=3&key={}{client}&sensor=false{channel}&language={}",
            request.key, request.locale
        );
        info!("injecting provider SDK script ({})", request.locale);
        self.loader.inject(&url)
    }

    fn setup(&mut self, request: &SetupRequest) -> Result<()> {
        self.canvas.bind(
            &request.container_selector,
            request.center,
            request.zoom,
            &request.controls,
        )?;
        self.controls = request.controls;
        // Declutter-vs-individual binding is decided once, here.
        self.clusterer = request.declutter.then(Clusterer::new);
        self.map_events.declare(&[
            names::MAP_CLICK,
            names::MAP_DBLCLICK,
            names::MAP_ZOOM,
            names::MARKERS_LOADED,
        ]);
        info!(
            "map bound to {} (zoom {}, declutter {})",
            request.container_selector, request.zoom, request.declutter
        );
        Ok(())
    }

    fn render_controls(&mut self) -> Result<()> {
        let controls = self.controls;
        self.canvas.render_controls(&controls);
        Ok(())
    }

    fn add_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        let id = self.create_marker(config, true);
        self.attach_marker(id);
        Ok(id)
    }

    fn add_html_marker(&mut self, config: MarkerConfig) -> Result<MarkerId> {
        let id = self.create_marker(config, false);
        self.attach_marker(id);
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) -> Result<()> {
        if !self.detach_marker(id) {
            debug!("remove_marker on unknown marker {id} is a no-op");
            return Ok(());
        }
        if self.clusterer.is_some() {
            self.rebuild_clusterer();
        }
        Ok(())
    }

    fn add_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.add_collection(markers, name, true)
    }

    fn add_html_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>> {
        self.add_collection(markers, name, false)
    }

    fn remove_marker_collection(&mut self, name: &str) -> Result<()> {
        let Some(ids) = self.collections.remove(name) else {
            debug!("remove_marker_collection on absent `{name}` is a no-op");
            return Ok(());
        };
        for id in ids {
            self.detach_marker(id);
        }
        if self.clusterer.is_some() {
            self.rebuild_clusterer();
        }
        Ok(())
    }

    fn get_marker_collection(&self, name: &str) -> Option<Vec<MarkerId>> {
        self.collections.get(name).cloned()
    }

    fn center(&mut self, position: LatLng) {
        self.canvas.set_center(position);
    }

    fn pan_to(&mut self, position: LatLng) {
        self.canvas.pan_to(position);
    }

    fn get_center(&self) -> LatLng {
        self.canvas.center()
    }

    fn best_fit(&mut self) {
        let positions: Vec<LatLng> = self
            .all_markers
            .iter()
            .filter_map(|id| self.markers.get(id).map(|m| m.position))
            .collect();
        match LatLngBounds::covering(positions.iter()) {
            Some(bounds) => self.canvas.fit_bounds(&bounds),
            // Fitting an empty marker set is a no-op.
            None => debug!("best_fit with no markers is a no-op"),
        }
    }

    fn street_zoom_level(&mut self) {
        self.canvas.set_zoom(STREET_ZOOM);
    }

    fn redraw(&mut self) {
        self.canvas.trigger_resize();
        if self.clusterer.is_some() {
            return;
        }
        // HTML overlays track their projected position on every redraw.
        let repositioned: Vec<(MarkerId, Point)> = self
            .all_markers
            .iter()
            .filter_map(|id| {
                let marker = self.markers.get(id)?;
                marker
                    .is_html()
                    .then(|| (*id, self.canvas.project(marker.position)))
            })
            .collect();
        for (id, at) in repositioned {
            self.canvas.move_overlay_node(id, at);
        }
    }

    fn add_polygon(
        &mut self,
        name: &str,
        path: Vec<LatLng>,
        options: PolygonOptions,
    ) -> Result<()> {
        self.canvas.draw_polygon(name, &path, &options);
        self.polygons.insert(
            name.to_string(),
            Polygon {
                name: name.to_string(),
                path,
                options,
                emphasized: false,
            },
        );
        Ok(())
    }

    fn get_polygon(&self, name: &str) -> Option<&Polygon> {
        self.polygons.get(name)
    }

    fn remove_polygon(&mut self, name: &str) {
        if self.polygons.remove(name).is_some() {
            self.canvas.erase_shape(name);
        }
    }

    fn add_line(&mut self, name: &str, path: Vec<LatLng>, options: LineOptions) -> Result<()> {
        self.canvas.draw_line(name, &path, &options);
        self.lines.insert(
            name.to_string(),
            Line {
                name: name.to_string(),
                path,
                options,
            },
        );
        Ok(())
    }

    fn get_line(&self, name: &str) -> Option<&Line> {
        self.lines.get(name)
    }

    fn remove_line(&mut self, name: &str) {
        if self.lines.remove(name).is_some() {
            self.canvas.erase_shape(name);
        }
    }

    fn add_listener(
        &mut self,
        target: EventTarget,
        event: &str,
        handler: EventHandler,
    ) -> Result<()> {
        match target {
            EventTarget::Map => {
                self.map_events.add_listener(event, handler);
                Ok(())
            }
            EventTarget::Marker(id) => match self.markers.get_mut(&id) {
                Some(marker) => {
                    marker.events.add_listener(event, handler);
                    Ok(())
                }
                None => Err(MapError::UnknownMarker(id)),
            },
        }
    }

    fn remove_listener(&mut self, target: EventTarget, event: &str) -> Result<()> {
        match target {
            EventTarget::Map => {
                self.map_events.remove_listeners(event);
                Ok(())
            }
            EventTarget::Marker(id) => match self.markers.get_mut(&id) {
                Some(marker) => {
                    marker.events.remove_listeners(event);
                    Ok(())
                }
                None => Err(MapError::UnknownMarker(id)),
            },
        }
    }

    fn add_map_listener(&mut self, event: &str, handler: EventHandler) -> Result<()> {
        self.add_listener(EventTarget::Map, event, handler)
    }

    fn remove_map_listener(&mut self, event: &str) -> Result<()> {
        self.remove_listener(EventTarget::Map, event)
    }

    fn change_marker_icon(&mut self, id: MarkerId, icon: &IconImage) -> Result<()> {
        match self.markers.get(&id) {
            Some(marker) if !marker.is_html() => {
                self.canvas.set_marker_icon(id, icon);
                Ok(())
            }
            Some(_) => Err(MapError::Configuration(format!(
                "marker {id} is an HTML marker and carries no icon"
            ))),
            None => Err(MapError::UnknownMarker(id)),
        }
    }

    fn dispatch_native(&mut self, event: NativeEvent) -> Result<()> {
        match event {
            NativeEvent::MapClick { position } => {
                self.map_events
                    .trigger(names::MAP_CLICK, &EventPayload::at(position));
            }
            NativeEvent::MapDoubleClick { position } => {
                self.map_events
                    .trigger(names::MAP_DBLCLICK, &EventPayload::at(position));
            }
            NativeEvent::ZoomChanged { zoom } => {
                if self.clusterer.is_some() {
                    self.refresh_clusters();
                }
                self.map_events
                    .trigger(names::MAP_ZOOM, &EventPayload::zoomed(zoom));
            }
            NativeEvent::MarkerClick { marker } => self.handle_marker_click(marker),
            NativeEvent::MarkerDoubleClick { marker } => {
                if let Some(m) = self.markers.get(&marker) {
                    m.events.trigger(
                        names::MARKER_DBLCLICK,
                        &EventPayload::for_marker(marker, m.position),
                    );
                }
            }
            NativeEvent::MarkerMouseOver { marker } => self.handle_marker_mouseover(marker),
            NativeEvent::InfoWindowClosed { marker } => self.handle_info_window_closed(marker),
            NativeEvent::ShapeMouseOver { name, position } => {
                self.handle_shape_mouseover(&name, position)
            }
            NativeEvent::ShapeMouseOut { name } => self.handle_shape_mouseout(&name),
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
