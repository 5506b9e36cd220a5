//! Backend adapters and the boundaries they render through.
//!
//! The facade drives a backend through one of two capability traits:
//! [`DynamicMapAdapter`] for interactive maps and [`StaticMapAdapter`] for
//! static image maps. Everything provider-specific (DOM work, SDK calls,
//! script injection) sits behind the boundary traits ([`MapCanvas`],
//! [`ScriptLoader`], [`ImageSurface`]), which this crate only calls.

pub mod cluster;
pub mod interactive;
pub mod marker;
pub mod memory;
pub mod shapes;
pub mod static_map;

pub use cluster::{ClusterCell, Clusterer};
pub use interactive::CanvasMapAdapter;
pub use marker::{IconConfig, IconImage, Marker, MarkerConfig, MarkerId, MarkerKind, WindowConfig};
pub use memory::{CanvasCall, MemoryCanvas, MemoryImageSurface, MemoryScriptLoader};
pub use shapes::{Line, LineOptions, Polygon, PolygonOptions, ShapeEmphasis};
pub use static_map::{StaticImageAdapter, StaticMapOptions, StaticMarkers};

use crate::core::config::ControlsConfig;
use crate::core::contract::{DYNAMIC_OPERATIONS, STATIC_OPERATIONS};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::events::EventHandler;
use crate::Result;

/// What the facade hands an adapter when a lazy script load is initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub key: String,
    pub locale: String,
    pub client_id: Option<String>,
    pub channel_id: Option<String>,
}

/// What the facade hands an adapter at setup time.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupRequest {
    pub container_selector: String,
    pub zoom: f64,
    pub center: LatLng,
    pub declutter: bool,
    pub controls: ControlsConfig,
}

/// The two transient popup kinds a marker may own. At most one window of
/// each kind is open per adapter at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// Click-triggered window.
    Info,
    /// Hover-triggered window.
    Rollover,
}

/// Addressee of a listener operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Map,
    Marker(MarkerId),
}

/// Provider-native events the host feeds into an interactive adapter. The
/// adapter normalizes them into the named events of [`crate::events`].
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    MapClick { position: LatLng },
    MapDoubleClick { position: LatLng },
    ZoomChanged { zoom: f64 },
    MarkerClick { marker: MarkerId },
    MarkerDoubleClick { marker: MarkerId },
    MarkerMouseOver { marker: MarkerId },
    InfoWindowClosed { marker: MarkerId },
    ShapeMouseOver { name: String, position: LatLng },
    ShapeMouseOut { name: String },
}

/// The native mapping surface an interactive adapter renders through.
/// Implementations own all DOM/SDK specifics; the adapter owns all policy.
pub trait MapCanvas {
    fn bind(
        &mut self,
        container_selector: &str,
        center: LatLng,
        zoom: f64,
        controls: &ControlsConfig,
    ) -> Result<()>;
    fn render_controls(&mut self, controls: &ControlsConfig);

    fn center(&self) -> LatLng;
    fn zoom(&self) -> f64;
    fn set_center(&mut self, center: LatLng);
    fn pan_to(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: f64);
    fn fit_bounds(&mut self, bounds: &LatLngBounds);
    fn trigger_resize(&mut self);

    /// Projects a geographic position to the canvas's pixel space.
    fn project(&self, position: LatLng) -> Point;

    fn place_marker(&mut self, id: MarkerId, position: LatLng, icon: Option<&IconImage>);
    fn remove_marker(&mut self, id: MarkerId);
    fn set_marker_icon(&mut self, id: MarkerId, icon: &IconImage);

    fn place_overlay_node(&mut self, id: MarkerId, html: &str, at: Point);
    fn move_overlay_node(&mut self, id: MarkerId, at: Point);
    fn remove_overlay_node(&mut self, id: MarkerId);

    fn open_window(
        &mut self,
        kind: WindowKind,
        marker: MarkerId,
        content: &str,
        window: &WindowConfig,
    );
    fn close_window(&mut self, kind: WindowKind, marker: MarkerId);

    fn draw_polygon(&mut self, name: &str, path: &[LatLng], options: &PolygonOptions);
    fn draw_line(&mut self, name: &str, path: &[LatLng], options: &LineOptions);
    fn set_shape_emphasis(&mut self, name: &str, emphasis: ShapeEmphasis);
    fn erase_shape(&mut self, name: &str);
    fn open_shape_title(&mut self, name: &str, title: &str, at: LatLng);
    fn close_shape_title(&mut self, name: &str);

    fn place_cluster(&mut self, center: LatLng, count: usize);
    fn clear_clusters(&mut self);

    fn as_any(&self) -> &dyn std::any::Any;
}

/// Injects the provider SDK script. Invoked at most once per runtime; the
/// host signals completion through `MapRuntime::script_load_complete`.
pub trait ScriptLoader {
    fn inject(&mut self, url: &str) -> Result<()>;
}

/// The image element a static adapter binds its computed URL to.
pub trait ImageSurface {
    fn bind_image(&mut self, container_selector: &str, url: &str) -> Result<()>;
}

/// Capability contract for interactive backends. The default `operations`
/// list conforms to the dynamic contract; an adapter overriding it with a
/// smaller set is rejected at facade construction.
pub trait DynamicMapAdapter {
    fn load_script(&mut self, request: &ScriptRequest) -> Result<()>;
    fn setup(&mut self, request: &SetupRequest) -> Result<()>;
    fn render_controls(&mut self) -> Result<()>;

    fn add_marker(&mut self, config: MarkerConfig) -> Result<MarkerId>;
    fn add_html_marker(&mut self, config: MarkerConfig) -> Result<MarkerId>;
    fn remove_marker(&mut self, id: MarkerId) -> Result<()>;

    fn add_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>>;
    fn add_html_marker_collection(
        &mut self,
        markers: Vec<MarkerConfig>,
        name: &str,
    ) -> Result<Vec<MarkerId>>;
    fn remove_marker_collection(&mut self, name: &str) -> Result<()>;
    fn get_marker_collection(&self, name: &str) -> Option<Vec<MarkerId>>;

    fn center(&mut self, position: LatLng);
    fn pan_to(&mut self, position: LatLng);
    fn get_center(&self) -> LatLng;
    fn best_fit(&mut self);
    fn street_zoom_level(&mut self);
    fn redraw(&mut self);

    fn add_polygon(&mut self, name: &str, path: Vec<LatLng>, options: PolygonOptions)
        -> Result<()>;
    fn get_polygon(&self, name: &str) -> Option<&Polygon>;
    fn remove_polygon(&mut self, name: &str);

    fn add_line(&mut self, name: &str, path: Vec<LatLng>, options: LineOptions) -> Result<()>;
    fn get_line(&self, name: &str) -> Option<&Line>;
    fn remove_line(&mut self, name: &str);

    fn add_listener(&mut self, target: EventTarget, event: &str, handler: EventHandler)
        -> Result<()>;
    fn remove_listener(&mut self, target: EventTarget, event: &str) -> Result<()>;
    fn add_map_listener(&mut self, event: &str, handler: EventHandler) -> Result<()>;
    fn remove_map_listener(&mut self, event: &str) -> Result<()>;

    fn change_marker_icon(&mut self, id: MarkerId, icon: &IconImage) -> Result<()>;

    /// Feeds one provider-native event through the adapter's normalization
    /// and window/selection semantics.
    fn dispatch_native(&mut self, event: NativeEvent) -> Result<()>;

    /// Operation names advertised for contract verification.
    fn operations(&self) -> Vec<&'static str> {
        DYNAMIC_OPERATIONS.to_vec()
    }

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Capability contract for static image backends.
pub trait StaticMapAdapter {
    fn setup(&mut self, request: &SetupRequest) -> Result<()>;
    fn render_controls(&mut self) -> Result<()>;

    /// Operation names advertised for contract verification.
    fn operations(&self) -> Vec<&'static str> {
        STATIC_OPERATIONS.to_vec()
    }

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
