//! Engine-wide constants shared by the facade and the built-in adapters.
//! Keeping them in a single place makes it easier to tweak crate-wide magic numbers.

/// World-pixel scale of the base zoom level (one 256px tile covers the world at z0).
pub const WORLD_TILE_SIZE: f64 = 256.0;

/// Zoom level applied by `street_zoom_level`.
pub const STREET_ZOOM: f64 = 16.0;

/// Default horizontal offset (pixels) from a marker to its info/rollover window.
pub const WINDOW_X_OFFSET: i32 = -130;

/// Default vertical offset (pixels) from a marker to its info/rollover window.
pub const WINDOW_Y_OFFSET: i32 = -50;

/// Stroke weight applied to a titled polygon while hovered.
pub const EMPHASIS_STROKE_WEIGHT: f64 = 4.0;

/// Fill opacity applied to a titled polygon while hovered.
pub const EMPHASIS_FILL_OPACITY: f64 = 0.7;

/// Stroke weight a polygon reverts to on hover-out.
pub const BASE_STROKE_WEIGHT: f64 = 3.0;

/// Fill opacity a polygon reverts to on hover-out.
pub const BASE_FILL_OPACITY: f64 = 0.3;

/// Grid cell size (pixels) used by the marker clusterer.
pub const CLUSTER_GRID_SIZE: f64 = 60.0;

/// Base endpoint the interactive adapter loads the provider SDK from.
pub const SDK_SCRIPT_BASE: &str = "http://maps.googleapis.com/maps/api/js";

/// Base endpoint static image URLs are built against.
pub const STATIC_MAP_BASE: &str = "http://maps.googleapis.com/maps/api/staticmap";
