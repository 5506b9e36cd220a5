//! Facade configuration and the two-layer merge.
//!
//! Configuration is resolved from built-in defaults plus a user-supplied
//! override set: a shallow merge where the user wins key-by-key. The nested
//! control flags overlay the all-enabled defaults individually, so enabling
//! one flag never disturbs the others.

use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Fully-resolved facade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    /// Locator for the element the map binds to.
    pub container_selector: String,
    /// Initial zoom value.
    pub default_zoom: f64,
    /// Geographic point the map is initially centered on.
    pub center: LatLng,
    /// Whether markers are grouped into clusters instead of rendered individually.
    pub declutter_enabled: bool,
    /// Which built-in controls the adapter renders.
    pub map_controls: ControlsConfig,
    /// Language code for map labels and messages.
    pub locale: String,
    /// Whether the provider SDK script is loaded on demand.
    pub lazyload: bool,
    /// Access key required when `lazyload` is enabled.
    pub key: Option<String>,
    pub client_id: Option<String>,
    pub channel_id: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_selector: "#map".to_string(),
            default_zoom: 7.0,
            center: LatLng::new(37.4419, -122.1419),
            declutter_enabled: false,
            map_controls: ControlsConfig::default(),
            locale: "en".to_string(),
            lazyload: true,
            key: None,
            client_id: None,
            channel_id: None,
        }
    }
}

impl MapConfig {
    /// Applies user overrides on top of this configuration, key-by-key.
    pub fn merged(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(selector) = overrides.container_selector {
            self.container_selector = selector;
        }
        if let Some(zoom) = overrides.default_zoom {
            self.default_zoom = zoom;
        }
        if let Some(lat) = overrides.center_to_lat {
            self.center.lat = lat;
        }
        if let Some(lng) = overrides.center_to_long {
            self.center.lng = lng;
        }
        if let Some(declutter) = overrides.declutter_enabled {
            self.declutter_enabled = declutter;
        }
        if let Some(controls) = overrides.map_controls {
            self.map_controls = self.map_controls.overlaid(controls);
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if let Some(lazyload) = overrides.lazyload {
            self.lazyload = lazyload;
        }
        if overrides.key.is_some() {
            self.key = overrides.key;
        }
        if overrides.client_id.is_some() {
            self.client_id = overrides.client_id;
        }
        if overrides.channel_id.is_some() {
            self.channel_id = overrides.channel_id;
        }
        self
    }
}

/// User-supplied configuration overrides. Every field is optional; absent
/// fields keep their built-in defaults. Field names follow the documented
/// JSON option keys so an override set can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub container_selector: Option<String>,
    pub default_zoom: Option<f64>,
    pub center_to_lat: Option<f64>,
    pub center_to_long: Option<f64>,
    pub declutter_enabled: Option<bool>,
    pub map_controls: Option<ControlsOverrides>,
    pub locale: Option<String>,
    pub lazyload: Option<bool>,
    pub key: Option<String>,
    pub client_id: Option<String>,
    pub channel_id: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = Some(selector.into());
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.default_zoom = Some(zoom);
        self
    }

    pub fn with_center(mut self, lat: f64, lng: f64) -> Self {
        self.center_to_lat = Some(lat);
        self.center_to_long = Some(lng);
        self
    }

    pub fn with_declutter(mut self, enabled: bool) -> Self {
        self.declutter_enabled = Some(enabled);
        self
    }

    pub fn with_controls(mut self, controls: ControlsOverrides) -> Self {
        self.map_controls = Some(controls);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_lazyload(mut self, lazyload: bool) -> Self {
        self.lazyload = Some(lazyload);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// Which built-in controls the adapter renders. Every flag defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsConfig {
    pub pan: bool,
    pub zoom: bool,
    pub map_type: bool,
    pub street_view: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            pan: true,
            zoom: true,
            map_type: true,
            street_view: true,
        }
    }
}

impl ControlsConfig {
    /// Overlays user-supplied flags individually onto this configuration.
    pub fn overlaid(mut self, overrides: ControlsOverrides) -> Self {
        if let Some(pan) = overrides.pan {
            self.pan = pan;
        }
        if let Some(zoom) = overrides.zoom {
            self.zoom = zoom;
        }
        if let Some(map_type) = overrides.map_type {
            self.map_type = map_type;
        }
        if let Some(street_view) = overrides.street_view {
            self.street_view = street_view;
        }
        self
    }
}

/// Per-flag control overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlsOverrides {
    pub pan: Option<bool>,
    pub zoom: Option<bool>,
    pub map_type: Option<bool>,
    pub street_view: Option<bool>,
}
