//! Marker data model shared by the facade and the interactive adapter.

use crate::core::constants::{WINDOW_X_OFFSET, WINDOW_Y_OFFSET};
use crate::core::geo::LatLng;
use crate::events::{EventHandler, EventHub};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a marker owned by an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One icon image: URL plus display size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl IconImage {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}

/// Marker icon specification: the default image and an optional variant
/// shown while the marker is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    pub default: IconImage,
    pub selected: Option<IconImage>,
}

impl IconConfig {
    pub fn new(default: IconImage) -> Self {
        Self {
            default,
            selected: None,
        }
    }

    pub fn with_selected(mut self, selected: IconImage) -> Self {
        self.selected = Some(selected);
        self
    }
}

/// Info/rollover window placement and styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    /// CSS class applied to the window box; the default styling is used
    /// when absent.
    pub css_class: Option<String>,
    /// Horizontal offset in pixels from the marker's projected position.
    pub x_offset: i32,
    /// Vertical offset in pixels from the marker's projected position.
    pub y_offset: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            css_class: None,
            x_offset: WINDOW_X_OFFSET,
            y_offset: WINDOW_Y_OFFSET,
        }
    }
}

/// Caller-facing marker construction options.
pub struct MarkerConfig {
    pub position: LatLng,
    pub icon: Option<IconConfig>,
    /// Raw HTML content; used by the HTML-marker construction path.
    pub html: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Suppresses the info window on click.
    pub disable_open_on_click: bool,
    pub window: WindowConfig,
    /// Custom listeners attached at creation, keyed by event name.
    pub listeners: Vec<(String, EventHandler)>,
}

impl MarkerConfig {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            icon: None,
            html: None,
            title: None,
            content: None,
            disable_open_on_click: false,
            window: WindowConfig::default(),
            listeners: Vec::new(),
        }
    }

    pub fn at(lat: f64, lng: f64) -> Self {
        Self::new(LatLng::new(lat, lng))
    }

    pub fn with_icon(mut self, icon: IconConfig) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_listener(mut self, event: impl Into<String>, handler: EventHandler) -> Self {
        self.listeners.push((event.into(), handler));
        self
    }

    pub fn without_open_on_click(mut self) -> Self {
        self.disable_open_on_click = true;
        self
    }
}

/// How a marker is rendered on the canvas.
pub enum MarkerKind {
    /// Provider-native marker, optionally with a custom icon.
    Icon(Option<IconConfig>),
    /// Screen-space overlay node containing caller-supplied HTML.
    Html(String),
}

/// A marker owned by an adapter. Collections and the flat marker list hold
/// `MarkerId` references into the adapter's marker table, never copies.
pub struct Marker {
    pub id: MarkerId,
    pub position: LatLng,
    pub kind: MarkerKind,
    /// Content shown in the click-triggered info window, if any.
    pub info_content: Option<String>,
    /// Content shown in the hover-triggered rollover window, if any.
    pub rollover_content: Option<String>,
    pub window: WindowConfig,
    pub disable_open_on_click: bool,
    pub(crate) events: EventHub,
}

impl Marker {
    pub fn icon_config(&self) -> Option<&IconConfig> {
        match &self.kind {
            MarkerKind::Icon(icon) => icon.as_ref(),
            MarkerKind::Html(_) => None,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self.kind, MarkerKind::Html(_))
    }
}

/// Combines a marker's title and body into window content. A window is only
/// created when there is something to show.
pub(crate) fn window_content(title: Option<&str>, content: Option<&str>) -> Option<String> {
    let body = content.unwrap_or("");
    let combined = match title {
        Some(title) => format!("{title}{body}"),
        None => body.to_string(),
    };
    if combined.is_empty() {
        None
    } else {
        Some(combined)
    }
}
