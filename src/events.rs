//! Named, re-triggerable events on map and marker objects.
//!
//! Adapters normalize provider-native events into the names declared here.
//! Declaring an event up front lets it be triggered before any listener is
//! attached; triggering a name with no listeners is a no-op.

use crate::adapter::marker::MarkerId;
use crate::core::geo::LatLng;
use crate::prelude::{HashMap, HashSet};
use std::rc::Rc;

/// Event names triggered by the built-in adapters.
pub mod names {
    /// Fired when the map is clicked.
    pub const MAP_CLICK: &str = "mapclick";
    /// Fired when the map is double clicked.
    pub const MAP_DBLCLICK: &str = "mapdblclick";
    /// Fired when the map zoom changes.
    pub const MAP_ZOOM: &str = "mapzoom";
    /// Fired once per marker-collection batch after it is loaded.
    pub const MARKERS_LOADED: &str = "markersloaded";
    /// Fired when a marker is clicked.
    pub const MARKER_CLICK: &str = "markerclick";
    /// Fired when a marker is double clicked.
    pub const MARKER_DBLCLICK: &str = "markerdblclick";
    /// Fired when the pointer enters a marker.
    pub const MARKER_MOUSEOVER: &str = "markermouseover";
    /// Fired when a marker's info window is closed.
    pub const INFO_WINDOW_CLOSED: &str = "infowindowclosed";
}

/// Normalized payload delivered to event handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPayload {
    pub position: Option<LatLng>,
    pub marker: Option<MarkerId>,
    pub zoom: Option<f64>,
}

impl EventPayload {
    pub fn at(position: LatLng) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn for_marker(marker: MarkerId, position: LatLng) -> Self {
        Self {
            position: Some(position),
            marker: Some(marker),
            ..Default::default()
        }
    }

    pub fn zoomed(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Default::default()
        }
    }
}

/// Handler invoked when a named event is triggered.
pub type EventHandler = Rc<dyn Fn(&EventPayload)>;

/// Per-object event table: the declared event names plus attached listeners.
#[derive(Default)]
pub struct EventHub {
    declared: HashSet<String>,
    listeners: HashMap<String, Vec<EventHandler>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-declares a set of named events so they can be triggered before
    /// any listener is attached.
    pub fn declare(&mut self, names: &[&str]) {
        for name in names {
            self.declared.insert((*name).to_string());
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn add_listener(&mut self, name: &str, handler: EventHandler) {
        self.listeners
            .entry(name.to_string())
            .or_default()
            .push(handler);
    }

    /// Removes every listener attached to the named event. Absent names are
    /// a no-op; the declaration survives so the event stays triggerable.
    pub fn remove_listeners(&mut self, name: &str) {
        self.listeners.remove(name);
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// Invokes every listener attached to the named event, in attach order.
    pub fn trigger(&self, name: &str, payload: &EventPayload) {
        // Handlers are cloned out first so one may re-enter the hub's owner.
        let handlers: Vec<EventHandler> = match self.listeners.get(name) {
            Some(handlers) => handlers.clone(),
            None => return,
        };
        for handler in handlers {
            handler(payload);
        }
    }
}
