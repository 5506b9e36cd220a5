//! Prelude module for common omnimap types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use omnimap::prelude::*;`

pub use crate::core::{
    config::{ConfigOverrides, ControlsConfig, ControlsOverrides, MapConfig},
    contract::{dynamic_contract, static_contract, Capabilities, CapabilityContract},
    facade::{Backend, GlobalMap, InitState},
    geo::{LatLng, LatLngBounds, Point},
    runtime::{MapRuntime, SharedMap},
};

pub use crate::adapter::{
    CanvasMapAdapter, DynamicMapAdapter, EventTarget, IconConfig, IconImage, ImageSurface,
    MapCanvas, MarkerConfig, MarkerId, MemoryCanvas, MemoryImageSurface, MemoryScriptLoader,
    NativeEvent, ScriptLoader, ScriptRequest, SetupRequest, StaticImageAdapter, StaticMapAdapter,
    StaticMapOptions, StaticMarkers, WindowConfig, WindowKind,
};

pub use crate::events::{names as event_names, EventHandler, EventHub, EventPayload};

pub use crate::{Error as MapError, Result};

pub use std::rc::Rc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
