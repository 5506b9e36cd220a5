//! # Omnimap
//!
//! A provider-agnostic mapping facade.
//!
//! Applications hold one [`GlobalMap`] per map instance; all real work is
//! delegated to a pluggable backend adapter verified against a fixed
//! capability contract: [`adapter::DynamicMapAdapter`] for interactive
//! maps, [`adapter::StaticMapAdapter`] for static image maps. The crate
//! owns the contract-verification boundary, the lazy script-loading state
//! machine shared by concurrent facades, and the marker/overlay/event
//! lifecycle model every conforming backend implements consistently;
//! provider rendering stays behind the adapter's boundary traits.

pub mod adapter;
pub mod core;
pub mod events;
pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{ConfigOverrides, ControlsConfig, ControlsOverrides, MapConfig},
    contract::{Capabilities, CapabilityContract},
    facade::{Backend, GlobalMap, InitState, ReadyCallback},
    geo::{LatLng, LatLngBounds, Point},
    runtime::{ExtensionFn, MapRuntime, SharedMap},
};

pub use adapter::{
    CanvasMapAdapter, DynamicMapAdapter, EventTarget, IconConfig, IconImage, MapCanvas, Marker,
    MarkerConfig, MarkerId, MemoryCanvas, MemoryImageSurface, MemoryScriptLoader, NativeEvent,
    ScriptLoader, StaticImageAdapter, StaticMapAdapter, StaticMapOptions, WindowKind,
};

pub use events::{EventHandler, EventPayload};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("adapter does not implement the {contract} contract: operation `{operation}` was not found")]
    ContractViolation { contract: String, operation: String },

    #[error("script load failed: {0}")]
    ScriptLoad(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("unknown marker: {0}")]
    UnknownMarker(MarkerId),

    #[error("operation `{0}` requires a completed map setup")]
    NotInitialized(&'static str),

    #[error("canvas error: {0}")]
    Canvas(String),
}

/// Error type alias for convenience
pub type Error = MapError;
