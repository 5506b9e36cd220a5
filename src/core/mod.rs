pub mod config;
pub mod constants;
pub mod contract;
pub mod facade;
pub mod geo;
pub mod runtime;

pub use config::{ConfigOverrides, ControlsConfig, ControlsOverrides, MapConfig};
pub use contract::{dynamic_contract, static_contract, Capabilities, CapabilityContract};
pub use facade::{Backend, GlobalMap, InitState, ReadyCallback};
pub use geo::{LatLng, LatLngBounds, Point};
pub use runtime::{ExtensionFn, MapRuntime, SharedMap};
