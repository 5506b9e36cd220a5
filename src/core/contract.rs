//! Runtime-checked capability contracts for backend adapters.
//!
//! Compile-time conformance is carried by the adapter traits; this module
//! keeps the all-or-nothing runtime check at the one boundary where it still
//! matters (facade construction), so an adapter loaded as a plugin cannot
//! partially implement the contract and fail later deep in a call chain.

use crate::{MapError, Result};
use once_cell::sync::Lazy;

/// Operation names every interactive adapter must expose.
pub const DYNAMIC_OPERATIONS: &[&str] = &[
    "load_script",
    "setup",
    "render_controls",
    "add_marker",
    "add_html_marker",
    "center",
    "pan_to",
    "remove_marker",
    "add_marker_collection",
    "add_html_marker_collection",
    "remove_marker_collection",
    "best_fit",
    "add_polygon",
    "get_polygon",
    "remove_polygon",
    "add_line",
    "get_line",
    "remove_line",
    "add_listener",
    "add_map_listener",
    "remove_listener",
    "remove_map_listener",
    "get_marker_collection",
    "get_center",
    "change_marker_icon",
    "street_zoom_level",
    "redraw",
];

/// Operation names every static adapter must expose.
pub const STATIC_OPERATIONS: &[&str] = &["setup", "render_controls"];

static DYNAMIC_CONTRACT: Lazy<CapabilityContract> = Lazy::new(|| {
    CapabilityContract::define("DynamicMapContract", DYNAMIC_OPERATIONS)
        .expect("built-in dynamic contract is well formed")
});

static STATIC_CONTRACT: Lazy<CapabilityContract> = Lazy::new(|| {
    CapabilityContract::define("StaticMapContract", STATIC_OPERATIONS)
        .expect("built-in static contract is well formed")
});

/// The contract interactive adapters are verified against.
pub fn dynamic_contract() -> &'static CapabilityContract {
    &DYNAMIC_CONTRACT
}

/// The contract static adapters are verified against.
pub fn static_contract() -> &'static CapabilityContract {
    &STATIC_CONTRACT
}

/// Implemented by anything that can advertise its operation set for
/// verification.
pub trait Capabilities {
    fn operations(&self) -> Vec<&'static str>;
}

/// A named set of required operation signatures. Immutable after `define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityContract {
    name: String,
    required_operations: Vec<String>,
}

impl CapabilityContract {
    /// Defines a new contract. The operation list must be non-empty and
    /// free of duplicates; the name must be non-empty.
    pub fn define(name: &str, operations: &[&str]) -> Result<Self> {
        if name.is_empty() {
            return Err(MapError::Configuration(
                "contract name must be non-empty".to_string(),
            ));
        }
        if operations.is_empty() {
            return Err(MapError::Configuration(format!(
                "contract {name} requires at least one operation"
            )));
        }
        let mut required_operations = Vec::with_capacity(operations.len());
        for op in operations {
            if required_operations.iter().any(|seen| seen == op) {
                return Err(MapError::Configuration(format!(
                    "contract {name} lists operation `{op}` more than once"
                )));
            }
            required_operations.push((*op).to_string());
        }
        Ok(Self {
            name: name.to_string(),
            required_operations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_operations(&self) -> &[String] {
        &self.required_operations
    }
}

/// Checks that the candidate advertises every operation of every given
/// contract. Pure validation, no side effects; fails on the first missing
/// operation, naming it and the contract it belongs to.
pub fn verify(candidate: &dyn Capabilities, contracts: &[&CapabilityContract]) -> Result<()> {
    let provided = candidate.operations();
    for contract in contracts {
        for operation in &contract.required_operations {
            if !provided.iter().any(|op| op == operation) {
                return Err(MapError::ContractViolation {
                    contract: contract.name.clone(),
                    operation: operation.clone(),
                });
            }
        }
    }
    Ok(())
}
