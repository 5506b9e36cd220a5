//! The map runtime: explicit home for what would otherwise be ambient
//! process-wide state.
//!
//! A `MapRuntime` owns the facade registry, the script-load flags, the FIFO
//! queue of setups waiting on an in-flight load, and the extension table
//! shared by every facade it creates. At most one script load is ever in
//! flight per runtime; setups queued behind it run in strict FIFO order
//! after the initiator's own setup. Everything here runs on the single host
//! event thread, so handles are deliberately not `Send`.

use crate::core::facade::{run_setup, GlobalMap};
use crate::MapError;
use crate::prelude::HashMap;
use crate::Result;
use log::{debug, info, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Shared handle to a facade. The registry keeps one alive for the runtime's
/// lifetime; callers hold clones.
pub type SharedMap = Rc<RefCell<GlobalMap>>;

/// A registered extension operation.
pub type ExtensionFn = Rc<dyn Fn(&mut GlobalMap, Value) -> Result<Value>>;

pub(crate) type ExtensionTable = Rc<RefCell<HashMap<String, ExtensionFn>>>;

#[derive(Default)]
pub struct MapRuntime {
    registry: HashMap<String, SharedMap>,
    script_loaded: bool,
    script_loading: bool,
    load_initiator: Option<String>,
    pending_setups: VecDeque<String>,
    extensions: ExtensionTable,
}

impl MapRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a facade by its instance key.
    pub fn get(&self, instance: &str) -> Option<SharedMap> {
        self.registry.get(instance).cloned()
    }

    pub fn script_loaded(&self) -> bool {
        self.script_loaded
    }

    pub fn script_loading(&self) -> bool {
        self.script_loading
    }

    /// Number of setups queued behind the in-flight script load.
    pub fn pending_count(&self) -> usize {
        self.pending_setups.len()
    }

    /// Installs an operation callable on every facade of this runtime,
    /// including facades created before the registration.
    pub fn register_operation<F>(&mut self, name: impl Into<String>, operation: F)
    where
        F: Fn(&mut GlobalMap, Value) -> Result<Value> + 'static,
    {
        let name = name.into();
        debug!("registered extension operation `{name}`");
        self.extensions
            .borrow_mut()
            .insert(name, Rc::new(operation));
    }

    /// Signals that the provider SDK script became usable. Runs the
    /// initiator's setup, then drains the pending queue in FIFO order.
    /// Every affected facade's completion callback fires exactly once.
    pub fn script_load_complete(&mut self) -> Result<()> {
        if !self.script_loading {
            debug!("script_load_complete with no load in flight");
        }
        self.script_loaded = true;
        info!(
            "script load complete; running {} queued setup(s)",
            self.pending_setups.len() + usize::from(self.load_initiator.is_some())
        );

        let mut to_run: Vec<String> = Vec::new();
        if let Some(initiator) = self.load_initiator.take() {
            to_run.push(initiator);
        }
        to_run.extend(self.pending_setups.drain(..));

        let mut first_error = None;
        for key in to_run {
            let Some(shared) = self.registry.get(&key).cloned() else {
                continue;
            };
            shared.borrow_mut().mark_script_loaded();
            if let Err(err) = run_setup(&shared) {
                warn!("setup of `{key}` failed after script load: {err}");
                first_error.get_or_insert(err);
            }
        }
        self.script_loading = false;
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Signals that the in-flight script load failed. The failure is
    /// surfaced to the initiator's and every queued facade's completion
    /// callback, in FIFO order; a later facade may initiate a fresh load.
    pub fn script_load_fail(&mut self, reason: &str) {
        warn!("script load failed: {reason}");
        self.script_loaded = false;

        let mut affected: Vec<String> = Vec::new();
        if let Some(initiator) = self.load_initiator.take() {
            affected.push(initiator);
        }
        affected.extend(self.pending_setups.drain(..));
        for key in affected {
            if let Some(shared) = self.registry.get(&key).cloned() {
                let callback = shared.borrow_mut().fail_load();
                if let Some(callback) = callback {
                    callback(Err(MapError::ScriptLoad(reason.to_string())));
                }
            }
        }
        self.script_loading = false;
    }

    pub(crate) fn extensions_handle(&self) -> ExtensionTable {
        self.extensions.clone()
    }

    /// Last write wins; a prior facade under the same key is dropped from
    /// the registry.
    pub(crate) fn register_map(&mut self, key: String, map: SharedMap) {
        self.registry.insert(key, map);
    }

    pub(crate) fn unregister_map(&mut self, key: &str) {
        self.registry.remove(key);
    }

    pub(crate) fn begin_script_load(&mut self, initiator: &str) {
        self.script_loading = true;
        self.load_initiator = Some(initiator.to_string());
    }

    pub(crate) fn abort_script_load(&mut self) {
        self.script_loading = false;
        self.load_initiator = None;
    }

    pub(crate) fn enqueue_setup(&mut self, key: String) {
        debug!("queueing setup of `{key}` behind the in-flight script load");
        self.pending_setups.push_back(key);
    }
}
