//! Current endpoint and its probe fingerprint
//!
//! Writers build a complete value first and then swap a pointer, so a
//! reader sees either the old endpoint or the new one, never a mix. Locks
//! are only held for the swap and never across an `.await`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::types::{Endpoint, Fingerprint};

/// The single "current" endpoint shared by registry and dispatcher
#[derive(Debug, Default)]
pub struct EndpointState {
    current: RwLock<Option<Arc<Endpoint>>>,
    fingerprint: Mutex<Option<Fingerprint>>,
}

/// Type alias for an Arc-wrapped state
pub type SharedEndpointState = Arc<EndpointState>;

impl EndpointState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current endpoint
    pub fn current(&self) -> Option<Arc<Endpoint>> {
        self.current.read().clone()
    }

    pub fn has_endpoint(&self) -> bool {
        self.current.read().is_some()
    }

    /// Make `endpoint` current. Returns the endpoint it replaced.
    pub fn publish(&self, endpoint: Arc<Endpoint>) -> Option<Arc<Endpoint>> {
        self.current.write().replace(endpoint)
    }

    /// Forget the current endpoint and its fingerprint
    pub fn clear(&self) -> Option<Arc<Endpoint>> {
        let previous = self.current.write().take();
        self.fingerprint.lock().take();
        previous
    }

    /// Clear only if `endpoint` is still the current one.
    ///
    /// Returns whether anything was cleared. A concurrent publish of a
    /// different endpoint is left alone.
    pub fn clear_if(&self, endpoint: &Endpoint) -> bool {
        let mut current = self.current.write();
        if current.as_deref() == Some(endpoint) {
            *current = None;
            drop(current);
            self.fingerprint.lock().take();
            true
        } else {
            false
        }
    }

    /// Store a new fingerprint and report whether it differs from a
    /// previously recorded one. The first fingerprint is never a change.
    pub fn record_fingerprint(&self, fingerprint: Fingerprint) -> bool {
        let mut slot = self.fingerprint.lock();
        let changed = matches!(slot.as_ref(), Some(previous) if *previous != fingerprint);
        *slot = Some(fingerprint);
        changed
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint.lock().clone()
    }
}
