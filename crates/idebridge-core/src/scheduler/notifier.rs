//! Outward "tools changed" notification

use std::sync::Arc;

use async_trait::async_trait;

/// Receives capability change events from the scheduler.
///
/// Implementations must not fail; a host that cannot deliver the
/// notification drops it.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn tools_changed(&self);
}

pub type SharedNotifier = Arc<dyn ChangeNotifier>;

/// Notifier that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChangeNotifier for NoOpNotifier {
    async fn tools_changed(&self) {}
}
