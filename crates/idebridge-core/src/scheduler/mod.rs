//! Periodic endpoint refresh
//!
//! One tick re-resolves the endpoint. When the endpoint or its
//! fingerprint moved, the registry snapshot is invalidated and the host
//! is told that the tool list changed.

mod notifier;
mod refresh;

pub use notifier::{ChangeNotifier, NoOpNotifier, SharedNotifier};
pub use refresh::{RefreshScheduler, SchedulerHandle, TickOutcome};
