//! Tool registry module
//!
//! Blends the fixed default catalog with the tools the IDE reports,
//! caching the remote half for a limited time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │                                             │
//! │  - static catalog (always listed)           │
//! │  - remote snapshot (TTL, stale fallback)    │
//! │  - merge by name, remote overrides static   │
//! └─────────────────────────────────────────────┘
//!           │
//!           │ GET {endpoint}/list_tools  (retried with backoff)
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  IDE automation API                         │
//! └─────────────────────────────────────────────┘
//! ```

mod error;
mod snapshot;
mod retry;
mod registry;
pub mod catalog;

pub use error::{RegistryError, RegistryResult};
pub use snapshot::{merge_tools, ToolListPayload, ToolRegistrySnapshot};
pub use retry::{RetryExhausted, RetryPolicy};
pub use registry::{RegistrySettings, ToolRegistry};
