//! IDE Bridge Core
//!
//! Runtime-agnostic plumbing between an outward tool protocol and an
//! IDE's local HTTP automation API. The IDE listens on one port of a
//! small range and may move between restarts; this crate finds it,
//! keeps a cached view of its tools, and forwards calls.
//!
//! ## Components
//!
//! - `discovery`: liveness probing and endpoint resolution
//! - `tools`: static catalog merged with the IDE's tool list (TTL cache, retries)
//! - `dispatch`: `POST {endpoint}/{tool}` and `{status, error}` envelope translation
//! - `scheduler`: periodic re-resolution and "tools changed" notifications
//! - `bridge`: facade wiring all of the above around one shared state
//!
//! ```rust,ignore
//! use idebridge_core::{Bridge, BridgeConfig, HttpBackend, NoOpLogger, NoOpNotifier};
//! use idebridge_core::tools::catalog;
//!
//! let config = BridgeConfig::load(None)?;
//! let backend = Arc::new(HttpBackend::new(config.request_timeout(), config.call_timeout())?);
//! let bridge = Bridge::new(config, backend, catalog::default_tools(), Arc::new(NoOpNotifier), logger)?;
//!
//! let handle = bridge.start().await.ok_or("refresh loop already running")?;
//! let tools = bridge.list_tools().await;
//! let result = bridge.call_tool("get_open_in_editor_file_text", serde_json::json!({})).await;
//! handle.stop().await;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod backend;
pub mod discovery;
pub mod tools;
pub mod dispatch;
pub mod scheduler;
pub mod bridge;

// Re-export commonly used types
pub use types::{
    ToolDescriptor, Endpoint, Fingerprint,
    Invocation, InvocationResult,
    CancellationToken,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, MemoryLogger};

pub use config::{BridgeConfig, ConfigError, ConfigResult, FileConfigSource};

pub use backend::{Backend, BackendError, BackendResponse, SharedBackend, HttpBackend, MockBackend, MockReply};

pub use discovery::{DiscoveryError, EndpointResolver, EndpointState, LivenessProber, Resolution};

pub use tools::{RegistryError, ToolRegistry, ToolRegistrySnapshot};

pub use dispatch::{CallDispatcher, DispatchError};

pub use scheduler::{ChangeNotifier, NoOpNotifier, RefreshScheduler, SchedulerHandle, TickOutcome};

pub use bridge::Bridge;
