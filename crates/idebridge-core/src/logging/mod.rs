//! Logging abstractions for runtime-agnostic logging
//!
//! The core never picks a logging backend itself. Hosts inject an
//! `Arc<dyn Logger>`; the server binary bridges it to `tracing`.

mod traits;
mod noop;
mod memory;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use memory::{LogEntry, LogLevel, MemoryLogger};
