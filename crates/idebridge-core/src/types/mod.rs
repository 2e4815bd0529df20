//! Core types shared by the discovery, registry and dispatch layers
//!
//! This module contains the data model every component agrees on.

mod tool;
mod endpoint;
mod invocation;
mod cancellation;

pub use tool::ToolDescriptor;
pub use endpoint::{Endpoint, Fingerprint};
pub use invocation::{Invocation, InvocationResult};
pub use cancellation::CancellationToken;
