//! Backend endpoint discovery
//!
//! The IDE publishes its automation API on one port of a small range, and
//! may move between restarts. Discovery keeps one trusted endpoint:
//!
//! ```text
//!  EndpointResolver ──probe──▶ LivenessProber ──GET list_tools──▶ IDE
//!        │
//!        └─publish/clear──▶ EndpointState ◀──read── ToolRegistry, CallDispatcher
//! ```

mod error;
mod state;
mod prober;
mod resolver;

pub use error::{DiscoveryError, DiscoveryResult};
pub use state::{EndpointState, SharedEndpointState};
pub use prober::{LivenessProber, ProbeOutcome};
pub use resolver::{EndpointResolver, Resolution, ResolverSettings};
