//! Discovery errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// No candidate answered its liveness check
    #[error("No IDE endpoint reachable (tried {tried})")]
    EndpointUnreachable { tried: String },
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
