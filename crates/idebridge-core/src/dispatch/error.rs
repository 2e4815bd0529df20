//! Invocation-time errors
//!
//! Each of these is reported to the caller as an error-flagged result.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No IDE endpoint is available; make sure the IDE is running with its automation API enabled")]
    NoEndpoint,

    #[error("Invalid tool name {0:?}")]
    InvalidToolName(String),

    #[error("Transport failure calling {tool}: {detail}")]
    TransportFailure {
        tool: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("Protocol violation from {tool}: {detail}")]
    ProtocolViolation { tool: String, detail: String },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
