//! Tool registry errors
//!
//! These never reach the outward caller: listing degrades to cached or
//! static data instead.

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tool listing request failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Tool listing returned status {status}")]
    Status { status: u16 },

    #[error("Tool listing could not be decoded: {0}")]
    Decode(String),

    #[error("Tool fetch failed after {attempts} attempts: {last}")]
    ToolFetchFailure {
        attempts: u32,
        #[source]
        last: Box<RegistryError>,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
