//! Tool call forwarding
//!
//! `POST {endpoint}/{tool}` with the arguments as body; the IDE answers
//! with a `{status, error}` envelope that is translated into an
//! [`InvocationResult`](crate::types::InvocationResult).

mod error;
mod envelope;
mod dispatcher;

pub use error::{DispatchError, DispatchResult};
pub use envelope::Envelope;
pub use dispatcher::CallDispatcher;
