//! HTTP access to the IDE automation API
//!
//! Every network call made by the core goes through the [`Backend`] trait:
//!
//! - `HttpBackend`: `reqwest`-based implementation used in production
//! - `MockBackend`: scripted responses for tests, no sockets involved

mod error;
mod traits;
mod http;
mod mock;

pub use error::{BackendError, BackendResult};
pub use traits::{Backend, BackendResponse, SharedBackend};
pub use http::HttpBackend;
pub use mock::{MockBackend, MockReply, RecordedCall};
