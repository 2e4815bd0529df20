//! Mock backend for testing
//!
//! Provides deterministic, scripted responses without network access.
//! Unrouted URLs behave like a closed port.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::error::{BackendError, BackendResult};
use super::traits::{Backend, BackendResponse};

/// Scripted reply for one request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with the given body
    Ok(String),
    /// Arbitrary status and body
    Status(u16, String),
    /// Connection refused
    Refused,
}

impl MockReply {
    pub fn ok(body: impl Into<String>) -> Self {
        MockReply::Ok(body.into())
    }

    pub fn json(value: &Value) -> Self {
        MockReply::Ok(value.to_string())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockReply::Status(status, body.into())
    }
}

/// A request the mock has seen
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

type RouteKey = (&'static str, String);

/// Scripted in-memory [`Backend`]
///
/// Each route holds a queue of replies; the last one sticks once the
/// others are used up.
#[derive(Debug, Default)]
pub struct MockBackend {
    routes: Mutex<HashMap<RouteKey, VecDeque<MockReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `GET url` with `reply`
    pub fn on_get(&self, url: impl Into<String>, reply: MockReply) -> &Self {
        self.set_route("GET", url.into(), vec![reply]);
        self
    }

    /// Answer successive `GET url` requests with `replies`
    pub fn on_get_sequence(&self, url: impl Into<String>, replies: Vec<MockReply>) -> &Self {
        self.set_route("GET", url.into(), replies);
        self
    }

    /// Always answer `POST url` with `reply`
    pub fn on_post(&self, url: impl Into<String>, reply: MockReply) -> &Self {
        self.set_route("POST", url.into(), vec![reply]);
        self
    }

    /// Remove every route for `url`, making it unreachable
    pub fn remove(&self, url: &str) {
        self.routes.lock().retain(|(_, route), _| route != url);
    }

    /// All requests seen so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of requests seen for `method url`
    pub fn call_count(&self, method: &str, url: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.url == url)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn set_route(&self, method: &'static str, url: String, replies: Vec<MockReply>) {
        self.routes.lock().insert((method, url), replies.into());
    }

    fn reply(&self, method: &'static str, url: &str, body: Option<Value>) -> BackendResult<BackendResponse> {
        self.calls.lock().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });

        let reply = {
            let mut routes = self.routes.lock();
            match routes.get_mut(&(method, url.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(MockReply::Ok(body)) => Ok(BackendResponse::new(200, body)),
            Some(MockReply::Status(status, body)) => Ok(BackendResponse::new(status, body)),
            Some(MockReply::Refused) | None => {
                Err(BackendError::ConnectionFailed(format!("{}: connection refused", url)))
            }
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get(&self, url: &str) -> BackendResult<BackendResponse> {
        self.reply("GET", url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> BackendResult<BackendResponse> {
        self.reply("POST", url, Some(body.clone()))
    }
}
