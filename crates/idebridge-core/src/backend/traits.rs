//! Backend trait definition

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::BackendResult;

/// Raw HTTP response: status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport to the IDE automation API
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET url`
    async fn get(&self, url: &str) -> BackendResult<BackendResponse>;

    /// `POST url` with a JSON body
    async fn post_json(&self, url: &str, body: &Value) -> BackendResult<BackendResponse>;
}

/// Type alias for an Arc-wrapped backend
pub type SharedBackend = Arc<dyn Backend>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(BackendResponse::new(200, "").is_success());
        assert!(BackendResponse::new(204, "").is_success());
        assert!(!BackendResponse::new(302, "").is_success());
        assert!(!BackendResponse::new(404, "").is_success());
        assert!(!BackendResponse::new(500, "").is_success());
    }
}
