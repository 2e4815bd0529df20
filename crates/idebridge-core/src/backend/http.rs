//! `reqwest` implementation of [`Backend`]

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{BackendError, BackendResult};
use super::traits::{Backend, BackendResponse};

/// HTTP backend for the IDE automation API (plain HTTP, loopback by default)
///
/// Probes and listings (`get`) are bounded by `request_timeout`. Tool
/// calls (`post_json`) run as long as the IDE needs unless a
/// `call_timeout` is set.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    request_timeout: Duration,
    call_timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new(request_timeout: Duration, call_timeout: Option<Duration>) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            request_timeout,
            call_timeout,
        })
    }

    async fn read(url: &str, result: reqwest::Result<reqwest::Response>) -> BackendResult<BackendResponse> {
        let response = result.map_err(|e| classify(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(url, e))?;
        Ok(BackendResponse { status, body })
    }
}

fn classify(url: &str, error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout { url: url.to_string() }
    } else if error.is_connect() {
        BackendError::ConnectionFailed(format!("{}: {}", url, error))
    } else {
        BackendError::Http(error)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, url: &str) -> BackendResult<BackendResponse> {
        let result = self.client.get(url).timeout(self.request_timeout).send().await;
        Self::read(url, result).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> BackendResult<BackendResponse> {
        let mut request = self.client.post(url).json(body);
        if let Some(timeout) = self.call_timeout {
            request = request.timeout(timeout);
        }
        Self::read(url, request.send().await).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const ENVELOPE: &str = r#"{"status":"ok","error":null}"#;

    /// Serve one request, answering `ENVELOPE` after `delay`. Returns the port.
    async fn serve_once(delay: Duration) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                // GET ends with the blank line, POST with the `{}` body.
                if (text.starts_with("GET") && text.ends_with("\r\n\r\n")) || text.ends_with("\r\n\r\n{}") {
                    break;
                }
            }

            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                ENVELOPE.len(),
                ENVELOPE
            );
            // The client may have given up already.
            socket.write_all(response.as_bytes()).await.ok();
            socket.shutdown().await.ok();
        });

        port
    }

    fn url(port: u16, route: &str) -> String {
        format!("http://127.0.0.1:{}/api/mcp/{}", port, route)
    }

    #[tokio::test]
    async fn test_closed_port_is_connection_failure() {
        // Grab a free port, then release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let backend = HttpBackend::new(Duration::from_secs(2), None).unwrap();
        let err = backend.get(&url(port, "list_tools")).await.unwrap_err();

        assert!(matches!(err, BackendError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_reads_status_and_body() {
        let port = serve_once(Duration::ZERO).await;
        let backend = HttpBackend::new(Duration::from_secs(5), None).unwrap();
        let response = backend
            .post_json(&url(port, "x"), &serde_json::json!({}))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, ENVELOPE);
    }

    #[tokio::test]
    async fn test_slow_probe_times_out() {
        let port = serve_once(Duration::from_millis(800)).await;
        let backend = HttpBackend::new(Duration::from_millis(200), None).unwrap();

        let err = backend.get(&url(port, "list_tools")).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_slow_tool_call_outlives_request_timeout() {
        let port = serve_once(Duration::from_millis(800)).await;
        let backend = HttpBackend::new(Duration::from_millis(200), None).unwrap();

        let response = backend
            .post_json(&url(port, "execute_terminal_command"), &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(response.body, ENVELOPE);
    }

    #[tokio::test]
    async fn test_call_timeout_bounds_tool_calls() {
        let port = serve_once(Duration::from_millis(800)).await;
        let backend = HttpBackend::new(Duration::from_secs(5), Some(Duration::from_millis(200))).unwrap();

        let err = backend
            .post_json(&url(port, "execute_terminal_command"), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Timeout { .. }));
    }
}
