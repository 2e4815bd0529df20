//! Call dispatcher

use serde_json::Value;

use crate::backend::SharedBackend;
use crate::discovery::SharedEndpointState;
use crate::logging::SharedLogger;
use crate::types::{Invocation, InvocationResult, ToolDescriptor};

use super::envelope::Envelope;
use super::error::{DispatchError, DispatchResult};

/// Forwards one invocation to the current endpoint. No retries here.
pub struct CallDispatcher {
    state: SharedEndpointState,
    backend: SharedBackend,
    logger: SharedLogger,
}

impl CallDispatcher {
    pub fn new(state: SharedEndpointState, backend: SharedBackend, logger: SharedLogger) -> Self {
        Self { state, backend, logger }
    }

    /// Invoke a tool; every failure comes back as an error-flagged result
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> InvocationResult {
        let invocation = Invocation::new(tool_name, arguments);
        match self.try_invoke(&invocation).await {
            Ok(result) => result,
            Err(e) => {
                self.logger.warn(&format!("[CallDispatcher] {}", e));
                InvocationResult::error(e.to_string())
            }
        }
    }

    pub async fn try_invoke(&self, invocation: &Invocation) -> DispatchResult<InvocationResult> {
        let tool = invocation.tool_name.as_str();
        let endpoint = self.state.current().ok_or(DispatchError::NoEndpoint)?;
        if !ToolDescriptor::is_addressable_name(tool) {
            return Err(DispatchError::InvalidToolName(tool.to_string()));
        }

        let url = endpoint.tool_url(tool).ok_or_else(|| DispatchError::TransportFailure {
            tool: tool.to_string(),
            status: None,
            detail: format!("cannot build a request URL from {}", endpoint),
        })?;
        self.logger.debug(&format!("[CallDispatcher] POST {}", url));

        let response = self
            .backend
            .post_json(&url, &invocation.arguments)
            .await
            .map_err(|e| DispatchError::TransportFailure {
                tool: tool.to_string(),
                status: None,
                detail: e.to_string(),
            })?;

        if !response.is_success() {
            let detail = if response.body.trim().is_empty() {
                format!("HTTP {}", response.status)
            } else {
                format!("HTTP {}: {}", response.status, response.body.trim())
            };
            return Err(DispatchError::TransportFailure {
                tool: tool.to_string(),
                status: Some(response.status),
                detail,
            });
        }

        let envelope = Envelope::parse(&response.body).map_err(|detail| DispatchError::ProtocolViolation {
            tool: tool.to_string(),
            detail,
        })?;

        Ok(InvocationResult {
            is_error: envelope.is_error(),
            text: envelope.into_text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use serde_json::json;
    use crate::backend::{MockBackend, MockReply};
    use crate::discovery::EndpointState;
    use crate::logging::NoOpLogger;
    use crate::types::Endpoint;

    fn setup(with_endpoint: bool) -> (Arc<MockBackend>, CallDispatcher, Endpoint) {
        let backend = Arc::new(MockBackend::new());
        let state = Arc::new(EndpointState::new());
        let endpoint = Endpoint::new("127.0.0.1", 63342, "/api/mcp");
        if with_endpoint {
            state.publish(Arc::new(endpoint.clone()));
        }
        let dispatcher = CallDispatcher::new(state, backend.clone(), Arc::new(NoOpLogger::new()));
        (backend, dispatcher, endpoint)
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let (backend, dispatcher, endpoint) = setup(true);
        backend.on_post(endpoint.url_for("get_terminal_text"), MockReply::ok(r#"{"status":"ok","error":null}"#));

        let result = dispatcher.invoke("get_terminal_text", json!({})).await;
        assert_eq!(result, InvocationResult::success("ok"));
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let (backend, dispatcher, endpoint) = setup(true);
        backend.on_post(endpoint.url_for("x"), MockReply::ok(r#"{"status":null,"error":"boom"}"#));

        let result = dispatcher.invoke("x", json!({})).await;
        assert_eq!(result, InvocationResult::error("boom"));
    }

    #[tokio::test]
    async fn test_arguments_sent_verbatim() {
        let (backend, dispatcher, endpoint) = setup(true);
        let url = endpoint.url_for("execute_terminal_command");
        backend.on_post(url.clone(), MockReply::ok(r#"{"status":"done"}"#));

        let args = json!({ "command": "ls -la", "nested": { "n": [1, 2, 3] } });
        dispatcher.invoke("execute_terminal_command", args.clone()).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, url);
        assert_eq!(calls[0].body, Some(args));
    }

    #[tokio::test]
    async fn test_no_endpoint() {
        let (backend, dispatcher, _) = setup(false);

        let err = dispatcher.try_invoke(&Invocation::new("x", json!({}))).await.unwrap_err();
        assert_eq!(err, DispatchError::NoEndpoint);
        assert!(backend.calls().is_empty());

        let result = dispatcher.invoke("x", json!({})).await;
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_failure() {
        let (backend, dispatcher, endpoint) = setup(true);
        backend.on_post(endpoint.url_for("x"), MockReply::status(404, "no such tool"));

        let err = dispatcher.try_invoke(&Invocation::new("x", json!({}))).await.unwrap_err();
        match err {
            DispatchError::TransportFailure { status, detail, .. } => {
                assert_eq!(status, Some(404));
                assert!(detail.contains("no such tool"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_failure() {
        let (_backend, dispatcher, _) = setup(true);
        let err = dispatcher.try_invoke(&Invocation::new("x", json!({}))).await.unwrap_err();
        assert!(matches!(err, DispatchError::TransportFailure { status: None, .. }));
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_protocol_violation() {
        let (backend, dispatcher, endpoint) = setup(true);
        backend.on_post(endpoint.url_for("x"), MockReply::ok(r#"{"result":"ok"}"#));

        let err = dispatcher.try_invoke(&Invocation::new("x", json!({}))).await.unwrap_err();
        assert!(matches!(err, DispatchError::ProtocolViolation { .. }));

        let result = dispatcher.invoke("x", json!({})).await;
        assert!(result.is_error);
        assert!(result.text.contains("neither"));
    }

    #[tokio::test]
    async fn test_single_attempt_only() {
        let (backend, dispatcher, endpoint) = setup(true);
        let url = endpoint.url_for("x");
        backend.on_post(url.clone(), MockReply::status(500, ""));

        dispatcher.invoke("x", json!({})).await;
        assert_eq!(backend.call_count("POST", &url), 1);
    }

    #[tokio::test]
    async fn test_names_are_sent_as_one_encoded_segment() {
        let (backend, dispatcher, endpoint) = setup(true);
        for name in ["vcs:status", "ファイル", "a/b", "x?y=1"] {
            let url = endpoint.tool_url(name).unwrap();
            backend.on_post(url.clone(), MockReply::ok(r#"{"status":"ok","error":null}"#));

            let result = dispatcher.invoke(name, json!({})).await;
            assert_eq!(result, InvocationResult::success("ok"), "{}", name);
            assert_eq!(backend.call_count("POST", &url), 1, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_dot_segment_names_are_rejected() {
        let (backend, dispatcher, _) = setup(true);
        for name in ["", ".", ".."] {
            let err = dispatcher.try_invoke(&Invocation::new(name, json!({}))).await.unwrap_err();
            assert!(matches!(err, DispatchError::InvalidToolName(_)), "{:?}", name);
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_wins_over_name_check() {
        let (_backend, dispatcher, _) = setup(false);
        for name in ["a b", ".."] {
            let err = dispatcher.try_invoke(&Invocation::new(name, json!({}))).await.unwrap_err();
            assert_eq!(err, DispatchError::NoEndpoint);
        }
    }
}
