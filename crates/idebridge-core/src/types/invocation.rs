//! Tool invocation request and result

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool call, addressed by tool name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Arguments payload, forwarded verbatim as the request body
    pub arguments: Value,
}

impl Invocation {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Translated outcome of a single invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub text: String,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl InvocationResult {
    /// Create a successful result
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}
