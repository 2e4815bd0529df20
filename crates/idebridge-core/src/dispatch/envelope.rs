//! Response envelope of the IDE automation API
//!
//! Exactly one of `status` and `error` is a non-null string. Anything
//! else is a protocol violation; nothing is coerced.

use serde_json::Value;

/// A well-formed envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// `{status: "...", error: null}`
    Success(String),
    /// `{status: null, error: "..."}`
    Failure(String),
}

impl Envelope {
    /// Parse a response body. The error string describes the violation.
    pub fn parse(body: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(body).map_err(|e| format!("response is not JSON ({})", e))?;
        let map = match value {
            Value::Object(map) => map,
            other => return Err(format!("expected an object envelope, found {}", kind(&other))),
        };

        let status = present(map.get("status"));
        let error = present(map.get("error"));

        match (status, error) {
            (Some(Value::String(text)), None) => Ok(Envelope::Success(text.clone())),
            (None, Some(Value::String(text))) => Ok(Envelope::Failure(text.clone())),
            (Some(_), Some(_)) => Err("both `status` and `error` are set".to_string()),
            (None, None) => Err("neither `status` nor `error` is set".to_string()),
            (Some(other), None) => Err(format!("`status` must be a string, found {}", kind(other))),
            (None, Some(other)) => Err(format!("`error` must be a string, found {}", kind(other))),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Failure(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Envelope::Success(text) | Envelope::Failure(text) => text,
        }
    }
}

/// Missing and `null` are treated the same
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
