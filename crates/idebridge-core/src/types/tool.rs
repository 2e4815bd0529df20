//! Tool descriptor types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A named callable capability exposed by the bridge
///
/// Identity is `name`: two descriptors with the same name describe the
/// same tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (unique key)
    pub name: String,
    /// Description of what the tool does
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", default = "empty_object_schema")]
    pub input_schema: Value,
}

fn empty_object_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

impl ToolDescriptor {
    /// Create a tool descriptor that takes no arguments
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: empty_object_schema(),
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Whether `name` can be sent as a single URL path segment.
    ///
    /// Everything is percent-encoded except the empty name and the dot
    /// segments, which no encoding keeps in place.
    pub fn is_addressable_name(name: &str) -> bool {
        !matches!(name, "" | "." | "..")
    }

    /// Input schema as a JSON object, falling back to an empty object schema
    /// when the backend sent something that is not an object.
    pub fn schema_object(&self) -> serde_json::Map<String, Value> {
        match &self.input_schema {
            Value::Object(map) => map.clone(),
            _ => match empty_object_schema() {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
        }
    }
}
