//! Backend endpoint and liveness fingerprint

use std::fmt;

use super::tool::ToolDescriptor;

/// A network address believed to reach the IDE automation API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Path prefix of the automation API, e.g. `/api/mcp`
    pub path_prefix: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, path_prefix: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path_prefix: path_prefix.into(),
        }
    }

    /// Base URL, without a trailing slash
    pub fn base_url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.host,
            self.port,
            self.path_prefix.trim_end_matches('/')
        )
    }

    /// URL of a single route below the base URL
    pub fn url_for(&self, route: &str) -> String {
        format!("{}/{}", self.base_url(), route.trim_start_matches('/'))
    }

    /// URL addressing `tool` as one percent-encoded path segment.
    ///
    /// `None` for names that cannot be a segment of their own (see
    /// [`ToolDescriptor::is_addressable_name`](crate::types::ToolDescriptor::is_addressable_name))
    /// or when the base URL does not parse.
    pub fn tool_url(&self, tool: &str) -> Option<String> {
        if !ToolDescriptor::is_addressable_name(tool) {
            return None;
        }
        let mut url = reqwest::Url::parse(&self.base_url()).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(tool);
        Some(url.into())
    }

    /// Liveness route, which is also the tool-listing route
    pub fn list_tools_url(&self) -> String {
        self.url_for("list_tools")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Opaque fingerprint of the backend's last liveness response body.
///
/// Only ever compared for equality, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
