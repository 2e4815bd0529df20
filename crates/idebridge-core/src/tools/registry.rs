//! Tool registry: static catalog blended with IDE-reported tools
//!
//! Listing never fails. In order of preference it returns:
//! - static ∪ fresh snapshot (no network access while the snapshot is young)
//! - static ∪ newly fetched tools
//! - static ∪ stale snapshot, when fetching failed
//! - static only, when nothing was ever fetched or no endpoint is known

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use crate::backend::SharedBackend;
use crate::config::BridgeConfig;
use crate::discovery::SharedEndpointState;
use crate::logging::SharedLogger;
use crate::log_warn;
use crate::types::{Endpoint, ToolDescriptor};

use super::error::{RegistryError, RegistryResult};
use super::retry::RetryPolicy;
use super::snapshot::{merge_tools, ToolListPayload, ToolRegistrySnapshot};

/// Cache and retry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Snapshot lifetime
    pub ttl: Duration,
    pub retry: RetryPolicy,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl RegistrySettings {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            ttl: config.cache_ttl(),
            retry: RetryPolicy::new(config.fetch_attempts, config.backoff_base()),
        }
    }
}

/// Cached snapshot plus whether it may serve the fast path.
///
/// An invalidated snapshot is kept as stale fallback data.
#[derive(Debug, Default, Clone)]
struct CacheSlot {
    snapshot: Option<Arc<ToolRegistrySnapshot>>,
    valid: bool,
}

/// Tool registry for the bridge
pub struct ToolRegistry {
    /// Default catalog, always listed
    static_tools: Vec<ToolDescriptor>,
    state: SharedEndpointState,
    backend: SharedBackend,
    cache: RwLock<CacheSlot>,
    settings: RegistrySettings,
    logger: SharedLogger,
}

impl ToolRegistry {
    pub fn new(
        static_tools: Vec<ToolDescriptor>,
        state: SharedEndpointState,
        backend: SharedBackend,
        settings: RegistrySettings,
        logger: SharedLogger,
    ) -> Self {
        Self {
            static_tools,
            state,
            backend,
            cache: RwLock::new(CacheSlot::default()),
            settings,
            logger,
        }
    }

    pub fn static_tools(&self) -> &[ToolDescriptor] {
        &self.static_tools
    }

    /// Latest stored snapshot, fresh or not
    pub fn snapshot(&self) -> Option<Arc<ToolRegistrySnapshot>> {
        self.cache.read().snapshot.clone()
    }

    /// Force the next listing to refetch. The old snapshot stays available as fallback.
    pub fn invalidate(&self) {
        self.cache.write().valid = false;
    }

    /// Ordered tool list for the outward protocol layer
    pub async fn list_tools(&self) -> Vec<ToolDescriptor> {
        let Some(endpoint) = self.state.current() else {
            return self.static_tools.clone();
        };

        let cached = self.cache.read().clone();
        if let Some(ref snapshot) = cached.snapshot {
            if cached.valid && snapshot.is_fresh(Instant::now(), self.settings.ttl) {
                return merge_tools(&self.static_tools, snapshot);
            }
        }

        match self.fetch_with_retry(&endpoint).await {
            Ok(tools) => {
                let snapshot = Arc::new(ToolRegistrySnapshot::new(tools, Instant::now()));
                self.store(&endpoint, snapshot.clone());
                self.logger.debug(&format!(
                    "[ToolRegistry] Fetched {} tools from {}",
                    snapshot.len(),
                    endpoint
                ));
                merge_tools(&self.static_tools, &snapshot)
            }
            Err(e) => match self.snapshot() {
                Some(stale) => {
                    log_warn!(
                        self.logger,
                        "[ToolRegistry] {}; serving {} cached tools from an expired snapshot",
                        e,
                        stale.len()
                    );
                    merge_tools(&self.static_tools, &stale)
                }
                None => {
                    log_warn!(self.logger, "[ToolRegistry] {}; serving static tools only", e);
                    self.static_tools.clone()
                }
            },
        }
    }

    /// Publish a new snapshot. It only serves the fast path if the
    /// endpoint it came from is still current.
    fn store(&self, source: &Endpoint, snapshot: Arc<ToolRegistrySnapshot>) {
        let still_current = self.state.current().as_deref() == Some(source);
        let mut cache = self.cache.write();
        cache.snapshot = Some(snapshot);
        cache.valid = still_current;
    }

    async fn fetch_with_retry(&self, endpoint: &Endpoint) -> RegistryResult<Vec<ToolDescriptor>> {
        let attempts = self.settings.retry.max_attempts;
        self.settings
            .retry
            .run(|attempt| async move {
                let result = self.fetch(endpoint).await;
                if let Err(ref e) = result {
                    self.logger.debug(&format!(
                        "[ToolRegistry] Fetch attempt {}/{} failed: {}",
                        attempt, attempts, e
                    ));
                }
                result
            })
            .await
            .map_err(|exhausted| RegistryError::ToolFetchFailure {
                attempts: exhausted.attempts,
                last: Box::new(exhausted.last),
            })
    }

    async fn fetch(&self, endpoint: &Endpoint) -> RegistryResult<Vec<ToolDescriptor>> {
        let response = self.backend.get(&endpoint.list_tools_url()).await?;
        if !response.is_success() {
            return Err(RegistryError::Status {
                status: response.status,
            });
        }
        let payload = ToolListPayload::parse(&response.body).map_err(|e| RegistryError::Decode(e.to_string()))?;

        // A tool the dispatcher cannot address is not listed either.
        let (tools, unaddressable): (Vec<_>, Vec<_>) = payload
            .into_tools()
            .into_iter()
            .partition(|t| ToolDescriptor::is_addressable_name(&t.name));
        for tool in &unaddressable {
            log_warn!(self.logger, "[ToolRegistry] Skipping tool with unusable name {:?}", tool.name);
        }
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, MockReply};
    use crate::discovery::EndpointState;
    use crate::logging::{LogLevel, MemoryLogger};
    use serde_json::json;

    struct Harness {
        backend: Arc<MockBackend>,
        state: SharedEndpointState,
        logger: Arc<MemoryLogger>,
        registry: ToolRegistry,
        endpoint: Arc<Endpoint>,
    }

    fn harness() -> Harness {
        let backend = Arc::new(MockBackend::new());
        let state = Arc::new(EndpointState::new());
        let logger = Arc::new(MemoryLogger::new());
        let statics = vec![
            ToolDescriptor::new("x", "static x"),
            ToolDescriptor::new("s", "static s"),
        ];
        let registry = ToolRegistry::new(
            statics,
            state.clone(),
            backend.clone(),
            RegistrySettings::default(),
            logger.clone(),
        );
        let endpoint = Arc::new(Endpoint::new("127.0.0.1", 63342, "/api/mcp"));
        Harness { backend, state, logger, registry, endpoint }
    }

    fn names(tools: &[ToolDescriptor]) -> Vec<String> {
        tools.iter().map(|t| t.name.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_endpoint_returns_static_without_network() {
        let h = harness();
        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s"]);
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_merges_and_caches() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        h.backend.on_get(
            h.endpoint.list_tools_url(),
            MockReply::json(&json!({ "tools": [{ "name": "x", "description": "remote x" }, { "name": "r" }] })),
        );

        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s", "r"]);
        assert_eq!(tools[0].description, "remote x");
        assert!(h.registry.snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_snapshot_makes_no_remote_calls() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        h.backend.on_get(h.endpoint.list_tools_url(), MockReply::ok(r#"[{"name":"r"}]"#));

        h.registry.list_tools().await;
        h.backend.clear_calls();

        tokio::time::advance(Duration::from_secs(29)).await;
        for _ in 0..5 {
            assert_eq!(names(&h.registry.list_tools().await), vec!["x", "s", "r"]);
        }
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_snapshot_refetches() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        let url = h.endpoint.list_tools_url();
        h.backend.on_get_sequence(
            url.clone(),
            vec![MockReply::ok(r#"[{"name":"r1"}]"#), MockReply::ok(r#"[{"name":"r2"}]"#)],
        );

        h.registry.list_tools().await;
        tokio::time::advance(Duration::from_secs(30)).await;

        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s", "r2"]);
        assert_eq!(h.backend.call_count("GET", &url), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refetch_serves_stale_snapshot() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        let url = h.endpoint.list_tools_url();
        h.backend.on_get_sequence(
            url.clone(),
            vec![MockReply::ok(r#"[{"name":"r"}]"#), MockReply::status(500, "boom")],
        );

        h.registry.list_tools().await;
        tokio::time::advance(Duration::from_secs(31)).await;

        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s", "r"]);
        // One initial fetch plus three failed attempts.
        assert_eq!(h.backend.call_count("GET", &url), 4);
        assert!(h.logger.contains(LogLevel::Warn, "expired snapshot"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_snapshot_serves_static() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        let url = h.endpoint.list_tools_url();
        h.backend.on_get(url.clone(), MockReply::ok("not json"));

        let started = Instant::now();
        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s"]);
        assert_eq!(h.backend.call_count("GET", &url), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2 + 4));
        assert!(h.logger.contains(LogLevel::Warn, "static tools only"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_within_attempts() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        let url = h.endpoint.list_tools_url();
        h.backend.on_get_sequence(
            url.clone(),
            vec![MockReply::Refused, MockReply::status(503, ""), MockReply::ok(r#"[{"name":"r"}]"#)],
        );

        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s", "r"]);
        assert_eq!(h.backend.call_count("GET", &url), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_refetch_but_keeps_fallback() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        let url = h.endpoint.list_tools_url();
        h.backend.on_get_sequence(url.clone(), vec![MockReply::ok(r#"[{"name":"r"}]"#), MockReply::Refused]);

        h.registry.list_tools().await;
        h.registry.invalidate();

        let tools = h.registry.list_tools().await;
        assert_eq!(h.backend.call_count("GET", &url), 4);
        assert_eq!(names(&tools), vec!["x", "s", "r"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listed_names_match_callable_names() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        h.backend.on_get(
            h.endpoint.list_tools_url(),
            MockReply::json(&json!([{ "name": "vcs:status" }, { "name": ".." }, { "name": "" }, { "name": "ファイル" }])),
        );

        let tools = h.registry.list_tools().await;
        assert_eq!(names(&tools), vec!["x", "s", "vcs:status", "ファイル"]);
        assert!(tools.iter().all(|t| h.endpoint.tool_url(&t.name).is_some()));
        assert!(h.logger.contains(LogLevel::Warn, "\"..\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_from_replaced_endpoint_is_not_fresh() {
        let h = harness();
        h.state.publish(h.endpoint.clone());
        h.backend.on_get(h.endpoint.list_tools_url(), MockReply::ok(r#"[{"name":"r"}]"#));
        h.registry.list_tools().await;

        let other = Arc::new(Endpoint::new("127.0.0.1", 63343, "/api/mcp"));
        h.registry.store(&other, Arc::new(ToolRegistrySnapshot::new(vec![], Instant::now())));

        assert!(!h.registry.cache.read().valid);
    }
}
