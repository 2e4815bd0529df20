//! Bridge settings and their defaults

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::file::FileConfigSource;

/// Explicit backend port override
pub const ENV_PORT: &str = "IDE_PORT";
/// Backend host override
pub const ENV_HOST: &str = "HOST";
/// Enables verbose diagnostics when `true` or `1`
pub const ENV_LOG_ENABLED: &str = "LOG_ENABLED";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PATH_PREFIX: &str = "/api/mcp";
/// First port of the scan range (inclusive)
pub const DEFAULT_SCAN_START: u16 = 63342;
/// Last port of the scan range (inclusive); ten candidates in total
pub const DEFAULT_SCAN_END: u16 = 63351;

/// Parameters fed into discovery, caching and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Backend host, always addressed over plain HTTP
    pub host: String,
    /// Explicit port; when set, scanning is disabled
    pub port: Option<u16>,
    pub scan_start: u16,
    pub scan_end: u16,
    pub path_prefix: String,
    pub refresh_interval_secs: u64,
    /// Lifetime of a remote tool snapshot
    pub cache_ttl_secs: u64,
    pub fetch_attempts: u32,
    /// Backoff unit; the wait after failed attempt `k` is `base * 2^k`
    pub backoff_base_ms: u64,
    /// Bound on probe and listing requests
    pub request_timeout_ms: u64,
    /// Bound on tool calls; unset lets a call run until the IDE answers
    pub call_timeout_ms: Option<u64>,
    pub verbose: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: None,
            scan_start: DEFAULT_SCAN_START,
            scan_end: DEFAULT_SCAN_END,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            refresh_interval_secs: 10,
            cache_ttl_secs: 30,
            fetch_attempts: 3,
            backoff_base_ms: 1000,
            request_timeout_ms: 5000,
            call_timeout_ms: None,
            verbose: false,
        }
    }
}

impl BridgeConfig {
    /// Defaults, then the YAML file (explicit path or the user config), then the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let source = match path {
            Some(path) => FileConfigSource::new(path),
            None => FileConfigSource::user(),
        };
        let mut config = source.load_over(Self::default())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PORT) {
            let raw = raw.trim();
            if !raw.is_empty() {
                let port = raw
                    .parse::<u16>()
                    .map_err(|e| ConfigError::invalid(ENV_PORT, raw, e.to_string()))?;
                self.port = Some(port);
            }
        }

        if let Some(host) = lookup(ENV_HOST) {
            let host = host.trim();
            if !host.is_empty() {
                self.host = host.to_string();
            }
        }

        if let Some(flag) = lookup(ENV_LOG_ENABLED) {
            self.verbose = matches!(flag.trim().to_lowercase().as_str(), "1" | "true");
        }

        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid("host", &self.host, "must not be empty"));
        }
        if self.port == Some(0) {
            return Err(ConfigError::invalid("port", 0, "must be between 1 and 65535"));
        }
        if self.scan_start == 0 || self.scan_start > self.scan_end {
            return Err(ConfigError::invalid(
                "scan_start",
                format!("{}..={}", self.scan_start, self.scan_end),
                "scan range must be non-empty and start above 0",
            ));
        }
        if !self.path_prefix.starts_with('/') {
            return Err(ConfigError::invalid("path_prefix", &self.path_prefix, "must start with '/'"));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::invalid("refresh_interval_secs", 0, "must be positive"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("request_timeout_ms", 0, "must be positive"));
        }
        if self.call_timeout_ms == Some(0) {
            return Err(ConfigError::invalid("call_timeout_ms", 0, "must be positive; leave unset for no limit"));
        }
        if self.fetch_attempts == 0 {
            return Err(ConfigError::invalid("fetch_attempts", 0, "at least one attempt is required"));
        }
        Ok(())
    }

    /// Candidate ports, ascending
    pub fn scan_ports(&self) -> RangeInclusive<u16> {
        self.scan_start..=self.scan_end
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}
