//! Endpoint resolution
//!
//! Priority order:
//! 1. explicit port override: probe exactly that endpoint, no scanning
//! 2. the current endpoint, if it still passes its liveness check
//! 3. ascending scan of the configured port range, lowest live port wins

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::logging::SharedLogger;
use crate::types::Endpoint;
use crate::{log_info, log_warn};

use super::error::{DiscoveryError, DiscoveryResult};
use super::prober::LivenessProber;
use super::state::SharedEndpointState;

/// Inputs to endpoint resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub host: String,
    pub port_override: Option<u16>,
    pub scan_ports: RangeInclusive<u16>,
    pub path_prefix: String,
}

impl ResolverSettings {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            host: config.host.clone(),
            port_override: config.port,
            scan_ports: config.scan_ports(),
            path_prefix: config.path_prefix.clone(),
        }
    }

    fn candidate(&self, port: u16) -> Endpoint {
        Endpoint::new(self.host.clone(), port, self.path_prefix.clone())
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub endpoint: Arc<Endpoint>,
    /// The liveness response differs from the previously recorded one
    pub fingerprint_changed: bool,
    /// The current endpoint was kept without scanning
    pub reused: bool,
}

/// Picks a working endpoint and publishes it to the shared state
pub struct EndpointResolver {
    settings: ResolverSettings,
    prober: LivenessProber,
    state: SharedEndpointState,
    logger: SharedLogger,
}

impl EndpointResolver {
    pub fn new(
        settings: ResolverSettings,
        prober: LivenessProber,
        state: SharedEndpointState,
        logger: SharedLogger,
    ) -> Self {
        Self {
            settings,
            prober,
            state,
            logger,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub async fn resolve(&self) -> DiscoveryResult<Resolution> {
        if let Some(port) = self.settings.port_override {
            return self.resolve_override(port).await;
        }

        if let Some(cached) = self.state.current() {
            if let Some(fingerprint_changed) = self.check(&cached).await {
                return Ok(Resolution {
                    endpoint: cached,
                    fingerprint_changed,
                    reused: true,
                });
            }
            // An endpoint that fails its own check is no longer trusted.
            if self.state.clear_if(&cached) {
                log_warn!(self.logger, "[EndpointResolver] Lost IDE endpoint {}, rescanning", cached);
            }
        }

        for port in self.settings.scan_ports.clone() {
            let candidate = self.settings.candidate(port);
            if let Some(fingerprint_changed) = self.check(&candidate).await {
                return Ok(self.adopt(candidate, fingerprint_changed));
            }
        }

        Err(DiscoveryError::EndpointUnreachable {
            tried: format!(
                "{} ports {}..={}",
                self.settings.host,
                self.settings.scan_ports.start(),
                self.settings.scan_ports.end()
            ),
        })
    }

    async fn resolve_override(&self, port: u16) -> DiscoveryResult<Resolution> {
        let candidate = self.settings.candidate(port);
        if let Some(fingerprint_changed) = self.check(&candidate).await {
            return Ok(self.adopt(candidate, fingerprint_changed));
        }

        if self.state.clear_if(&candidate) {
            log_warn!(self.logger, "[EndpointResolver] Configured IDE endpoint {} stopped responding", candidate);
        }
        Err(DiscoveryError::EndpointUnreachable {
            tried: candidate.to_string(),
        })
    }

    /// Probe `endpoint`; on success record its fingerprint and report whether it changed
    async fn check(&self, endpoint: &Endpoint) -> Option<bool> {
        let outcome = self.prober.probe(endpoint).await;
        if !outcome.alive {
            return None;
        }
        Some(
            outcome
                .fingerprint
                .map(|fp| self.state.record_fingerprint(fp))
                .unwrap_or(false),
        )
    }

    fn adopt(&self, candidate: Endpoint, fingerprint_changed: bool) -> Resolution {
        let endpoint = Arc::new(candidate);
        let previous = self.state.publish(endpoint.clone());
        let reused = previous.as_deref() == Some(endpoint.as_ref());
        if !reused {
            log_info!(self.logger, "[EndpointResolver] Using IDE endpoint {}", endpoint);
        }
        Resolution {
            endpoint,
            fingerprint_changed,
            reused,
        }
    }
}
