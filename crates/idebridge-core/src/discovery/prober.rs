//! Liveness prober

use crate::backend::SharedBackend;
use crate::logging::SharedLogger;
use crate::types::{Endpoint, Fingerprint};

/// Result of a single liveness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub alive: bool,
    /// Raw response body of a successful check
    pub fingerprint: Option<Fingerprint>,
}

impl ProbeOutcome {
    fn dead() -> Self {
        Self {
            alive: false,
            fingerprint: None,
        }
    }
}

/// Issues one read-only `GET {endpoint}/list_tools` per probe.
///
/// Network failures and non-success statuses are reported as `alive =
/// false`; the body is kept as an opaque fingerprint and never parsed.
pub struct LivenessProber {
    backend: SharedBackend,
    logger: SharedLogger,
}

impl LivenessProber {
    pub fn new(backend: SharedBackend, logger: SharedLogger) -> Self {
        Self { backend, logger }
    }

    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let url = endpoint.list_tools_url();
        match self.backend.get(&url).await {
            Ok(response) if response.is_success() => ProbeOutcome {
                alive: true,
                fingerprint: Some(Fingerprint::new(response.body)),
            },
            Ok(response) => {
                self.logger.debug(&format!(
                    "[LivenessProber] {} answered with status {}",
                    url, response.status
                ));
                ProbeOutcome::dead()
            }
            Err(e) => {
                self.logger.debug(&format!("[LivenessProber] {} unreachable: {}", url, e));
                ProbeOutcome::dead()
            }
        }
    }
}
