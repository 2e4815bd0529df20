//! Refresh scheduler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::discovery::{EndpointResolver, SharedEndpointState};
use crate::logging::SharedLogger;
use crate::tools::ToolRegistry;
use crate::types::{CancellationToken, Endpoint};
use crate::{log_error, log_info, log_warn};

use super::notifier::SharedNotifier;

/// What a single tick observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Current endpoint after the tick
    pub endpoint: Option<Arc<Endpoint>>,
    pub endpoint_changed: bool,
    pub fingerprint_changed: bool,
}

impl TickOutcome {
    /// Whether a change notification was sent
    pub fn notified(&self) -> bool {
        self.endpoint_changed || self.fingerprint_changed
    }
}

/// Re-resolves the endpoint on a fixed interval
pub struct RefreshScheduler {
    resolver: EndpointResolver,
    registry: Arc<ToolRegistry>,
    state: SharedEndpointState,
    notifier: SharedNotifier,
    interval: Duration,
    logger: SharedLogger,
    /// Set while a background loop owns this scheduler
    running: AtomicBool,
}

impl RefreshScheduler {
    pub fn new(
        resolver: EndpointResolver,
        registry: Arc<ToolRegistry>,
        state: SharedEndpointState,
        notifier: SharedNotifier,
        interval: Duration,
        logger: SharedLogger,
    ) -> Self {
        Self {
            resolver,
            registry,
            state,
            notifier,
            interval,
            logger,
            running: AtomicBool::new(false),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one resolution pass. Failures are logged, never returned.
    pub async fn tick(&self) -> TickOutcome {
        let previous = self.state.current();

        let fingerprint_changed = match self.resolver.resolve().await {
            Ok(resolution) => resolution.fingerprint_changed,
            Err(e) => {
                log_warn!(self.logger, "[RefreshScheduler] {}", e);
                false
            }
        };

        let current = self.state.current();
        let endpoint_changed = previous.as_deref() != current.as_deref();

        let outcome = TickOutcome {
            endpoint: current,
            endpoint_changed,
            fingerprint_changed,
        };

        if outcome.notified() {
            match (&previous, &outcome.endpoint) {
                (Some(old), Some(new)) if endpoint_changed => {
                    log_info!(self.logger, "[RefreshScheduler] Endpoint moved from {} to {}", old, new)
                }
                (None, Some(new)) => log_info!(self.logger, "[RefreshScheduler] Endpoint available at {}", new),
                (Some(old), None) => log_warn!(self.logger, "[RefreshScheduler] Endpoint {} is gone", old),
                _ => log_info!(self.logger, "[RefreshScheduler] IDE reported a different tool list"),
            }
            self.registry.invalidate();
            self.notifier.tools_changed().await;
        }

        outcome
    }

    /// Run the first tick, then keep ticking in the background every
    /// `interval` until the handle is stopped.
    ///
    /// Only one loop runs at a time: while one is active this returns
    /// `None` without ticking. Stopping the handle allows a new start.
    pub async fn start(self: Arc<Self>) -> Option<SchedulerHandle> {
        if self.running.swap(true, Ordering::SeqCst) {
            log_warn!(self.logger, "[RefreshScheduler] Already running; start ignored");
            return None;
        }

        self.tick().await;

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let scheduler = self.clone();
        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = tokio::time::sleep(scheduler.interval) => {
                        scheduler.tick().await;
                    }
                }
            }
            scheduler.logger.debug("[RefreshScheduler] Stopped");
        });

        Some(SchedulerHandle {
            token,
            join,
            scheduler: self,
        })
    }
}

/// Owner of the background refresh task
pub struct SchedulerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
    scheduler: Arc<RefreshScheduler>,
}

impl SchedulerHandle {
    /// Token that stops the loop when cancelled
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel the loop and wait for it. A tick in progress completes first.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            log_error!(self.scheduler.logger, "[RefreshScheduler] Refresh loop ended abnormally: {}", e);
        }
        self.scheduler.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("token", &self.token)
            .field("finished", &self.join.is_finished())
            .finish()
    }
}
