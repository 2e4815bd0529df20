//! Bridge facade
//!
//! Wires discovery, registry, dispatch and the refresh scheduler around
//! one shared [`EndpointState`](crate::discovery::EndpointState). Hosts
//! only talk to this type.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::SharedBackend;
use crate::config::{BridgeConfig, ConfigResult};
use crate::discovery::{EndpointResolver, EndpointState, LivenessProber, ResolverSettings, SharedEndpointState};
use crate::dispatch::CallDispatcher;
use crate::logging::SharedLogger;
use crate::scheduler::{RefreshScheduler, SchedulerHandle, SharedNotifier, TickOutcome};
use crate::tools::{RegistrySettings, ToolRegistry};
use crate::types::{Endpoint, InvocationResult, ToolDescriptor};

pub struct Bridge {
    config: BridgeConfig,
    state: SharedEndpointState,
    registry: Arc<ToolRegistry>,
    dispatcher: CallDispatcher,
    scheduler: Arc<RefreshScheduler>,
}

impl Bridge {
    /// Build every component from a validated configuration
    pub fn new(
        config: BridgeConfig,
        backend: SharedBackend,
        static_tools: Vec<ToolDescriptor>,
        notifier: SharedNotifier,
        logger: SharedLogger,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let state: SharedEndpointState = Arc::new(EndpointState::new());
        let resolver = EndpointResolver::new(
            ResolverSettings::from_config(&config),
            LivenessProber::new(backend.clone(), logger.clone()),
            state.clone(),
            logger.clone(),
        );
        let registry = Arc::new(ToolRegistry::new(
            static_tools,
            state.clone(),
            backend.clone(),
            RegistrySettings::from_config(&config),
            logger.clone(),
        ));
        let dispatcher = CallDispatcher::new(state.clone(), backend, logger.clone());
        let scheduler = Arc::new(RefreshScheduler::new(
            resolver,
            registry.clone(),
            state.clone(),
            notifier,
            config.refresh_interval(),
            logger,
        ));

        Ok(Self {
            config,
            state,
            registry,
            dispatcher,
            scheduler,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Static tools merged with whatever the IDE reports
    pub async fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry.list_tools().await
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> InvocationResult {
        self.dispatcher.invoke(name, arguments).await
    }

    /// First refresh, then the periodic loop.
    ///
    /// `None` while a loop started earlier is still running.
    pub async fn start(&self) -> Option<SchedulerHandle> {
        self.scheduler.clone().start().await
    }

    /// Run one refresh tick outside the schedule
    pub async fn refresh_now(&self) -> TickOutcome {
        self.scheduler.tick().await
    }

    pub fn current_endpoint(&self) -> Option<Arc<Endpoint>> {
        self.state.current()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
