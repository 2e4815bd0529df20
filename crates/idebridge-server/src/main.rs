//! `idebridge`: MCP stdio server for a JetBrains IDE's automation API

mod logger;
mod notifier;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use idebridge_core::tools::catalog;
use idebridge_core::{Bridge, BridgeConfig, HttpBackend};

use crate::logger::TracingLogger;
use crate::notifier::PeerNotifier;
use crate::server::BridgeServer;

/// Expose the IDE's tools over MCP on stdin/stdout
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// YAML configuration file (defaults to the user config directory)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Use exactly this IDE port instead of scanning
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// IDE host
    #[arg(long = "host")]
    host: Option<String>,

    /// Log diagnostics to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut BridgeConfig) {
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Verbose adds our debug output on top of everyone's warnings.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,idebridge=debug"
    } else {
        "warn"
    }
}

/// stdout carries the protocol, so logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = BridgeConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    init_tracing(config.verbose);

    let backend = Arc::new(
        HttpBackend::new(config.request_timeout(), config.call_timeout()).context("failed to build HTTP client")?,
    );
    let notifier = Arc::new(PeerNotifier::new());
    let bridge = Arc::new(
        Bridge::new(
            config,
            backend,
            catalog::default_tools(),
            notifier.clone(),
            Arc::new(TracingLogger::new()),
        )
        .context("invalid configuration")?,
    );

    // Resolve once before the first client request can arrive.
    let scheduler = bridge.start().await.context("refresh loop already running")?;
    match bridge.current_endpoint() {
        Some(endpoint) => tracing::info!("IDE endpoint: {}", endpoint),
        None => tracing::warn!("No IDE endpoint found yet; retrying in the background"),
    }

    let service = BridgeServer::new(bridge.clone())
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    notifier.attach(service.peer().clone());

    let reason = service.waiting().await;
    scheduler.stop().await;
    tracing::debug!("MCP session ended: {:?}", reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["idebridge", "--port", "63345", "--host", "10.0.0.2", "-v"]);
        let mut config = BridgeConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.port, Some(63345));
        assert_eq!(config.host, "10.0.0.2");
        assert!(config.verbose);
    }

    #[test]
    fn test_verbose_filter_keeps_other_warnings() {
        assert_eq!(default_filter(false), "warn");
        let verbose = default_filter(true);
        assert!(verbose.split(',').any(|directive| directive == "warn"));
        assert!(verbose.split(',').any(|directive| directive == "idebridge=debug"));
        EnvFilter::try_new(verbose).unwrap();
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["idebridge"]);
        let mut config = BridgeConfig {
            port: Some(1234),
            verbose: true,
            ..BridgeConfig::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.port, Some(1234));
        assert!(config.verbose);
    }
}
