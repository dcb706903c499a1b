//! SNI Proxy back-end resolver.
//!
//! Resolves the TLS server name of inbound connections to back-end servers.
//!
//! # Architecture Overview
//!
//! ```text
//!     TLS ClientHello (SNI)
//!     ──────────────────────▶ ServerName ──▶ AggregateLocator
//!                                               │
//!                              ┌────────────────┴─────────────────┐
//!                              ▼                                  ▼
//!                       StaticLocator                     DiscoveryLocator
//!                     (config [[routes]])            (published snapshot, ArcSwap)
//!                                                                 ▲
//!                                                                 │ every poll_interval
//!                                                   ServiceLoader ── Docker Engine API
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Run discovery and log route changes until SIGINT/SIGTERM
//! sni-proxy -c /etc/sni-proxy/config.toml
//!
//! # Resolve names once against static routes and a single discovery load
//! sni-proxy -c config.toml resolve api.example www.example
//!
//! # Validate configuration
//! sni-proxy -c config.toml check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sni_proxy::config::{load_config, ProxyConfig};
use sni_proxy::lifecycle::{shutdown_signal, Backends, StartupError};
use sni_proxy::observability::logging;
use sni_proxy::{Resolution, ServerName};

/// TLS SNI back-end resolver with Docker service discovery.
#[derive(Parser, Debug)]
#[command(name = "sni-proxy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "SNI_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run service discovery until interrupted (default)
    Run,
    /// Resolve server names once and print the result
    Resolve {
        /// Server names to resolve
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Validate the configuration and exit
    Check,
}

impl Args {
    fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("sni-proxy: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ProxyConfig::default(),
    };

    if let Err(e) = logging::init_logging(&config.observability, args.log_level()) {
        eprintln!("sni-proxy: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match args.command.unwrap_or(Command::Run) {
        Command::Run => run(&config).await,
        Command::Resolve { names } => resolve(&config, &names).await,
        Command::Check => {
            tracing::info!(routes = config.routes.len(), "Configuration is valid");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ProxyConfig) -> Result<(), StartupError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sni-proxy starting");

    let backends = Backends::from_config(config)?;
    let poller = backends.spawn_discovery();

    let timeout = config.discovery.startup_timeout();
    if !backends.wait_ready(timeout).await {
        tracing::warn!(?timeout, "Initial service discovery did not finish in time");
    }
    tracing::info!("Ready to resolve server names");

    if let Err(e) = shutdown_signal().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signals");
    }

    backends.stop();
    if let Some(poller) = poller {
        if let Err(e) = poller.await {
            tracing::error!(error = %e, "Discovery task ended abnormally");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn resolve(config: &ProxyConfig, names: &[String]) -> Result<(), StartupError> {
    let backends = Backends::from_config(config)?;

    if let Some(discovery) = backends.discovery() {
        if let Err(e) = discovery.refresh().await {
            tracing::warn!(error = %e, "Service discovery failed, resolving with static routes only");
        }
    }

    for raw in names {
        let name = ServerName::new(raw);
        match backends.locate(&name) {
            Resolution::Found(endpoint) => println!("{name}\t{endpoint}"),
            Resolution::Refused => println!("{name}\t(no route: refused)"),
            Resolution::NoMatch => println!("{name}\t(no route)"),
        }
    }
    Ok(())
}
