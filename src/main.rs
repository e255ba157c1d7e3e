//! Browser connector CLI.
//!
//! Hosts the session manager outside a browser: discovers the local browser
//! tools server, keeps the session alive, and prints status events.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use connector_protocols::{
    ConnectionState, DiscoveryReason, ProbeOutcome, ServerCandidate, StatusEvent,
};
use connector_session::{
    ConnectorConfig, FileSettingsStore, HttpTransport, IdentityValidator, SessionManager,
};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let store = match &cli.settings {
        Some(path) => FileSettingsStore::new(path.clone()),
        None => FileSettingsStore::default_location()?,
    };
    let transport = Arc::new(HttpTransport::new()?);
    let config = ConnectorConfig::default();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let manager = SessionManager::new(transport, Arc::new(store), config);
            manager.start().await?;
            run(manager).await
        }
        Commands::Discover => {
            let manager = SessionManager::new(transport, Arc::new(store), config);
            manager.start().await?;
            discover(manager).await
        }
        Commands::Check { host, port } => check(transport, &config, host, port).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Keep the session alive until Ctrl-C, logging every status change.
async fn run(manager: SessionManager) -> anyhow::Result<ExitCode> {
    let mut events = manager.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StatusEvent::ConnectionStatusChanged {
                    state: ConnectionState::Connected,
                    candidate,
                    identity,
                } => {
                    let candidate = candidate.map(|c| c.to_string()).unwrap_or_default();
                    let identity = identity
                        .map(|i| format!("{} {}", i.name, i.version))
                        .unwrap_or_default();
                    info!(%candidate, %identity, "connected");
                }
                StatusEvent::ConnectionStatusChanged { state, .. } => {
                    info!(%state, "connection status changed");
                }
                StatusEvent::DiscoveryRequested {
                    reason,
                    force_restart,
                } => {
                    debug!(?reason, force_restart, "discovery requested");
                }
            }
        }
    });

    manager.request_discovery(DiscoveryReason::Explicit, true);

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    printer.abort();
    Ok(ExitCode::SUCCESS)
}

/// One scan; exit code reflects whether a server was found.
async fn discover(manager: SessionManager) -> anyhow::Result<ExitCode> {
    let mut events = manager.subscribe();
    manager.request_discovery(DiscoveryReason::Explicit, true);

    while let Ok(event) = events.recv().await {
        if let StatusEvent::ConnectionStatusChanged {
            state,
            candidate,
            identity,
        } = event
        {
            match state {
                ConnectionState::Connected => {
                    let candidate = candidate.map(|c| c.to_string()).unwrap_or_default();
                    match identity {
                        Some(identity) => println!(
                            "found {} {} at {}",
                            identity.name, identity.version, candidate
                        ),
                        None => println!("found server at {}", candidate),
                    }
                    return Ok(ExitCode::SUCCESS);
                }
                ConnectionState::Disconnected => {
                    println!("no server found");
                    return Ok(ExitCode::FAILURE);
                }
                _ => {}
            }
        }
    }

    warn!("event bus closed before discovery finished");
    Ok(ExitCode::FAILURE)
}

/// One identity probe against a single candidate.
async fn check(
    transport: Arc<HttpTransport>,
    config: &ConnectorConfig,
    host: String,
    port: u16,
) -> anyhow::Result<ExitCode> {
    let validator = IdentityValidator::new(transport);
    let candidate = ServerCandidate::new(host, port);

    match validator.validate(&candidate, config.check_timeout()).await {
        ProbeOutcome::Verified(identity) => {
            println!(
                "{}: verified ({} {})",
                candidate, identity.name, identity.version
            );
            Ok(ExitCode::SUCCESS)
        }
        ProbeOutcome::Rejected => {
            println!("{}: rejected (a server answered with the wrong identity)", candidate);
            Ok(ExitCode::FAILURE)
        }
        ProbeOutcome::Unreachable(cause) => {
            println!("{}: unreachable ({})", candidate, cause);
            Ok(ExitCode::from(2))
        }
    }
}
