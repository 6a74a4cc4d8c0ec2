//! # surikata
//!
//! Live Q&A server binary. Loads settings, wires the in-memory store into
//! the HTTP/WebSocket server and serves until ctrl-c.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use surikata_settings::SurikataSettings;
use surikata_store::MemoryStore;
use surikata_server::config::ServerConfig;
use surikata_server::server::SurikataServer;

/// Surikata live Q&A server.
#[derive(Parser, Debug)]
#[command(name = "surikata", about = "Live Q&A server for conference sessions")]
struct Cli {
    /// Settings file (defaults to `~/.surikata/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Node name reported by `/health` (overrides settings).
    #[arg(long)]
    name: Option<String>,

    /// Log level or filter directive (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines.
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Apply command-line flags on top of loaded settings.
    fn apply(&self, settings: &mut SurikataSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(name) = &self.name {
            settings.name.clone_from(name);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.log_json {
            settings.logging.json = true;
        }
    }
}

fn load(args: &Cli) -> Result<SurikataSettings> {
    let path = args.settings.clone().unwrap_or_else(surikata_settings::settings_path);
    let mut settings = surikata_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    args.apply(&mut settings);
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = load(&args)?;

    surikata_core::logging::init_subscriber(&settings.logging.level, settings.logging.json);

    let metrics = surikata_server::metrics::install_recorder().context("Failed to install metrics recorder")?;

    let store = Arc::new(MemoryStore::new());
    let server = SurikataServer::new(ServerConfig::from_settings(&settings), store).with_metrics(metrics);
    let method_count = server.methods().methods().len();

    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!(
        name = %settings.name,
        "surikata listening on http://{addr} ({method_count} RPC methods registered)"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    server
        .shutdown()
        .graceful_shutdown(
            vec![handle],
            Some(Duration::from_secs(settings.server.shutdown_timeout_secs)),
        )
        .await;

    tracing::info!("shutdown complete");
    Ok(())
}
