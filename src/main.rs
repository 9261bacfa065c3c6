use std::process::ExitCode;
use std::sync::Arc;

use squad_status_sync::discord::DiscordClient;
use squad_status_sync::server::FileSnapshotSource;
use squad_status_sync::{Config, Reconciler, StatusError, StatusSync};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Status sync stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StatusError> {
    let config = Config::load().await;
    let mut platform = DiscordClient::from_env(&config)?;

    if config.sync.disable_status {
        info!("Presence updates disabled by config");
    } else {
        platform = platform.with_presence_gateway(&config.discord_gateway_url)?;
        info!(url = %config.discord_gateway_url, "Presence gateway session started");
    }
    if config.sync.targets.is_empty() {
        warn!("No messageIDs configured, only the tick loop will run");
    }

    let source = FileSnapshotSource::new(&config.snapshot_path);
    let reconciler = Reconciler::new(
        config.sync.clone(),
        config.footer_text.clone(),
        Arc::new(platform),
        Arc::new(source),
    );

    let mut status_sync = StatusSync::new(reconciler);
    status_sync.mount()?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    status_sync.unmount();
    Ok(())
}
