mod sink;
mod source;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cnd_core::{
    load_config, validate_config, CertificateIssuer, ControlFileResolver, Downloader,
    HttpDownloader, InfosimplesClient, RetrievalOrchestrator,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("CND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Compute config hash so runs are attributable to a configuration
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "cnd runner starting"
    );

    // Resolve this period's control spreadsheet - fatal if missing, there
    // is nothing to process without it.
    let resolver = ControlFileResolver::new(config.resolver.clone());
    let today = Local::now().date_naive();
    let control_file = resolver
        .resolve(today)
        .context("Control file resolution failed")?;
    info!(path = %control_file.display(), "Control file resolved");

    // The spreadsheet reader is an external collaborator; the runner takes
    // the already-extracted identifier list as JSON.
    let tasks = source::load_tasks(&config.input.tasks_path)
        .await
        .with_context(|| format!("Failed to load tasks from {:?}", config.input.tasks_path))?;
    if tasks.is_empty() {
        warn!("No identifiers to process");
    }
    info!(count = tasks.len(), "Identifier list loaded");

    // Wire the engine
    let issuer: Arc<dyn CertificateIssuer> = Arc::new(InfosimplesClient::new(config.api.clone()));
    info!("Using issuer: {}", issuer.name());
    let downloader: Arc<dyn Downloader> = Arc::new(HttpDownloader::new(config.download.clone()));

    let orchestrator = RetrievalOrchestrator::new(
        config.retrieval.clone(),
        issuer,
        downloader,
        config.destination.root.clone(),
    );

    // Run; per-identifier failures are inside the report, never fatal.
    let report = orchestrator.process_all(tasks).await;
    info!(
        rows = report.rows.len(),
        failures = report.failures.len(),
        "Run complete"
    );
    for failure in &report.failures {
        warn!(cnpj = %failure.cnpj, reason = %failure.reason, "Identifier failed");
    }

    // Hand off to the persistence/export collaborators as JSON.
    sink::write_report(&report, &config.report.output_path)
        .await
        .context("Failed to write report")?;
    info!(path = %config.report.output_path.display(), "Report written");

    Ok(())
}
