//! Gallery sync entry point.
//!
//! Wires configuration, authentication, the Drive connector, the
//! reconciliation engine, and the document updater into one sequential run.
//!
//! Exit codes: 0 on success or no-op, 1 on configuration/authentication
//! failure or interruption. Per-item failures during the run are logged and
//! skipped, never fatal.

mod cli;

use clap::Parser;
use cli::Cli;
use core_gallery::DocumentUpdater;
use core_image::{ImageLimits, ImageProcessor};
use core_runtime::logging::{init_logging, LoggingConfig};
use core_runtime::GalleryConfig;
use core_sync::{LocalImageStore, ManifestStore, Reconciler};
use provider_google_drive::{
    Authenticator, DriveConnector, DriveError, HttpClient, ReqwestHttpClient, StoredCredentials,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn, Level};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] core_runtime::Error),

    #[error(transparent)]
    Drive(#[from] DriveError),

    #[error("Interrupted")]
    Interrupted,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig::default()
        .with_format(cli.log_format.into())
        .with_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        });
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Sync aborted");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut builder = GalleryConfig::builder()
        .credentials_path(cli.credentials)
        .root_folder_id(cli.root_folder)
        .site_root(cli.site_root);
    if let Some(manifest) = cli.manifest {
        builder = builder.manifest_path(manifest);
    }
    if let Some(index) = cli.index {
        builder = builder.index_path(index);
    }
    let config = builder.build()?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let credentials = StoredCredentials::from_file(&config.credentials_path).await?;
    let access_token = Authenticator::new(credentials, Arc::clone(&http))
        .access_token()
        .await?;

    let connector = DriveConnector::new(
        http,
        access_token,
        config.root_folder_id.clone(),
        Duration::from_millis(config.rate_limit_delay_ms),
    );

    let limits = ImageLimits {
        max_file_size_bytes: config.max_file_size_bytes,
        allowed_extensions: config.allowed_extensions.clone(),
        min_dimensions: config.min_dimensions,
        max_dimensions: config.max_dimensions,
        jpeg_quality: config.jpeg_quality,
    };

    let manifest_store = ManifestStore::new(config.manifest_path.clone());
    let reconciler = Reconciler::new(
        Arc::new(connector),
        ImageProcessor::new(limits),
        LocalImageStore::new(config.images_dir.clone(), config.site_root.clone()),
        ManifestStore::new(config.manifest_path.clone()),
        config.styles.clone(),
    );

    let mut gallery = manifest_store.load().await;

    info!(root_folder = %config.root_folder_id, "Starting gallery sync");
    let report = tokio::select! {
        report = reconciler.run(&mut gallery) => report,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, discarding this run's work");
            return Err(CliError::Interrupted);
        }
    };

    if cli.skip_html {
        info!("Skipping document update");
    } else if report.has_changes() {
        // Document update failures are logged but never fail the run; the
        // manifest and local images are already in place.
        match DocumentUpdater::new(&config.index_path)
            .update_all(&gallery.images)
            .await
        {
            Ok(updated) if updated.is_empty() => info!("No document sections needed updating"),
            Ok(updated) => info!(styles = ?updated, "Document updated"),
            Err(e) => warn!(error = %e, "Document update failed"),
        }
    } else {
        info!("No new images; document left untouched");
    }

    Ok(())
}
