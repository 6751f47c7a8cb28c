//! Narrated shorts worker binary.

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shortcast_media::WhisperCli;
use shortcast_publish::{cleanup_uploaded, run_publish, JsonStateStore, YouTubeClient};
use shortcast_worker::{run_render_pass, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("shortcast=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting shortcast-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Err(e) = run(config).await {
        error!("Worker error: {:#}", e);
        std::process::exit(1);
    }

    info!("Worker run complete");
}

async fn run(config: WorkerConfig) -> anyhow::Result<()> {
    let store = JsonStateStore::new(&config.state_path);
    let transcriber = WhisperCli::new(&config.whisper_model);

    run_render_pass(&store, &transcriber, &config)
        .await
        .context("render pass failed")?;

    match YouTubeClient::from_env() {
        Ok(publisher) => {
            let result = run_publish(&store, &publisher, &config.publish_options())
                .await
                .context("publish pass failed")?;

            if result.stopped_early {
                warn!(
                    "Publishing halted early: {}",
                    result.reason.as_deref().unwrap_or("quota exhausted")
                );
            }
        }
        Err(e) => {
            warn!("Publishing skipped: {}", e);
        }
    }

    cleanup_uploaded(&store).await.context("cleanup failed")?;

    Ok(())
}
