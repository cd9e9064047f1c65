mod reddit;
mod sink;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maplink_core::{
    load_config, validate_config, BeatmapResolver, DifficultyRecalculator, FailureLog,
    FileFailureLog, OppaiAnalyzer, OsuApi, OsuApiClient, Pipeline, PipelineOutcome,
};

use reddit::RedditSource;
use sink::{CommentSink, LogSink};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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
    let config_path = std::env::var("MAPLINK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Wire up the pipeline collaborators
    let api: Arc<dyn OsuApi> = Arc::new(
        OsuApiClient::new(config.osu.clone()).context("Failed to create osu! API client")?,
    );
    let analyzer = Arc::new(OppaiAnalyzer::new(config.oppai.clone()));
    let faillog: Arc<dyn FailureLog> = Arc::new(FileFailureLog::new(config.log.failures.clone()));
    info!("Failure log at {:?}", config.log.failures);

    let resolver =
        BeatmapResolver::new(Arc::clone(&api)).with_recent_limit(config.resolver.recent_limit);
    let recalc = DifficultyRecalculator::new(Arc::clone(&api), analyzer, config.recalc.clone())
        .with_faillog(Arc::clone(&faillog));
    let pipeline =
        Pipeline::new(resolver, recalc, config.report.clone()).with_faillog(faillog);

    let mut source =
        RedditSource::new(config.reddit.clone()).context("Failed to create listing source")?;
    let comment_sink = LogSink;

    info!(
        "Polling /r/{} every {}s",
        config.reddit.subreddit, config.reddit.poll_secs
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.reddit.poll_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poll_once(&mut source, &pipeline, &comment_sink).await;
            }
            _ = shutdown_signal() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Fetch the listing once and run every new post through the pipeline.
/// Listing faults are logged and skipped; the next tick retries.
async fn poll_once(source: &mut RedditSource, pipeline: &Pipeline, comment_sink: &dyn CommentSink) {
    let posts = match source.fetch_new().await {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Listing fetch failed: {}", e);
            return;
        }
    };

    for post in posts {
        match pipeline.handle(&post).await {
            PipelineOutcome::Comment(comment) => {
                comment_sink.publish(&post.title, &comment).await;
            }
            PipelineOutcome::NotApplicable | PipelineOutcome::ResolutionFailed => {}
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
