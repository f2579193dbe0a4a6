//! darkroom server binary.

use anyhow::{Context, Result};
use clap::Parser;
use darkroom_core::config::AppConfig;
use darkroom_engine::ImageEngine;
use darkroom_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// darkroom - an on-demand image transformation server
#[derive(Parser, Debug)]
#[command(name = "darkroomd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DARKROOM_CONFIG",
        default_value = "config/darkroom.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("darkroom v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    // Check for DARKROOM_ environment variables (excluding DARKROOM_CONFIG which is just the path)
    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("DARKROOM_") && key != "DARKROOM_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: darkroomd --config /path/to/darkroom.toml\n  \
             2. Environment variables: DARKROOM_SERVER__BIND=0.0.0.0:6001 \
             DARKROOM_STORAGE__STORE__TYPE=filesystem ... darkroomd\n\n\
             See config/darkroom.example.toml for example configuration.\n\
             Set DARKROOM_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DARKROOM_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Invalid configuration is fatal; never start serving on a partial setup.
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid configuration")?;

    // Initialize the cache tier if configured
    let cache_store = match &config.cache_store {
        Some(cache_config) => {
            let store = darkroom_cache::from_config(cache_config)
                .await
                .context("failed to initialize cache store")?;
            tracing::info!(backend = store.backend_name(), "Cache store initialized");
            Some(store)
        }
        None => {
            tracing::info!("No cache store configured, cache tier disabled");
            None
        }
    };

    // Initialize storage backends
    let source_storage = darkroom_storage::source_from_config(config.storage.source_config())
        .await
        .context("failed to initialize source storage")?;
    let store_storage = darkroom_storage::store_from_config(&config.storage.store)
        .await
        .context("failed to initialize store storage")?;
    tracing::info!(
        source = source_storage.backend_name(),
        store = store_storage.backend_name(),
        "Storage backends initialized"
    );

    // Create application state
    let state = AppState::new(
        config.clone(),
        cache_store,
        source_storage,
        store_storage,
        Arc::new(ImageEngine::new()),
    );

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
