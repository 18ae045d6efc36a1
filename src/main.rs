mod agent;
mod config;
mod config_manager;
mod error;
mod logging;
mod routes;
mod state;
mod storage;
mod vision;
mod weather;
mod workflow;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; keys may come from the real environment
    let dotenv = dotenvy::dotenv();

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        Some("config/conf.yaml".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut loaded = None;
    let mut errors = Vec::new();
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                loaded = Some((path, cfg));
                break;
            }
            Err(e) => errors.push(format!("{}: {}", path, e)),
        }
    }

    let (config_path, config) = loaded.ok_or_else(|| {
        anyhow::anyhow!("Could not load a config file. Tried:\n{}", errors.join("\n"))
    })?;

    // Held until shutdown so buffered file lines are flushed
    let _log_guard = logging::init(config.server.log_file.as_deref())?;

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    for failed in &errors {
        debug!("Failed to load config from {}", failed);
    }
    info!("Loaded configuration from: {}", config_path);

    let app_state = AppState::new(&config)?;

    let app = Router::new()
        .merge(routes::create_routes(app_state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
