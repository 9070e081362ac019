//! Odyssey API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use odyssey_api::config::{Config, ContentSource};
use odyssey_api::error::AppError;
use odyssey_api::routes;
use odyssey_api::state::AppState;
use odyssey_content::{HttpCsvContentRepository, YamlContentRepository};
use odyssey_core::clock::{Clock, SystemClock};
use odyssey_core::repository::ContentRepository;
use odyssey_core::rng::SystemRng;
use odyssey_session::application::command_handlers::evict_idle_sessions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Odyssey API server");

    let config = Config::from_env()?;
    let content_repository = build_content_repository(&config.content)?;

    // Build application state.
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let app_state = AppState::new(config.game, clock, SystemRng::factory(), content_repository);

    spawn_idle_sweeper(&app_state, config.sweep_interval);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with the chat front end's origin.
    let app = routes::app_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!(
        max_rounds = config.game.max_rounds,
        schedule = %config.game.schedule,
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_content_repository(
    source: &ContentSource,
) -> Result<Arc<dyn ContentRepository>, AppError> {
    match source {
        ContentSource::HttpCsv {
            scenarios_url,
            questions_url,
            timeout,
        } => {
            let client = reqwest::Client::builder().timeout(*timeout).build()?;
            tracing::info!(%scenarios_url, %questions_url, "fetching content from CSV exports");
            Ok(Arc::new(HttpCsvContentRepository::new(
                client,
                scenarios_url.as_str(),
                questions_url.as_str(),
            )))
        }
        ContentSource::YamlFile(path) => Ok(Arc::new(YamlContentRepository::from_path(path)?)),
    }
}

/// Periodically drops sessions that have been idle past the timeout.
fn spawn_idle_sweeper(state: &AppState, every: std::time::Duration) {
    let store = Arc::clone(&state.store);
    let clock = Arc::clone(&state.clock);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(err) = evict_idle_sessions(&store, clock.as_ref()) {
                tracing::warn!(%err, "idle session sweep failed");
            }
        }
    });
}
