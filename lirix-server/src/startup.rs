use std::{net::SocketAddr, path::Path, sync::Arc, time::Instant};

use anyhow::Context;
use axum::{
    Router,
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
};
use lirix_core::{Config, Location, WeatherProvider, provider_from_config};
use log::{info, warn};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;

use crate::routes::{
    about_handler, detail_handler, help_handler, not_found_handler, overview_handler,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    /// Registry of locations, in overview order.
    pub locations: Vec<Location>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>, locations: Vec<Location>) -> Self {
        Self { provider, locations }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(Arc::from(provider), config.locations.clone()))
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }
}

pub fn app(app_state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/", get(overview_handler))
        .route("/detail", get(detail_handler))
        .route("/about", get(about_handler))
        .route("/help", get(help_handler))
        .fallback(not_found_handler)
        .with_state(Arc::new(app_state));

    let router = match static_dir {
        Some(dir) => router.nest_service("/static", ServeDir::new(dir)),
        None => router,
    };

    router.layer(middleware::from_fn(log_request))
}

/// Bind the configured address and serve until Ctrl+C / SIGTERM.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.listen_addr()?;
    let app_state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(socket_addr)
        .await
        .with_context(|| format!("error binding to socket {socket_addr}"))?;

    info!("Lirix starting...");
    info!("  Listen:    http://{}", socket_addr);
    info!("  Upstream:  {}", config.openweather.base_url);
    info!("  Timezone:  {}", config.timezone);
    info!("  Locations: {}", config.locations.len());
    if let Some(dir) = &config.static_dir {
        info!("  Static:    {}", dir.display());
    }
    if !config.has_api_key() {
        warn!("No OpenWeatherMap API key configured; run `lirix configure` to set one");
    }

    let app = app(app_state, config.static_dir.as_deref());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Lirix stopped");
    Ok(())
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", method, path);

    let response = next.run(request).await;
    info!(
        target: "http_response",
        "response, {} {}, code: {}, time: {:?}",
        method,
        path,
        response.status().as_str(),
        started.elapsed()
    );

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
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
