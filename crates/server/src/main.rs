use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

mod ai;
mod routes;

const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
const DEFAULT_BIND: &str = "0.0.0.0:3001";

#[derive(Clone)]
pub struct AppState {
    pub ai_api_key: Option<String>,
    pub model: String,
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "massing_server=info".into()),
        )
        .init();

    let state = AppState {
        ai_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
        model: std::env::var("MASSING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        http: reqwest::Client::new(),
    };
    if state.ai_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, /api/generate will answer 503");
    }

    let app = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/generate", post(routes::generate))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind = std::env::var("MASSING_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {bind}: {e}");
            return;
        }
    };
    tracing::info!("Generator service running on http://{bind}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
    }
}
