use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

mod ai;
mod routes;

const DEFAULT_BIND: &str = "0.0.0.0:3001";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub api_key: Option<String>,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl AppState {
    fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/generate-code", post(routes::generate_code))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info".into()),
        )
        .init();

    let state = AppState::from_env();
    if state.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; code generation requests will fail");
    }

    let bind = std::env::var("NFINIT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {bind}: {e}");
            return;
        }
    };
    tracing::info!("Code generation server running on http://{bind}");
    if let Err(e) = axum::serve(listener, router(state)).await {
        tracing::error!("Server error: {e}");
    }
}
