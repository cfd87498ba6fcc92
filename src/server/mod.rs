//! HTTP surface: the words endpoint, the subscription endpoint and,
//! optionally, the static front end.
//!
//! Routes are mounted twice: under `/api` and under the
//! `/.netlify/functions` paths the existing front end calls.

mod error;
mod routes;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::storage::Database;

pub use error::{ApiError, ErrorBody};
pub use routes::{is_valid_email, SubscribeResponse};

/// Shared handler state. Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub feed_url: Arc<str>,
    pub db: Database,
}

impl AppState {
    pub fn new(client: reqwest::Client, feed_url: &str, db: Database) -> Self {
        Self {
            client,
            feed_url: Arc::from(feed_url),
            db,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/api/words", get(routes::words))
        .route("/api/subscribe", subscribe_route())
        .route("/.netlify/functions/getWords", get(routes::words))
        .route("/.netlify/functions/submitEmail", subscribe_route())
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving static files");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

/// POST only; any other method gets the JSON 405 body.
fn subscribe_route() -> MethodRouter<AppState> {
    post(routes::subscribe).fallback(routes::method_not_allowed)
}

/// Binds `addr` and serves until Ctrl+C.
pub async fn serve(addr: &str, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await
}
