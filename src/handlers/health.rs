use axum::{routing::get, Router};

use crate::AppState;

/// Plain-text body returned by the liveness probe.
pub const HEALTH_MESSAGE: &str = "RISTOWORD backend attivo 🚀";

pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe; the service has no dependencies worth checking.
pub async fn health_check() -> &'static str {
    HEALTH_MESSAGE
}
