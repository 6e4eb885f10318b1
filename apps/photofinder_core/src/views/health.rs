use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use crate::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub app: &'static str,
}

/// Probes the store; unhealthy when the probe fails.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.probe.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                app: "photofinder_core",
            }),
        ),
        Err(e) => {
            error!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "unavailable",
                    app: "photofinder_core",
                }),
            )
        }
    }
}
