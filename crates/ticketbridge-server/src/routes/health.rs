use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// Always 200: the aggregate is advisory.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let report = state.probe.check().await;
    Json(json!({
        "status": report.status_str(),
        "healthy": report.healthy(),
        "store": report.store,
        "tracker": report.tracker,
    }))
}
