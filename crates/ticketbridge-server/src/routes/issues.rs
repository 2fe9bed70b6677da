use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use ticketbridge_core::conversion::{ConversionRequest, ConversionResult, FailureKind};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/issues", post(create_issue))
}

async fn create_issue(
    State(state): State<AppState>,
    Json(input): Json<ConversionRequest>,
) -> (StatusCode, Json<Value>) {
    let result = state.workflow.convert(&input).await;
    let mut body = json!(result);
    body["message"] = json!(result.summary());
    (status_for(&result), Json(body))
}

pub(crate) fn status_for(result: &ConversionResult) -> StatusCode {
    match result.failure_kind() {
        None => StatusCode::CREATED,
        Some(FailureKind::InvalidRequest) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureKind::InvalidMessageId) => StatusCode::BAD_REQUEST,
        Some(FailureKind::MessageNotFound) => StatusCode::NOT_FOUND,
        Some(FailureKind::AlreadyLinked) => StatusCode::CONFLICT,
        Some(FailureKind::PersistenceConflict) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(FailureKind::ChatUnavailable | FailureKind::TrackerError) => StatusCode::BAD_GATEWAY,
        Some(FailureKind::StoreUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
