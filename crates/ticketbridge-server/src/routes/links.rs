use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use ticketbridge_core::message::MessageId;
use ticketbridge_db::LinkStore;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/links/{message_id}", get(get_link))
}

async fn get_link(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let id = MessageId::parse(&message_id)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))))?;

    match state.store.get_link(&id.to_string()).await {
        Ok(Some(link)) => Ok(Json(json!(link))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no issue linked to message {id}") })),
        )),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
