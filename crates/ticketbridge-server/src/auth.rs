use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::routes::AppState;

/// Authentication configuration.
pub struct AuthConfig {
    /// SHA-256 hash of the configured API key.
    pub key_hash: String,
}

/// SHA-256 hash a raw key, returning the hex-encoded digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a new API key: `tb_` + 43 chars of base62-encoded random bytes.
pub fn generate_api_key() -> String {
    use rand::Rng;
    const BASE62: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let random_part: String = (0..43)
        .map(|_| {
            let idx = rng.gen_range(0..BASE62.len());
            BASE62[idx] as char
        })
        .collect();
    format!("tb_{random_part}")
}

/// Axum middleware guarding the protected routes.
///
/// With no key configured every request passes. Otherwise a valid
/// `Authorization: Bearer <key>` header is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth = match &state.auth {
        Some(auth) => auth,
        None => return next.run(request).await,
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        if constant_time_eq(&sha256_hex(token), &auth.key_hash) {
            return next.run(request).await;
        }
    }

    warn!("rejected {} {}: missing or invalid API key", request.method(), request.uri().path());
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing or invalid API key" })),
    )
        .into_response()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Build an `Option<AuthConfig>` from a configured key.
///
/// Returns `None` (open access) when no key, or an empty key, is given.
pub fn build_auth_config(key: Option<&str>) -> Option<Arc<AuthConfig>> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| {
            Arc::new(AuthConfig {
                key_hash: sha256_hex(k),
            })
        })
}
