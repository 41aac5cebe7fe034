//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, ErrorResponse, HealthResponse, MintRequest, MintResponse,
};
use common::ServiceError;
use scoped_key::ErrorKind;
use tracing::{error, warn};

use super::state::AppState;

/// `POST /scoped-keys` — seal the request policy into a new scoped key.
pub async fn mint(State(state): State<AppState>, Json(req): Json<MintRequest>) -> Response {
    let master_key = match state.master_key() {
        Ok(k) => k,
        Err(e) => return error_response(&e),
    };

    match state
        .minter
        .encrypt(master_key.expose(), &req.policy, req.iv.as_deref())
    {
        Ok(scoped_key) => (StatusCode::OK, Json(MintResponse { scoped_key })).into_response(),
        Err(e) => error_response(&classify(e)),
    }
}

/// `POST /scoped-keys/decrypt` — recover the plaintext of a scoped key.
pub async fn decrypt(State(state): State<AppState>, Json(req): Json<DecryptRequest>) -> Response {
    let master_key = match state.master_key() {
        Ok(k) => k,
        Err(e) => return error_response(&e),
    };

    match state.minter.decrypt(master_key.expose(), &req.scoped_key) {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => error_response(&classify(e)),
    }
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` when a master key is loaded.
/// Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let master_key_loaded = state.master_key.is_some();

    let (status_code, status_str) = if master_key_loaded {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        master_key_loaded,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Map a library error onto the service error taxonomy.
///
/// A key error means the configured master key is unusable, which is the
/// operator's fault rather than the caller's.
fn classify(err: scoped_key::Error) -> ServiceError {
    match err.kind() {
        ErrorKind::Key => {
            error!(error = %err, "configured master key rejected");
            ServiceError::Internal("master key rejected".into())
        }
        ErrorKind::Iv | ErrorKind::Payload | ErrorKind::TokenFormat | ErrorKind::Cipher => {
            warn!(kind = ?err.kind(), error = %err, "scoped key request rejected");
            ServiceError::BadRequest(err.to_string())
        }
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}
