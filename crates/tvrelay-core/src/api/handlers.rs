//! API handlers for the HTTP surface

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::error::Error;
use crate::relay::AlertRelay;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Relay handling `/tv` alerts
    pub relay: Arc<AlertRelay>,
}

/// JSON reply used by every endpoint
#[derive(Debug, Serialize)]
pub struct Reply {
    /// Whether the request succeeded
    pub ok: bool,
    /// Generic error message, never the underlying cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl Reply {
    /// Successful reply
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    /// Failed reply with a generic message
    pub fn failed(error: &'static str) -> Self {
        Self {
            ok: false,
            error: Some(error),
        }
    }
}

/// Trivial liveness text
pub async fn root() -> &'static str {
    "OK"
}

/// Health check endpoint
pub async fn health() -> Json<Reply> {
    Json(Reply::ok())
}

/// Charting platform webhook.
///
/// The body is parsed as JSON whatever the content type says. An empty or
/// malformed body counts as missing and is rejected like a wrong secret.
pub async fn tradingview_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = serde_json::from_slice::<Value>(&body).ok();

    match state.relay.handle(payload.as_ref()).await {
        Ok(_) => Json(Reply::ok()).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &Error) -> Response {
    match err {
        Error::Unauthorized => {
            (StatusCode::UNAUTHORIZED, Json(Reply::failed("Invalid secret"))).into_response()
        }
        other => {
            error!(error = %other, "TV webhook error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Reply::failed("Server error")),
            )
                .into_response()
        }
    }
}
