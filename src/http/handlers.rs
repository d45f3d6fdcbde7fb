use super::cors::preflight_response;
use super::response::{error_response, not_found_response, SAVED_MESSAGE};
use super::state::AppState;
use crate::core::ingest::Receipt;
use crate::utils::error::{FormError, Result};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// 讀完整個 body 再解析，避免只讀到第一個 chunk
async fn drain_body(body: Body, limit: usize) -> Result<Bytes> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| FormError::BodyRead {
            message: e.to_string(),
        })
}

async fn accept_submission(state: &AppState, body: Body) -> Result<Receipt> {
    let bytes = drain_body(body, state.max_body_bytes).await?;
    state.ingest.ingest(&bytes).await
}

pub async fn submit_form_data(State(state): State<AppState>, body: Body) -> Response {
    match accept_submission(&state, body).await {
        Ok(_) => (StatusCode::OK, SAVED_MESSAGE).into_response(),
        Err(e) => error_response("POST request", &e),
    }
}

pub async fn read_form_data(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(reader) = &state.reader else {
        return not_found_response();
    };

    if let Some(gate) = &state.gate {
        let presented = headers
            .get(gate.header())
            .and_then(|value| value.to_str().ok());
        if let Err(e) = gate.check(presented) {
            return error_response("GET request", &e);
        }
    }

    match reader.read_all().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => error_response("GET request", &e),
    }
}

/// OPTIONS anywhere is a preflight; every other unmatched request is a 404.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        preflight_response()
    } else {
        not_found_response()
    }
}
