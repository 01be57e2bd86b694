//! Request handlers. Every failure is a 400 with `{"error": message}`.

use super::AppState;
use crate::core::normalize;
use crate::core::types::SummaryReport;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Response for a normalized name
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub msg: String,
}

/// `?name=` for summaries
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub name: Option<String>,
}

fn bad_request(message: impl Into<String>) -> Response {
    let error = serde_json::json!({ "error": message.into() });
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

fn json_body(body: &Bytes) -> Result<serde_json::Value, Response> {
    serde_json::from_slice(body).map_err(|e| bad_request(format!("malformed JSON: {}", e)))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Normalize a handwritten name
///
/// POST /parse `{"input": "meatball_-_sub"}`
pub async fn parse(body: Bytes) -> Response {
    let payload = match json_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(input) = payload.get("input").and_then(|i| i.as_str()) else {
        return bad_request("input must be a string");
    };

    match normalize::normalize_name(input) {
        Ok(msg) => (StatusCode::OK, Json(ParseResponse { msg })).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

/// Register an ingredient or recipe
///
/// POST /entry
pub async fn create_entry(State(registry): State<AppState>, body: Bytes) -> Response {
    let payload = match json_body(&body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match registry.register_payload(&payload) {
        Ok(name) => {
            info!(name = %name, "entry created");
            (StatusCode::OK, Json(serde_json::json!({}))).into_response()
        }
        Err(e) => bad_request(e.to_string()),
    }
}

/// Summarize an entry
///
/// GET /summary?name=Pancake
pub async fn summary(
    State(registry): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let Some(name) = query.name.filter(|n| !n.is_empty()) else {
        return bad_request("name query parameter is required");
    };

    match registry.summarize(&name) {
        Ok(result) => (StatusCode::OK, Json(SummaryReport::new(&name, &result))).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}
