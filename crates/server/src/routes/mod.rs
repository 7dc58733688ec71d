use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::ai;
use crate::AppState;
use shared::{GenerateRequest, GenerateResponse};

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Prompt → raw massing layout JSON
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let Some(api_key) = state.ai_api_key.as_deref() else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };
    if request.prompt.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let layout = ai::generate_layout(&state.http, api_key, &state.model, &request.prompt)
        .await
        .map_err(|e| {
            tracing::error!("Generation error: {}", e);
            StatusCode::BAD_GATEWAY
        })?;
    Ok(Json(GenerateResponse { layout }))
}
