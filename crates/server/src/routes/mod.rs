use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::ai::{self, RequestProblem};
use crate::AppState;
use shared::{CodeGenErrorBody, CodeGenRequest, CodeGenResponse};

type ApiError = (StatusCode, Json<CodeGenErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(CodeGenErrorBody { error: message.into() }))
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Conversation + current code → generated build123d source
pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<CodeGenRequest>,
) -> Result<Json<CodeGenResponse>, ApiError> {
    let api_key = ai::validate(&state, &request).map_err(|problem| match problem {
        RequestProblem::BadRequest(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        RequestProblem::NotConfigured(msg) => api_error(StatusCode::INTERNAL_SERVER_ERROR, msg),
    })?;

    let code = ai::generate_code(&state, api_key, &request)
        .await
        .map_err(|e| {
            tracing::error!("Generate code error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    tracing::info!(
        model = %request.model_id,
        turns = request.messages.len(),
        "Generated {} bytes of code",
        code.len()
    );
    Ok(Json(CodeGenResponse { code }))
}
