//! HTTP handlers for the agent service.

use crate::dtos::{ExecuteRequest, ExecuteResponse, HealthResponse, InfoResponse, RootResponse};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::running())
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(chrono::Utc::now().timestamp()))
}

pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse::current())
}

/// Decode the first JSON value in `body`. Anything after it is ignored and a
/// literal `null` is an empty request.
fn decode_request(body: &[u8]) -> Result<ExecuteRequest, AppError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<ExecuteRequest>>()
        .next()
    {
        Some(Ok(request)) => Ok(request.unwrap_or_default()),
        Some(Err(e)) => Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid request body: {}",
            e
        ))),
        None => Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid request body: empty body"
        ))),
    }
}

/// Run the agent on the posted prompt.
///
/// The body is decoded as JSON whatever its declared content type.
pub async fn execute(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request = decode_request(&body)?;

    tracing::info!(
        request_id = %request.metadata.request_id,
        user_id = %request.metadata.user_id,
        timeout_ms = request.metadata.timeout,
        prompt_len = request.input.prompt.len(),
        "Executing agent"
    );

    let response = match state
        .agent
        .execute(&request.input.prompt, request.input.context.as_ref())
        .await
    {
        Ok(execution) => (StatusCode::OK, Json(ExecuteResponse::success(execution))),
        Err(e) => {
            tracing::error!(
                request_id = %request.metadata.request_id,
                error = %e,
                "Agent execution failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ExecuteResponse::failure(e.to_string())),
            )
        }
    };

    Ok(response.into_response())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
