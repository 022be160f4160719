use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use super::{error::ApiError, state::State};
use crate::domain::model::{
    AuthResponse, HealthStatus, LoginRequest, NotFoundResponse, PublicUser, RegisterRequest,
};

pub async fn root_handler(AxumState(state): AxumState<Arc<State>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "KehilApp API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": state.endpoints(),
    }))
}

pub async fn health_handler(AxumState(state): AxumState<Arc<State>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn register_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedPayload(e.body_text()))?;

    let user = state.auth.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::ok(PublicUser::from(&user))),
    ))
}

pub async fn login_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedPayload(e.body_text()))?;

    let user = state.auth.login(request).await?;
    Ok(Json(AuthResponse::ok(PublicUser::from(&user))))
}

pub async fn not_found_handler(
    AxumState(state): AxumState<Arc<State>>,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    tracing::debug!("404 for {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            message: "Endpoint not found".to_string(),
            requested_url: uri.to_string(),
            available_endpoints: state.endpoints(),
        }),
    )
}
