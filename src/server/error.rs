use crate::domain::model::AuthResponse;
use crate::utils::error::KehilError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(#[source] KehilError),
}

impl From<KehilError> for ApiError {
    fn from(error: KehilError) -> Self {
        match error {
            KehilError::ValidationError { message } => ApiError::Validation(message),
            KehilError::DuplicateEmail { .. } => ApiError::DuplicateEmail,
            KehilError::InvalidCredentials => ApiError::InvalidCredentials,
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MalformedPayload(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Internal(ref source) => {
                tracing::error!("❌ Request failed: {}", source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(AuthResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::MalformedPayload("eof".to_string()), StatusCode::BAD_REQUEST),
            (ApiError::from(KehilError::ValidationError { message: "x".to_string() }), StatusCode::BAD_REQUEST),
            (
                ApiError::from(KehilError::DuplicateEmail { email: "a@b.c".to_string() }),
                StatusCode::CONFLICT,
            ),
            (ApiError::from(KehilError::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (
                ApiError::from(KehilError::ConfigError { message: "boom".to_string() }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
