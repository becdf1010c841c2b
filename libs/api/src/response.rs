use std::{collections::HashMap, fmt::Debug, sync::OnceLock};

use axum::{http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::{preview, ApiError};

static ERROR_CODES: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::AuthError(message) => (StatusCode::UNAUTHORIZED, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::UpstreamError(message) => {
                (StatusCode::BAD_GATEWAY, message)
            }
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::PreviewExpired(message) => {
                let jar = CookieJar::new().add(preview::removal_cookie());
                return (
                    StatusCode::UNAUTHORIZED,
                    jar,
                    Json(ErrorResponse { message }),
                )
                    .into_response();
            }
        };
        (status_code, Json(ErrorResponse { message })).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T, E: Debug> IntoApiResponse<T> for Result<T, E> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(error_code, error = format!("{:?}", e));
            error_for(error_code)
        })
    }
}

fn error_codes() -> &'static HashMap<String, String> {
    ERROR_CODES.get_or_init(|| {
        serde_json::from_str(include_str!("error-code.json"))
            .unwrap_or_default()
    })
}

/// Message registered for a code.
pub fn error_message(error_code: &str) -> String {
    error_codes()
        .get(error_code)
        .cloned()
        .unwrap_or_else(|| format!("unexpected error: {error_code}"))
}

/// The error a code stands for, with the message registered for it.
pub fn error_for(error_code: &str) -> ApiError {
    let message = error_message(error_code);

    match error_code.split('-').next() {
        Some("401") => ApiError::AuthError(message),
        Some("404") => ApiError::NotFound(message),
        Some("502") => ApiError::UpstreamError(message),
        _ => ApiError::ServerError(message),
    }
}

#[cfg(test)]
mod test {
    use axum::http::header;

    use super::*;

    #[test]
    fn test_error_codes_are_registered() {
        let codes = [
            "401-001", "404-001", "404-002", "500-001", "502-001", "502-002",
            "502-003",
        ];
        for code in codes {
            assert!(error_codes().contains_key(code), "{code} is missing");
        }
    }

    #[test]
    fn test_error_for() {
        assert!(matches!(
            error_for("401-001"),
            ApiError::AuthError(m) if m == "Invalid token"
        ));
        assert!(matches!(error_for("404-001"), ApiError::NotFound(_)));
        assert!(matches!(error_for("502-001"), ApiError::UpstreamError(_)));
        assert!(matches!(error_for("500-001"), ApiError::ServerError(_)));
        assert!(matches!(
            error_for("999-999"),
            ApiError::ServerError(m) if m.contains("999-999")
        ));
    }

    #[test]
    fn test_into_response_logs_and_maps() {
        let result: Result<(), &str> = Err("boom");

        let mapped = IntoApiResponse::into_response(result, "502-002");

        assert!(matches!(
            mapped,
            Err(ApiError::UpstreamError(m)) if m == "Failed to load post"
        ));
    }

    #[test]
    fn test_expired_preview_clears_cookie() {
        // Arrange
        let error = ApiError::PreviewExpired(error_message("401-001"));

        // Act
        let response = IntoResponse::into_response(error);

        // Assert
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(cookie.starts_with("preview_ref=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
