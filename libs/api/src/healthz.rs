use axum::http::StatusCode;

/// Liveness check
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up"))
)]
pub(super) async fn get_health() -> StatusCode {
    StatusCode::OK
}
