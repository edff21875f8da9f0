use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running. The relay
/// has no downstream readiness dependencies to check.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}
