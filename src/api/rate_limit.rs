use crate::api::AppState;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

/// Counts throttle decisions and surfaces retry-after hints in the log.
pub async fn log_rate_limit_events(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    let after =
        response.headers().get("x-ratelimit-after").and_then(|v| v.to_str().ok()).map(ToString::to_string);
    state.rate_limit_service.log_decision(response.status(), after);
    response
}
