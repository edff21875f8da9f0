use crate::api::rate_limit::log_rate_limit_events;
use crate::config::Config;
use crate::services::rate_limit_service::RateLimitService;
use crate::services::relay_service::RelayService;
use axum::body::Body;
use axum::http::{HeaderName, Method, Request, header};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod schemas;
pub mod submissions;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub relay_service: RelayService,
    pub rate_limit_service: RateLimitService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub relay_service: RelayService,
    pub rate_limit_service: RateLimitService,
}

/// Configures and returns the application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst)
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .expect("Failed to build rate limiter config"),
    );

    let state = AppState {
        config,
        relay_service: services.relay_service,
        rate_limit_service: services.rate_limit_service,
    };

    // The storefront widget posts cross-origin from the shop pages.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS, Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let submission_routes = Router::new()
        .route("/api/telegram", post(submissions::relay_submission).options(submissions::preflight))
        .layer(GovernorLayer::new(governor_conf));

    Router::new()
        .merge(submission_routes)
        .route("/livez", get(health::livez))
        .method_not_allowed_fallback(submissions::method_not_allowed)
        .layer(from_fn_with_state(state.clone(), log_rate_limit_events))
        .layer(cors)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static("x-request-id"), middleware::MakeRequestUuidOrHeader))
        .with_state(state)
}
